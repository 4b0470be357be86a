//! Homology-constrained shortest paths on punctured grids.
//!
//! Pipeline
//! - `complex`: grid vertices, edges (axis + checkerboard diagonals), oriented
//!   triangles, and the boundary operators `d1`, `d2`.
//! - `homology`: kernel of the edge Laplacian `d1ᵗd1 + d2d2ᵗ` (one column per
//!   independent loop around the holes) and projections onto it.
//! - `vectorize`: vertex path → signed edge chain.
//! - `optimize`: flow / MTZ / OHCP encodings handed to a solver oracle.
//! - `decompose`, `shortest`: post-solve chain splitting and hop-count routing.
//!
//! Complexes and their operators are immutable once built and can be shared
//! across solves; each solve builds and drops its own program.

pub mod api;
pub mod cfg;
pub mod complex;
pub mod cost;
pub mod decompose;
pub mod error;
pub mod homology;
pub mod optimize;
pub mod shortest;
pub mod vectorize;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::SolveCfg;
pub use error::{HomopathError, Result};
pub use nalgebra::{DMatrix, DVector};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::SolveCfg;
    pub use crate::complex::{BoundaryOperators, Cell, Edge, GridComplex, Triangle, VertexId};
    pub use crate::cost::{EdgeCost, EuclideanCost, UniformCost};
    pub use crate::decompose::{decompose, Chain, Decomposition, FirstFound, TieBreak};
    pub use crate::homology::{HomologyBasis, HomologyClass};
    pub use crate::optimize::{MicroLpOracle, PathSolution, Planner, SolverOracle, Variant};
    pub use crate::shortest::{dijkstra, reconstruct, stitch_through_cycle, ShortestPaths};
    pub use crate::vectorize::to_edge_vector;
}
