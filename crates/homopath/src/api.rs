//! Curated surface for callers that drive the whole pipeline.
//!
//! Grouped by stage; prefer these re-exports over reaching into submodules.

// Complex and operators
pub use crate::complex::{
    BoundaryOperators, Cell, Edge, GridComplex, Triangle, VertexId, MIN_HOLE_SEPARATION,
};
// Homology
pub use crate::homology::{HomologyBasis, HomologyClass};
pub use crate::vectorize::{check_endpoints, to_edge_vector};
// Optimisation
pub use crate::cost::{edge_costs, EdgeCost, EuclideanCost, UniformCost};
pub use crate::optimize::{
    Assignment, ConflictSet, FlowFormulation, Formulation, LinearProgram, MicroLpOracle,
    MtzFormulation, OhcpFormulation, OracleError, PathSolution, Planner, SolverOracle, Variant,
};
// Post-processing
pub use crate::decompose::{decompose, Chain, Decomposition, FirstFound, TieBreak};
pub use crate::shortest::{dijkstra, reconstruct, stitch_through_cycle, ShortestPaths, Stitch};
// Configuration and errors
pub use crate::cfg::SolveCfg;
pub use crate::error::{ConfigError, HomopathError, PathError, SolveError, TopologyError};
