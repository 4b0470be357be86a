//! Simplicial structure of a punctured grid.
//!
//! Purpose
//! - Enumerate vertices (non-hole cells), edges (axis + checkerboard diagonals)
//!   and counter-clockwise triangles for an `rows × cols` grid with single-cell
//!   holes, and build the signed incidence matrices `d1` (vertices × edges) and
//!   `d2` (edges × triangles).
//!
//! Conventions
//! - A cell is `(row, col)`; geometrically `x = col`, `y = row`.
//! - Vertex ids are `row * cols + col`; matrix rows use the dense position of
//!   the id among the surviving vertices.
//! - Edges keep the orientation they were generated with (towards larger row,
//!   or larger column on the same row); this is the canonical orientation.
//! - Around each hole the whole 3×3 block is cut out: edges touching the hole
//!   or any of its eight neighbours are removed. The resulting octagonal
//!   puncture keeps the triangulation clean at the cost of a larger hole.
//!
//! Split: `types.rs` (ids and simplices), `build.rs` (construction and the
//! read interface), `boundary.rs` (incidence matrices).

mod boundary;
mod build;
mod types;

pub use boundary::BoundaryOperators;
pub use build::{GridComplex, MIN_HOLE_SEPARATION};
pub use types::{Cell, Edge, Triangle, VertexId};

#[cfg(test)]
mod tests;
