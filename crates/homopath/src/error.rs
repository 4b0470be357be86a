use thiserror::Error;

use crate::complex::{Cell, VertexId};
use crate::optimize::ConflictSet;

/// Top-level error type for grid construction, path handling and solving.
#[derive(Debug, Error)]
pub enum HomopathError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Rejected grid or hole layouts, caught before any edge is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("hole {cell} lies outside the {rows}x{cols} grid")]
    HoleOutOfBounds { cell: Cell, rows: usize, cols: usize },

    #[error("hole {cell} needs two cells of clearance from the grid border")]
    HoleNearBorder { cell: Cell },

    #[error("hole {cell} is listed more than once")]
    DuplicateHole { cell: Cell },

    #[error("holes {a} and {b} are closer than Chebyshev distance 4; their cut-outs would merge")]
    HolesTooClose { a: Cell, b: Cell },

    #[error("{holes} holes declared but the homology basis has rank {rank}")]
    RankMismatch { holes: usize, rank: usize },
}

/// Internal invariant violations of the simplicial structure.
///
/// Any of these means `d1 · d2 ≠ 0` somewhere and downstream homology is void.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("hole cut-out expected edge {from} -> {to}, which is absent")]
    MissingRemovalEdge { from: Cell, to: Cell },

    #[error("triangle edge {a} -- {b} is not in the edge set")]
    MissingTriangleEdge { a: VertexId, b: VertexId },

    #[error("boundary of boundary is not zero (max |d1·d2| = {max_abs})")]
    BoundaryNotClosed { max_abs: f64 },

    #[error("singular value decomposition of the edge Laplacian did not converge")]
    KernelUnavailable,
}

/// Caller-contract violations on reference paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path needs at least two vertices (got {len})")]
    TooShort { len: usize },

    #[error("vertex {0} is not part of the complex")]
    UnknownVertex(VertexId),

    #[error("consecutive vertices {from} -> {to} are not joined by an edge")]
    NotAdjacent { from: VertexId, to: VertexId },

    #[error("path runs {start} -> {end}, expected {expected_start} -> {expected_end}")]
    EndpointMismatch {
        start: VertexId,
        end: VertexId,
        expected_start: VertexId,
        expected_end: VertexId,
    },
}

/// Failures reported by or around the solver oracle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("model is infeasible; conflicting subsystem: {0}")]
    Infeasible(ConflictSet),

    #[error("model is unbounded")]
    Unbounded,

    #[error("solver backend failed: {0}")]
    Backend(String),

    #[error("assignment has {got} values, model has {expected} variables")]
    MalformedAssignment { expected: usize, got: usize },
}

/// Convenience type alias for results using [`HomopathError`].
pub type Result<T> = std::result::Result<T, HomopathError>;
