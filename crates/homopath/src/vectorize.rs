//! Vertex paths to signed edge chains.

use nalgebra::DVector;

use crate::complex::{GridComplex, VertexId};
use crate::error::PathError;

/// Signed edge-indicator chain of a vertex path over `complex.edges()`.
///
/// Each hop `(a, b)` adds `+1` on the canonical edge `a → b` or `-1` on the
/// canonical edge `b → a`. Hops over non-edges are rejected, never skipped.
/// Repeated traversals accumulate, so a path and its reverse give exactly
/// negated chains.
pub fn to_edge_vector(
    complex: &GridComplex,
    path: &[VertexId],
) -> Result<DVector<f64>, PathError> {
    if path.len() < 2 {
        return Err(PathError::TooShort { len: path.len() });
    }
    if let Some(&v) = path.iter().find(|&&v| complex.position(v).is_none()) {
        return Err(PathError::UnknownVertex(v));
    }
    let mut x = DVector::zeros(complex.edges().len());
    for hop in path.windows(2) {
        let (from, to) = (hop[0], hop[1]);
        let (k, sign) = complex
            .oriented_edge(from, to)
            .ok_or(PathError::NotAdjacent { from, to })?;
        x[k] += sign;
    }
    Ok(x)
}

/// Reject paths that do not run from `source` to `sink`.
pub fn check_endpoints(
    path: &[VertexId],
    source: VertexId,
    sink: VertexId,
) -> Result<(), PathError> {
    match (path.first(), path.last()) {
        (Some(&start), Some(&end)) if start == source && end == sink => Ok(()),
        (Some(&start), Some(&end)) => Err(PathError::EndpointMismatch {
            start,
            end,
            expected_start: source,
            expected_end: sink,
        }),
        _ => Err(PathError::TooShort { len: path.len() }),
    }
}
