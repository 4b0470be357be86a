//! Signed incidence (boundary) matrices of the grid complex.

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{Result, TopologyError};

use super::build::GridComplex;

/// `d1` (vertices × edges) and `d2` (edges × triangles) for one complex.
///
/// Invariant: `d1 · d2 = 0` within `boundary_tol`; checked on construction.
#[derive(Clone, Debug)]
pub struct BoundaryOperators {
    pub d1: DMatrix<f64>,
    pub d2: DMatrix<f64>,
}

impl BoundaryOperators {
    /// Build both operators and verify that the boundary of a boundary vanishes.
    pub fn new(complex: &GridComplex, boundary_tol: f64) -> Result<Self> {
        let d1 = build_d1(complex);
        let d2 = build_d2(complex)?;
        let ops = Self { d1, d2 };
        let max_abs = ops.boundary_defect();
        if max_abs > boundary_tol {
            return Err(TopologyError::BoundaryNotClosed { max_abs }.into());
        }
        debug!(
            d1 = ?ops.d1.shape(),
            d2 = ?ops.d2.shape(),
            "boundary operators built"
        );
        Ok(ops)
    }

    /// Max-abs entry of `d1 · d2`.
    pub fn boundary_defect(&self) -> f64 {
        (&self.d1 * &self.d2)
            .iter()
            .fold(0.0_f64, |m, x| m.max(x.abs()))
    }

    /// Edge Laplacian `d1ᵗ d1 + d2 d2ᵗ` (square, edges × edges).
    pub fn edge_laplacian(&self) -> DMatrix<f64> {
        self.d1.transpose() * &self.d1 + &self.d2 * self.d2.transpose()
    }
}

/// Column for edge `(u, v)`: `-1` at `u`, `+1` at `v`.
pub(crate) fn build_d1(complex: &GridComplex) -> DMatrix<f64> {
    let mut d1 = DMatrix::zeros(complex.vertices().len(), complex.edges().len());
    for (k, e) in complex.edges().iter().enumerate() {
        if let (Some(pu), Some(pv)) = (complex.position(e.from), complex.position(e.to)) {
            d1[(pu, k)] = -1.0;
            d1[(pv, k)] = 1.0;
        }
    }
    d1
}

/// Column for triangle `(u, v, w)`: `±1` on each boundary edge by orientation.
pub(crate) fn build_d2(complex: &GridComplex) -> Result<DMatrix<f64>> {
    let mut d2 = DMatrix::zeros(complex.edges().len(), complex.triangles().len());
    for (j, tri) in complex.triangles().iter().enumerate() {
        for (a, b) in tri.boundary() {
            let (row, sign) = complex
                .oriented_edge(a, b)
                .ok_or(TopologyError::MissingTriangleEdge { a, b })?;
            d2[(row, j)] = sign;
        }
    }
    Ok(d2)
}
