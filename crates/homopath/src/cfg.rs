//! Tolerance defaults for basis extraction, flow snapping and decomposition.
//!
//! Policy
//! - One `Copy` struct passed explicitly; no global state.
//! - Kernel extraction is sensitive to grid size (the Laplacian grows with the
//!   edge count), so `kernel_tol` stays configurable and is exercised in tests.

/// Numeric tolerances used across the pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveCfg {
    /// Singular values below this select kernel vectors of the edge Laplacian.
    pub kernel_tol: f64,
    /// Net edge flows with magnitude below this are snapped to zero.
    pub snap_tol: f64,
    /// Edge values with magnitude at or below this are ignored by `decompose`.
    pub decompose_tol: f64,
    /// Max-abs entry allowed in `d1 · d2`.
    pub boundary_tol: f64,
}

impl Default for SolveCfg {
    fn default() -> Self {
        Self {
            kernel_tol: 1e-6,
            snap_tol: 1e-3,
            decompose_tol: 1e-6,
            boundary_tol: 1e-9,
        }
    }
}

impl SolveCfg {
    /// Same defaults with a different kernel tolerance.
    pub fn with_kernel_tol(self, kernel_tol: f64) -> Self {
        Self { kernel_tol, ..self }
    }
}
