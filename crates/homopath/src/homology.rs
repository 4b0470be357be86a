//! Homology basis of the punctured grid and projections onto it.
//!
//! The kernel of the edge Laplacian `L = d1ᵗd1 + d2d2ᵗ` consists of chains that
//! are both cycles (`d1 x = 0`) and orthogonal to every triangle boundary
//! (`d2ᵗ x = 0`). Its dimension is the number of independent loops around the
//! holes; each hole cut-out contributes one when holes are well separated.
//!
//! The kernel is read off the SVD of `L`: right-singular vectors with singular
//! value below `kernel_tol`. The columns of `H` are orthonormal, so two chains
//! with equal boundary are homologous iff `Hᵗ x` agrees.

use nalgebra::{DMatrix, DVector, SVD};
use tracing::debug;

use crate::complex::BoundaryOperators;
use crate::error::{Result, TopologyError};

/// Orthonormal basis `H` (edges × rank) of the harmonic edge chains.
#[derive(Clone, Debug)]
pub struct HomologyBasis {
    h: DMatrix<f64>,
}

/// Coordinates of an edge chain in a [`HomologyBasis`].
#[derive(Clone, Debug, PartialEq)]
pub struct HomologyClass(pub DVector<f64>);

impl HomologyBasis {
    /// Kernel of the edge Laplacian via SVD with threshold `kernel_tol`.
    pub fn compute(ops: &BoundaryOperators, kernel_tol: f64) -> Result<Self> {
        let lap = ops.edge_laplacian();
        let n = lap.nrows();
        if n == 0 {
            return Ok(Self {
                h: DMatrix::zeros(0, 0),
            });
        }
        let svd = SVD::new(lap, false, true);
        let v_t = svd.v_t.ok_or(TopologyError::KernelUnavailable)?;
        let kernel: Vec<usize> = svd
            .singular_values
            .iter()
            .enumerate()
            .filter(|(_, s)| **s < kernel_tol)
            .map(|(i, _)| i)
            .collect();
        let mut h = DMatrix::zeros(n, kernel.len());
        for (k, &i) in kernel.iter().enumerate() {
            h.set_column(k, &v_t.row(i).transpose());
        }
        debug!(edges = n, rank = kernel.len(), kernel_tol, "homology basis");
        Ok(Self { h })
    }

    /// Number of independent non-bounding loops.
    #[inline]
    pub fn rank(&self) -> usize {
        self.h.ncols()
    }

    /// Basis matrix `H` (edges × rank).
    #[inline]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.h
    }

    /// `Hᵗ x` for a signed edge chain `x` over the same complex.
    pub fn project(&self, edge_vector: &DVector<f64>) -> HomologyClass {
        if self.rank() == 0 {
            return HomologyClass(DVector::zeros(0));
        }
        debug_assert_eq!(edge_vector.len(), self.h.nrows(), "edge vector length");
        HomologyClass(self.h.tr_mul(edge_vector))
    }
}

impl HomologyClass {
    #[inline]
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Max-abs coordinate difference; infinite when ranks differ.
    pub fn distance(&self, other: &HomologyClass) -> f64 {
        if self.rank() != other.rank() {
            return f64::INFINITY;
        }
        if self.rank() == 0 {
            return 0.0;
        }
        (&self.0 - &other.0).amax()
    }

    #[inline]
    pub fn approx_eq(&self, other: &HomologyClass, tol: f64) -> bool {
        self.distance(other) <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::{Cell, GridComplex, MIN_HOLE_SEPARATION};
    use crate::vectorize::to_edge_vector;

    fn basis(rows: usize, cols: usize, holes: &[Cell], tol: f64) -> (GridComplex, HomologyBasis) {
        let complex = GridComplex::new(rows, cols, holes.iter().copied()).unwrap();
        let ops = BoundaryOperators::new(&complex, 1e-9).unwrap();
        let basis = HomologyBasis::compute(&ops, tol).unwrap();
        (complex, basis)
    }

    #[test]
    fn no_holes_has_trivial_homology() {
        let (_, b) = basis(5, 5, &[], 1e-6);
        assert_eq!(b.rank(), 0);
        let (_, b) = basis(4, 6, &[], 1e-6);
        assert_eq!(b.rank(), 0);
    }

    #[test]
    fn rank_counts_separated_holes() {
        let (_, one) = basis(7, 7, &[Cell::new(3, 3)], 1e-6);
        assert_eq!(one.rank(), 1);
        let (_, odd) = basis(7, 7, &[Cell::new(3, 2)], 1e-6);
        assert_eq!(odd.rank(), 1);
        let (_, two) = basis(12, 12, &[Cell::new(3, 3), Cell::new(8, 8)], 1e-6);
        assert_eq!(two.rank(), 2);
    }

    #[test]
    fn minimum_separation_keeps_one_loop_per_hole() {
        assert_eq!(MIN_HOLE_SEPARATION, 4);
        let others = [Cell::new(3, 7), Cell::new(7, 7), Cell::new(7, 5), Cell::new(7, 3)];
        for other in others {
            let (_, b) = basis(12, 12, &[Cell::new(3, 3), other], 1e-6);
            assert_eq!(b.rank(), 2, "holes (3, 3) and {other}");
        }
        let (_, odd) = basis(12, 12, &[Cell::new(3, 4), Cell::new(7, 8)], 1e-6);
        assert_eq!(odd.rank(), 2);
        let three = [Cell::new(3, 3), Cell::new(3, 7), Cell::new(7, 5)];
        let (_, b) = basis(14, 14, &three, 1e-6);
        assert_eq!(b.rank(), 3);
    }

    #[test]
    fn basis_columns_are_orthonormal_harmonic_chains() {
        let complex = GridComplex::new(12, 12, [Cell::new(3, 3), Cell::new(8, 8)]).unwrap();
        let ops = BoundaryOperators::new(&complex, 1e-9).unwrap();
        let b = HomologyBasis::compute(&ops, 1e-6).unwrap();
        let h = b.matrix();
        let gram = h.tr_mul(h);
        assert!((gram - DMatrix::identity(2, 2)).amax() < 1e-9);
        assert!((&ops.d1 * h).amax() < 1e-9);
        assert!((ops.d2.tr_mul(h)).amax() < 1e-9);
    }

    #[test]
    fn rank_is_stable_across_reasonable_tolerances() {
        for tol in [1e-9, 1e-8, 1e-6, 1e-4] {
            let (_, b) = basis(9, 9, &[Cell::new(4, 4)], tol);
            assert_eq!(b.rank(), 1, "tol = {tol}");
        }
        // An absurd threshold swallows non-kernel directions too.
        let (_, loose) = basis(9, 9, &[Cell::new(4, 4)], 10.0);
        assert!(loose.rank() > 1);
    }

    #[test]
    fn loop_around_hole_projects_nonzero_and_boundary_loop_projects_zero() {
        let (c, b) = basis(7, 7, &[Cell::new(3, 3)], 1e-6);
        let ring: Vec<Cell> = (0..6)
            .map(|k| Cell::new(1, 1 + k))
            .chain((1..6).map(|k| Cell::new(1 + k, 6)))
            .chain((1..6).map(|k| Cell::new(6, 6 - k)))
            .chain((1..6).map(|k| Cell::new(6 - k, 1)))
            .collect();
        let path: Vec<_> = ring.iter().map(|&cell| c.vertex_at(cell).unwrap()).collect();
        let x = to_edge_vector(&c, &path).unwrap();
        assert!(b.project(&x).0.amax() > 1e-3);

        // Unit square in a hole-free corner bounds two triangles.
        let square = [
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(1, 1),
            Cell::new(1, 0),
            Cell::new(0, 0),
        ];
        let path: Vec<_> = square.iter().map(|&cell| c.vertex_at(cell).unwrap()).collect();
        let x = to_edge_vector(&c, &path).unwrap();
        assert!(b.project(&x).0.amax() < 1e-9);
    }

    #[test]
    fn class_distance_handles_rank_mismatch() {
        let a = HomologyClass(DVector::from_vec(vec![1.0, 2.0]));
        let b = HomologyClass(DVector::from_vec(vec![1.0]));
        assert!(a.distance(&b).is_infinite());
        assert!(a.approx_eq(&a.clone(), 0.0));
    }
}
