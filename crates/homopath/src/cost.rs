//! Per-edge weights for the optimisation models.

use crate::complex::{Cell, GridComplex};

/// Weight of traversing the grid edge between two adjacent cells.
///
/// Costs are symmetric: both arcs of an edge get the same weight.
pub trait EdgeCost {
    fn cost(&self, a: Cell, b: Cell) -> f64;
}

/// Euclidean length: `1` for axis-aligned edges, `√2` for diagonals.
#[derive(Clone, Copy, Debug, Default)]
pub struct EuclideanCost;

impl EdgeCost for EuclideanCost {
    fn cost(&self, a: Cell, b: Cell) -> f64 {
        let dr = a.row.abs_diff(b.row) as f64;
        let dc = a.col.abs_diff(b.col) as f64;
        dr.hypot(dc)
    }
}

/// Hop count: every edge weighs `1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformCost;

impl EdgeCost for UniformCost {
    fn cost(&self, _a: Cell, _b: Cell) -> f64 {
        1.0
    }
}

impl<F> EdgeCost for F
where
    F: Fn(Cell, Cell) -> f64,
{
    fn cost(&self, a: Cell, b: Cell) -> f64 {
        self(a, b)
    }
}

/// Costs aligned with `complex.edges()`.
pub fn edge_costs<C: EdgeCost + ?Sized>(complex: &GridComplex, cost: &C) -> Vec<f64> {
    complex
        .edges()
        .iter()
        .map(|e| match (complex.cell_of(e.from), complex.cell_of(e.to)) {
            (Some(a), Some(b)) => cost.cost(a, b),
            _ => f64::INFINITY,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_distinguishes_axis_and_diagonal() {
        let c = GridComplex::new(3, 3, []).unwrap();
        let costs = edge_costs(&c, &EuclideanCost);
        for (e, w) in c.edges().iter().zip(&costs) {
            let expected = if c.is_diagonal(*e) {
                std::f64::consts::SQRT_2
            } else {
                1.0
            };
            assert!((w - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn closures_are_cost_functions() {
        let c = GridComplex::new(2, 2, []).unwrap();
        let costs = edge_costs(&c, &|a: Cell, _b: Cell| a.row as f64 + 2.0);
        assert_eq!(costs.len(), c.edges().len());
        assert!(costs.iter().all(|w| *w >= 2.0));
        assert!(edge_costs(&c, &UniformCost).iter().all(|w| *w == 1.0));
    }
}
