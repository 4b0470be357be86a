//! Planner facade: reusable complex + basis, one fresh program per solve.

use nalgebra::DVector;
use tracing::{debug, info, warn};

use crate::cfg::SolveCfg;
use crate::complex::{BoundaryOperators, Cell, Edge, GridComplex, VertexId};
use crate::cost::{edge_costs, EdgeCost};
use crate::decompose::{decompose, Decomposition, TieBreak};
use crate::error::{ConfigError, Result, SolveError};
use crate::homology::{HomologyBasis, HomologyClass};
use crate::vectorize::{check_endpoints, to_edge_vector};

use super::oracle::SolverOracle;
use super::problem::{Formulation, HomologyProblem};

/// Complex, boundary operators and homology basis for one grid layout.
#[derive(Clone, Debug)]
pub struct Planner {
    complex: GridComplex,
    ops: BoundaryOperators,
    basis: HomologyBasis,
    cfg: SolveCfg,
}

/// Result of one successful solve.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSolution {
    pub formulation: &'static str,
    /// `|edge_values[k]| > 0` after snapping, aligned with `complex.edges()`.
    pub used: Vec<bool>,
    /// Optimal objective (path length under the cost function).
    pub objective: f64,
    /// Net flow per canonical edge; sign encodes direction, snapped to zero
    /// below `snap_tol`.
    pub edge_values: Vec<f64>,
}

impl Planner {
    /// Build the complex for `(rows, cols, holes)` and everything derived from it.
    pub fn new(
        rows: usize,
        cols: usize,
        holes: impl IntoIterator<Item = Cell>,
        cfg: SolveCfg,
    ) -> Result<Self> {
        Self::from_complex(GridComplex::new(rows, cols, holes)?, cfg)
    }

    /// Fails with `ConfigError::RankMismatch` unless every hole contributes
    /// exactly one independent loop.
    pub fn from_complex(complex: GridComplex, cfg: SolveCfg) -> Result<Self> {
        let ops = BoundaryOperators::new(&complex, cfg.boundary_tol)?;
        let basis = HomologyBasis::compute(&ops, cfg.kernel_tol)?;
        let holes = complex.holes().len();
        if basis.rank() != holes {
            warn!(
                holes,
                rank = basis.rank(),
                kernel_tol = cfg.kernel_tol,
                "homology rank mismatch"
            );
            return Err(ConfigError::RankMismatch {
                holes,
                rank: basis.rank(),
            }
            .into());
        }
        Ok(Self {
            complex,
            ops,
            basis,
            cfg,
        })
    }

    #[inline]
    pub fn complex(&self) -> &GridComplex {
        &self.complex
    }
    #[inline]
    pub fn operators(&self) -> &BoundaryOperators {
        &self.ops
    }
    #[inline]
    pub fn basis(&self) -> &HomologyBasis {
        &self.basis
    }
    #[inline]
    pub fn cfg(&self) -> SolveCfg {
        self.cfg
    }

    /// Homology coordinates of a vertex path.
    pub fn classify(&self, path: &[VertexId]) -> Result<HomologyClass> {
        let x = to_edge_vector(&self.complex, path)?;
        Ok(self.basis.project(&x))
    }

    /// Validate the reference path and assemble the shared encoding inputs.
    pub fn problem<C: EdgeCost + ?Sized>(
        &self,
        reference: &[VertexId],
        cost: &C,
    ) -> Result<HomologyProblem<'_>> {
        let (Some(source), Some(sink)) = (self.complex.source(), self.complex.sink()) else {
            return Err(ConfigError::EmptyGrid {
                rows: self.complex.rows(),
                cols: self.complex.cols(),
            }
            .into());
        };
        let x_ref = to_edge_vector(&self.complex, reference)?;
        check_endpoints(reference, source, sink)?;
        let target = self.basis.project(&x_ref);
        Ok(HomologyProblem {
            complex: &self.complex,
            ops: &self.ops,
            basis: &self.basis,
            costs: edge_costs(&self.complex, cost),
            reference: x_ref,
            target,
            source,
            sink,
        })
    }

    /// Cheapest source→sink flow homologous to `reference` under `formulation`.
    ///
    /// Infeasibility comes back as `SolveError::Infeasible` with the oracle's
    /// conflict set; nothing is retried.
    pub fn solve<C, F, O>(
        &self,
        reference: &[VertexId],
        cost: &C,
        formulation: &F,
        oracle: &O,
    ) -> Result<PathSolution>
    where
        C: EdgeCost + ?Sized,
        F: Formulation + ?Sized,
        O: SolverOracle + ?Sized,
    {
        let problem = self.problem(reference, cost)?;
        let model = formulation.encode(&problem);
        debug!(
            formulation = formulation.name(),
            vars = model.lp.vars.len(),
            constraints = model.lp.constraints.len(),
            rank = self.basis.rank(),
            "model encoded"
        );
        let assignment = oracle.solve(&model.lp).map_err(SolveError::from)?;
        if assignment.values.len() != model.lp.vars.len() {
            return Err(SolveError::MalformedAssignment {
                expected: model.lp.vars.len(),
                got: assignment.values.len(),
            }
            .into());
        }

        let snap = self.cfg.snap_tol;
        let edge_values: Vec<f64> = model
            .net
            .iter()
            .map(|&(pos, neg)| {
                let v = assignment.value(pos) - assignment.value(neg);
                if v.abs() < snap {
                    0.0
                } else {
                    v
                }
            })
            .collect();
        let used: Vec<bool> = edge_values.iter().map(|v| *v != 0.0).collect();

        for (e, v) in self.complex.edges().iter().zip(&edge_values) {
            if *v != 0.0 {
                let direction = if *v > 0.0 { "forward" } else { "backward" };
                debug!(from = %e.from, to = %e.to, direction, value = *v, "edge used");
            }
        }
        info!(
            formulation = formulation.name(),
            objective = assignment.objective,
            used = used.iter().filter(|u| **u).count(),
            "optimal path found"
        );
        Ok(PathSolution {
            formulation: formulation.name(),
            used,
            objective: assignment.objective,
            edge_values,
        })
    }
}

impl PathSolution {
    /// Snapped net flows as a chain over the complex's edges.
    pub fn edge_vector(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.edge_values)
    }

    pub fn projection(&self, basis: &HomologyBasis) -> HomologyClass {
        basis.project(&self.edge_vector())
    }

    /// Used edges, oriented by the sign of their flow.
    pub fn directed_edges(&self, edges: &[Edge]) -> Vec<Edge> {
        edges
            .iter()
            .zip(&self.edge_values)
            .filter(|(_, v)| **v != 0.0)
            .map(|(e, v)| if *v > 0.0 { *e } else { e.reversed() })
            .collect()
    }

    /// Split the flow into a primary chain and residual cycles.
    pub fn decompose<T: TieBreak + ?Sized>(
        &self,
        edges: &[Edge],
        tol: f64,
        tie_break: &T,
    ) -> Decomposition {
        decompose(&self.edge_values, edges, tol, tie_break)
    }
}
