//! Arc-flow encodings: LP relaxation and MTZ integer program.

use std::collections::HashMap;

use crate::complex::VertexId;

use super::problem::{EncodedModel, Formulation, HomologyProblem};
use super::program::{LinearProgram, Sense, VarId};

/// Continuous arc flows in `[0, 1]`.
///
/// The relaxation may return detached cycles next to (or fractional mixes
/// of) source→sink paths; [`MtzFormulation`] rules those out.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlowFormulation;

/// Binary arcs plus ordering variables `u[v] ∈ [0, N−1]`, `u[source] = 0`,
/// and `u[a] − u[b] + N·x(a,b) ≤ N − 1` for every arc.
#[derive(Clone, Copy, Debug, Default)]
pub struct MtzFormulation;

impl Formulation for FlowFormulation {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn encode(&self, problem: &HomologyProblem<'_>) -> EncodedModel {
        let arcs = ArcModel::build(problem, "homology_constrained_flow", false);
        arcs.into_encoded()
    }
}

impl Formulation for MtzFormulation {
    fn name(&self) -> &'static str {
        "mtz"
    }

    fn encode(&self, problem: &HomologyProblem<'_>) -> EncodedModel {
        let mut arcs = ArcModel::build(problem, "homology_constrained_mtz", true);
        let vertices = problem.complex.vertices();
        let n = vertices.len() as f64;
        let order: HashMap<VertexId, VarId> = vertices
            .iter()
            .map(|&v| (v, arcs.lp.add_continuous(format!("u_{}", v.0), 0.0, n - 1.0)))
            .collect();
        if let Some(&u_s) = order.get(&problem.source) {
            arcs.lp.add_constraint("u_start", vec![(u_s, 1.0)], Sense::Eq, 0.0);
        }
        let edges = problem.complex.edges();
        let directed = edges
            .iter()
            .zip(&arcs.fwd)
            .map(|(e, &x)| (e.from, e.to, x))
            .chain(edges.iter().zip(&arcs.rev).map(|(e, &x)| (e.to, e.from, x)))
            .collect::<Vec<_>>();
        for (a, b, x) in directed {
            if let (Some(&ua), Some(&ub)) = (order.get(&a), order.get(&b)) {
                arcs.lp.add_constraint(
                    format!("mtz_{}_{}", a.0, b.0),
                    vec![(ua, 1.0), (ub, -1.0), (x, n)],
                    Sense::Le,
                    n - 1.0,
                );
            }
        }
        arcs.into_encoded()
    }
}

/// Both arcs of every edge, cost objective, conservation and homology rows.
struct ArcModel {
    lp: LinearProgram,
    fwd: Vec<VarId>,
    rev: Vec<VarId>,
}

impl ArcModel {
    fn build(problem: &HomologyProblem<'_>, name: &str, binary: bool) -> Self {
        let complex = problem.complex;
        let edges = complex.edges();
        let mut lp = LinearProgram::new(name);
        let arc = |lp: &mut LinearProgram, a: VertexId, b: VertexId| {
            let label = format!("x_{}_{}", a.0, b.0);
            if binary {
                lp.add_binary(label)
            } else {
                lp.add_continuous(label, 0.0, 1.0)
            }
        };
        let fwd: Vec<VarId> = edges.iter().map(|e| arc(&mut lp, e.from, e.to)).collect();
        let rev: Vec<VarId> = edges.iter().map(|e| arc(&mut lp, e.to, e.from)).collect();

        for (k, &w) in problem.costs.iter().enumerate() {
            lp.minimise_term(fwd[k], w);
            lp.minimise_term(rev[k], w);
        }

        // outflow − inflow per vertex, indexed by dense position.
        let mut balance: Vec<Vec<(VarId, f64)>> = vec![Vec::new(); complex.vertices().len()];
        for (k, e) in edges.iter().enumerate() {
            if let (Some(pu), Some(pv)) = (complex.position(e.from), complex.position(e.to)) {
                balance[pu].extend([(fwd[k], 1.0), (rev[k], -1.0)]);
                balance[pv].extend([(fwd[k], -1.0), (rev[k], 1.0)]);
            }
        }
        for (&v, terms) in complex.vertices().iter().zip(balance) {
            let supply = if v == problem.source {
                1.0
            } else if v == problem.sink {
                -1.0
            } else {
                0.0
            };
            lp.add_constraint(format!("flow_{}", v.0), terms, Sense::Eq, supply);
        }

        let h = problem.basis.matrix();
        for j in 0..problem.basis.rank() {
            let mut terms = Vec::with_capacity(2 * edges.len());
            for k in 0..edges.len() {
                let coef = h[(k, j)];
                if coef != 0.0 {
                    terms.push((fwd[k], coef));
                    terms.push((rev[k], -coef));
                }
            }
            lp.add_constraint(
                format!("harm_proj_{j}"),
                terms,
                Sense::Eq,
                problem.target.0[j],
            );
        }
        Self { lp, fwd, rev }
    }

    fn into_encoded(self) -> EncodedModel {
        let net = self.fwd.into_iter().zip(self.rev).collect();
        EncodedModel { lp: self.lp, net }
    }
}
