//! Optimal homologous chain encoding with explicit triangle variables.

use super::problem::{EncodedModel, Formulation, HomologyProblem};
use super::program::{LinearProgram, Sense, VarId};

/// `x⁺ − x⁻ = x_ref + d2 (y⁺ − y⁻)` per edge, minimising `Σ w (x⁺ + x⁻)`.
///
/// Any feasible chain differs from the reference by a boundary of triangles,
/// so it shares both endpoints and homology class without using the basis.
#[derive(Clone, Copy, Debug, Default)]
pub struct OhcpFormulation;

impl Formulation for OhcpFormulation {
    fn name(&self) -> &'static str {
        "ohcp"
    }

    fn encode(&self, problem: &HomologyProblem<'_>) -> EncodedModel {
        let complex = problem.complex;
        let edges = complex.edges();
        let triangles = complex.triangles();
        let mut lp = LinearProgram::new("ohcp");

        let x_plus: Vec<VarId> = edges
            .iter()
            .map(|e| {
                let name = format!("x_plus_{}_{}", e.from.0, e.to.0);
                lp.add_continuous(name, 0.0, f64::INFINITY)
            })
            .collect();
        let x_minus: Vec<VarId> = edges
            .iter()
            .map(|e| {
                let name = format!("x_minus_{}_{}", e.from.0, e.to.0);
                lp.add_continuous(name, 0.0, f64::INFINITY)
            })
            .collect();
        let y_plus: Vec<VarId> = (0..triangles.len())
            .map(|t| lp.add_continuous(format!("y_plus_{t}"), 0.0, f64::INFINITY))
            .collect();
        let y_minus: Vec<VarId> = (0..triangles.len())
            .map(|t| lp.add_continuous(format!("y_minus_{t}"), 0.0, f64::INFINITY))
            .collect();

        for (k, &w) in problem.costs.iter().enumerate() {
            lp.minimise_term(x_plus[k], w);
            lp.minimise_term(x_minus[k], w);
        }

        let mut rows: Vec<Vec<(VarId, f64)>> = (0..edges.len())
            .map(|k| vec![(x_plus[k], 1.0), (x_minus[k], -1.0)])
            .collect();
        for (t, tri) in triangles.iter().enumerate() {
            for (a, b) in tri.boundary() {
                let Some((k, _)) = complex.oriented_edge(a, b) else {
                    continue;
                };
                let d = problem.ops.d2[(k, t)];
                rows[k].extend([(y_plus[t], -d), (y_minus[t], d)]);
            }
        }
        for ((e, terms), &x_ref) in edges.iter().zip(rows).zip(problem.reference.iter()) {
            lp.add_constraint(
                format!("edge_{}_{}", e.from.0, e.to.0),
                terms,
                Sense::Eq,
                x_ref,
            );
        }

        let net = x_plus.into_iter().zip(x_minus).collect();
        EncodedModel { lp, net }
    }
}
