//! Shared inputs of every encoding and the `Formulation` seam.

use nalgebra::DVector;

use crate::complex::{BoundaryOperators, GridComplex, VertexId};
use crate::homology::{HomologyBasis, HomologyClass};

use super::flow::{FlowFormulation, MtzFormulation};
use super::ohcp::OhcpFormulation;
use super::program::{LinearProgram, VarId};

/// Everything an encoding needs for one solve.
#[derive(Clone, Debug)]
pub struct HomologyProblem<'a> {
    pub complex: &'a GridComplex,
    pub ops: &'a BoundaryOperators,
    pub basis: &'a HomologyBasis,
    /// Per canonical edge, used for both arcs.
    pub costs: Vec<f64>,
    /// Signed edge chain of the reference path.
    pub reference: DVector<f64>,
    /// `Hᵗ · reference`.
    pub target: HomologyClass,
    pub source: VertexId,
    pub sink: VertexId,
}

/// Program plus the recipe to read a net edge flow back out of it:
/// for edge `k`, `value(net[k].0) − value(net[k].1)`.
#[derive(Clone, Debug)]
pub struct EncodedModel {
    pub lp: LinearProgram,
    pub net: Vec<(VarId, VarId)>,
}

/// One way of turning a [`HomologyProblem`] into a program.
pub trait Formulation {
    fn name(&self) -> &'static str;
    fn encode(&self, problem: &HomologyProblem<'_>) -> EncodedModel;
}

/// Selector over the built-in encodings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    /// Continuous arc flows with basis-projection constraints.
    #[default]
    Flow,
    /// Binary arcs with MTZ subtour elimination.
    Mtz,
    /// Explicit 2-chain (triangle) deviation variables.
    Ohcp,
}

impl Formulation for Variant {
    fn name(&self) -> &'static str {
        match self {
            Variant::Flow => FlowFormulation.name(),
            Variant::Mtz => MtzFormulation.name(),
            Variant::Ohcp => OhcpFormulation.name(),
        }
    }

    fn encode(&self, problem: &HomologyProblem<'_>) -> EncodedModel {
        match self {
            Variant::Flow => FlowFormulation.encode(problem),
            Variant::Mtz => MtzFormulation.encode(problem),
            Variant::Ohcp => OhcpFormulation.encode(problem),
        }
    }
}
