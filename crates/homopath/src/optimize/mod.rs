//! Homology-constrained path programs and their solution.
//!
//! Purpose
//! - Encode "cheapest source→sink path homologous to a reference path" as a
//!   linear or integer program, hand it to a [`SolverOracle`], and read back a
//!   signed per-edge flow.
//!
//! Encodings (all behind [`Formulation`])
//! - [`FlowFormulation`]: arc flows in `[0, 1]`, per-vertex conservation, and
//!   one equality per homology basis column (`Hᵗ(x⁺ − x⁻) = Hᵗ x_ref`).
//! - [`MtzFormulation`]: same with binary arcs plus Miller–Tucker–Zemlin
//!   ordering variables, which forbids detached cycles next to the path.
//! - [`OhcpFormulation`]: `x = x_ref + d2 y` with split signs; the optimiser
//!   fills triangles between reference and candidate instead of matching
//!   basis coordinates.
//!
//! Lifecycle
//! - [`Planner`] owns the complex, boundary operators and basis (read-only);
//!   every `solve` builds a fresh program and drops it after extraction.

mod flow;
mod ohcp;
mod oracle;
mod planner;
mod problem;
mod program;

pub use flow::{FlowFormulation, MtzFormulation};
pub use ohcp::OhcpFormulation;
pub use oracle::{ConflictSet, MicroLpOracle, OracleError, SolverOracle};
pub use planner::{PathSolution, Planner};
pub use problem::{EncodedModel, Formulation, HomologyProblem, Variant};
pub use program::{Assignment, LinearConstraint, LinearProgram, Sense, VarId, VarKind, VarSpec};
