//! Solver oracle contract and the default `good_lp`/microlp implementation.
//!
//! Contract
//! - `solve` returns optimal values for every variable, or an infeasibility
//!   report carrying an irreducible inconsistent subsystem (IIS): the names of
//!   constraints and bounds that are jointly infeasible, minimal under removal.
//!
//! IIS
//! - microlp has no native IIS support; `MicroLpOracle` runs a deletion filter:
//!   drop one member at a time (constraints, then lower bounds, then upper
//!   bounds) and keep it dropped while the rest stays infeasible. Every solve
//!   is a pure feasibility solve (zero objective), so at most one re-solve per
//!   member.
//! - Programs with integer variables are filtered on their continuous
//!   relaxation: each solve is then one LP instead of a branch-and-bound run.
//!   A conflict of the relaxation is a conflict of the integer program; when
//!   the relaxation is feasible (infeasibility comes from integrality alone)
//!   no conflict set is reported.
//! - Re-solves are capped by `max_solves`; running out reports `computed = false`.
//!   `compute_iis = false` skips the search entirely.

use std::fmt;

use good_lp::{
    default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::{debug, warn};

use super::program::{Assignment, LinearProgram, Sense, VarKind};
use crate::error::SolveError;

/// External solving engine consuming a [`LinearProgram`].
pub trait SolverOracle {
    fn solve(&self, lp: &LinearProgram) -> Result<Assignment, OracleError>;
}

/// Oracle-side failure modes.
#[derive(Clone, Debug, PartialEq)]
pub enum OracleError {
    Infeasible(ConflictSet),
    Unbounded,
    Backend(String),
}

impl From<OracleError> for SolveError {
    fn from(e: OracleError) -> Self {
        match e {
            OracleError::Infeasible(iis) => SolveError::Infeasible(iis),
            OracleError::Unbounded => SolveError::Unbounded,
            OracleError::Backend(msg) => SolveError::Backend(msg),
        }
    }
}

/// Names of the members of an irreducible inconsistent subsystem.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConflictSet {
    pub constraints: Vec<String>,
    /// Variables whose lower bound is part of the conflict.
    pub lower_bounds: Vec<String>,
    /// Variables whose upper bound is part of the conflict.
    pub upper_bounds: Vec<String>,
    /// False when the oracle skipped the IIS computation or gave up on it.
    pub computed: bool,
    /// Found on the continuous relaxation of an integer program.
    pub relaxed: bool,
}

impl ConflictSet {
    pub fn len(&self) -> usize {
        self.constraints.len() + self.lower_bounds.len() + self.upper_bounds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ConflictSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.computed {
            return write!(f, "<not computed>");
        }
        write!(
            f,
            "constraints [{}]; lower bounds [{}]; upper bounds [{}]",
            self.constraints.join(", "),
            self.lower_bounds.join(", "),
            self.upper_bounds.join(", ")
        )?;
        if self.relaxed {
            write!(f, " (continuous relaxation)")?;
        }
        Ok(())
    }
}

/// `good_lp` with the pure-Rust microlp backend (LP and MILP).
#[derive(Clone, Copy, Debug)]
pub struct MicroLpOracle {
    pub compute_iis: bool,
    /// Upper bound on feasibility re-solves spent on one conflict set.
    pub max_solves: usize,
}

impl Default for MicroLpOracle {
    fn default() -> Self {
        Self {
            compute_iis: true,
            max_solves: 4096,
        }
    }
}

impl SolverOracle for MicroLpOracle {
    fn solve(&self, lp: &LinearProgram) -> Result<Assignment, OracleError> {
        check_var_ids(lp)?;
        debug!(
            model = %lp.name,
            vars = lp.vars.len(),
            constraints = lp.constraints.len(),
            "invoking microlp"
        );
        match run(lp, &Mask::all(lp), true, false) {
            Ok(values) => {
                let objective = lp.objective_value(&values);
                Ok(Assignment { values, objective })
            }
            Err(ResolutionError::Infeasible) => {
                let iis = if self.compute_iis {
                    conflict_set(lp, self.max_solves)
                } else {
                    ConflictSet::default()
                };
                warn!(
                    model = %lp.name,
                    members = iis.len(),
                    computed = iis.computed,
                    relaxed = iis.relaxed,
                    "model infeasible"
                );
                Err(OracleError::Infeasible(iis))
            }
            Err(ResolutionError::Unbounded) => Err(OracleError::Unbounded),
            Err(e) => Err(OracleError::Backend(e.to_string())),
        }
    }
}

fn check_var_ids(lp: &LinearProgram) -> Result<(), OracleError> {
    let n = lp.vars.len();
    let objective = lp.objective.iter().map(|&(v, _)| (v, "objective"));
    let rows = lp
        .constraints
        .iter()
        .flat_map(|c| c.terms.iter().map(move |&(v, _)| (v, c.name.as_str())));
    match objective.chain(rows).find(|(v, _)| v.0 >= n) {
        Some((v, place)) => Err(OracleError::Backend(format!(
            "variable index {} out of range ({n} variables) in {place}",
            v.0
        ))),
        None => Ok(()),
    }
}

/// Which constraints and bounds take part in a (re-)solve.
#[derive(Clone, Debug)]
struct Mask {
    constraints: Vec<bool>,
    lower: Vec<bool>,
    upper: Vec<bool>,
}

#[derive(Clone, Copy, Debug)]
enum Member {
    Constraint(usize),
    Lower(usize),
    Upper(usize),
}

impl Mask {
    fn all(lp: &LinearProgram) -> Self {
        Self {
            constraints: vec![true; lp.constraints.len()],
            lower: lp.vars.iter().map(|v| v.lb.is_finite()).collect(),
            upper: lp.vars.iter().map(|v| v.ub.is_finite()).collect(),
        }
    }

    /// Active members in filter order: constraints, lower bounds, upper bounds.
    fn members(&self) -> Vec<Member> {
        let on = |flags: &[bool]| -> Vec<usize> {
            flags.iter().enumerate().filter(|(_, f)| **f).map(|(i, _)| i).collect()
        };
        on(&self.constraints)
            .into_iter()
            .map(Member::Constraint)
            .chain(on(&self.lower).into_iter().map(Member::Lower))
            .chain(on(&self.upper).into_iter().map(Member::Upper))
            .collect()
    }

    fn flag(&mut self, m: Member) -> &mut bool {
        match m {
            Member::Constraint(k) => &mut self.constraints[k],
            Member::Lower(i) => &mut self.lower[i],
            Member::Upper(i) => &mut self.upper[i],
        }
    }
}

fn run(
    lp: &LinearProgram,
    mask: &Mask,
    with_objective: bool,
    relax: bool,
) -> Result<Vec<f64>, ResolutionError> {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = lp
        .vars
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let mut def = variable().name(spec.name.clone());
            if mask.lower[i] {
                def = def.min(spec.lb);
            }
            if mask.upper[i] {
                def = def.max(spec.ub);
            }
            if spec.kind == VarKind::Integer && !relax {
                def = def.integer();
            }
            vars.add(def)
        })
        .collect();

    let mut objective = Expression::with_capacity(lp.objective.len());
    if with_objective {
        for &(v, coef) in &lp.objective {
            objective.add_mul(coef, handles[v.0]);
        }
    }
    let mut model = vars.minimise(objective).using(default_solver);
    for (k, c) in lp.constraints.iter().enumerate() {
        if !mask.constraints[k] {
            continue;
        }
        let mut lhs = Expression::with_capacity(c.terms.len());
        for &(v, coef) in &c.terms {
            lhs.add_mul(coef, handles[v.0]);
        }
        let constraint = match c.sense {
            Sense::Eq => lhs.eq(c.rhs),
            Sense::Le => lhs.leq(c.rhs),
            Sense::Ge => lhs.geq(c.rhs),
        };
        model = model.with(constraint);
    }
    let solution = model.solve()?;
    Ok(handles.iter().map(|&h| solution.value(h)).collect())
}

/// Zero-objective feasibility checks with a shared budget.
struct Filter<'a> {
    lp: &'a LinearProgram,
    relax: bool,
    left: usize,
}

impl Filter<'_> {
    /// `None` once the budget is spent.
    fn infeasible(&mut self, mask: &Mask) -> Option<bool> {
        self.left = self.left.checked_sub(1)?;
        Some(matches!(
            run(self.lp, mask, false, self.relax),
            Err(ResolutionError::Infeasible)
        ))
    }
}

/// Deletion filter over constraints, then lower bounds, then upper bounds.
fn conflict_set(lp: &LinearProgram, max_solves: usize) -> ConflictSet {
    let relaxed = lp.vars.iter().any(|v| v.kind == VarKind::Integer);
    let mut filter = Filter {
        lp,
        relax: relaxed,
        left: max_solves,
    };
    let mut mask = Mask::all(lp);
    if relaxed && filter.infeasible(&mask) != Some(true) {
        debug!(model = %lp.name, "relaxation feasible; no conflict set");
        return ConflictSet::default();
    }
    for member in mask.members() {
        *mask.flag(member) = false;
        match filter.infeasible(&mask) {
            Some(true) => {}
            Some(false) => *mask.flag(member) = true,
            None => {
                warn!(model = %lp.name, max_solves, "conflict set search ran out of solves");
                return ConflictSet::default();
            }
        }
    }
    let names = |flags: &[bool], name: &dyn Fn(usize) -> String| -> Vec<String> {
        flags
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| name(i))
            .collect()
    };
    ConflictSet {
        constraints: names(&mask.constraints, &|k| lp.constraints[k].name.clone()),
        lower_bounds: names(&mask.lower, &|i| lp.vars[i].name.clone()),
        upper_bounds: names(&mask.upper, &|i| lp.vars[i].name.clone()),
        computed: true,
        relaxed,
    }
}
