//! Solver-neutral linear/integer program handed to a [`SolverOracle`].
//!
//! [`SolverOracle`]: super::SolverOracle

/// Index of a decision variable in a [`LinearProgram`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    Continuous,
    Integer,
}

/// Variable with bounds `lb <= x <= ub` (infinite bounds allowed).
#[derive(Clone, Debug, PartialEq)]
pub struct VarSpec {
    pub name: String,
    pub lb: f64,
    pub ub: f64,
    pub kind: VarKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Le,
    Ge,
}

/// Named constraint `Σ coef · x  (=|<=|>=)  rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// Minimisation program: variables, linear objective, linear constraints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearProgram {
    pub name: String,
    pub vars: Vec<VarSpec>,
    pub objective: Vec<(VarId, f64)>,
    pub constraints: Vec<LinearConstraint>,
}

impl LinearProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_var(&mut self, name: impl Into<String>, lb: f64, ub: f64, kind: VarKind) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(VarSpec {
            name: name.into(),
            lb,
            ub,
            kind,
        });
        id
    }

    #[inline]
    pub fn add_continuous(&mut self, name: impl Into<String>, lb: f64, ub: f64) -> VarId {
        self.add_var(name, lb, ub, VarKind::Continuous)
    }

    #[inline]
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_var(name, 0.0, 1.0, VarKind::Integer)
    }

    /// Add `coef · x` to the objective.
    #[inline]
    pub fn minimise_term(&mut self, var: VarId, coef: f64) {
        self.objective.push((var, coef));
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(VarId, f64)>,
        sense: Sense,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            terms,
            sense,
            rhs,
        });
    }

    /// Objective value of an assignment (`values[i]` for variable `i`).
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|&(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Optimal values reported by an oracle, aligned with `LinearProgram::vars`.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub values: Vec<f64>,
    pub objective: f64,
}

impl Assignment {
    #[inline]
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }
}
