use strum::{Display, EnumIs};
use varisat::{CnfFormula, ExtendFormula, Lit, Solver, Var};

use crate::error::Result;

/// The polarity handed to the engine for a literal that asserts its variable is true.
///
/// Every clause built in this crate goes through [`holds`] and [`fails`], and every model value is read back through [`ModelValue::of`],
/// so this is the only place the engine's truth convention is spelled out.
pub const ENGINE_TRUE: bool = true;

/// The literal "`var` is true".
#[inline]
pub fn holds(var: Var) -> Lit {
    var.lit(ENGINE_TRUE)
}

/// The literal "`var` is false".
#[inline]
pub fn fails(var: Var) -> Lit {
    var.lit(!ENGINE_TRUE)
}

/// Outcome of a single [`SatBackend::solve`] call.
#[derive(Copy, Clone, Debug, Display, EnumIs, Eq, PartialEq, Hash)]
pub enum Satisfiability {
    /// A model exists and can be read with [`SatBackend::model_value`].
    Satisfiable,
    /// No assignment satisfies the clauses.
    Unsatisfiable,
}

/// Value of one variable in the most recent model.
#[derive(Copy, Clone, Debug, Display, EnumIs, Eq, PartialEq, Hash)]
pub enum ModelValue {
    /// The model sets the variable.
    True,
    /// The model clears the variable.
    False,
    /// No model is available, or the model does not mention the variable.
    Unknown,
}

impl ModelValue {
    /// Interpret the literal the engine reports for a variable in its model.
    pub fn of(lit: Lit) -> Self {
        if lit.is_positive() == ENGINE_TRUE { Self::True } else { Self::False }
    }
}

/// Anything clauses can be submitted to: a live engine, or a formula being recorded for export.
pub trait ClauseSink {
    /// Allocate a fresh variable. Variables are numbered densely from 0 in allocation order.
    fn new_variable(&mut self) -> Var;
    /// Submit the disjunction of `clause`.
    fn add_clause(&mut self, clause: &[Lit]);
    /// Number of variables allocated so far.
    fn var_count(&self) -> usize;
}

/// The capability this crate needs from a SAT engine.
///
/// [`model_value`](Self::model_value) is only meaningful after [`solve`](Self::solve) returned [`Satisfiable`](Satisfiability::Satisfiable)
/// and before the next clause is added.
pub trait SatBackend: ClauseSink {
    /// Decide the clauses submitted so far.
    fn solve(&mut self) -> Result<Satisfiability>;
    /// Value of `var` in the model found by the last successful [`solve`](Self::solve).
    fn model_value(&self, var: Var) -> ModelValue;
}

impl ClauseSink for CnfFormula {
    fn new_variable(&mut self) -> Var {
        ExtendFormula::new_var(self)
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        ExtendFormula::add_clause(self, clause)
    }

    fn var_count(&self) -> usize {
        CnfFormula::var_count(self)
    }
}

/// [`SatBackend`] over the [`varisat`] CDCL solver.
pub struct VarisatBackend<'a> {
    solver: Solver<'a>,
    var_count: usize,
    model: Option<Vec<Lit>>,
}

impl Default for VarisatBackend<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl VarisatBackend<'_> {
    /// A fresh session with no variables and no clauses.
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            var_count: 0,
            model: None,
        }
    }
}

impl ClauseSink for VarisatBackend<'_> {
    fn new_variable(&mut self) -> Var {
        self.var_count += 1;
        ExtendFormula::new_var(&mut self.solver)
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        // the previous model no longer describes the formula
        self.model = None;
        ExtendFormula::add_clause(&mut self.solver, clause)
    }

    fn var_count(&self) -> usize {
        self.var_count
    }
}

impl SatBackend for VarisatBackend<'_> {
    fn solve(&mut self) -> Result<Satisfiability> {
        self.model = None;
        if self.solver.solve()? {
            self.model = self.solver.model();
            Ok(Satisfiability::Satisfiable)
        } else {
            Ok(Satisfiability::Unsatisfiable)
        }
    }

    fn model_value(&self, var: Var) -> ModelValue {
        self.model.as_ref()
            .and_then(|model| model.get(var.index()))
            .map_or(ModelValue::Unknown, |lit| ModelValue::of(*lit))
    }
}
