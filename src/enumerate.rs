use itertools::Itertools;
use varisat::{Lit, Var};

use crate::backend::{fails, holds, ModelValue, SatBackend, Satisfiability};
use crate::error::{Error, Result};

/// A full model: the truth value of every variable allocated in the session when it was solved.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    /// Read the current model of `backend` for every allocated variable.
    pub fn snapshot(backend: &impl SatBackend) -> Result<Self> {
        let values = (0..backend.var_count())
            .map(Var::from_index)
            .map(|var| match backend.model_value(var) {
                ModelValue::True => Ok(true),
                ModelValue::False => Ok(false),
                ModelValue::Unknown => Err(Error::IncompleteModel { var }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { values })
    }

    /// # Panics
    /// If `var` was not allocated when the snapshot was taken.
    #[inline]
    pub fn value(&self, var: Var) -> bool {
        self.values[var.index()]
    }

    /// Number of variables covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for the assignment of a session with no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The literals made true by this assignment, one per variable.
    pub fn literals(&self) -> impl Iterator<Item = Lit> + '_ {
        self.values.iter()
            .enumerate()
            .map(|(index, value)| if *value { holds(Var::from_index(index)) } else { fails(Var::from_index(index)) })
    }

    /// The clause ruling out exactly this assignment: the disjunction of the negation of each of its literals.
    pub fn blocking_clause(&self) -> Vec<Lit> {
        self.literals().map(|lit| !lit).collect_vec()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Searching,
    Exhausted,
}

/// Iterates over every satisfying assignment of the clauses loaded into a backend.
///
/// After each model is found, a clause blocking that full assignment is added, so no assignment is produced twice and the
/// iteration ends once the engine reports the remaining formula unsatisfiable.
/// Blocking covers every allocated variable, not only those a caller happens to decode.
///
/// The backend keeps its blocking clauses afterwards; use a fresh session for unrelated queries.
pub struct Enumerator<'s, B: SatBackend> {
    backend: &'s mut B,
    state: State,
    found: usize,
}

impl<'s, B: SatBackend> Enumerator<'s, B> {
    /// Enumerate the models of whatever `backend` already holds.
    pub fn new(backend: &'s mut B) -> Self {
        Self { backend, state: State::Searching, found: 0 }
    }

    /// Number of assignments produced so far.
    pub fn found(&self) -> usize {
        self.found
    }

    /// True once the iterator will yield nothing more.
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    fn step(&mut self) -> Result<Option<Assignment>> {
        if self.backend.solve()? == Satisfiability::Unsatisfiable {
            log::info!("enumeration exhausted after {} assignments", self.found);
            self.state = State::Exhausted;
            return Ok(None);
        }

        let assignment = Assignment::snapshot(&*self.backend)?;
        self.found += 1;
        log::debug!("assignment #{} found", self.found);

        if assignment.is_empty() {
            // nothing to block; the single empty assignment is the only one
            self.state = State::Exhausted;
        } else {
            self.backend.add_clause(&assignment.blocking_clause());
        }

        Ok(Some(assignment))
    }
}

impl<B: SatBackend> Iterator for Enumerator<'_, B> {
    type Item = Result<Assignment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_exhausted() {
            return None;
        }

        let step = self.step();
        if step.is_err() {
            self.state = State::Exhausted;
        }
        step.transpose()
    }
}
