use std::fmt::{Display, Formatter};
use std::num::NonZero;

use itertools::Itertools;
use varisat::Var;

use crate::backend::{ClauseSink, SatBackend, Satisfiability};
use crate::encoding::VarGrid;
use crate::enumerate::Assignment;
use crate::error::{Error, Result};
use crate::logic::{at_least_one, at_most_one, submit};

/// Where each pigeon sits.
///
/// The encoding never forbids a pigeon from occupying several holes at once, so a model may list more than one hole for a pigeon.
/// No hole is ever shared between two pigeons, so picking any one hole per pigeon still gives a valid placement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Placement {
    holes: Vec<Vec<usize>>,
}

impl Placement {
    /// The lowest hole `pigeon` occupies.
    ///
    /// # Panics
    /// If `pigeon` is out of range.
    pub fn hole_of(&self, pigeon: usize) -> usize {
        self.holes[pigeon][0]
    }

    /// Every hole `pigeon` occupies, ascending.
    pub fn holes_of(&self, pigeon: usize) -> &[usize] {
        &self.holes[pigeon]
    }

    /// Number of pigeons placed.
    pub fn pigeon_count(&self) -> usize {
        self.holes.len()
    }

    /// One hole per pigeon, indexed by pigeon.
    pub fn assignment(&self) -> Vec<usize> {
        (0..self.holes.len()).map(|pigeon| self.hole_of(pigeon)).collect_vec()
    }
}

impl Display for Placement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (pigeon, holes) in self.holes.iter().enumerate() {
            for hole in holes {
                writeln!(f, "Pigeon {pigeon} in hole {hole}")?;
            }
        }
        Ok(())
    }
}

/// Can `pigeons` pigeons be placed in `holes` holes, at most one pigeon per hole?
///
/// # Encoding
/// Pigeon `p` sitting in hole `h` is the variable `p * holes + h`.
///
/// 1. Every pigeon is placed somewhere: for each `p`, `v(p, 0) + v(p, 1) + ... + v(p, holes - 1)`.
/// 2. No hole is double-booked: for each `h` and each pair of pigeons `p1 < p2`, `!v(p1, h) + !v(p2, h)`.
///
/// There is deliberately no "at most one hole per pigeon" family.
/// Letting a pigeon spread over several holes only makes the clauses easier to satisfy,
/// so an unsatisfiable answer still proves the pigeons do not fit; see [`Placement`] for what this means for models.
#[derive(Copy, Clone, Debug)]
pub struct Pigeonhole {
    pigeons: NonZero<usize>,
    holes: NonZero<usize>,
    grid: VarGrid,
}

impl Pigeonhole {
    /// The instance with the given counts.
    pub fn new(pigeons: NonZero<usize>, holes: NonZero<usize>) -> Self {
        Self {
            pigeons,
            holes,
            grid: VarGrid::new(pigeons.get(), holes.get()),
        }
    }

    /// The variable "`pigeon` sits in `hole`".
    #[inline]
    pub fn placement_var(&self, pigeon: usize, hole: usize) -> Var {
        self.grid.var(pigeon, hole)
    }

    /// The pigeon×hole variable layout.
    #[inline]
    pub fn grid(&self) -> VarGrid {
        self.grid
    }

    /// Number of clauses [`Self::encode`] submits.
    pub fn clause_count(&self) -> usize {
        let p = self.pigeons.get();
        p + self.holes.get() * (p * (p - 1) / 2)
    }

    /// Allocate this problem's variables in the fresh session `sink` and submit all of its clauses.
    pub fn encode(&self, sink: &mut impl ClauseSink) {
        log::debug!("encoding {} pigeons in {} holes", self.pigeons, self.holes);
        self.grid.allocate(sink);

        for pigeon in self.grid.rows() {
            submit(sink, "pigeon placed", &at_least_one(self.grid.row(pigeon)));
        }

        for hole in self.grid.cols() {
            let occupants = self.grid.col(hole).collect_vec();
            for clause in at_most_one(&occupants) {
                submit(sink, "hole shared", &clause);
            }
        }

        log::debug!("encoded {} variables and {} clauses", self.grid.len(), self.clause_count());
    }

    /// Encode into the fresh session `backend` and decide whether the pigeons fit.
    pub fn is_satisfiable(&self, backend: &mut impl SatBackend) -> Result<bool> {
        self.encode(backend);
        Ok(backend.solve()?.is_satisfiable())
    }

    /// Encode into the fresh session `backend`, solve once and decode a placement, if any.
    pub fn solve(&self, backend: &mut impl SatBackend) -> Result<Option<Placement>> {
        self.encode(backend);
        match backend.solve()? {
            Satisfiability::Unsatisfiable => Ok(None),
            Satisfiability::Satisfiable => self.decode(&Assignment::snapshot(&*backend)?).map(Some),
        }
    }

    /// Read the placement out of a model of this problem's clauses.
    pub fn decode(&self, assignment: &Assignment) -> Result<Placement> {
        let holes = self.grid.rows()
            .map(|pigeon| {
                let occupied = self.grid.cols()
                    .filter(|hole| assignment.value(self.placement_var(pigeon, *hole)))
                    .collect_vec();
                if occupied.is_empty() {
                    Err(Error::Undecodable { row: pigeon, true_count: 0 })
                } else {
                    Ok(occupied)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Placement { holes })
    }
}
