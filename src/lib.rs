#![warn(missing_docs)]

//! # `chromate`
//!
//! Decides [graph k-colorability](https://en.wikipedia.org/wiki/Graph_coloring) and the [pigeonhole problem](https://en.wikipedia.org/wiki/Pigeonhole_principle)
//! by reducing them to Boolean satisfiability, and can list every coloring of a graph.
//! Sudoku rides along as a pre-colored 9-coloring problem.
//!
//! Begin by building a [`Graph`], wrap it in a [`ColoringProblem`] with a number of colors, and hand it a fresh [`SatBackend`] session
//! such as [`VarisatBackend`] via [`is_colorable`](ColoringProblem::is_colorable), [`solve`](ColoringProblem::solve) or
//! [`all_colorings`](ColoringProblem::all_colorings).
//!
//! # Internals
//! Every problem here is a grid of propositional variables, one per (subject, value) pair: node × color, pigeon × hole.
//! The [`VarGrid`] numbers them `row * cols + col`, so clauses can be built without asking the engine anything.
//!
//! For coloring we assert, in CNF:
//! 1. Every node has at least one color, and no node has two; i.e. exactly one color per node.
//! 2. For every edge and every color, the endpoints do not both take that color.
//!
//! For the pigeonhole problem:
//! 1. Every pigeon sits in at least one hole.
//! 2. For every hole, no two pigeons share it.
//!
//! Solving defers to the engine behind [`SatBackend`]; decoding reads the model back through [`ModelValue`].
//! Enumerating all solutions ([`Enumerator`]) repeatedly solves and adds a clause forbidding the exact assignment just found,
//! until the engine reports the remaining formula unsatisfiable.
//!
//! Any encoding can also be recorded into a [`varisat::CnfFormula`] and written out with [`dimacs::write_dimacs`].

pub use backend::{ClauseSink, ModelValue, SatBackend, Satisfiability, VarisatBackend};
pub use coloring::{Coloring, ColoringProblem};
pub use encoding::VarGrid;
pub use enumerate::{Assignment, Enumerator};
pub use error::{Error, Result};
pub use graph::{Edge, Graph};
pub use pigeonhole::{Pigeonhole, Placement};
pub use sudoku::{ParseSudokuError, Sudoku};

/// The SAT engine seam.
pub mod backend;
/// Graph coloring to CNF and back.
pub mod coloring;
/// DIMACS CNF export.
pub mod dimacs;
pub(crate) mod encoding;
pub(crate) mod enumerate;
pub(crate) mod error;
pub(crate) mod graph;
pub(crate) mod logic;
pub(crate) mod pigeonhole;
pub(crate) mod sudoku;
mod tests;
/// JavaScript bindings.
#[cfg(feature = "wasm")]
pub mod wasm;
