use std::ops::Range;

use varisat::Var;

use crate::backend::ClauseSink;

/// A dense two-dimensional block of propositional variables, `rows × cols` in row-major order.
///
/// For coloring, a row is a node and a column a color; for the pigeonhole problem, a row is a pigeon and a column a hole.
/// Variable `(row, col)` is `row * cols + col`, so the mapping is computed without asking the engine anything.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VarGrid {
    rows: usize,
    cols: usize,
}

impl VarGrid {
    /// A grid of `rows * cols` variables.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Row indices.
    #[inline]
    pub fn rows(&self) -> Range<usize> {
        0..self.rows
    }

    /// Column indices.
    #[inline]
    pub fn cols(&self) -> Range<usize> {
        0..self.cols
    }

    /// Number of variables in the grid.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// True if the grid has no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The variable standing for "`row` takes value `col`".
    ///
    /// # Panics
    /// If `row` or `col` is out of range.
    #[inline]
    pub fn var(&self, row: usize, col: usize) -> Var {
        assert!(row < self.rows, "row {row} out of range 0..{}", self.rows);
        assert!(col < self.cols, "column {col} out of range 0..{}", self.cols);
        Var::from_index(row * self.cols + col)
    }

    /// Inverse of [`Self::var`].
    ///
    /// # Panics
    /// If `var` is not part of this grid.
    pub fn locate(&self, var: Var) -> (usize, usize) {
        assert!(var.index() < self.len(), "variable {} outside grid of {} variables", var.index(), self.len());
        (var.index() / self.cols, var.index() % self.cols)
    }

    /// All variables of `row`, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Var> + '_ {
        self.cols().map(move |col| self.var(row, col))
    }

    /// All variables of `col`, in row order.
    pub fn col(&self, col: usize) -> impl Iterator<Item = Var> + '_ {
        self.rows().map(move |row| self.var(row, col))
    }

    /// Allocate this grid's variables in `sink`.
    ///
    /// The sink must be a fresh session so the indices it hands out line up with [`Self::var`].
    ///
    /// # Panics
    /// If `sink` already holds variables.
    pub fn allocate(&self, sink: &mut impl ClauseSink) {
        assert_eq!(sink.var_count(), 0, "grid must be allocated in a fresh session");
        for index in 0..self.len() {
            let var = sink.new_variable();
            debug_assert_eq!(var.index(), index);
        }
    }
}
