use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;
use thiserror::Error;

use crate::backend::{ClauseSink, SatBackend, Satisfiability};
use crate::coloring::ColoringProblem;
use crate::enumerate::Assignment;
use crate::error::Result;
use crate::graph::Graph;

const SIDE: usize = 9;
const BOX: usize = 3;

/// Reasons a puzzle string may be rejected.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ParseSudokuError {
    /// The text held this many cells instead of 81.
    #[error("expected {expected} cells, found {0}", expected = SIDE * SIDE)]
    WrongCellCount(usize),
    /// A character other than `1`-`9`, `.`, `0` or whitespace.
    #[error("invalid cell {0:?}; use 1-9 for givens and '.' or '0' for blanks")]
    InvalidCell(char),
}

/// A 9×9 Sudoku grid; 0 marks a blank cell.
///
/// Solving treats the puzzle as 9-coloring the graph whose nodes are the 81 cells and whose edges join every two cells sharing a row,
/// a column or a 3×3 box, with each given digit fixing its cell's color.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sudoku {
    cells: Array2<u8>,
}

impl Sudoku {
    /// # Panics
    /// If `cells` is not 9×9 or holds a value above 9.
    pub fn new(cells: Array2<u8>) -> Self {
        assert_eq!(cells.dim(), (SIDE, SIDE), "a sudoku grid is {SIDE}x{SIDE}");
        assert!(cells.iter().all(|digit| *digit as usize <= SIDE), "cell values must be in 0..=9");
        Self { cells }
    }

    /// Digit at `(row, col)`, 0 if blank.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[(row, col)]
    }

    /// The underlying 9×9 grid.
    pub fn cells(&self) -> &Array2<u8> {
        &self.cells
    }

    /// True when no cell is blank.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|digit| *digit != 0)
    }

    #[inline]
    fn node(row: usize, col: usize) -> usize {
        row * SIDE + col
    }

    /// The graph linking every pair of cells that may not hold the same digit.
    pub fn constraint_graph() -> Graph {
        let cells = (0..SIDE).cartesian_product(0..SIDE).collect_vec();
        let peers = cells.iter()
            .tuple_combinations::<(_, _)>()
            .filter(|((r1, c1), (r2, c2))| r1 == r2 || c1 == c2 || (r1 / BOX == r2 / BOX && c1 / BOX == c2 / BOX))
            .map(|((r1, c1), (r2, c2))| (Self::node(*r1, *c1), Self::node(*r2, *c2)));

        Graph::from_edges(SIDE * SIDE, peers)
    }

    /// Run `f` on the coloring problem equivalent to this puzzle.
    fn with_problem<R>(&self, f: impl FnOnce(&ColoringProblem) -> R) -> R {
        let graph = Self::constraint_graph();
        let mut problem = ColoringProblem::new(&graph, NonZero::new(SIDE).unwrap());
        for ((row, col), digit) in self.cells.indexed_iter() {
            if *digit != 0 {
                problem.fix(Self::node(row, col), *digit as usize - 1);
            }
        }
        f(&problem)
    }

    /// Allocate this puzzle's variables in the fresh session `sink` and submit all of its clauses.
    ///
    /// Digit `d` in cell `(row, col)` is the variable `(row * 9 + col) * 9 + d - 1`.
    pub fn encode(&self, sink: &mut impl ClauseSink) {
        self.with_problem(|problem| problem.encode(sink))
    }

    /// Encode into the fresh session `backend` and fill in every blank.
    /// Returns [`None`] if the givens admit no solution.
    pub fn solve(&self, backend: &mut impl SatBackend) -> Result<Option<Sudoku>> {
        self.encode(backend);
        if backend.solve()? == Satisfiability::Unsatisfiable {
            log::info!("sudoku has no solution");
            return Ok(None);
        }

        self.decode(&Assignment::snapshot(&*backend)?).map(Some)
    }

    /// Read the filled grid back from a model of this puzzle's encoding.
    pub fn decode(&self, assignment: &Assignment) -> Result<Sudoku> {
        let coloring = self.with_problem(|problem| problem.decode(assignment))?;
        let cells = Array2::from_shape_fn((SIDE, SIDE), |(row, col)| (coloring.color_of(Self::node(row, col)) + 1) as u8);
        Ok(Self { cells })
    }
}

impl FromStr for Sudoku {
    type Err = ParseSudokuError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let digits = s.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' | '0' => Ok(0),
                '1'..='9' => Ok(c as u8 - b'0'),
                _ => Err(ParseSudokuError::InvalidCell(c)),
            })
            .collect::<std::result::Result<Vec<u8>, _>>()?;

        if digits.len() != SIDE * SIDE {
            return Err(ParseSudokuError::WrongCellCount(digits.len()));
        }

        Ok(Self { cells: Array2::from_shape_vec((SIDE, SIDE), digits).unwrap() })
    }
}

impl Display for Sudoku {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            writeln!(f, "{}", row.iter().map(|digit| match digit {
                0 => '.',
                d => (b'0' + d) as char,
            }).collect::<String>())?;
        }
        Ok(())
    }
}
