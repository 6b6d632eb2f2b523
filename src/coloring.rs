use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::ops::Range;

use itertools::Itertools;
use varisat::Var;

use crate::backend::{holds, ClauseSink, SatBackend, Satisfiability};
use crate::encoding::VarGrid;
use crate::enumerate::{Assignment, Enumerator};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::logic::{at_least_one, at_most_one, not_both, submit};

/// A proper coloring: the color of each node, indexed by node.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Coloring {
    colors: Vec<usize>,
}

impl Coloring {
    /// # Panics
    /// If `node` is out of range.
    #[inline]
    pub fn color_of(&self, node: usize) -> usize {
        self.colors[node]
    }

    /// Colors indexed by node.
    pub fn as_slice(&self) -> &[usize] {
        &self.colors
    }

    /// Number of nodes colored.
    pub fn node_count(&self) -> usize {
        self.colors.len()
    }

    /// Whether this assigns every node of `graph` a color below `colors` and no edge joins two nodes of the same color.
    pub fn is_proper(&self, graph: &Graph, colors: usize) -> bool {
        self.colors.len() == graph.node_count()
            && self.colors.iter().all(|color| *color < colors)
            && graph.edges().iter().all(|edge| self.colors[edge.low] != self.colors[edge.high])
    }
}

impl Display for Coloring {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.colors.iter().enumerate().map(|(node, color)| format!("{node}:{color}")).join(" "))
    }
}

impl From<Coloring> for Vec<usize> {
    fn from(value: Coloring) -> Self {
        value.colors
    }
}

/// The question "can `graph` be colored with `colors` colors?", optionally with some nodes' colors fixed in advance.
///
/// # Encoding
/// Node `n` having color `c` is the variable `n * colors + c` (see [`VarGrid`]).
///
/// ## Nodes
/// Every node has at least one color: one clause `v(n, 0) + v(n, 1) + ... + v(n, k - 1)`.
/// Every node has at most one color: for each pair of colors `c1 < c2`, the clause `!v(n, c1) + !v(n, c2)`.
/// Together these pin each node to exactly one color; either family alone does not.
///
/// ## Edges
/// For each edge `(u, v)` and each color `c`, the clause `!v(u, c) + !v(v, c)`: adjacent nodes never share a color.
///
/// ## Fixed nodes
/// A node fixed to color `c` contributes the unit clause `v(n, c)`.
pub struct ColoringProblem<'g> {
    graph: &'g Graph,
    colors: NonZero<usize>,
    grid: VarGrid,
    fixed: Vec<(usize, usize)>,
}

impl<'g> ColoringProblem<'g> {
    /// Color `graph` with `colors` colors and no node fixed.
    pub fn new(graph: &'g Graph, colors: NonZero<usize>) -> Self {
        Self {
            graph,
            colors,
            grid: VarGrid::new(graph.node_count(), colors.get()),
            fixed: Vec::new(),
        }
    }

    /// Require `node` to take `color`.
    ///
    /// # Panics
    /// If `node` or `color` is out of range.
    pub fn fix(&mut self, node: usize, color: usize) -> &mut Self {
        // validates the pair
        self.grid.var(node, color);
        self.fixed.push((node, color));
        self
    }

    /// The graph being colored.
    #[inline]
    pub fn graph(&self) -> &Graph {
        self.graph
    }

    /// `0..colors`.
    #[inline]
    pub fn valid_colors(&self) -> Range<usize> {
        0..self.colors.get()
    }

    /// The node×color variable layout.
    #[inline]
    pub fn grid(&self) -> VarGrid {
        self.grid
    }

    /// The variable "`node` has `color`".
    #[inline]
    pub fn color_var(&self, node: usize, color: usize) -> Var {
        self.grid.var(node, color)
    }

    /// Number of clauses [`Self::encode`] submits.
    pub fn clause_count(&self) -> usize {
        let k = self.colors.get();
        self.graph.node_count() * (1 + k * (k - 1) / 2) + self.graph.edge_count() * k + self.fixed.len()
    }

    /// Allocate this problem's variables in the fresh session `sink` and submit all of its clauses.
    pub fn encode(&self, sink: &mut impl ClauseSink) {
        log::debug!(
            "encoding {}-coloring of {} nodes and {} edges",
            self.colors, self.graph.node_count(), self.graph.edge_count(),
        );
        self.grid.allocate(sink);

        for node in self.graph.nodes() {
            self.add_node_constraints(sink, node);
        }

        for node in self.graph.nodes() {
            for edge in self.graph.edges_from(node) {
                self.add_edge_constraints(sink, edge.low, edge.high);
            }
        }

        for (node, color) in &self.fixed {
            submit(sink, "fixed", &[holds(self.color_var(*node, *color))]);
        }

        log::debug!("encoded {} variables and {} clauses", self.grid.len(), self.clause_count());
    }

    /// `node` has exactly one color.
    fn add_node_constraints(&self, sink: &mut impl ClauseSink, node: usize) {
        let vars = self.grid.row(node).collect_vec();

        submit(sink, "at least one color", &at_least_one(vars.iter().copied()));
        for clause in at_most_one(&vars) {
            submit(sink, "at most one color", &clause);
        }
    }

    /// `n1` and `n2` never share a color.
    fn add_edge_constraints(&self, sink: &mut impl ClauseSink, n1: usize, n2: usize) {
        for color in self.valid_colors() {
            submit(sink, "edge", &not_both(self.color_var(n1, color), self.color_var(n2, color)));
        }
    }

    /// Encode into the fresh session `backend` and decide colorability with a single solve.
    pub fn is_colorable(&self, backend: &mut impl SatBackend) -> Result<bool> {
        self.encode(backend);
        Ok(backend.solve()?.is_satisfiable())
    }

    /// Encode into the fresh session `backend`, solve once and decode the coloring, if any.
    pub fn solve(&self, backend: &mut impl SatBackend) -> Result<Option<Coloring>> {
        self.encode(backend);
        match backend.solve()? {
            Satisfiability::Unsatisfiable => Ok(None),
            Satisfiability::Satisfiable => self.decode(&Assignment::snapshot(&*backend)?).map(Some),
        }
    }

    /// Encode into the fresh session `backend` and enumerate every distinct coloring, in discovery order.
    pub fn all_colorings(&self, backend: &mut impl SatBackend) -> Result<Vec<Coloring>> {
        self.encode(backend);
        Enumerator::new(backend)
            .map(|assignment| self.decode(&assignment?))
            .collect()
    }

    /// Read the coloring out of a model of this problem's clauses.
    pub fn decode(&self, assignment: &Assignment) -> Result<Coloring> {
        let colors = self.graph.nodes()
            .map(|node| {
                let true_colors = self.valid_colors()
                    .filter(|color| assignment.value(self.color_var(node, *color)))
                    .collect_vec();
                match true_colors.as_slice() {
                    [color] => Ok(*color),
                    _ => Err(Error::Undecodable { row: node, true_count: true_colors.len() }),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Coloring { colors })
    }
}
