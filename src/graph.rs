use std::fmt::{Display, Formatter};
use std::ops::Range;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use unordered_pair::UnorderedPair;

/// An undirected edge, always stored with the lower node id first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Edge {
    /// The smaller endpoint.
    pub low: usize,
    /// The larger endpoint.
    pub high: usize,
}

impl Edge {
    /// # Panics
    /// On a self-loop.
    pub fn new(pair: impl Into<UnorderedPair<usize>>) -> Self {
        let UnorderedPair(a, b) = pair.into();
        assert_ne!(a, b, "self-loop on node {a}");
        Self { low: a.min(b), high: a.max(b) }
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// An undirected simple graph over the nodes `0..node_count`.
///
/// The node count is fixed at construction; edges may be added in either orientation and are canonicalised on insertion.
/// Adding the same edge twice has no further effect.
#[derive(Clone, Debug)]
pub struct Graph {
    inner: UnGraphMap<usize, ()>,
    node_count: usize,
}

impl Graph {
    /// A graph with `node_count` isolated nodes.
    pub fn with_nodes(node_count: usize) -> Self {
        let mut inner = UnGraphMap::with_capacity(node_count, 0);
        for node in 0..node_count {
            inner.add_node(node);
        }

        Self { inner, node_count }
    }

    /// A graph with `node_count` nodes and the given edges.
    ///
    /// # Panics
    /// Under the same conditions as [`Self::add_edge`].
    pub fn from_edges<P>(node_count: usize, edges: impl IntoIterator<Item = P>) -> Self
    where
        P: Into<UnorderedPair<usize>>,
    {
        let mut graph = Self::with_nodes(node_count);
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    /// The complete graph on `node_count` nodes.
    pub fn complete(node_count: usize) -> Self {
        Self::from_edges(node_count, (0..node_count).tuple_combinations::<(_, _)>())
    }

    /// The cycle `0 - 1 - ... - (node_count - 1) - 0`.
    ///
    /// # Panics
    /// If `node_count < 3`.
    pub fn cycle(node_count: usize) -> Self {
        assert!(node_count >= 3, "a cycle needs at least 3 nodes");
        Self::from_edges(node_count, (0..node_count).map(|node| (node, (node + 1) % node_count)))
    }

    /// Connect two distinct nodes. Returns the canonical form of the edge.
    ///
    /// # Panics
    /// If either endpoint is out of range, or both endpoints are the same node.
    pub fn add_edge(&mut self, edge: impl Into<UnorderedPair<usize>>) -> Edge {
        let edge = Edge::new(edge);
        assert!(edge.high < self.node_count, "edge {edge} references a node outside 0..{}", self.node_count);

        self.inner.add_edge(edge.low, edge.high, ());
        edge
    }

    /// Number of nodes, including isolated ones.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of distinct edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// `0..node_count`.
    #[inline]
    pub fn nodes(&self) -> Range<usize> {
        0..self.node_count
    }

    /// All edges in canonical form, sorted.
    pub fn edges(&self) -> Vec<Edge> {
        self.inner.all_edges()
            .map(|(a, b, _)| Edge::new((a, b)))
            .sorted()
            .collect_vec()
    }

    /// Edges whose lower endpoint is `node`.
    ///
    /// # Panics
    /// If `node` is out of range.
    pub fn edges_from(&self, node: usize) -> Vec<Edge> {
        assert!(node < self.node_count, "node {node} outside 0..{}", self.node_count);
        self.inner.neighbors(node)
            .filter(|other| *other > node)
            .sorted()
            .map(|other| Edge { low: node, high: other })
            .collect_vec()
    }

    /// Whether `a` and `b` are adjacent.
    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        self.inner.contains_edge(a, b)
    }

    /// Nodes adjacent to `node`, in no particular order.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.inner.neighbors(node)
    }
}
