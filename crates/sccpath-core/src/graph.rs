//! Append-only adjacency-list graph.
//!
//! # Overview
//!
//! [`Graph`] has a fixed vertex count chosen at construction. Edges are
//! appended per source vertex and never removed; the insertion order of each
//! adjacency list is the tie-break order for every traversal in this crate.
//!
//! # Weight model
//!
//! | Model              | Cost of traversing `u → v`      |
//! |--------------------|---------------------------------|
//! | [`WeightModel::Edge`] | the edge's stored weight     |
//! | [`WeightModel::Node`] | the node weight of `v`       |
//!
//! The node model carries task-duration semantics: durations live on
//! vertices, and edges only express precedence.

#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::str::FromStr;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

// ---------------------------------------------------------------------------
// WeightModel
// ---------------------------------------------------------------------------

/// Where traversal cost comes from.
///
/// Tags deserialize through [`FromStr`], so documents accept the same
/// spellings as the parser (case-insensitive, surrounding whitespace ignored).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum WeightModel {
    /// Use each edge's own weight.
    #[default]
    Edge,
    /// Use the destination vertex's node weight.
    Node,
}

impl WeightModel {
    /// Stable lowercase tag used in documents and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::Node => "node",
        }
    }
}

impl fmt::Display for WeightModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightModel {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edge" => Ok(Self::Edge),
            "node" => Ok(Self::Node),
            _ => Err(GraphError::UnknownWeightModel(s.to_string())),
        }
    }
}

impl TryFrom<String> for WeightModel {
    type Error = GraphError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// An outgoing edge: destination index and weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Destination vertex.
    pub to: usize,
    /// Stored weight (ignored under [`WeightModel::Node`]).
    pub weight: i64,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "->{}(w={})", self.to, self.weight)
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Fixed-size adjacency-list graph with per-vertex node weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    directed: bool,
    weight_model: WeightModel,
    adjacency: Vec<Vec<Edge>>,
    node_weights: Vec<i64>,
}

impl Graph {
    /// Create a graph with `vertex_count` isolated vertices, all of node weight 1.
    #[must_use]
    pub fn new(vertex_count: usize, directed: bool, weight_model: WeightModel) -> Self {
        Self {
            directed,
            weight_model,
            adjacency: vec![Vec::new(); vertex_count],
            node_weights: vec![1; vertex_count],
        }
    }

    /// Shorthand for a directed graph using [`WeightModel::Edge`].
    #[must_use]
    pub fn directed(vertex_count: usize) -> Self {
        Self::new(vertex_count, true, WeightModel::Edge)
    }

    /// Append `from → to` with `weight` to `from`'s adjacency list.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertexIndex`] if either endpoint is out of range.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: i64) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;
        self.adjacency[from].push(Edge { to, weight });
        Ok(())
    }

    /// Overwrite the node weight of `vertex`.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertexIndex`] if `vertex` is out of range.
    pub fn set_node_weight(&mut self, vertex: usize, weight: i64) -> Result<(), GraphError> {
        self.check(vertex)?;
        self.node_weights[vertex] = weight;
        Ok(())
    }

    /// Outgoing edges of `vertex`, in insertion order.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertexIndex`] if `vertex` is out of range.
    pub fn adjacent(&self, vertex: usize) -> Result<&[Edge], GraphError> {
        self.check(vertex)?;
        Ok(&self.adjacency[vertex])
    }

    /// Node weight of `vertex`.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertexIndex`] if `vertex` is out of range.
    pub fn node_weight(&self, vertex: usize) -> Result<i64, GraphError> {
        self.check(vertex)?;
        Ok(self.node_weights[vertex])
    }

    /// Number of vertices fixed at construction.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph was declared directed.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// The weight model the path analyzer will apply.
    #[must_use]
    pub const fn weight_model(&self) -> WeightModel {
        self.weight_model
    }

    /// Number of edges.
    ///
    /// For undirected graphs every edge is expected to have been inserted in
    /// both directions, so the adjacency total is halved.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let total: usize = self.adjacency.iter().map(Vec::len).sum();
        if self.directed { total } else { total / 2 }
    }

    /// All edges as `(from, edge)`, vertex-ascending then insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, &Edge)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, edges)| edges.iter().map(move |edge| (from, edge)))
    }

    /// Node weights indexed by vertex.
    #[must_use]
    pub fn node_weights(&self) -> &[i64] {
        &self.node_weights
    }

    /// Convert into a petgraph [`DiGraph`] whose node indices equal vertex
    /// indices. Node weights become node payloads, edge weights edge payloads.
    #[must_use]
    pub fn to_petgraph(&self) -> DiGraph<i64, i64> {
        let mut graph = DiGraph::with_capacity(self.vertex_count(), self.edges().count());
        for &weight in &self.node_weights {
            graph.add_node(weight);
        }
        for (from, edge) in self.edges() {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(edge.to), edge.weight);
        }
        graph
    }

    /// Unchecked adjacency access for traversals that iterate `0..n`.
    pub(crate) fn out_edges(&self, vertex: usize) -> &[Edge] {
        &self.adjacency[vertex]
    }

    fn check(&self, vertex: usize) -> Result<(), GraphError> {
        if vertex < self.vertex_count() {
            Ok(())
        } else {
            Err(GraphError::invalid_vertex(vertex, self.vertex_count()))
        }
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Graph: n={}, edges={}, directed={}, weight_model={}",
            self.vertex_count(),
            self.edge_count(),
            self.directed,
            self.weight_model
        )?;
        for (vertex, edges) in self.adjacency.iter().enumerate() {
            write!(f, "{vertex}: [")?;
            for (i, edge) in edges.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{edge}")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
