//! Serde model of the JSON graph document.
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 3,
//!   "weight_model": "edge",
//!   "edges": [ { "u": 0, "v": 1, "w": 3 }, { "u": 1, "v": 2 } ],
//!   "node_weights": [1, 2, 3],
//!   "source": 0
//! }
//! ```
//!
//! Only `directed` and `n` are required. Missing edge weights are 1, missing
//! node weights are 1, node weights past `n` are ignored and the source
//! defaults to vertex 0. Edges are inserted exactly as listed; an undirected
//! document must list both directions itself.

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, GraphError};
use crate::graph::{Graph, WeightModel};

const fn default_weight() -> i64 {
    1
}

/// One `{u, v, w}` entry of the `edges` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Source vertex.
    pub u: usize,
    /// Destination vertex.
    pub v: usize,
    /// Weight, 1 when absent.
    #[serde(default = "default_weight")]
    pub w: i64,
}

/// A whole graph document as read from or written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Directed flag.
    pub directed: bool,
    /// Vertex count.
    pub n: usize,
    /// Cost model for the path analyzer.
    #[serde(default)]
    pub weight_model: WeightModel,
    /// Edges in insertion order.
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    /// Per-vertex weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_weights: Option<Vec<i64>>,
    /// Designated source vertex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
}

impl GraphDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::Graph`] carrying [`GraphError::UnknownWeightModel`]
    ///   when `weight_model` is a string other than `edge` or `node`.
    /// - [`DocumentError::Json`] for malformed JSON or a missing or mistyped
    ///   field.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(text).map_err(|err| {
            unknown_weight_model(text).map_or(DocumentError::Json(err), DocumentError::Graph)
        })
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates [`serde_json::Error`].
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The source vertex to analyze from.
    #[must_use]
    pub fn source_vertex(&self) -> usize {
        self.source.unwrap_or(0)
    }

    /// Build the in-memory [`Graph`].
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertexIndex`] for an edge endpoint outside `[0, n)`.
    pub fn to_graph(&self) -> Result<Graph, GraphError> {
        let mut graph = Graph::new(self.n, self.directed, self.weight_model);
        for edge in &self.edges {
            graph.add_edge(edge.u, edge.v, edge.w)?;
        }
        if let Some(weights) = &self.node_weights {
            for (vertex, &weight) in weights.iter().take(self.n).enumerate() {
                graph.set_node_weight(vertex, weight)?;
            }
        }
        Ok(graph)
    }

    /// Describe `graph` as a document. Node weights are written only when
    /// some vertex differs from the default of 1.
    #[must_use]
    pub fn from_graph(graph: &Graph, source: Option<usize>) -> Self {
        let edges = graph
            .edges()
            .map(|(u, edge)| EdgeSpec {
                u,
                v: edge.to,
                w: edge.weight,
            })
            .collect();
        let node_weights = graph
            .node_weights()
            .iter()
            .any(|&w| w != 1)
            .then(|| graph.node_weights().to_vec());

        Self {
            directed: graph.is_directed(),
            n: graph.vertex_count(),
            weight_model: graph.weight_model(),
            edges,
            node_weights,
            source,
        }
    }
}

/// The error for an unusable `weight_model` string, if `text` carries one.
fn unknown_weight_model(text: &str) -> Option<GraphError> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value.get("weight_model")?.as_str()?.parse::<WeightModel>().err()
}
