//! Error types shared by every algorithm in the crate.
//!
//! Cyclicity is *not* an error for the topological sorter: Kahn's algorithm
//! reports it as an empty order. It only becomes [`GraphError::NotADag`] once
//! something needs a complete order, i.e. the path analyzer or
//! [`TopoResult::into_dag_order`](crate::topo::TopoResult::into_dag_order).

/// Errors raised by graph construction and analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A vertex index fell outside `[0, vertex_count)`.
    #[error("invalid vertex index {index} (graph has {vertex_count} vertices)")]
    InvalidVertexIndex {
        /// The offending index.
        index: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// The graph contains a cycle, so no complete topological order exists.
    #[error("graph contains a cycle: only {ordered} of {vertex_count} vertices could be ordered")]
    NotADag {
        /// Vertices Kahn's algorithm managed to emit before stalling.
        ordered: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// A weight model tag other than `edge` or `node`.
    #[error("unknown weight model {0:?} (expected \"edge\" or \"node\")")]
    UnknownWeightModel(String),

    /// Distance arithmetic left the `i64` range while relaxing into `vertex`.
    #[error("path distance overflowed while relaxing vertex {vertex}")]
    DistanceOverflow {
        /// Destination vertex of the overflowing relaxation.
        vertex: usize,
    },
}

/// Errors raised while reading a graph document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Malformed JSON, or a field missing or of the wrong type.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Well-formed JSON carrying a value the graph model rejects.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl GraphError {
    /// Shorthand used by every bounds check in the crate.
    #[must_use]
    pub const fn invalid_vertex(index: usize, vertex_count: usize) -> Self {
        Self::InvalidVertexIndex {
            index,
            vertex_count,
        }
    }
}
