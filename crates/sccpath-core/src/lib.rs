#![forbid(unsafe_code)]
//! sccpath-core library.
//!
//! Strongly connected components, condensation, topological ordering and
//! single-source DAG paths over an append-only adjacency-list [`Graph`].
//!
//! ```
//! use sccpath_core::{Graph, analyze};
//!
//! let mut g = Graph::directed(3);
//! g.add_edge(0, 1, 2).unwrap();
//! g.add_edge(1, 0, 2).unwrap();
//! g.add_edge(1, 2, 5).unwrap();
//!
//! let report = analyze(&g, 0).unwrap();
//! assert_eq!(report.scc_count(), 2);
//! assert_eq!(report.paths.unwrap().critical.length, 5);
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`GraphError`] (`thiserror`). A cycle is only an error where a
//!   complete order is required.
//! - **Logging**: `tracing` spans on every algorithm entry point, `debug!` on
//!   completion, `warn!` when Kahn's algorithm meets a cycle.
//! - **Instrumentation**: every run returns its own [`Instrumentation`].

pub mod analysis;
pub mod document;
pub mod error;
pub mod graph;
pub mod instrument;
pub mod paths;
pub mod scc;
pub mod topo;

pub use analysis::{AnalysisReport, analyze};
pub use document::{EdgeSpec, GraphDocument};
pub use error::{DocumentError, GraphError};
pub use graph::{Edge, Graph, WeightModel};
pub use instrument::{Counter, Instrumentation};
pub use paths::{
    CriticalPathResult, CriticalPathRun, DagPathAnalyzer, PathMode, PathResult, PathRun,
    reconstruct_path,
};
pub use scc::{SccPartition, SccResult, find_sccs};
pub use topo::{TopoResult, dfs_sort, is_valid_topological_order, kahn_sort};
