//! Single-source shortest and longest paths on a DAG.
//!
//! # Algorithm
//!
//! 1. Obtain a Kahn order of the graph; a cyclic graph is rejected with
//!    [`GraphError::NotADag`].
//! 2. Set `dist[source] = 0`, every other distance unreachable.
//! 3. Visit vertices in that order. A reachable `u` relaxes each outgoing
//!    edge `u → v` with cost `w` (the edge weight, or the node weight of `v`
//!    under [`WeightModel::Node`]): shortest mode takes `dist[u] + w` when it
//!    is strictly smaller, longest mode when it is strictly larger.
//!
//! Strict comparison means the first improving predecessor in relaxation
//! order keeps the parent slot on ties.
//!
//! Longest paths are computed directly, not by negating weights, so both
//! modes share one relaxation loop. Sums use checked arithmetic; a sum that
//! leaves the `i64` range is reported as [`GraphError::DistanceOverflow`].
//!
//! # Critical path
//!
//! The critical path is the longest path from the source to whichever
//! reachable vertex has the largest longest-path distance. Ties go to the
//! lowest vertex index.

#![allow(clippy::module_name_repetitions)]

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::{Graph, WeightModel};
use crate::instrument::{Counter, Instrumentation};
use crate::topo::kahn_sort;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which extremum the relaxation keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    /// Minimise path cost.
    Shortest,
    /// Maximise path cost.
    Longest,
}

impl PathMode {
    const fn improves(self, candidate: i64, current: i64) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }
}

impl fmt::Display for PathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shortest => "shortest",
            Self::Longest => "longest",
        })
    }
}

/// Distances and parent pointers from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    /// Mode used for relaxation.
    pub mode: PathMode,
    /// The source vertex.
    pub source: usize,
    /// Distance per vertex; `None` means unreachable from `source`.
    pub distances: Vec<Option<i64>>,
    /// Predecessor on the chosen path; `None` for the source and unreachable vertices.
    pub parents: Vec<Option<usize>>,
    /// The topological order the relaxation followed.
    pub topo_order: Vec<usize>,
}

impl PathResult {
    /// Distance to `vertex`, `None` when unreachable or out of range.
    #[must_use]
    pub fn distance(&self, vertex: usize) -> Option<i64> {
        self.distances.get(vertex).copied().flatten()
    }

    /// Path from the source to `target`, empty when `target` is unreachable.
    #[must_use]
    pub fn path_to(&self, target: usize) -> Vec<usize> {
        reconstruct_path(self.source, target, &self.parents)
    }

    /// Reachable vertices paired with their distance, ascending by vertex.
    pub fn reachable(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter_map(|(v, d)| d.map(|d| (v, d)))
    }
}

/// One path computation and the counters it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRun {
    /// Distances and parents.
    pub result: PathResult,
    /// Counters: `vertices_processed`, `edge_relaxations`, `successful_relaxations`.
    pub metrics: Instrumentation,
}

/// The longest path out of the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPathResult {
    /// Vertices from source to `end_vertex`.
    pub path: Vec<usize>,
    /// Total cost of `path`.
    pub length: i64,
    /// Where the path ends.
    pub end_vertex: usize,
}

/// Critical path plus the counters of the longest-path run behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalPathRun {
    /// The path.
    pub critical: CriticalPathResult,
    /// Counters of the longest-path computation.
    pub metrics: Instrumentation,
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Path queries over one DAG.
///
/// Construction sorts the graph once; each query reuses that order.
#[derive(Debug, Clone)]
pub struct DagPathAnalyzer<'g> {
    graph: &'g Graph,
    order: Vec<usize>,
}

impl<'g> DagPathAnalyzer<'g> {
    /// Sort `graph` topologically and prepare for path queries.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotADag`] if `graph` contains a cycle.
    pub fn new(graph: &'g Graph) -> Result<Self, GraphError> {
        let order = kahn_sort(graph).into_dag_order()?;
        Ok(Self { graph, order })
    }

    /// The topological order queries relax in.
    #[must_use]
    pub fn topo_order(&self) -> &[usize] {
        &self.order
    }

    /// Single-source shortest paths.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertexIndex`] for an out-of-range source,
    /// [`GraphError::DistanceOverflow`] if a sum leaves the `i64` range.
    pub fn shortest_paths(&self, source: usize) -> Result<PathRun, GraphError> {
        self.relax(source, PathMode::Shortest)
    }

    /// Single-source longest paths.
    ///
    /// # Errors
    ///
    /// Same as [`shortest_paths`](Self::shortest_paths).
    pub fn longest_paths(&self, source: usize) -> Result<PathRun, GraphError> {
        self.relax(source, PathMode::Longest)
    }

    /// Longest path from `source` to the farthest reachable vertex.
    ///
    /// With no outgoing reach the path is just `[source]` of length 0.
    ///
    /// # Errors
    ///
    /// Same as [`shortest_paths`](Self::shortest_paths).
    pub fn find_critical_path(&self, source: usize) -> Result<CriticalPathRun, GraphError> {
        let PathRun { result, metrics } = self.longest_paths(source)?;

        let mut end_vertex = source;
        let mut length = 0_i64;
        let mut best: Option<i64> = None;
        for (vertex, distance) in result.reachable() {
            if best.is_none_or(|b| distance > b) {
                best = Some(distance);
                end_vertex = vertex;
                length = distance;
            }
        }

        let path = result.path_to(end_vertex);
        debug!(end_vertex, length, hops = path.len(), "critical path found");

        Ok(CriticalPathRun {
            critical: CriticalPathResult {
                path,
                length,
                end_vertex,
            },
            metrics,
        })
    }

    #[instrument(skip(self), fields(vertices = self.graph.vertex_count()))]
    fn relax(&self, source: usize, mode: PathMode) -> Result<PathRun, GraphError> {
        let n = self.graph.vertex_count();
        if source >= n {
            return Err(GraphError::invalid_vertex(source, n));
        }

        let mut metrics = Instrumentation::new();
        let mut distances: Vec<Option<i64>> = vec![None; n];
        let mut parents: Vec<Option<usize>> = vec![None; n];
        distances[source] = Some(0);

        metrics.start();

        for &u in &self.order {
            metrics.increment(Counter::VerticesProcessed);
            let Some(base) = distances[u] else {
                continue;
            };

            for edge in self.graph.out_edges(u) {
                metrics.increment(Counter::EdgeRelaxations);
                let v = edge.to;
                let cost = match self.graph.weight_model() {
                    WeightModel::Edge => edge.weight,
                    WeightModel::Node => self.graph.node_weights()[v],
                };
                let candidate = base
                    .checked_add(cost)
                    .ok_or(GraphError::DistanceOverflow { vertex: v })?;

                let better = distances[v].is_none_or(|current| mode.improves(candidate, current));
                if better {
                    distances[v] = Some(candidate);
                    parents[v] = Some(u);
                    metrics.increment(Counter::SuccessfulRelaxations);
                }
            }
        }

        metrics.stop();
        debug!(
            reachable = distances.iter().flatten().count(),
            relaxations = metrics.count(Counter::SuccessfulRelaxations),
            "relaxation complete"
        );

        Ok(PathRun {
            result: PathResult {
                mode,
                source,
                distances,
                parents,
                topo_order: self.order.clone(),
            },
            metrics,
        })
    }
}

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

/// Walk `parents` back from `target` to `source`.
///
/// Returns an empty path when `target` is out of range, or when it is not the
/// source and has no parent (unreachable). A chain that ends before reaching
/// `source` stops at its first parentless vertex.
#[must_use]
pub fn reconstruct_path(source: usize, target: usize, parents: &[Option<usize>]) -> Vec<usize> {
    let Some(&first) = parents.get(target) else {
        return Vec::new();
    };
    if target != source && first.is_none() {
        return Vec::new();
    }

    let mut path = vec![target];
    let mut current = target;
    while current != source {
        match parents.get(current).copied().flatten() {
            // Malformed parent arrays may loop.
            Some(parent) if path.len() <= parents.len() => {
                path.push(parent);
                current = parent;
            }
            _ => break,
        }
    }
    path.reverse();
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
