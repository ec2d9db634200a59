//! Topological ordering: Kahn's algorithm and a depth-first variant.
//!
//! # Cycle signal
//!
//! [`kahn_sort`] never fails. When the graph has a cycle the queue drains
//! before every vertex is emitted and the returned order is **empty**. Code
//! that needs a complete order calls [`TopoResult::into_dag_order`], which
//! turns that signal into [`GraphError::NotADag`]; the path analyzer relies
//! on exactly that conversion.
//!
//! [`dfs_sort`] is kept for cross-validation. It emits every vertex even on
//! cyclic input, but records whether it met a back edge so that
//! [`TopoResult::is_acyclic`] stays truthful for both variants.

#![allow(clippy::module_name_repetitions)]

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::instrument::{Counter, Instrumentation};

/// Output of one topological sort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopoResult {
    /// Vertices in topological order; empty when Kahn detected a cycle.
    pub order: Vec<usize>,
    /// Counters collected during the run.
    pub metrics: Instrumentation,
    #[serde(skip)]
    vertex_count: usize,
    #[serde(skip)]
    emitted: usize,
    #[serde(skip)]
    acyclic: bool,
}

impl TopoResult {
    /// `true` when the sorted graph has no cycle.
    #[must_use]
    pub const fn is_acyclic(&self) -> bool {
        self.acyclic
    }

    /// Number of vertices emitted before the sort finished or stalled.
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    /// The complete order, or [`GraphError::NotADag`] if the graph is cyclic.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotADag`] when a cycle was detected.
    pub fn into_dag_order(self) -> Result<Vec<usize>, GraphError> {
        if self.acyclic {
            Ok(self.order)
        } else {
            Err(GraphError::NotADag {
                ordered: self.emitted,
                vertex_count: self.vertex_count,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Kahn
// ---------------------------------------------------------------------------

/// Kahn's algorithm with a FIFO queue seeded in ascending vertex order.
///
/// Returns an empty order when the graph contains a cycle.
#[must_use]
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn kahn_sort(graph: &Graph) -> TopoResult {
    let n = graph.vertex_count();
    let mut metrics = Instrumentation::new();

    let mut in_degree = vec![0_usize; n];
    for (_, edge) in graph.edges() {
        in_degree[edge.to] += 1;
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    for (vertex, &degree) in in_degree.iter().enumerate() {
        if degree == 0 {
            queue.push_back(vertex);
            metrics.increment(Counter::QueuePushes);
        }
    }

    let mut order = Vec::with_capacity(n);
    metrics.start();

    while let Some(u) = queue.pop_front() {
        order.push(u);
        metrics.increment(Counter::QueuePops);

        for edge in graph.out_edges(u) {
            let v = edge.to;
            in_degree[v] -= 1;
            metrics.increment(Counter::EdgeRelaxations);
            if in_degree[v] == 0 {
                queue.push_back(v);
                metrics.increment(Counter::QueuePushes);
            }
        }
    }

    metrics.stop();

    let emitted = order.len();
    let acyclic = emitted == n;
    if acyclic {
        debug!(ordered = emitted, "kahn complete");
    } else {
        warn!(
            ordered = emitted,
            vertices = n,
            "graph contains a cycle; topological sort incomplete"
        );
        order.clear();
    }

    TopoResult {
        order,
        metrics,
        vertex_count: n,
        emitted,
        acyclic,
    }
}

// ---------------------------------------------------------------------------
// Depth-first variant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Depth-first topological sort: reverse postorder, roots scanned ascending.
///
/// Iterative; safe on arbitrarily long chains. Any valid order is acceptable
/// here, so the result need not match [`kahn_sort`].
#[must_use]
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn dfs_sort(graph: &Graph) -> TopoResult {
    let n = graph.vertex_count();
    let mut metrics = Instrumentation::new();
    let mut marks = vec![Mark::Unvisited; n];
    let mut postorder = Vec::with_capacity(n);
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut acyclic = true;

    metrics.start();

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnPath;
        metrics.increment(Counter::DfsVisits);
        frames.push((root, 0));

        while let Some(top) = frames.last_mut() {
            let (u, cursor) = *top;
            if let Some(edge) = graph.out_edges(u).get(cursor) {
                top.1 += 1;
                metrics.increment(Counter::EdgesExplored);
                match marks[edge.to] {
                    Mark::Unvisited => {
                        marks[edge.to] = Mark::OnPath;
                        metrics.increment(Counter::DfsVisits);
                        frames.push((edge.to, 0));
                    }
                    Mark::OnPath => acyclic = false,
                    Mark::Done => {}
                }
            } else {
                frames.pop();
                marks[u] = Mark::Done;
                postorder.push(u);
                metrics.increment(Counter::StackPushes);
            }
        }
    }

    metrics.stop();
    postorder.reverse();
    debug!(ordered = postorder.len(), acyclic, "dfs sort complete");

    TopoResult {
        emitted: postorder.len(),
        order: postorder,
        metrics,
        vertex_count: n,
        acyclic,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that `order` lists every vertex of `graph` exactly once and that
/// every edge `u → v` has `u` before `v`.
#[must_use]
pub fn is_valid_topological_order(graph: &Graph, order: &[usize]) -> bool {
    let n = graph.vertex_count();
    if order.len() != n {
        return false;
    }

    let mut position: Vec<Option<usize>> = vec![None; n];
    for (pos, &vertex) in order.iter().enumerate() {
        match position.get_mut(vertex) {
            Some(slot @ None) => *slot = Some(pos),
            _ => return false,
        }
    }

    graph
        .edges()
        .all(|(u, edge)| position[u] < position[edge.to])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
