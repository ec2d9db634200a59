//! Strongly connected components (Tarjan) and SCC condensation.
//!
//! # Algorithm
//!
//! Vertices are scanned `0..n`; every unvisited vertex roots a depth-first
//! traversal. Entering `u` assigns `disc[u] = low[u] = time++` and pushes `u`
//! on the component stack. Each outgoing edge `u → v` (insertion order)
//! either descends into an unvisited `v` and later folds `low[v]` into
//! `low[u]`, or, when `v` is still on the component stack, folds `disc[v]`.
//! Once all edges of `u` are explored and `low[u] == disc[u]`, the stack is
//! popped down to `u` and those vertices form one component.
//!
//! Components therefore complete in *reverse topological order* of the
//! condensation: component 0 has no outgoing condensation edges.
//!
//! # Traversal
//!
//! The descent is driven by an explicit stack of `(vertex, next edge)`
//! frames instead of recursion, so long chains cannot exhaust the call
//! stack. The frame stack replays the recursive visit order exactly:
//! discovery times, component order and member order all match a recursive
//! implementation.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::instrument::{Counter, Instrumentation};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Partition of a graph's vertices into strongly connected components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SccPartition {
    /// Components in Tarjan completion order. Members appear in stack-pop order.
    components: Vec<Vec<usize>>,
    /// Component index of every vertex.
    #[serde(skip)]
    scc_of: Vec<usize>,
}

impl SccPartition {
    /// Components in completion order.
    #[must_use]
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    /// Number of components.
    #[must_use]
    pub fn scc_count(&self) -> usize {
        self.components.len()
    }

    /// Component index containing `vertex`.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertexIndex`] if `vertex` was not part of the
    /// partitioned graph.
    pub fn scc_id(&self, vertex: usize) -> Result<usize, GraphError> {
        self.scc_of
            .get(vertex)
            .copied()
            .ok_or_else(|| GraphError::invalid_vertex(vertex, self.scc_of.len()))
    }

    /// Component index → component size.
    #[must_use]
    pub fn scc_sizes(&self) -> BTreeMap<usize, usize> {
        self.components
            .iter()
            .enumerate()
            .map(|(id, members)| (id, members.len()))
            .collect()
    }

    /// Whether each component contains a cycle, indexed by component id:
    /// more than one member, or a single member with a self-loop in `graph`.
    #[must_use]
    pub fn cyclic_flags(&self, graph: &Graph) -> Vec<bool> {
        self.components
            .iter()
            .map(|members| match members.as_slice() {
                [only] => graph
                    .adjacent(*only)
                    .is_ok_and(|edges| edges.iter().any(|e| e.to == *only)),
                _ => true,
            })
            .collect()
    }

    /// Components that contain a cycle, in completion order.
    #[must_use]
    pub fn cyclic_components<'a>(&'a self, graph: &Graph) -> Vec<&'a [usize]> {
        self.components
            .iter()
            .zip(self.cyclic_flags(graph))
            .filter_map(|(members, cyclic)| cyclic.then_some(members.as_slice()))
            .collect()
    }

    /// Contract every component of `graph` into one vertex.
    ///
    /// The result is directed and keeps `graph`'s weight model. Each distinct
    /// ordered pair of different components gets one edge carrying the weight
    /// of the first original edge found between them (vertices ascending,
    /// then insertion order). Node weight of condensation vertex `i` is the
    /// size of component `i`.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertexIndex`] if `graph` has vertices this
    /// partition does not cover.
    #[instrument(skip_all, fields(components = self.scc_count()))]
    pub fn build_condensation(&self, graph: &Graph) -> Result<Graph, GraphError> {
        let mut condensed = Graph::new(self.scc_count(), true, graph.weight_model());
        let mut added: HashSet<(usize, usize)> = HashSet::new();

        for (u, edge) in graph.edges() {
            let from = self.scc_id(u)?;
            let to = self.scc_id(edge.to)?;
            if from != to && added.insert((from, to)) {
                condensed.add_edge(from, to, edge.weight)?;
            }
        }

        for (id, members) in self.components.iter().enumerate() {
            let size = i64::try_from(members.len()).unwrap_or(i64::MAX);
            condensed.set_node_weight(id, size)?;
        }

        debug!(
            vertices = condensed.vertex_count(),
            edges = condensed.edge_count(),
            "condensation built"
        );
        Ok(condensed)
    }
}

/// Output of one Tarjan run.
#[derive(Debug, Clone, PartialEq)]
pub struct SccResult {
    /// The vertex partition.
    pub partition: SccPartition,
    /// Counters: `dfs_visits`, `edges_explored`, `stack_pops`.
    pub metrics: Instrumentation,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// One suspended visit of the depth-first traversal.
#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: usize,
    next_edge: usize,
}

struct TarjanState<'g> {
    graph: &'g Graph,
    time: usize,
    disc: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    frames: Vec<Frame>,
    components: Vec<Vec<usize>>,
    scc_of: Vec<usize>,
    metrics: Instrumentation,
}

impl<'g> TarjanState<'g> {
    fn new(graph: &'g Graph) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            time: 0,
            disc: vec![None; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            frames: Vec::new(),
            components: Vec::new(),
            scc_of: vec![0; n],
            metrics: Instrumentation::new(),
        }
    }

    fn enter(&mut self, u: usize) {
        self.disc[u] = Some(self.time);
        self.low[u] = self.time;
        self.time += 1;
        self.stack.push(u);
        self.on_stack[u] = true;
        self.frames.push(Frame {
            vertex: u,
            next_edge: 0,
        });
        self.metrics.increment(Counter::DfsVisits);
    }

    fn visit(&mut self, root: usize) {
        let graph = self.graph;
        self.enter(root);

        while let Some(top) = self.frames.len().checked_sub(1) {
            let Frame { vertex: u, next_edge } = self.frames[top];

            if let Some(edge) = graph.out_edges(u).get(next_edge) {
                self.frames[top].next_edge += 1;
                self.metrics.increment(Counter::EdgesExplored);

                let v = edge.to;
                match self.disc[v] {
                    None => self.enter(v),
                    Some(disc_v) if self.on_stack[v] => {
                        self.low[u] = self.low[u].min(disc_v);
                    }
                    Some(_) => {}
                }
                continue;
            }

            // All edges of `u` explored: this is where the recursive call returns.
            self.frames.pop();
            if Some(self.low[u]) == self.disc[u] {
                self.pop_component(u);
            }
            if let Some(parent) = self.frames.last() {
                let p = parent.vertex;
                self.low[p] = self.low[p].min(self.low[u]);
            }
        }
    }

    fn pop_component(&mut self, root: usize) {
        let id = self.components.len();
        let mut members = Vec::new();
        while let Some(v) = self.stack.pop() {
            self.on_stack[v] = false;
            self.scc_of[v] = id;
            members.push(v);
            self.metrics.increment(Counter::StackPops);
            if v == root {
                break;
            }
        }
        self.components.push(members);
    }
}

/// Partition `graph` into strongly connected components with Tarjan's
/// algorithm.
#[must_use]
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn find_sccs(graph: &Graph) -> SccResult {
    let mut state = TarjanState::new(graph);
    state.metrics.start();

    for vertex in 0..graph.vertex_count() {
        if state.disc[vertex].is_none() {
            state.visit(vertex);
        }
    }

    state.metrics.stop();
    debug!(components = state.components.len(), "tarjan complete");

    SccResult {
        partition: SccPartition {
            components: state.components,
            scc_of: state.scc_of,
        },
        metrics: state.metrics,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WeightModel;

    fn graph_with_edges(n: usize, edges: &[(usize, usize, i64)]) -> Graph {
        let mut g = Graph::directed(n);
        for &(u, v, w) in edges {
            g.add_edge(u, v, w).expect("edge in range");
        }
        g
    }

    fn sorted(members: &[usize]) -> Vec<usize> {
        let mut out = members.to_vec();
        out.sort_unstable();
        out
    }

    // -----------------------------------------------------------------------
    // Partitioning
    // -----------------------------------------------------------------------

    #[test]
    fn empty_graph_has_no_components() {
        let result = find_sccs(&Graph::directed(0));
        assert_eq!(result.partition.scc_count(), 0);
        assert!(result.partition.scc_sizes().is_empty());
    }

    #[test]
    fn chain_components_complete_sink_first() {
        // 0 → 1 → 2: the sink finishes first.
        let g = graph_with_edges(3, &[(0, 1, 1), (1, 2, 1)]);
        let result = find_sccs(&g);

        assert_eq!(result.partition.components(), &[vec![2], vec![1], vec![0]]);
        assert_eq!(result.partition.scc_id(2).unwrap(), 0);
        assert_eq!(result.partition.scc_id(0).unwrap(), 2);
    }

    #[test]
    fn ring_is_one_component_in_pop_order() {
        let g = graph_with_edges(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 1)]);
        let result = find_sccs(&g);

        assert_eq!(result.partition.scc_count(), 1);
        // Stack is [0, 1, 2, 3]; popping down to 0 yields reverse push order.
        assert_eq!(result.partition.components()[0], vec![3, 2, 1, 0]);
    }

    #[test]
    fn self_loop_is_singleton_component() {
        let g = graph_with_edges(2, &[(0, 0, 1), (0, 1, 1)]);
        let result = find_sccs(&g);

        assert_eq!(result.partition.scc_count(), 2);
        let cyclic = result.partition.cyclic_components(&g);
        assert_eq!(cyclic, vec![&[0][..]]);
    }

    #[test]
    fn cyclic_flags_follow_component_ids() {
        // {0,1} ring, 2 with a self-loop, 3 plain
        let g = graph_with_edges(4, &[(0, 1, 1), (1, 0, 1), (2, 2, 1), (1, 3, 1)]);
        let partition = find_sccs(&g).partition;
        let flags = partition.cyclic_flags(&g);

        assert_eq!(flags.len(), partition.scc_count());
        for (id, members) in partition.components().iter().enumerate() {
            let expected = members.len() > 1 || members == &[2];
            assert_eq!(flags[id], expected, "component {id}: {members:?}");
        }
    }

    #[test]
    fn cross_edge_to_finished_component_is_ignored() {
        // 0 → 1, 0 → 2, 2 → 1, 1 ↔ 3
        let g = graph_with_edges(4, &[(0, 1, 1), (1, 3, 1), (3, 1, 1), (0, 2, 1), (2, 1, 1)]);
        let result = find_sccs(&g);

        let comps: Vec<Vec<usize>> = result
            .partition
            .components()
            .iter()
            .map(|c| sorted(c))
            .collect();
        assert_eq!(comps, vec![vec![1, 3], vec![2], vec![0]]);
    }

    #[test]
    fn unknown_vertex_has_no_scc_id() {
        let result = find_sccs(&Graph::directed(2));
        assert_eq!(
            result.partition.scc_id(5),
            Err(GraphError::invalid_vertex(5, 2))
        );
    }

    #[test]
    fn long_chain_does_not_overflow_the_stack() {
        let n = 200_000;
        let mut g = Graph::directed(n);
        for v in 0..n - 1 {
            g.add_edge(v, v + 1, 1).unwrap();
        }
        g.add_edge(n - 1, 0, 1).unwrap();

        let result = find_sccs(&g);
        assert_eq!(result.partition.scc_count(), 1);
        assert_eq!(result.partition.components()[0].len(), n);
    }

    // -----------------------------------------------------------------------
    // Instrumentation
    // -----------------------------------------------------------------------

    #[test]
    fn counters_track_visits_edges_and_pops() {
        let g = graph_with_edges(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (2, 2, 1)]);
        let result = find_sccs(&g);

        assert_eq!(result.metrics.count(Counter::DfsVisits), 3);
        assert_eq!(result.metrics.count(Counter::EdgesExplored), 4);
        assert_eq!(result.metrics.count(Counter::StackPops), 3);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let g = graph_with_edges(5, &[(0, 1, 1), (1, 0, 1), (1, 2, 1), (3, 4, 1)]);
        assert_eq!(find_sccs(&g), find_sccs(&g));
    }

    // -----------------------------------------------------------------------
    // Condensation
    // -----------------------------------------------------------------------

    #[test]
    fn condensation_dedups_and_keeps_first_weight() {
        // {0,1} cycle; both 0 → 2 (w=5) and 1 → 2 (w=9) cross into {2}.
        let g = graph_with_edges(3, &[(0, 1, 1), (1, 0, 1), (0, 2, 5), (1, 2, 9)]);
        let result = find_sccs(&g);
        let cond = result.partition.build_condensation(&g).unwrap();

        let from = result.partition.scc_id(0).unwrap();
        let to = result.partition.scc_id(2).unwrap();
        assert_eq!(cond.vertex_count(), 2);
        assert_eq!(cond.edge_count(), 1);
        assert_eq!(cond.adjacent(from).unwrap()[0].to, to);
        assert_eq!(cond.adjacent(from).unwrap()[0].weight, 5);
        assert_eq!(cond.node_weight(from).unwrap(), 2);
        assert_eq!(cond.node_weight(to).unwrap(), 1);
    }

    #[test]
    fn condensation_drops_intra_component_edges() {
        let g = graph_with_edges(2, &[(0, 1, 1), (1, 0, 1), (0, 0, 3)]);
        let result = find_sccs(&g);
        let cond = result.partition.build_condensation(&g).unwrap();

        assert_eq!(cond.vertex_count(), 1);
        assert_eq!(cond.edge_count(), 0);
    }

    #[test]
    fn condensation_keeps_weight_model() {
        let mut g = Graph::new(2, true, WeightModel::Node);
        g.add_edge(0, 1, 4).unwrap();
        let result = find_sccs(&g);
        let cond = result.partition.build_condensation(&g).unwrap();
        assert_eq!(cond.weight_model(), WeightModel::Node);
        assert!(cond.is_directed());
    }

    #[test]
    fn condensation_rejects_foreign_graph() {
        let small = Graph::directed(1);
        let big = graph_with_edges(3, &[(0, 2, 1)]);
        let result = find_sccs(&small);
        assert!(matches!(
            result.partition.build_condensation(&big),
            Err(GraphError::InvalidVertexIndex { .. })
        ));
    }
}
