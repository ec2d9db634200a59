//! End-to-end pipeline: SCC → condensation → topological order → paths.
//!
//! [`analyze`] runs every stage on one input graph and returns an owned,
//! serializable [`AnalysisReport`]. Path analysis runs on the condensation
//! from the component that contains the requested source, and only when the
//! condensation order is non-empty.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{info, instrument};

use crate::document::GraphDocument;
use crate::error::GraphError;
use crate::graph::{Graph, WeightModel};
use crate::instrument::Instrumentation;
use crate::paths::{CriticalPathResult, DagPathAnalyzer, PathResult};
use crate::scc::find_sccs;
use crate::topo::{is_valid_topological_order, kahn_sort};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Shape of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    /// Vertex count.
    pub vertices: usize,
    /// Stored edge count.
    pub edges: usize,
    /// Whether edges are one-way.
    pub directed: bool,
    /// How path costs are charged.
    pub weight_model: WeightModel,
}

impl GraphSummary {
    /// Summarize `graph`.
    #[must_use]
    pub fn of(graph: &Graph) -> Self {
        Self {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            directed: graph.is_directed(),
            weight_model: graph.weight_model(),
        }
    }
}

/// One strongly connected component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentReport {
    /// Component index, in Tarjan completion order.
    pub id: usize,
    /// Original vertices, in stack-pop order.
    pub members: Vec<usize>,
    /// `members.len()`.
    pub size: usize,
    /// More than one member, or a self-loop.
    pub cyclic: bool,
}

/// Path results on the condensation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathsReport {
    /// Component containing the requested source vertex.
    pub condensation_source: usize,
    /// Shortest distances over condensation vertices.
    pub shortest: PathResult,
    /// Longest distances over condensation vertices.
    pub longest: PathResult,
    /// Longest path out of `condensation_source`.
    pub critical: CriticalPathResult,
}

/// Instrumentation for each stage that ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageMetrics {
    /// Tarjan on the input graph.
    pub scc: Instrumentation,
    /// Kahn on the condensation.
    pub topo: Instrumentation,
    /// Shortest-path relaxation, when paths ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest: Option<Instrumentation>,
    /// Longest-path relaxation, when paths ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest: Option<Instrumentation>,
}

/// Everything [`analyze`] found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Shape of the input graph.
    pub graph: GraphSummary,
    /// Requested source vertex in the input graph.
    pub source: usize,
    /// Strongly connected components in completion order.
    pub components: Vec<ComponentReport>,
    /// The condensation as a document, sourced at the condensation source.
    pub condensation: GraphDocument,
    /// Kahn order of the condensation; empty if it could not be ordered.
    pub topo_order: Vec<usize>,
    /// `topo_order` is non-empty and respects every condensation edge.
    pub topo_valid: bool,
    /// Original vertices grouped by component, components in `topo_order`.
    pub expanded_order: Vec<Vec<usize>>,
    /// Path results; absent when the condensation order is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsReport>,
    /// Counters per stage.
    pub metrics: StageMetrics,
}

impl AnalysisReport {
    /// Number of strongly connected components.
    #[must_use]
    pub fn scc_count(&self) -> usize {
        self.components.len()
    }

    /// Condensation shape.
    #[must_use]
    pub fn condensation_summary(&self) -> GraphSummary {
        GraphSummary {
            vertices: self.condensation.n,
            edges: self.condensation.edges.len(),
            directed: self.condensation.directed,
            weight_model: self.condensation.weight_model,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full analysis of `graph` from `source`.
///
/// # Errors
///
/// - [`GraphError::InvalidVertexIndex`] if path analysis runs and `source`
///   is out of range.
/// - [`GraphError::DistanceOverflow`] if a path sum leaves the `i64` range.
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn analyze(graph: &Graph, source: usize) -> Result<AnalysisReport, GraphError> {
    let scc = find_sccs(graph);
    let partition = scc.partition;
    let condensation = partition.build_condensation(graph)?;

    let components: Vec<ComponentReport> = partition
        .components()
        .iter()
        .zip(partition.cyclic_flags(graph))
        .enumerate()
        .map(|(id, (members, cyclic))| ComponentReport {
            id,
            members: members.clone(),
            size: members.len(),
            cyclic,
        })
        .collect();

    let topo = kahn_sort(&condensation);
    let topo_valid =
        !topo.order.is_empty() && is_valid_topological_order(&condensation, &topo.order);
    let expanded_order: Vec<Vec<usize>> = topo
        .order
        .iter()
        .map(|&id| partition.components()[id].clone())
        .collect();

    let mut metrics = StageMetrics {
        scc: scc.metrics,
        topo: topo.metrics,
        shortest: None,
        longest: None,
    };

    let paths = if topo.order.is_empty() {
        None
    } else {
        let condensation_source = partition.scc_id(source)?;
        let analyzer = DagPathAnalyzer::new(&condensation)?;
        let shortest = analyzer.shortest_paths(condensation_source)?;
        let longest = analyzer.longest_paths(condensation_source)?;
        let critical = analyzer.find_critical_path(condensation_source)?.critical;

        metrics.shortest = Some(shortest.metrics);
        metrics.longest = Some(longest.metrics);
        Some(PathsReport {
            condensation_source,
            shortest: shortest.result,
            longest: longest.result,
            critical,
        })
    };

    info!(
        components = components.len(),
        condensation_edges = condensation.edge_count(),
        ordered = topo.order.len(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        graph: GraphSummary::of(graph),
        source,
        components,
        condensation: GraphDocument::from_graph(
            &condensation,
            paths.as_ref().map(|p| p.condensation_source),
        ),
        topo_order: topo.order,
        topo_valid,
        expanded_order,
        paths,
        metrics,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
