//! `sccpath analyze`: run the full pipeline on one graph document.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use sccpath_core::analysis::PathsReport;
use sccpath_core::{AnalysisReport, Graph, Instrumentation, PathResult, analyze};
use tracing::debug;

use crate::cmd::load_document;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::timing;

/// Arguments for `sccpath analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Graph document (JSON).
    pub file: PathBuf,

    /// Source vertex for path analysis. Defaults to the document's `source`,
    /// or 0.
    #[arg(long)]
    pub source: Option<usize>,
}

/// Execute `sccpath analyze`.
pub fn run_analyze(args: &AnalyzeArgs, output: OutputMode) -> anyhow::Result<()> {
    let doc = timing::timed("load", || load_document(&args.file))?;
    let graph = doc
        .to_graph()
        .with_context(|| format!("invalid graph in {}", args.file.display()))?;
    let source = args.source.unwrap_or_else(|| doc.source_vertex());
    debug!(file = %args.file.display(), source, "loaded graph");

    let report = timing::timed("analyze", || analyze(&graph, source))
        .with_context(|| format!("analysis of {} failed", args.file.display()))?;

    render_mode(
        output,
        &report,
        render_text,
        |report, w| render_pretty(report, &graph, &args.file, w),
    )
}

fn join(values: &[usize], sep: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

fn distance_label(distance: Option<i64>) -> String {
    distance.map_or_else(|| "unreachable".to_string(), |d| d.to_string())
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

fn render_text(report: &AnalysisReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "graph vertices={} edges={} directed={} weight_model={}",
        report.graph.vertices, report.graph.edges, report.graph.directed, report.graph.weight_model
    )?;
    writeln!(w, "scc_count={}", report.scc_count())?;
    for component in &report.components {
        writeln!(
            w,
            "scc id={} size={} cyclic={} members={}",
            component.id,
            component.size,
            component.cyclic,
            join(&component.members, ",")
        )?;
    }
    let cond = report.condensation_summary();
    writeln!(w, "condensation vertices={} edges={}", cond.vertices, cond.edges)?;

    if report.topo_order.is_empty() {
        writeln!(w, "topo_order=none")?;
    } else {
        writeln!(w, "topo_order={}", join(&report.topo_order, ","))?;
    }

    if let Some(paths) = &report.paths {
        writeln!(w, "source={} condensation_source={}", report.source, paths.condensation_source)?;
        for result in [&paths.shortest, &paths.longest] {
            let distances: Vec<String> = result
                .distances
                .iter()
                .enumerate()
                .map(|(v, d)| format!("{v}:{}", distance_label(*d)))
                .collect();
            writeln!(w, "{} {}", result.mode, distances.join(" "))?;
        }
        writeln!(
            w,
            "critical_path={} length={}",
            join(&paths.critical.path, ","),
            paths.critical.length
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pretty
// ---------------------------------------------------------------------------

fn write_metrics(w: &mut dyn Write, metrics: &Instrumentation) -> io::Result<()> {
    writeln!(w, "Metrics:")?;
    for line in metrics.summary().lines() {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

fn write_path_table(w: &mut dyn Write, result: &PathResult) -> io::Result<()> {
    writeln!(w, "{} paths from SCC {}:", capitalize(&result.mode.to_string()), result.source)?;
    for (vertex, distance) in result.distances.iter().enumerate() {
        match distance {
            Some(d) => writeln!(
                w,
                "  to SCC {vertex}: {d:>4}   path: {}",
                join(&result.path_to(vertex), " -> ")
            )?,
            None => writeln!(w, "  to SCC {vertex}: unreachable")?,
        }
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

fn write_paths(w: &mut dyn Write, report: &AnalysisReport, paths: &PathsReport) -> io::Result<()> {
    writeln!(
        w,
        "Source vertex {} lies in SCC {}",
        report.source, paths.condensation_source
    )?;
    writeln!(w)?;
    write_path_table(w, &paths.shortest)?;
    if let Some(metrics) = &report.metrics.shortest {
        write_metrics(w, metrics)?;
    }
    writeln!(w)?;
    write_path_table(w, &paths.longest)?;
    if let Some(metrics) = &report.metrics.longest {
        write_metrics(w, metrics)?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "Critical path: {} (length {})",
        join(&paths.critical.path, " -> "),
        paths.critical.length
    )
}

fn render_pretty(
    report: &AnalysisReport,
    graph: &Graph,
    file: &Path,
    w: &mut dyn Write,
) -> io::Result<()> {
    writeln!(w, "Analyzing dataset: {}", file.display())?;
    writeln!(w)?;
    write!(w, "{graph}")?;

    pretty_section(w, "STEP 1: STRONGLY CONNECTED COMPONENTS (Tarjan)")?;
    writeln!(w, "Found {} SCCs:", report.scc_count())?;
    for component in &report.components {
        writeln!(
            w,
            "  SCC {}: [{}] (size {}{})",
            component.id,
            join(&component.members, ", "),
            component.size,
            if component.cyclic { ", cyclic" } else { "" }
        )?;
    }
    write_metrics(w, &report.metrics.scc)?;

    pretty_section(w, "CONDENSATION GRAPH (DAG of SCCs)")?;
    let cond = report.condensation_summary();
    writeln!(w, "Condensation: n={}, edges={}", cond.vertices, cond.edges)?;
    for edge in &report.condensation.edges {
        writeln!(w, "  SCC {} -> SCC {} (w={})", edge.u, edge.v, edge.w)?;
    }

    pretty_section(w, "STEP 2: TOPOLOGICAL SORT (Kahn)")?;
    if report.topo_order.is_empty() {
        writeln!(w, "Graph contains a cycle; no topological order exists.")?;
    } else {
        writeln!(w, "Topological order: {}", join(&report.topo_order, " "))?;
        writeln!(w)?;
        writeln!(w, "Expanded task order:")?;
        for (id, members) in report.topo_order.iter().zip(&report.expanded_order) {
            writeln!(w, "  SCC {id} contains tasks: [{}]", join(members, ", "))?;
        }
    }
    write_metrics(w, &report.metrics.topo)?;

    pretty_section(w, "STEP 3: DAG SHORTEST & LONGEST PATHS")?;
    match &report.paths {
        Some(paths) => write_paths(w, report, paths)?,
        None => writeln!(w, "[WARNING] Cannot compute DAG paths: graph contains cycles")?,
    }

    pretty_section(w, "ANALYSIS COMPLETE")?;
    pretty_kv(w, "✓ SCCs found", report.scc_count().to_string())?;
    pretty_kv(w, "✓ Condensation nodes", cond.vertices.to_string())?;
    pretty_kv(w, "✓ Condensation edges", cond.edges.to_string())?;
    pretty_kv(
        w,
        "✓ Topological order",
        if report.topo_valid { "Valid" } else { "N/A (cyclic)" },
    )?;
    pretty_kv(w, "✓ Weight model", report.graph.weight_model.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> Graph {
        let mut g = Graph::directed(6);
        for (u, v, w) in [(0, 1, 3), (0, 3, 2), (1, 2, 4), (2, 5, 1), (3, 4, 2), (4, 5, 3)] {
            g.add_edge(u, v, w).expect("edge in range");
        }
        g
    }

    fn ring_with_tail() -> Graph {
        let mut g = Graph::directed(5);
        for (u, v) in [(0, 1), (1, 2), (2, 0), (2, 3)] {
            g.add_edge(u, v, 1).expect("edge in range");
        }
        g
    }

    fn pretty(graph: &Graph, source: usize) -> String {
        let report = analyze(graph, source).unwrap();
        let mut buf = Vec::new();
        render_pretty(&report, graph, Path::new("tasks.json"), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn text(graph: &Graph, source: usize) -> String {
        let report = analyze(graph, source).unwrap();
        let mut buf = Vec::new();
        render_text(&report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn pretty_lists_every_stage() {
        let out = pretty(&scenario_a(), 0);
        assert!(out.contains("Analyzing dataset: tasks.json"));
        assert!(out.contains("Found 6 SCCs:"));
        assert!(out.contains("Topological order:"));
        assert!(out.contains("Shortest paths from SCC"));
        assert!(out.contains("Longest paths from SCC"));
        assert!(out.contains("(length 8)"));
        assert!(out.contains("Valid"));
    }

    #[test]
    fn unreachable_vertices_are_labelled() {
        let out = pretty(&ring_with_tail(), 0);
        assert!(out.contains("unreachable"), "{out}");
        assert!(out.contains("cyclic"));

        let out = text(&ring_with_tail(), 0);
        assert!(out.contains(":unreachable"), "{out}");
    }

    #[test]
    fn text_lines_are_key_value() {
        let out = text(&scenario_a(), 0);
        assert!(out.starts_with("graph vertices=6 edges=6 directed=true weight_model=edge\n"));
        assert!(out.contains("scc_count=6\n"));
        assert!(out.contains("critical_path="));
        assert!(out.contains("length=8"));
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("shortest"), "Shortest");
        assert_eq!(capitalize(""), "");
    }
}
