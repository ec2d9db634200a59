//! `sccpath bench`: time every algorithm on every dataset in a directory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use sccpath_core::{Counter, DagPathAnalyzer, Graph, GraphError, find_sccs, kahn_sort};
use serde::Serialize;
use tracing::info;

use crate::cmd::load_document;
use crate::config::Settings;
use crate::error::ErrorCode;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::report::{self, Algorithm, AlgorithmStats, BenchRecord};
use crate::timing;

/// Arguments for `sccpath bench`.
#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Directory of `*.json` graph documents. Defaults to `[datasets] dir`.
    pub dir: Option<PathBuf>,

    /// CSV destination. Defaults to `<results_dir>/<csv_name>`.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Markdown report destination. Defaults to `<results_dir>/<report_name>`.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BenchOutput {
    datasets: usize,
    csv: PathBuf,
    report: PathBuf,
    summary: Vec<AlgorithmStats>,
    records: Vec<BenchRecord>,
}

/// Execute `sccpath bench`.
pub fn run_bench(args: &BenchArgs, settings: &Settings, output: OutputMode) -> anyhow::Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| settings.datasets_dir.clone());
    let csv_path = args.csv.clone().unwrap_or_else(|| settings.csv_path());
    let report_path = args.report.clone().unwrap_or_else(|| settings.report_path());

    let files = dataset_files(&dir)?;
    if files.is_empty() {
        return Err(anyhow::Error::new(ErrorCode::NoDatasets)
            .context(format!("no *.json files in {}", dir.display())));
    }

    let mut records = Vec::new();
    for file in &files {
        let name = file
            .file_stem()
            .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
        let graph = load_document(file)?
            .to_graph()
            .with_context(|| format!("invalid graph in {}", file.display()))?;
        let dataset_records = timing::timed("bench.dataset", || bench_graph(&name, &graph))
            .with_context(|| format!("benchmark of {} failed", file.display()))?;
        info!(dataset = %name, runs = dataset_records.len(), "benchmarked");
        records.extend(dataset_records);
    }

    timing::timed("bench.write", || -> anyhow::Result<()> {
        write_file(&csv_path, &report::to_csv(&records))?;
        write_file(&report_path, &report::to_markdown(&records))
    })?;

    let payload = BenchOutput {
        datasets: files.len(),
        csv: csv_path,
        report: report_path,
        summary: report::algorithm_stats(&records),
        records,
    };
    render_mode(output, &payload, render_text, render_pretty)
}

/// `*.json` files directly under `dir`, sorted by file name.
fn dataset_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read dataset directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Run Tarjan on `graph`, Kahn on its condensation and, when the
/// condensation is non-empty, shortest and longest paths from its vertex 0.
///
/// # Errors
///
/// [`GraphError::DistanceOverflow`] from path relaxation.
pub fn bench_graph(dataset: &str, graph: &Graph) -> Result<Vec<BenchRecord>, GraphError> {
    let orig_v = graph.vertex_count();
    let orig_e = graph.edge_count();
    let mut records = Vec::with_capacity(Algorithm::ALL.len());

    let scc = find_sccs(graph);
    records.push(BenchRecord {
        dataset: dataset.to_string(),
        algorithm: Algorithm::SccTarjan,
        orig_v,
        orig_e,
        cond_v: orig_v,
        cond_e: orig_e,
        time_ms: scc.metrics.elapsed_millis(),
        operations: scc.metrics.count(Counter::DfsVisits),
        details: format!("SCCs={}", scc.partition.scc_count()),
    });

    let condensation = scc.partition.build_condensation(graph)?;
    let cond_v = condensation.vertex_count();
    let cond_e = condensation.edge_count();
    let record = |algorithm, time_ms, operations, details| BenchRecord {
        dataset: dataset.to_string(),
        algorithm,
        orig_v,
        orig_e,
        cond_v,
        cond_e,
        time_ms,
        operations,
        details,
    };

    let topo = kahn_sort(&condensation);
    records.push(record(
        Algorithm::TopoKahn,
        topo.metrics.elapsed_millis(),
        topo.metrics.count(Counter::QueuePops),
        format!("Valid={}", !topo.order.is_empty()),
    ));

    if !topo.order.is_empty() {
        let analyzer = DagPathAnalyzer::new(&condensation)?;
        for (algorithm, run) in [
            (Algorithm::DagShortest, analyzer.shortest_paths(0)?),
            (Algorithm::DagLongest, analyzer.longest_paths(0)?),
        ] {
            records.push(record(
                algorithm,
                run.metrics.elapsed_millis(),
                run.metrics.count(Counter::EdgeRelaxations),
                format!(
                    "Relaxations={}",
                    run.metrics.count(Counter::SuccessfulRelaxations)
                ),
            ));
        }
    }
    Ok(records)
}

fn render_text(payload: &BenchOutput, w: &mut dyn Write) -> io::Result<()> {
    for stats in &payload.summary {
        writeln!(
            w,
            "{} datasets={} avg_ms={:.3} min_ms={:.3} max_ms={:.3}",
            stats.algorithm, stats.datasets, stats.avg_ms, stats.min_ms, stats.max_ms
        )?;
    }
    writeln!(w, "csv={}", payload.csv.display())?;
    writeln!(w, "report={}", payload.report.display())
}

fn render_pretty(payload: &BenchOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "BENCHMARK SUMMARY")?;
    writeln!(w, "Benchmarked {} datasets", payload.datasets)?;
    for stats in &payload.summary {
        writeln!(w)?;
        writeln!(w, "{}:", stats.algorithm)?;
        pretty_kv(w, "  Average time", format!("{:.3} ms", stats.avg_ms))?;
        pretty_kv(w, "  Min time", format!("{:.3} ms", stats.min_ms))?;
        pretty_kv(w, "  Max time", format!("{:.3} ms", stats.max_ms))?;
        pretty_kv(w, "  Datasets", stats.datasets.to_string())?;
    }
    writeln!(w)?;
    writeln!(w, "Results saved to: {}", payload.csv.display())?;
    writeln!(w, "Analysis report saved to: {}", payload.report.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::directed(n);
        for &(u, v) in edges {
            g.add_edge(u, v, 1).expect("edge in range");
        }
        g
    }

    #[test]
    fn dag_gets_all_four_records() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let records = bench_graph("small_dag_1", &g).unwrap();
        let algorithms: Vec<Algorithm> = records.iter().map(|r| r.algorithm).collect();
        assert_eq!(algorithms, Algorithm::ALL);

        assert_eq!(records[0].details, "SCCs=4");
        assert_eq!(records[0].operations, 4);
        assert_eq!(records[1].details, "Valid=true");
        assert_eq!(records[1].operations, 4);
        assert!(records.iter().all(|r| r.dataset == "small_dag_1"));
    }

    #[test]
    fn condensation_sizes_are_recorded() {
        // Two rings bridged once.
        let g = graph(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)]);
        let records = bench_graph("medium_scc_1", &g).unwrap();

        let tarjan = &records[0];
        assert_eq!((tarjan.orig_v, tarjan.orig_e), (6, 7));
        assert_eq!((tarjan.cond_v, tarjan.cond_e), (6, 7));
        assert_eq!(tarjan.details, "SCCs=2");

        let kahn = &records[1];
        assert_eq!((kahn.cond_v, kahn.cond_e), (2, 1));
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn empty_graph_skips_path_runs() {
        let records = bench_graph("empty", &Graph::directed(0)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].details, "Valid=false");
    }

    #[test]
    fn dataset_files_are_sorted_json_only() {
        let dir = tempfile::tempdir().expect("temp dir");
        for name in ["b.json", "a.json", "notes.txt"] {
            std::fs::write(dir.path().join(name), "{}").expect("write");
        }
        let files = dataset_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.json", "b.json"]);
    }
}
