//! Benchmark records and their CSV / Markdown renderings.

use std::fmt::{self, Write as _};

use sccpath_datasets::SizeCategory;
use serde::Serialize;

/// Algorithms measured by `sccpath bench`, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Algorithm {
    #[serde(rename = "SCC_Tarjan")]
    SccTarjan,
    #[serde(rename = "Topo_Kahn")]
    TopoKahn,
    #[serde(rename = "DAG_Shortest")]
    DagShortest,
    #[serde(rename = "DAG_Longest")]
    DagLongest,
}

impl Algorithm {
    pub const ALL: [Self; 4] = [
        Self::SccTarjan,
        Self::TopoKahn,
        Self::DagShortest,
        Self::DagLongest,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SccTarjan => "SCC_Tarjan",
            Self::TopoKahn => "Topo_Kahn",
            Self::DagShortest => "DAG_Shortest",
            Self::DagLongest => "DAG_Longest",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One algorithm run on one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchRecord {
    pub dataset: String,
    pub algorithm: Algorithm,
    pub orig_v: usize,
    pub orig_e: usize,
    pub cond_v: usize,
    pub cond_e: usize,
    pub time_ms: f64,
    pub operations: u64,
    pub details: String,
}

/// Time statistics for one algorithm across datasets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlgorithmStats {
    pub algorithm: Algorithm,
    pub datasets: usize,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

pub const CSV_HEADER: &str =
    "Dataset,Algorithm,Orig_V,Orig_E,Cond_V,Cond_E,Time_ms,Operations,Details";

/// Per-algorithm statistics, skipping algorithms that never ran.
pub fn algorithm_stats(records: &[BenchRecord]) -> Vec<AlgorithmStats> {
    Algorithm::ALL
        .into_iter()
        .filter_map(|algorithm| {
            let times: Vec<f64> = records
                .iter()
                .filter(|r| r.algorithm == algorithm)
                .map(|r| r.time_ms)
                .collect();
            if times.is_empty() {
                return None;
            }
            let sum: f64 = times.iter().sum();
            #[allow(clippy::cast_precision_loss)]
            let avg_ms = sum / times.len() as f64;
            Some(AlgorithmStats {
                algorithm,
                datasets: times.len(),
                avg_ms,
                min_ms: times.iter().copied().fold(f64::INFINITY, f64::min),
                max_ms: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
        })
        .collect()
}

/// CSV document: header plus one line per record, times to three decimals.
pub fn to_csv(records: &[BenchRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{CSV_HEADER}");
    for r in records {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{:.3},{},{}",
            r.dataset,
            r.algorithm,
            r.orig_v,
            r.orig_e,
            r.cond_v,
            r.cond_e,
            r.time_ms,
            r.operations,
            r.details
        );
    }
    out
}

/// Markdown report: one table per size category, then the algorithm
/// comparison.
pub fn to_markdown(records: &[BenchRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Performance Analysis Report\n");
    let _ = writeln!(out, "## Results by Dataset Size\n");

    for category in SizeCategory::ALL {
        let _ = writeln!(out, "### {}\n", category.title());
        let _ = writeln!(
            out,
            "| Dataset | Algorithm | Orig_V | Orig_E | Cond_V | Cond_E | Time (ms) | Ops |"
        );
        let _ = writeln!(
            out,
            "|---------|-----------|--------|--------|--------|--------|-----------|-----|"
        );
        for r in records
            .iter()
            .filter(|r| SizeCategory::from_name(&r.dataset) == Some(category))
        {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {:.3} | {} |",
                r.dataset,
                r.algorithm,
                r.orig_v,
                r.orig_e,
                r.cond_v,
                r.cond_e,
                r.time_ms,
                r.operations
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Algorithm Performance Comparison\n");
    let _ = writeln!(out, "| Algorithm | Avg Time (ms) | Best Time (ms) | Worst Time (ms) |");
    let _ = writeln!(out, "|-----------|---------------|----------------|-----------------|");
    for stats in algorithm_stats(records) {
        let _ = writeln!(
            out,
            "| {} | {:.3} | {:.3} | {:.3} |",
            stats.algorithm, stats.avg_ms, stats.min_ms, stats.max_ms
        );
    }
    out
}
