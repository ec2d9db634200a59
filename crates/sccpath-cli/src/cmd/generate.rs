//! `sccpath generate`: write the standard benchmark datasets.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sccpath_datasets::{WrittenDataset, write_catalog};
use serde::Serialize;

use crate::config::Settings;
use crate::output::{OutputMode, pretty_section, render_mode};
use crate::timing;

/// Arguments for `sccpath generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory. Defaults to `[datasets] dir` from config, or `data`.
    pub dir: Option<PathBuf>,

    /// Base RNG seed; dataset `i` uses `seed + i`.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    dir: PathBuf,
    seed: u64,
    datasets: Vec<DatasetEntry>,
}

#[derive(Debug, Serialize)]
struct DatasetEntry {
    name: &'static str,
    path: PathBuf,
    vertices: usize,
    edges: usize,
}

impl From<WrittenDataset> for DatasetEntry {
    fn from(written: WrittenDataset) -> Self {
        Self {
            name: written.name,
            path: written.path,
            vertices: written.vertices,
            edges: written.edges,
        }
    }
}

/// Execute `sccpath generate`.
pub fn run_generate(
    args: &GenerateArgs,
    settings: &Settings,
    output: OutputMode,
) -> anyhow::Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| settings.datasets_dir.clone());
    let seed = args.seed.unwrap_or(settings.seed);

    let written = timing::timed("generate", || write_catalog(&dir, seed))
        .with_context(|| format!("failed to generate datasets in {}", dir.display()))?;

    let payload = GenerateOutput {
        dir,
        seed,
        datasets: written.into_iter().map(DatasetEntry::from).collect(),
    };
    render_mode(output, &payload, render_text, render_pretty)
}

fn render_text(payload: &GenerateOutput, w: &mut dyn Write) -> io::Result<()> {
    for entry in &payload.datasets {
        writeln!(
            w,
            "{} vertices={} edges={} path={}",
            entry.name,
            entry.vertices,
            entry.edges,
            entry.path.display()
        )?;
    }
    Ok(())
}

fn render_pretty(payload: &GenerateOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "DATASETS")?;
    writeln!(w, "{:<18} {:>8} {:>8}", "name", "vertices", "edges")?;
    for entry in &payload.datasets {
        writeln!(w, "{:<18} {:>8} {:>8}", entry.name, entry.vertices, entry.edges)?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "✓ Generated {} datasets in {} (seed {})",
        payload.datasets.len(),
        payload.dir.display(),
        payload.seed
    )
}
