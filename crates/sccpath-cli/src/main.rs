#![forbid(unsafe_code)]

mod cmd;
mod config;
mod error;
mod output;
mod report;
mod timing;

use std::env;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "sccpath",
    author,
    version,
    about = "sccpath: strongly connected components, topological order and DAG paths",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (unless SCCPATH_LOG is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format. Defaults to pretty on a terminal, text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Emit a phase timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Analyze one graph document",
        long_about = "Find strongly connected components, condense them into a DAG, order it \
                      topologically and compute shortest, longest and critical paths.",
        after_help = "EXAMPLES:\n    # Analyze a graph from its document's source vertex\n    sccpath analyze tasks.json\n\n    # Pick a different source\n    sccpath analyze tasks.json --source 4\n\n    # Emit machine-readable output\n    sccpath analyze tasks.json --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Datasets",
        about = "Generate the benchmark datasets",
        long_about = "Write the nine standard datasets (small, medium and large) as JSON \
                      documents.",
        after_help = "EXAMPLES:\n    # Write to ./data with seed 42\n    sccpath generate\n\n    # Choose directory and seed\n    sccpath generate out --seed 7"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Datasets",
        about = "Benchmark every algorithm on a dataset directory",
        long_about = "Run Tarjan, Kahn, and DAG shortest/longest paths on every *.json file in a \
                      directory, then write a CSV of the runs and a Markdown report.",
        after_help = "EXAMPLES:\n    # Benchmark ./data into ./results\n    sccpath bench\n\n    # Custom destinations\n    sccpath bench data --csv runs.csv --report report.md"
    )]
    Bench(cmd::bench::BenchArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    sccpath completions bash > ~/.local/share/bash-completion/completions/sccpath"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SCCPATH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "sccpath=debug,info"
        } else {
            "sccpath=info,warn"
        })
    });

    let format = env::var("SCCPATH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn dispatch(command: &Commands, settings: &Settings, output: OutputMode) -> anyhow::Result<()> {
    match command {
        Commands::Analyze(args) => {
            timing::timed("cmd.analyze", || cmd::analyze::run_analyze(args, output))
        }
        Commands::Generate(args) => timing::timed("cmd.generate", || {
            cmd::generate::run_generate(args, settings, output)
        }),
        Commands::Bench(args) => {
            timing::timed("cmd.bench", || cmd::bench::run_bench(args, settings, output))
        }
        Commands::Completions(args) => timing::timed("cmd.completions", || {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing::enabled_from_env();
    timing::set_enabled(timing_enabled);
    timing::clear();

    let project_root = env::current_dir()?;
    let settings = timing::timed("config", || config::load_settings(&project_root));
    let config_format = settings
        .as_ref()
        .ok()
        .and_then(|s| s.output_format.clone());
    let output = resolve_output_mode(cli.format, cli.json, config_format.as_deref());
    debug!(?output, "resolved output mode");

    let command_result = settings.and_then(|settings| dispatch(&cli.command, &settings, output));

    if timing_enabled {
        let report = timing::collect_report();
        eprintln!("timing report:");
        eprint!("{}", report.table());
        if output.is_json() {
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Err(err) = &command_result {
        debug!(error = %err, "command failed");
        render_error(output, &CliError::from_anyhow(err))?;
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["sccpath", "analyze", "g.json", "--timing", "--json"]);
        assert!(cli.timing);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Analyze(_)));
    }

    #[test]
    fn format_flag_accepts_value_enum() {
        let cli = Cli::parse_from(["sccpath", "--format", "text", "generate"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn analyze_source_is_optional() {
        let cli = Cli::parse_from(["sccpath", "analyze", "g.json"]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.source, None);

        let cli = Cli::parse_from(["sccpath", "analyze", "g.json", "--source", "3"]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.source, Some(3));
    }

    #[test]
    fn bench_paths_parse() {
        let cli = Cli::parse_from([
            "sccpath", "bench", "data", "--csv", "a.csv", "--report", "r.md",
        ]);
        let Commands::Bench(args) = cli.command else {
            panic!("expected bench");
        };
        assert_eq!(args.dir.as_deref(), Some(std::path::Path::new("data")));
        assert_eq!(args.csv.as_deref(), Some(std::path::Path::new("a.csv")));
        assert_eq!(args.report.as_deref(), Some(std::path::Path::new("r.md")));
    }

    #[test]
    fn generate_seed_parses() {
        let cli = Cli::parse_from(["sccpath", "generate", "--seed", "7"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.seed, Some(7));
        assert!(args.dir.is_none());
    }
}
