//! Layered configuration.
//!
//! `sccpath.toml` in the working directory overrides the user file at
//! `<config_dir>/sccpath/config.toml`, which overrides the built-in
//! defaults. Command-line flags and `FORMAT` are applied later by the
//! commands themselves. Both files share one schema:
//!
//! ```toml
//! [datasets]
//! dir = "data"
//! seed = 42
//!
//! [bench]
//! results_dir = "results"
//! csv_name = "benchmark_results.csv"
//! report_name = "analysis_report.md"
//!
//! [output]
//! format = "pretty"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const PROJECT_CONFIG_FILE: &str = "sccpath.toml";

/// One config file. Every key is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub datasets: DatasetsSection,
    pub bench: BenchSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetsSection {
    pub dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchSection {
    pub results_dir: Option<PathBuf>,
    pub csv_name: Option<String>,
    pub report_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub datasets_dir: PathBuf,
    pub seed: u64,
    pub results_dir: PathBuf,
    pub csv_name: String,
    pub report_name: String,
    pub output_format: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            datasets_dir: PathBuf::from("data"),
            seed: 42,
            results_dir: PathBuf::from("results"),
            csv_name: "benchmark_results.csv".to_string(),
            report_name: "analysis_report.md".to_string(),
            output_format: None,
        }
    }
}

impl Settings {
    /// Default CSV destination.
    #[must_use]
    pub fn csv_path(&self) -> PathBuf {
        self.results_dir.join(&self.csv_name)
    }

    /// Default Markdown report destination.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.results_dir.join(&self.report_name)
    }

    /// Overlay `file` on top of `self`.
    fn apply(&mut self, file: ConfigFile) {
        if let Some(dir) = file.datasets.dir {
            self.datasets_dir = dir;
        }
        if let Some(seed) = file.datasets.seed {
            self.seed = seed;
        }
        if let Some(dir) = file.bench.results_dir {
            self.results_dir = dir;
        }
        if let Some(name) = file.bench.csv_name {
            self.csv_name = name;
        }
        if let Some(name) = file.bench.report_name {
            self.report_name = name;
        }
        if let Some(format) = file.output.format {
            self.output_format = Some(format);
        }
    }
}

fn load_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// `sccpath.toml` under `project_root`, or defaults when absent.
///
/// # Errors
///
/// The file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ConfigFile> {
    load_file(&project_root.join(PROJECT_CONFIG_FILE))
}

/// The per-user config file, or defaults when absent.
///
/// # Errors
///
/// The file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigFile> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    load_file(&config_dir.join("sccpath").join("config.toml"))
}

/// Merge user then project config over the defaults.
#[must_use]
pub fn resolve(user: ConfigFile, project: ConfigFile) -> Settings {
    let mut settings = Settings::default();
    settings.apply(user);
    settings.apply(project);
    settings
}

/// Load and merge both layers for `project_root`.
///
/// # Errors
///
/// Either config file exists but is unreadable or malformed.
pub fn load_settings(project_root: &Path) -> Result<Settings> {
    let user = load_user_config()?;
    let project = load_project_config(project_root)?;
    Ok(resolve(user, project))
}
