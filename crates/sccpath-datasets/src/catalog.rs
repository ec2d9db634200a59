//! The nine-dataset benchmark catalog and its on-disk writer.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use sccpath_core::GraphDocument;
use tracing::{info, instrument};

use crate::error::DatasetError;
use crate::families;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Size bucket a dataset is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

impl SizeCategory {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Infer the bucket from a dataset name's `small_` / `medium_` / `large_`
    /// prefix.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| name.starts_with(&format!("{}_", category.as_str())))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Heading used in reports, e.g. `Small Datasets (6-10 nodes)`.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Small => "Small Datasets (6-10 nodes)",
            Self::Medium => "Medium Datasets (10-20 nodes)",
            Self::Large => "Large Datasets (20-50 nodes)",
        }
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which generator a dataset uses, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Family {
    SimpleDag { density: f64 },
    PureDag { density: f64 },
    WithCycles { cycles: usize },
    Mixed { density: f64, cycles: usize },
    MultiScc { components: usize },
    Dense { density: f64 },
}

impl Family {
    /// Run the generator for `n` vertices.
    ///
    /// # Errors
    ///
    /// Propagates the generator's [`DatasetError::InvalidParameter`].
    pub fn generate(self, n: usize, rng: &mut StdRng) -> Result<GraphDocument, DatasetError> {
        match self {
            Self::SimpleDag { density } => families::simple_dag(n, density, rng),
            Self::PureDag { density } => families::pure_dag(n, density, rng),
            Self::WithCycles { cycles } => families::with_cycles(n, cycles, rng),
            Self::Mixed { density, cycles } => families::mixed(n, density, cycles, rng),
            Self::MultiScc { components } => families::multi_scc(n, components, rng),
            Self::Dense { density } => families::dense(n, density, rng),
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SimpleDag { .. } => "dag",
            Self::PureDag { .. } => "pure dag",
            Self::WithCycles { .. } => "cyclic",
            Self::Mixed { .. } => "mixed",
            Self::MultiScc { .. } => "multi-scc",
            Self::Dense { .. } => "dense",
        }
    }
}

/// One named entry of the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub n: usize,
    pub family: Family,
}

impl DatasetSpec {
    #[must_use]
    pub fn category(&self) -> Option<SizeCategory> {
        SizeCategory::from_name(self.name)
    }

    /// Generate this dataset from a fresh RNG seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Propagates the generator's [`DatasetError::InvalidParameter`].
    pub fn generate(&self, seed: u64) -> Result<GraphDocument, DatasetError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.family.generate(self.n, &mut rng)
    }
}

/// A dataset file that [`write_catalog`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDataset {
    pub name: &'static str,
    pub path: PathBuf,
    pub vertices: usize,
    pub edges: usize,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Three small, three medium and three large datasets.
#[must_use]
pub const fn standard_catalog() -> [DatasetSpec; 9] {
    [
        DatasetSpec {
            name: "small_dag_1",
            n: 7,
            family: Family::SimpleDag { density: 0.4 },
        },
        DatasetSpec {
            name: "small_cyclic_1",
            n: 8,
            family: Family::WithCycles { cycles: 2 },
        },
        DatasetSpec {
            name: "small_dag_2",
            n: 10,
            family: Family::PureDag { density: 0.3 },
        },
        DatasetSpec {
            name: "medium_mixed_1",
            n: 12,
            family: Family::Mixed {
                density: 0.25,
                cycles: 2,
            },
        },
        DatasetSpec {
            name: "medium_scc_1",
            n: 15,
            family: Family::MultiScc { components: 3 },
        },
        DatasetSpec {
            name: "medium_dense_1",
            n: 18,
            family: Family::Dense { density: 0.6 },
        },
        DatasetSpec {
            name: "large_dag_1",
            n: 25,
            family: Family::PureDag { density: 0.15 },
        },
        DatasetSpec {
            name: "large_scc_1",
            n: 35,
            family: Family::MultiScc { components: 5 },
        },
        DatasetSpec {
            name: "large_dense_1",
            n: 50,
            family: Family::Dense { density: 0.4 },
        },
    ]
}

/// Generate every catalog entry and write it as pretty JSON to
/// `dir/<name>.json`, creating `dir` if needed.
///
/// Entry `i` is seeded with `seed + i`, so one seed reproduces the whole set.
///
/// # Errors
///
/// [`DatasetError::Io`] on filesystem failures, [`DatasetError::Serialize`]
/// if a document cannot be encoded.
#[instrument(skip(dir), fields(dir = %dir.display()))]
pub fn write_catalog(dir: &Path, seed: u64) -> Result<Vec<WrittenDataset>, DatasetError> {
    fs::create_dir_all(dir).map_err(|source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for (index, spec) in (0_u64..).zip(standard_catalog()) {
        let doc = spec.generate(seed.wrapping_add(index))?;
        let path = dir.join(format!("{}.json", spec.name));
        let json = doc.to_json_pretty()?;
        fs::write(&path, json).map_err(|source| DatasetError::Io {
            path: path.clone(),
            source,
        })?;

        info!(
            dataset = spec.name,
            kind = spec.family.label(),
            vertices = doc.n,
            edges = doc.edges.len(),
            "generated"
        );
        written.push(WrittenDataset {
            name: spec.name,
            path,
            vertices: doc.n,
            edges: doc.edges.len(),
        });
    }
    Ok(written)
}
