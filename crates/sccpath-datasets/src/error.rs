use std::io;
use std::path::PathBuf;

/// Errors raised while generating or writing datasets.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A generator was asked for an impossible shape.
    #[error("invalid {family} parameters: {reason}")]
    InvalidParameter {
        /// Generator family name, e.g. `"multi_scc"`.
        family: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// Reading or writing a dataset file failed.
    #[error("dataset I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The document could not be serialized.
    #[error("dataset serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DatasetError {
    pub(crate) fn invalid(family: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            family,
            reason: reason.into(),
        }
    }
}
