use std::fmt;

use sccpath_core::{DocumentError, GraphError};
use sccpath_datasets::DatasetError;

/// Stable machine-readable error codes for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputReadFailed,
    InputParseError,
    InvalidVertex,
    UnknownWeightModel,
    NotADag,
    DistanceOverflow,
    InvalidDatasetParameter,
    DatasetWriteFailed,
    NoDatasets,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InputReadFailed => "E1002",
            Self::InputParseError => "E1003",
            Self::InvalidVertex => "E2001",
            Self::UnknownWeightModel => "E2002",
            Self::NotADag => "E2003",
            Self::DistanceOverflow => "E2004",
            Self::InvalidDatasetParameter => "E3001",
            Self::DatasetWriteFailed => "E3002",
            Self::NoDatasets => "E3003",
            Self::InternalUnexpected => "E9001",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputReadFailed => "Input file could not be read",
            Self::InputParseError => "Input file is not a valid graph document",
            Self::InvalidVertex => "Vertex index out of range",
            Self::UnknownWeightModel => "Unknown weight model",
            Self::NotADag => "Graph is not acyclic",
            Self::DistanceOverflow => "Path length overflowed",
            Self::InvalidDatasetParameter => "Invalid dataset parameters",
            Self::DatasetWriteFailed => "Dataset file write failed",
            Self::NoDatasets => "No datasets found",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Remediation hint, when there is one.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix the syntax in sccpath.toml and retry."),
            Self::InputReadFailed => Some("Check the path and read permissions."),
            Self::InputParseError => {
                Some("Expected JSON with `n`, `edges` ({u, v, w}) and optional `source`.")
            }
            Self::InvalidVertex => Some("Every edge endpoint and the source must be below `n`."),
            Self::UnknownWeightModel => Some("Use `edge` or `node` for `weight_model`."),
            Self::NotADag => None,
            Self::DistanceOverflow => Some("Reduce edge weights so path sums fit in 64 bits."),
            Self::InvalidDatasetParameter => None,
            Self::DatasetWriteFailed => Some("Check disk space and write permissions."),
            Self::NoDatasets => Some("Run `sccpath generate` to create the standard datasets."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }

    const fn for_graph(err: &GraphError) -> Self {
        match err {
            GraphError::InvalidVertexIndex { .. } => Self::InvalidVertex,
            GraphError::UnknownWeightModel(_) => Self::UnknownWeightModel,
            GraphError::NotADag { .. } => Self::NotADag,
            GraphError::DistanceOverflow { .. } => Self::DistanceOverflow,
        }
    }

    /// Best-effort code for an error chain produced by a command.
    #[must_use]
    pub fn classify(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(graph) = cause.downcast_ref::<GraphError>() {
                return Self::for_graph(graph);
            }
            if let Some(document) = cause.downcast_ref::<DocumentError>() {
                return match document {
                    DocumentError::Graph(graph) => Self::for_graph(graph),
                    DocumentError::Json(_) => Self::InputParseError,
                };
            }
            if let Some(dataset) = cause.downcast_ref::<DatasetError>() {
                return match dataset {
                    DatasetError::InvalidParameter { .. } => Self::InvalidDatasetParameter,
                    DatasetError::Io { .. } | DatasetError::Serialize(_) => {
                        Self::DatasetWriteFailed
                    }
                };
            }
            if let Some(code) = cause.downcast_ref::<Self>() {
                return *code;
            }
            if cause.is::<toml::de::Error>() {
                return Self::ConfigParseError;
            }
            if cause.is::<serde_json::Error>() {
                return Self::InputParseError;
            }
            if cause.is::<std::io::Error>() {
                return Self::InputReadFailed;
            }
        }
        Self::InternalUnexpected
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ErrorCode {}
