pub mod analyze;
pub mod bench;
pub mod completions;
pub mod generate;

use std::path::Path;

use anyhow::{Context, Result};
use sccpath_core::GraphDocument;

/// Read and parse one graph document.
pub fn load_document(path: &Path) -> Result<GraphDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    GraphDocument::from_json(&text).with_context(|| format!("failed to parse {}", path.display()))
}
