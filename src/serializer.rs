//! Serialization module for handing record batches to downstream writers.
//!
//! Rendering the final documentation (HTML, Markdown, a static site) lives
//! outside this crate; these functions produce the neutral JSON or YAML
//! encodings such writers consume.

use crate::processor::DocumentationRecord;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a batch of documentation records to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(records: &[DocumentationRecord]) -> Result<String> {
    debug!("Serializing {} records to JSON", records.len());
    serde_json::to_string_pretty(records)
        .context("Failed to serialize documentation records to JSON")
}

/// Serializes a batch of documentation records to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(records: &[DocumentationRecord]) -> Result<String> {
    debug!("Serializing {} records to YAML", records.len());
    serde_yaml::to_string(records)
        .context("Failed to serialize documentation records to YAML")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be created or
/// written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!(
        "Successfully wrote {} bytes to {}",
        content.len(),
        path.display()
    );
    Ok(())
}
