//! JSON reporter
//!
//! Serializes the full DocumentQuality tree, section and chapter text included,
//! so a saved report loads back into an identical value.

use crate::models::DocumentQuality;
use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing a saved quality report
#[derive(Error, Debug)]
pub enum QualityError {
    #[error("Invalid quality report: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Failed to serialize quality report: {0}")]
    Serialize(serde_json::Error),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convert a document result into a JSON mapping, preserving chapter and section order
pub fn to_dict(doc: &DocumentQuality) -> Result<Value, QualityError> {
    serde_json::to_value(doc).map_err(QualityError::Serialize)
}

/// Inverse of [`to_dict`]. Missing `genre`/`created_at` default to empty,
/// a missing `language` to 中文.
pub fn from_dict(data: &Value) -> Result<DocumentQuality, QualityError> {
    Ok(DocumentQuality::deserialize(data)?)
}

/// Render report as pretty-printed JSON
pub fn render(doc: &DocumentQuality) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Render report as compact JSON (single line)
pub fn render_compact(doc: &DocumentQuality) -> Result<String> {
    Ok(serde_json::to_string(doc)?)
}

/// Write `doc` to `path` as pretty JSON
pub fn save_report(doc: &DocumentQuality, path: &Path) -> Result<(), QualityError> {
    let content = serde_json::to_string_pretty(doc).map_err(QualityError::Serialize)?;
    std::fs::write(path, content).map_err(|source| QualityError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a report written by [`save_report`]
pub fn load_report(path: &Path) -> Result<DocumentQuality, QualityError> {
    let content = std::fs::read_to_string(path).map_err(|source| QualityError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data: Value = serde_json::from_str(&content)?;
    from_dict(&data)
}
