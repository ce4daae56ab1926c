//! Loading profiled column records from disk.

use std::path::Path;

use schemalift_core::{ColumnRecord, EnrichmentError, Result};
use serde::Deserialize;

/// Accepted layouts of a column input file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ColumnDocument {
    /// A bare array of column records
    List(Vec<ColumnRecord>),
    /// A profiling document with a `columns` array
    Profile { columns: Vec<ColumnRecord> },
}

/// Parses column records from JSON text.
///
/// Accepts either a top-level array of records or an object with a
/// `columns` array.
///
/// # Errors
///
/// Returns a serialization error if the text matches neither layout.
pub fn parse_columns(json: &str) -> Result<Vec<ColumnRecord>> {
    let document: ColumnDocument = serde_json::from_str(json)
        .map_err(|e| EnrichmentError::serialization("Failed to parse column records", e))?;

    Ok(match document {
        ColumnDocument::List(columns) | ColumnDocument::Profile { columns } => columns,
    })
}

/// Reads column records from a JSON file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a serialization error
/// if its content is not a column document.
pub async fn load_columns(path: &Path) -> Result<Vec<ColumnRecord>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| EnrichmentError::io(format!("Failed to read {}", path.display()), e))?;

    let columns = parse_columns(&json)?;
    tracing::info!("Loaded {} columns from {}", columns.len(), path.display());
    Ok(columns)
}
