//! Loading of raw count exports.
//!
//! The export is a single JSON array and is read into memory in one go.

use std::path::Path;

use serde_json::Value;
use tracing::debug;
use traffic_core::error::{Result, TrafficError};

/// Read the export at `path` and return its records.
///
/// # Errors
///
/// * [`TrafficError::FileRead`] when the file cannot be read.
/// * [`TrafficError::JsonParse`] when the content is not valid JSON.
/// * [`TrafficError::NotAnArray`] when the top-level value is not an array.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let bytes = std::fs::read(path).map_err(|source| TrafficError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Export read");

    parse_records(&bytes)
}

/// Parse an in-memory export into its records.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Value>> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(records) => {
            debug!(records = records.len(), "Export parsed");
            Ok(records)
        }
        other => Err(TrafficError::NotAnArray(json_type_name(&other).to_string())),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
