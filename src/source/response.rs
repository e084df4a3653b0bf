//! Response decoding and the load error taxonomy.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

use crate::models::StudentRecord;

/// A load that reached the data source and got a well-formed answer.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The source returned a record list (possibly empty).
    Records(Vec<StudentRecord>),
    /// The source answered with neither data nor an error.
    Empty,
}

/// Why a load failed. None of these clear previously loaded data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source answered with an explicit error payload.
    #[error("data source reported an error: {0}")]
    Source(String),

    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("cannot connect to data source at {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("data source returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not decode response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unexpected response shape: expected an object or array of records")]
    Shape,

    #[error("could not read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// True for an explicit error payload, false for transport-class failures.
    pub fn is_source(&self) -> bool {
        matches!(self, LoadError::Source(_))
    }

    /// Whether repeating the request could help.
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::Timeout { .. } | LoadError::Connect { .. } | LoadError::Transport(_) => true,
            LoadError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

/// Classify a response body.
///
/// `{"error": ...}` is a source error and wins over `data`; `{"data": [...]}`
/// is a record list even when empty; an object with neither is
/// [`FetchOutcome::Empty`]. A bare array is accepted as a record list.
pub fn parse_response(body: &str) -> Result<FetchOutcome, LoadError> {
    let value: Value = serde_json::from_str(body)?;

    match value {
        Value::Array(rows) => Ok(FetchOutcome::Records(decode_rows(rows))),
        Value::Object(mut map) => {
            if let Some(error) = map.remove("error").filter(is_set) {
                let message = match error {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                return Err(LoadError::Source(message));
            }

            match map.remove("data").filter(is_set) {
                Some(Value::Array(rows)) => Ok(FetchOutcome::Records(decode_rows(rows))),
                Some(_) => Err(LoadError::Shape),
                None => Ok(FetchOutcome::Empty),
            }
        }
        _ => Err(LoadError::Shape),
    }
}

/// Decode each row on its own; rows that are not objects are dropped.
fn decode_rows(rows: Vec<Value>) -> Vec<StudentRecord> {
    let total = rows.len();
    let records: Vec<StudentRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping row {}: {}", i + 1, e);
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!("Kept {} of {} rows", records.len(), total);
    }
    records
}

/// Null, `false` and empty strings count as an absent key.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
