//! Saved endpoint responses on disk.

use std::path::Path;
use tracing::info;

use crate::source::response::{parse_response, FetchOutcome, LoadError};

/// Read a snapshot file holding a copy of the endpoint's response body.
pub async fn read_snapshot(path: &Path) -> Result<FetchOutcome, LoadError> {
    info!("Reading advising data from {}", path.display());

    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    parse_response(&body)
}
