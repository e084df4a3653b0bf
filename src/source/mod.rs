//! Loading advising records from the spreadsheet endpoint or a saved snapshot.

pub mod client;
pub mod response;
pub mod snapshot;

pub use client::SourceClient;
pub use response::{parse_response, FetchOutcome, LoadError};
pub use snapshot::read_snapshot;

use std::path::PathBuf;

/// Where a dashboard session gets its records from.
pub enum DataSource {
    /// Live spreadsheet endpoint.
    Remote(SourceClient),
    /// A saved copy of the endpoint's response body.
    Snapshot(PathBuf),
}

impl DataSource {
    /// Perform one load.
    pub async fn load(&self) -> Result<FetchOutcome, LoadError> {
        match self {
            DataSource::Remote(client) => client.fetch().await,
            DataSource::Snapshot(path) => read_snapshot(path).await,
        }
    }

    /// Human-readable origin, for logs and report headers.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Remote(client) => client.url().to_string(),
            DataSource::Snapshot(path) => path.display().to_string(),
        }
    }
}
