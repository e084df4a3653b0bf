//! Holds the most recently loaded record list.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::models::StudentRecord;

/// The current dataset. Each load swaps in a new list; existing snapshots
/// handed out by [`RecordStore::all`] are unaffected.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[StudentRecord]>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            loaded_at: None,
        }
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole dataset.
    pub fn load(&mut self, records: Vec<StudentRecord>) {
        info!("Loaded {} student records", records.len());
        self.records = Arc::from(records);
        self.loaded_at = Some(Utc::now());
    }

    /// Read-only snapshot of the current dataset.
    pub fn all(&self) -> Arc<[StudentRecord]> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the current dataset was loaded; `None` before the first load.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}
