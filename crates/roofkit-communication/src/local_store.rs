//! Local fallback storage for snapshots that could not be uploaded.
//!
//! Versions are kept most recent first in a single JSON file and capped at a
//! fixed count; the oldest are dropped when the cap is exceeded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use roofkit_designer::Snapshot;

use crate::error::{SyncError, SyncResult};
use crate::messages::{VersionRecord, VersionSummary};
use crate::traits::SnapshotStore;

/// Prefix marking ids issued by the local store.
pub const LOCAL_ID_PREFIX: &str = "local:";

#[derive(Debug)]
pub struct LocalSnapshotStore {
    path: PathBuf,
    capacity: usize,
    records: Mutex<Vec<VersionRecord>>,
}

impl LocalSnapshotStore {
    /// Open the store at `path`, loading any versions already saved there.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> SyncResult<Self> {
        let path = path.into();
        let mut records: Vec<VersionRecord> = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            Vec::new()
        };
        records.truncate(capacity.max(1));
        tracing::debug!(path = %path.display(), count = records.len(), "Opened local snapshot store");
        Ok(Self {
            path,
            capacity: capacity.max(1),
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Store a snapshot and persist the file.
    pub fn add(&self, snapshot: &Snapshot) -> SyncResult<VersionSummary> {
        let created_at = Utc::now();
        let mut records = self.records.lock();

        let mut millis = created_at.timestamp_millis();
        while records
            .iter()
            .any(|r| r.id == format!("{}{}", LOCAL_ID_PREFIX, millis))
        {
            millis += 1;
        }

        let record = VersionRecord {
            id: format!("{}{}", LOCAL_ID_PREFIX, millis),
            created_at,
            payload: snapshot.compacted(),
        };
        let summary = record.summary();
        let mut updated = Vec::with_capacity(self.capacity);
        updated.push(record);
        updated.extend(records.iter().take(self.capacity - 1).cloned());
        self.persist(&updated)?;
        *records = updated;

        tracing::info!(version = %summary.id, "Snapshot saved locally");
        Ok(summary)
    }

    pub fn summaries(&self) -> Vec<VersionSummary> {
        self.records.lock().iter().map(VersionRecord::summary).collect()
    }

    pub fn get(&self, id: &str) -> Option<Snapshot> {
        self.records
            .lock()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.payload.clone())
    }

    fn persist(&self, records: &[VersionRecord]) -> SyncResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(records)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn create_version(&self, snapshot: &Snapshot) -> SyncResult<VersionSummary> {
        self.add(snapshot)
    }

    async fn list_versions(&self) -> SyncResult<Vec<VersionSummary>> {
        Ok(self.summaries())
    }

    async fn fetch_version(&self, id: &str) -> SyncResult<Snapshot> {
        self.get(id).ok_or_else(|| SyncError::NotFound(id.to_string()))
    }
}
