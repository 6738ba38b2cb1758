//! Collaborator traits.
//!
//! The editor talks to three external services. Each is a trait so the save
//! workflow can run against the HTTP client, the local fallback store or an
//! in-memory double in tests.

use async_trait::async_trait;
use roofkit_designer::{MeasurementTotals, Snapshot};

use crate::error::SyncResult;
use crate::messages::{RecomputeRequest, ReportReference, ReportRequest, VersionSummary};

/// Versioned snapshot storage.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Store a new version.
    async fn create_version(&self, snapshot: &Snapshot) -> SyncResult<VersionSummary>;

    /// Stored versions, most recent first.
    async fn list_versions(&self) -> SyncResult<Vec<VersionSummary>>;

    /// Retrieve one version for restore.
    async fn fetch_version(&self, id: &str) -> SyncResult<Snapshot>;
}

/// Authoritative totals.
#[async_trait]
pub trait RecomputeService: Send + Sync {
    async fn recompute(&self, request: &RecomputeRequest) -> SyncResult<MeasurementTotals>;
}

/// Report rendering.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, request: &ReportRequest) -> SyncResult<ReportReference>;
}
