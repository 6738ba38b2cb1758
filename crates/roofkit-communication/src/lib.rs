//! # RoofKit Communication
//!
//! Persistence and service plumbing for the measurement editor: versioned
//! snapshot storage, authoritative recompute and report generation, plus a
//! local fallback store used when uploads fail.
//!
//! The collaborators are traits ([`SnapshotStore`], [`RecomputeService`],
//! [`ReportGenerator`]); [`HttpClient`] implements all three against the
//! measurement API and [`SaveWorkflow`] sequences them.

pub mod error;
pub mod http;
pub mod local_store;
pub mod messages;
pub mod sync;
pub mod traits;

pub use error::{SyncError, SyncResult};
pub use http::HttpClient;
pub use local_store::{LocalSnapshotStore, LOCAL_ID_PREFIX};
pub use messages::{
    PlaneSummary, RecomputeRequest, ReportReference, ReportRequest, VersionList, VersionRecord,
    VersionSummary,
};
pub use sync::{ReportOutcome, SaveOutcome, SaveWorkflow, SnapshotOutcome};
pub use traits::{RecomputeService, ReportGenerator, SnapshotStore};
