//! Save and report workflows.
//!
//! A save always tries to preserve the drawing first: the snapshot goes to
//! the remote store, and to the local fallback store if that fails. Totals
//! are then recomputed by the service on a best-effort basis. Progress is
//! reported as a list of status messages for the host to display.

use std::sync::Arc;

use roofkit_designer::{EditorState, MeasurementTotals, Snapshot};

use crate::error::{SyncError, SyncResult};
use crate::local_store::LocalSnapshotStore;
use crate::messages::{RecomputeRequest, ReportReference, ReportRequest, VersionSummary};
use crate::traits::{RecomputeService, ReportGenerator, SnapshotStore};

/// Where the snapshot ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOutcome {
    Remote(VersionSummary),
    /// Remote store failed; kept in the local fallback store.
    Local(VersionSummary),
    /// Neither store accepted it.
    Failed,
}

impl SnapshotOutcome {
    pub fn is_remote(&self) -> bool {
        matches!(self, SnapshotOutcome::Remote(_))
    }
}

/// Result of [`SaveWorkflow::save`].
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub snapshot: SnapshotOutcome,
    /// Authoritative totals, when the recompute call succeeded.
    pub totals: Option<MeasurementTotals>,
    /// Status messages in the order they were produced.
    pub messages: Vec<String>,
}

impl SaveOutcome {
    /// Last status message.
    pub fn status(&self) -> &str {
        self.messages.last().map(String::as_str).unwrap_or_default()
    }
}

/// Result of [`SaveWorkflow::generate_report`].
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub snapshot: SnapshotOutcome,
    /// Totals the report was generated from.
    pub totals: MeasurementTotals,
    pub report: Option<ReportReference>,
    pub messages: Vec<String>,
}

impl ReportOutcome {
    pub fn status(&self) -> &str {
        self.messages.last().map(String::as_str).unwrap_or_default()
    }
}

/// Coordinates the snapshot store, recompute service and report generator.
pub struct SaveWorkflow {
    store: Arc<dyn SnapshotStore>,
    fallback: Option<Arc<LocalSnapshotStore>>,
    recompute: Arc<dyn RecomputeService>,
    reports: Option<Arc<dyn ReportGenerator>>,
}

impl SaveWorkflow {
    pub fn new(store: Arc<dyn SnapshotStore>, recompute: Arc<dyn RecomputeService>) -> Self {
        Self {
            store,
            fallback: None,
            recompute,
            reports: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<LocalSnapshotStore>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_reports(mut self, reports: Arc<dyn ReportGenerator>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Snapshot then recompute.
    pub async fn save(&self, snapshot: &Snapshot) -> SaveOutcome {
        let mut messages = vec!["Saving...".to_string()];
        let stored = self.store_snapshot(snapshot, &mut messages).await;

        let totals = match self.recompute.recompute(&RecomputeRequest::from(snapshot)).await {
            Ok(totals) => {
                messages.push(
                    if stored.is_remote() {
                        "Saved (snapshot + totals)"
                    } else {
                        "Saved (totals)"
                    }
                    .to_string(),
                );
                Some(totals)
            }
            Err(e) => {
                tracing::warn!("Recompute failed: {}", e);
                messages.push(
                    if stored.is_remote() {
                        "Saved snapshot"
                    } else {
                        "Error saving"
                    }
                    .to_string(),
                );
                None
            }
        };

        SaveOutcome {
            snapshot: stored,
            totals,
            messages,
        }
    }

    /// Save the editor's state and adopt the recomputed totals.
    pub async fn save_editor(&self, editor: &mut EditorState) -> SaveOutcome {
        let outcome = self.save(&editor.to_snapshot()).await;
        if let Some(totals) = &outcome.totals {
            editor.apply_remote_totals(totals.clone());
        }
        outcome
    }

    /// Snapshot, recompute, then ask the report generator to render and file
    /// a report. `provisional` totals are used when the recompute fails.
    pub async fn generate_report(
        &self,
        snapshot: &Snapshot,
        provisional: MeasurementTotals,
        overlay: Option<String>,
    ) -> SyncResult<ReportOutcome> {
        let reports = self
            .reports
            .as_ref()
            .ok_or_else(|| SyncError::Transport("No report generator configured".to_string()))?;

        let mut messages = vec!["Saving progress...".to_string()];
        let stored = self.store_snapshot(snapshot, &mut messages).await;

        messages.push("Saving corrections...".to_string());
        let totals = match self.recompute.recompute(&RecomputeRequest::from(snapshot)).await {
            Ok(totals) => totals,
            Err(e) => {
                tracing::warn!("Recompute failed, reporting local totals: {}", e);
                provisional
            }
        };

        messages.push("Generating report...".to_string());
        let mut request = ReportRequest::new(snapshot, totals.clone());
        if let Some(overlay) = overlay {
            request = request.with_overlay(overlay);
        }

        let report = match reports.generate(&request).await {
            Ok(reference) => {
                messages.push(
                    if reference.ok {
                        "Report saved to customer files"
                    } else {
                        "Report generated"
                    }
                    .to_string(),
                );
                tracing::info!(file = ?reference.file_id, "Report generated");
                Some(reference)
            }
            Err(e) => {
                tracing::warn!("Report generation failed: {}", e);
                messages.push(failure_message("Report failed", &e));
                None
            }
        };

        Ok(ReportOutcome {
            snapshot: stored,
            totals,
            report,
            messages,
        })
    }

    /// Versions from the remote store, falling back to the local store when
    /// the remote listing fails.
    pub async fn list_versions(&self) -> SyncResult<Vec<VersionSummary>> {
        match self.store.list_versions().await {
            Ok(versions) => Ok(versions),
            Err(e) => match &self.fallback {
                Some(local) => {
                    tracing::warn!("Remote version list failed, using local store: {}", e);
                    Ok(local.summaries())
                }
                None => Err(e),
            },
        }
    }

    /// Fetch a version by id; local ids are served from the fallback store.
    pub async fn fetch_version(&self, id: &str) -> SyncResult<Snapshot> {
        if let Some(local) = &self.fallback {
            if let Some(snapshot) = local.get(id) {
                return Ok(snapshot);
            }
        }
        self.store.fetch_version(id).await
    }

    async fn store_snapshot(&self, snapshot: &Snapshot, messages: &mut Vec<String>) -> SnapshotOutcome {
        let compact = snapshot.compacted();
        match self.store.create_version(&compact).await {
            Ok(summary) => SnapshotOutcome::Remote(summary),
            Err(e) => {
                tracing::warn!("Snapshot upload failed: {}", e);
                messages.push(failure_message("Snapshot failed", &e));
                match self.fallback.as_ref().map(|local| local.add(&compact)) {
                    Some(Ok(summary)) => SnapshotOutcome::Local(summary),
                    Some(Err(local_err)) => {
                        tracing::error!("Local snapshot save failed: {}", local_err);
                        SnapshotOutcome::Failed
                    }
                    None => SnapshotOutcome::Failed,
                }
            }
        }
    }
}

fn failure_message(prefix: &str, err: &SyncError) -> String {
    match err {
        SyncError::Status { message, .. } => format!("{}: {}", prefix, message),
        other => format!("{}: {}", prefix, other),
    }
}
