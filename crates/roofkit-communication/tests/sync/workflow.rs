use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use roofkit_communication::*;
use roofkit_designer::{
    AreaBasis, EditorState, LayerId, MeasurementTotals, Plane, PlaneId, Point, Snapshot,
};
use tempfile::TempDir;

/// Records uploads; fails every call when `fail` is set.
#[derive(Default)]
struct MockStore {
    fail: bool,
    created: Mutex<Vec<String>>,
}

#[async_trait]
impl SnapshotStore for MockStore {
    async fn create_version(&self, snapshot: &Snapshot) -> SyncResult<VersionSummary> {
        if self.fail {
            return Err(SyncError::Status {
                status: 500,
                message: "store offline".to_string(),
            });
        }
        let id = format!("v{}", self.created.lock().len() + 1);
        self.created.lock().push(id.clone());
        Ok(VersionSummary {
            id,
            name: snapshot.name.clone(),
            created_at: Utc::now(),
        })
    }

    async fn list_versions(&self) -> SyncResult<Vec<VersionSummary>> {
        if self.fail {
            return Err(SyncError::Transport("connection refused".to_string()));
        }
        Ok(Vec::new())
    }

    async fn fetch_version(&self, id: &str) -> SyncResult<Snapshot> {
        Err(SyncError::NotFound(id.to_string()))
    }
}

struct MockRecompute {
    result: Option<MeasurementTotals>,
    requests: Mutex<Vec<usize>>,
}

impl MockRecompute {
    fn ok(total_squares: f64) -> Self {
        Self {
            result: Some(MeasurementTotals {
                total_squares,
                basis: AreaBasis::ReferenceTotal,
                ..Default::default()
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            result: None,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RecomputeService for MockRecompute {
    async fn recompute(&self, request: &RecomputeRequest) -> SyncResult<MeasurementTotals> {
        self.requests.lock().push(request.planes.len());
        self.result
            .clone()
            .ok_or_else(|| SyncError::Transport("timed out".to_string()))
    }
}

#[derive(Default)]
struct MockReports {
    requests: Mutex<Vec<ReportRequest>>,
}

#[async_trait]
impl ReportGenerator for MockReports {
    async fn generate(&self, request: &ReportRequest) -> SyncResult<ReportReference> {
        self.requests.lock().push(request.clone());
        Ok(ReportReference {
            ok: true,
            file_id: Some("f-1".to_string()),
        })
    }
}

fn snapshot() -> Snapshot {
    let layer = LayerId::new("A");
    let plane = Plane::new(
        PlaneId::new("p1"),
        layer.clone(),
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ],
        8.0,
    )
    .unwrap();
    Snapshot::new(vec![plane], Vec::new(), layer)
}

#[tokio::test]
async fn test_save_remote_snapshot_and_totals() {
    let store = Arc::new(MockStore::default());
    let recompute = Arc::new(MockRecompute::ok(12.5));
    let workflow = SaveWorkflow::new(store.clone(), recompute.clone());

    let outcome = workflow.save(&snapshot()).await;
    assert!(outcome.snapshot.is_remote());
    assert_eq!(outcome.totals.as_ref().unwrap().total_squares, 12.5);
    assert_eq!(outcome.messages, vec!["Saving...", "Saved (snapshot + totals)"]);
    assert_eq!(store.created.lock().len(), 1);
    assert_eq!(*recompute.requests.lock(), vec![1]);
}

#[tokio::test]
async fn test_save_falls_back_to_local_store() {
    let dir = TempDir::new().unwrap();
    let local = Arc::new(LocalSnapshotStore::open(dir.path().join("local.json"), 50).unwrap());
    let store = Arc::new(MockStore {
        fail: true,
        ..Default::default()
    });
    let workflow =
        SaveWorkflow::new(store, Arc::new(MockRecompute::ok(3.0))).with_fallback(local.clone());

    let outcome = workflow.save(&snapshot()).await;
    assert!(matches!(outcome.snapshot, SnapshotOutcome::Local(_)));
    assert_eq!(
        outcome.messages,
        vec!["Saving...", "Snapshot failed: store offline", "Saved (totals)"]
    );
    assert_eq!(local.len(), 1);

    // Remote listing is down, so the local versions are offered instead
    let versions = workflow.list_versions().await.unwrap();
    assert_eq!(versions.len(), 1);
    let restored = workflow.fetch_version(&versions[0].id).await.unwrap();
    assert_eq!(restored.planes.len(), 1);
}

#[tokio::test]
async fn test_save_status_when_recompute_fails() {
    let workflow = SaveWorkflow::new(
        Arc::new(MockStore::default()),
        Arc::new(MockRecompute::failing()),
    );
    let outcome = workflow.save(&snapshot()).await;
    assert!(outcome.totals.is_none());
    assert_eq!(outcome.status(), "Saved snapshot");

    let broken = SaveWorkflow::new(
        Arc::new(MockStore {
            fail: true,
            ..Default::default()
        }),
        Arc::new(MockRecompute::failing()),
    );
    let outcome = broken.save(&snapshot()).await;
    assert_eq!(outcome.snapshot, SnapshotOutcome::Failed);
    assert_eq!(outcome.status(), "Error saving");
}

#[tokio::test]
async fn test_save_editor_adopts_remote_totals() {
    let mut editor = EditorState::default();
    editor.restore(snapshot());
    let workflow = SaveWorkflow::new(
        Arc::new(MockStore::default()),
        Arc::new(MockRecompute::ok(40.0)),
    );

    workflow.save_editor(&mut editor).await;
    assert_eq!(editor.totals().total_squares, 40.0);
    assert_eq!(editor.totals().basis, AreaBasis::ReferenceTotal);
}

#[tokio::test]
async fn test_report_request_contents() {
    let reports = Arc::new(MockReports::default());
    let workflow = SaveWorkflow::new(
        Arc::new(MockStore::default()),
        Arc::new(MockRecompute::ok(9.0)),
    )
    .with_reports(reports.clone());

    let mut snap = snapshot();
    snap.view.angle_deg = 15.0;
    let outcome = workflow
        .generate_report(&snap, MeasurementTotals::default(), None)
        .await
        .unwrap();

    assert_eq!(
        outcome.messages,
        vec![
            "Saving progress...",
            "Saving corrections...",
            "Generating report...",
            "Report saved to customer files",
        ]
    );
    let link = outcome.report.unwrap().link("https://example.com/api");
    assert_eq!(link.as_deref(), Some("https://example.com/api/files/f-1"));

    let sent = reports.requests.lock()[0].clone();
    assert_eq!(sent.totals.total_squares, 9.0);
    assert_eq!(sent.image_rotation_deg, 15.0);
    assert!(sent.save_to_files);
    assert_eq!(sent.plane_summaries[0].index, 1);
    assert_eq!(sent.plane_summaries[0].vertex_count, 4);

    let json = serde_json::to_value(&sent).unwrap();
    assert!(json.get("planeSummaries").is_some());
    assert!(json.get("overlayImage").is_none());
}

#[tokio::test]
async fn test_report_uses_provisional_totals_when_recompute_fails() {
    let reports = Arc::new(MockReports::default());
    let workflow = SaveWorkflow::new(
        Arc::new(MockStore::default()),
        Arc::new(MockRecompute::failing()),
    )
    .with_reports(reports.clone());

    let provisional = MeasurementTotals {
        total_squares: 2.0,
        ..Default::default()
    };
    let outcome = workflow
        .generate_report(&snapshot(), provisional, Some("data:image/png;base64,AA".into()))
        .await
        .unwrap();
    assert_eq!(outcome.totals.total_squares, 2.0);
    assert!(reports.requests.lock()[0].overlay_image.is_some());
}

#[tokio::test]
async fn test_report_requires_generator() {
    let workflow = SaveWorkflow::new(
        Arc::new(MockStore::default()),
        Arc::new(MockRecompute::ok(1.0)),
    );
    assert!(workflow
        .generate_report(&snapshot(), MeasurementTotals::default(), None)
        .await
        .is_err());
}
