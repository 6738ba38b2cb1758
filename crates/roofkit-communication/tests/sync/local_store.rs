use roofkit_communication::{LocalSnapshotStore, SnapshotStore, SyncError, LOCAL_ID_PREFIX};
use roofkit_designer::{LayerId, Plane, PlaneId, Point, Snapshot};
use tempfile::TempDir;

fn snapshot(name: &str) -> Snapshot {
    let layer = LayerId::new("A");
    let plane = Plane::new(
        PlaneId::new("p1"),
        layer.clone(),
        vec![
            Point::new(0.04, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ],
        6.0,
    )
    .unwrap();
    Snapshot::new(vec![plane], Vec::new(), layer).with_name(name)
}

#[test]
fn test_add_assigns_local_ids_most_recent_first() {
    let dir = TempDir::new().unwrap();
    let store = LocalSnapshotStore::open(dir.path().join("snapshots.json"), 50).unwrap();
    let first = store.add(&snapshot("first")).unwrap();
    let second = store.add(&snapshot("second")).unwrap();

    assert!(first.id.starts_with(LOCAL_ID_PREFIX));
    assert_ne!(first.id, second.id);

    let summaries = store.summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name.as_deref(), Some("second"));
    assert_eq!(summaries[1].name.as_deref(), Some("first"));
}

#[test]
fn test_capacity_drops_oldest() {
    let dir = TempDir::new().unwrap();
    let store = LocalSnapshotStore::open(dir.path().join("snapshots.json"), 3).unwrap();
    for i in 0..5 {
        store.add(&snapshot(&format!("v{}", i))).unwrap();
    }
    let names: Vec<_> = store
        .summaries()
        .into_iter()
        .filter_map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["v4", "v3", "v2"]);
}

#[test]
fn test_reopen_loads_persisted_versions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("snapshots.json");
    let id = {
        let store = LocalSnapshotStore::open(&path, 50).unwrap();
        store.add(&snapshot("kept")).unwrap().id
    };

    let reopened = LocalSnapshotStore::open(&path, 50).unwrap();
    assert_eq!(reopened.len(), 1);
    let restored = reopened.get(&id).unwrap();
    assert_eq!(restored.name.as_deref(), Some("kept"));
    // Stored copies are compacted to 0.1 px
    assert_eq!(restored.planes[0].ring()[0], Point::new(0.0, 0.0));
}

#[tokio::test]
async fn test_store_trait_fetch_missing() {
    let dir = TempDir::new().unwrap();
    let store = LocalSnapshotStore::open(dir.path().join("snapshots.json"), 50).unwrap();
    let summary = store.create_version(&snapshot("a")).await.unwrap();

    assert_eq!(store.list_versions().await.unwrap().len(), 1);
    assert!(store.fetch_version(&summary.id).await.is_ok());
    assert!(matches!(
        store.fetch_version("local:0").await,
        Err(SyncError::NotFound(_))
    ));
}

#[test]
fn test_failed_write_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    let store = LocalSnapshotStore::open(blocker.join("snapshots.json"), 50).unwrap();

    // A plain file where the store directory should be
    std::fs::write(&blocker, b"").unwrap();
    assert!(store.add(&snapshot("lost")).is_err());
    assert!(store.is_empty());
    assert!(store.summaries().is_empty());

    std::fs::remove_file(&blocker).unwrap();
    store.add(&snapshot("kept")).unwrap();
    assert_eq!(store.len(), 1);
}
