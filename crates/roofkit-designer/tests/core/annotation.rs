use roofkit_designer::annotation::{nearest_edge, pick_edge, plane_at};
use roofkit_designer::model::{LayerId, Plane, PlaneId, Point};

fn rect_plane(id: &str, layer: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Plane {
    Plane::new(
        PlaneId::new(id),
        LayerId::new(layer),
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ],
        6.0,
    )
    .unwrap()
}

#[test]
fn test_nearest_edge_across_planes() {
    let planes = vec![
        rect_plane("p1", "A", 0.0, 0.0, 100.0, 100.0),
        rect_plane("p2", "A", 200.0, 0.0, 300.0, 100.0),
    ];
    let hit = nearest_edge(Point::new(190.0, 50.0), &planes).unwrap();
    assert_eq!(hit.plane_id, PlaneId::new("p2"));
    assert_eq!(hit.edge_index, 3);
    assert!((hit.distance - 10.0).abs() < 1e-9);
    assert_eq!(hit.projection, Point::new(200.0, 50.0));
}

#[test]
fn test_pick_edge_within_tolerance() {
    let planes = vec![rect_plane("p1", "A", 0.0, 0.0, 100.0, 100.0)];
    let layer = LayerId::new("A");
    let hit = pick_edge(Point::new(50.0, -5.0), &planes, &layer, 18.0).unwrap();
    assert_eq!(hit.edge_index, 0);
    assert!(pick_edge(Point::new(50.0, -50.0), &planes, &layer, 18.0).is_none());
}

#[test]
fn test_pick_edge_falls_back_to_plane_under_cursor() {
    let planes = vec![rect_plane("p1", "A", 0.0, 0.0, 200.0, 200.0)];
    let layer = LayerId::new("A");
    // 40px from every edge but inside the plane
    let hit = pick_edge(Point::new(160.0, 100.0), &planes, &layer, 18.0).unwrap();
    assert_eq!(hit.plane_id, PlaneId::new("p1"));
    assert_eq!(hit.edge_index, 1);
}

#[test]
fn test_pick_edge_ignores_other_layers() {
    let planes = vec![rect_plane("p1", "B", 0.0, 0.0, 100.0, 100.0)];
    let layer = LayerId::new("A");
    assert!(pick_edge(Point::new(50.0, 1.0), &planes, &layer, 18.0).is_none());
}

#[test]
fn test_plane_at_prefers_topmost() {
    let planes = vec![
        rect_plane("lower", "A", 0.0, 0.0, 100.0, 100.0),
        rect_plane("upper", "A", 0.0, 0.0, 100.0, 100.0),
        rect_plane("other", "B", 0.0, 0.0, 100.0, 100.0),
    ];
    let layer = LayerId::new("A");
    let plane = plane_at(Point::new(50.0, 50.0), &planes, &layer).unwrap();
    assert_eq!(plane.id(), &PlaneId::new("upper"));
    assert!(plane_at(Point::new(150.0, 50.0), &planes, &layer).is_none());
}
