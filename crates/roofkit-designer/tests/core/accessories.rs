use roofkit_core::EditError;
use roofkit_designer::accessories::{accessory_breakdown, hit_test, BLANK_VALUE};
use roofkit_designer::model::{
    AccessoryData, AccessoryId, AccessoryKind, AccessoryPayload, LayerId, Plane, PlaneId, Point,
};
use serde_json::json;

fn square(id: &str, x0: f64) -> Plane {
    Plane::new(
        PlaneId::new(id),
        LayerId::new("A"),
        vec![
            Point::new(x0, 0.0),
            Point::new(x0 + 100.0, 0.0),
            Point::new(x0 + 100.0, 100.0),
            Point::new(x0, 100.0),
        ],
        6.0,
    )
    .unwrap()
}

#[test]
fn test_add_inside_only() {
    let mut plane = square("p1", 0.0);
    let id = plane
        .add_accessory(AccessoryKind::Vent, Point::new(50.0, 50.0))
        .unwrap();
    assert_eq!(plane.accessories().len(), 1);
    assert_eq!(plane.accessory(&id).unwrap().kind(), Some(AccessoryKind::Vent));

    let err = plane
        .add_accessory(AccessoryKind::Vent, Point::new(150.0, 50.0))
        .unwrap_err();
    assert_eq!(
        err,
        EditError::AccessoryOutsidePlane {
            plane_id: "p1".to_string()
        }
    );
}

#[test]
fn test_update_requires_matching_kind() {
    let mut plane = square("p1", 0.0);
    let id = plane
        .add_accessory(AccessoryKind::Skylight, Point::new(50.0, 50.0))
        .unwrap();

    plane
        .update_accessory_data(
            &id,
            AccessoryData::Skylight {
                size: "c01".to_string(),
            },
        )
        .unwrap();

    let err = plane
        .update_accessory_data(&id, AccessoryData::Vent { styles: vec![] })
        .unwrap_err();
    assert!(matches!(err, EditError::AccessoryKindMismatch { .. }));
}

#[test]
fn test_remove_and_missing() {
    let mut plane = square("p1", 0.0);
    let id = plane
        .add_accessory(AccessoryKind::Other, Point::new(10.0, 10.0))
        .unwrap();
    let removed = plane.remove_accessory(&id).unwrap();
    assert_eq!(removed.id, id);
    assert!(plane.accessories().is_empty());
    assert!(matches!(
        plane.remove_accessory(&id),
        Err(EditError::AccessoryNotFound { .. })
    ));
    assert!(plane
        .move_accessory(&AccessoryId::new("nope"), Point::new(1.0, 1.0))
        .is_err());
}

#[test]
fn test_hit_test_picks_closest_within_radius() {
    let mut a = square("p1", 0.0);
    let mut b = square("p2", 100.0);
    a.add_accessory(AccessoryKind::Vent, Point::new(95.0, 50.0))
        .unwrap();
    let near = b
        .add_accessory(AccessoryKind::Vent, Point::new(103.0, 50.0))
        .unwrap();
    let planes = vec![a, b];

    let hit = hit_test(Point::new(101.0, 50.0), &planes, 10.0).unwrap();
    assert_eq!(hit.accessory_id, near);
    assert_eq!(hit.plane_id, PlaneId::new("p2"));
    assert!(hit_test(Point::new(150.0, 90.0), &planes, 10.0).is_none());
}

#[test]
fn test_breakdown_counts_values_and_blanks() {
    let mut plane = square("p1", 0.0);
    let s1 = plane
        .add_accessory(AccessoryKind::Skylight, Point::new(10.0, 10.0))
        .unwrap();
    plane
        .add_accessory(AccessoryKind::Skylight, Point::new(20.0, 10.0))
        .unwrap();
    let vent = plane
        .add_accessory(AccessoryKind::Vent, Point::new(30.0, 10.0))
        .unwrap();
    plane
        .add_accessory(AccessoryKind::Vent, Point::new(40.0, 10.0))
        .unwrap();
    plane
        .update_accessory_data(
            &s1,
            AccessoryData::Skylight {
                size: " c01 ".to_string(),
            },
        )
        .unwrap();
    plane
        .update_accessory_data(
            &vent,
            AccessoryData::Vent {
                styles: vec!["Ridge".to_string(), "Box".to_string()],
            },
        )
        .unwrap();

    let breakdown = accessory_breakdown(&[plane]);
    assert_eq!(breakdown["Skylight"]["C01"], 1);
    assert_eq!(breakdown["Skylight"]["M08"], 1);
    assert_eq!(breakdown["Vents"]["Ridge"], 1);
    assert_eq!(breakdown["Vents"]["Box"], 1);
    assert_eq!(breakdown["Vents"][BLANK_VALUE], 1);
}

#[test]
fn test_unrecognized_accessory_counted_but_read_only() {
    let mut plane: Plane = serde_json::from_value(json!({
        "id": "p1",
        "layerId": "A",
        "pitch": 6.0,
        "ring": [{"x": 0.0, "y": 0.0}, {"x": 100.0, "y": 0.0}, {"x": 100.0, "y": 100.0}],
        "accessories": [{
            "id": "legacy",
            "position": {"x": 60.0, "y": 20.0},
            "data": {"kind": "chimney", "width": 3}
        }]
    }))
    .unwrap();
    let id = AccessoryId::new("legacy");
    let acc = plane.accessory(&id).unwrap();
    assert!(matches!(acc.data, AccessoryPayload::Unrecognized(_)));
    assert!(!acc.is_editable());

    let breakdown = accessory_breakdown(std::slice::from_ref(&plane));
    assert_eq!(breakdown["chimney"][BLANK_VALUE], 1);

    let err = plane
        .update_accessory_data(
            &id,
            AccessoryData::Other {
                note: "x".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, EditError::AccessoryNotEditable { .. }));
}
