use proptest::prelude::*;
use roofkit_designer::measurement::*;
use roofkit_designer::model::{AccessoryKind, EdgeType, LayerId, Plane, PlaneId, Point};

fn rect_plane(id: &str, x0: f64, y0: f64, x1: f64, y1: f64, pitch: f64) -> Plane {
    Plane::new(
        PlaneId::new(id),
        LayerId::new("A"),
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ],
        pitch,
    )
    .unwrap()
}

#[test]
fn test_rake_footage_at_six_twelve() {
    let mut plane = rect_plane("p1", 0.0, 0.0, 100.0, 100.0, 6.0);
    plane.set_edge_type(1, EdgeType::Rake).unwrap();
    let totals = compute_totals(&[plane], &ScaleReference::with_gsd(0.1));
    // 100 px at 0.1 m/px is 32.8 ft, times sqrt(1.25)
    let rake = totals.edge_total(EdgeType::Rake);
    assert!((rake - 36.68).abs() < 0.01, "rake = {}", rake);
    assert_eq!(roofkit_core::format_feet(rake), "36.7 ft");
}

#[test]
fn test_ground_sample_area() {
    let plane = rect_plane("p1", 0.0, 0.0, 100.0, 100.0, 0.0);
    let totals = compute_totals(&[plane], &ScaleReference::with_gsd(0.1));
    assert_eq!(totals.basis, AreaBasis::GroundSample);
    // 10 m x 10 m flat
    assert!((totals.total_sq_ft() - 1076.39).abs() < 1e-6);
    assert!((totals.total_squares - 10.7639).abs() < 1e-9);
    // Four unlabeled edges, all exterior
    assert!((totals.total_perimeter_ft - 4.0 * 32.8084).abs() < 1e-6);
    assert!((totals.edge_total(EdgeType::Unknown) - totals.total_perimeter_ft).abs() < 1e-9);
}

#[test]
fn test_reference_total_distributed_by_weight() {
    let flat = rect_plane("flat", 0.0, 0.0, 100.0, 100.0, 0.0);
    let steep = rect_plane("steep", 200.0, 0.0, 300.0, 100.0, 12.0);
    let scale = ScaleReference::with_gsd(0.1).with_reference_total(2500.0);
    let totals = compute_totals(&[flat, steep], &scale);

    assert_eq!(totals.basis, AreaBasis::ReferenceTotal);
    assert!((totals.total_squares - 25.0).abs() < 1e-9);

    let flat_area = totals.planes[0].area_sq_ft.unwrap();
    let steep_area = totals.planes[1].area_sq_ft.unwrap();
    assert!((flat_area + steep_area - 2500.0).abs() < 1e-9);
    assert!((steep_area / flat_area - 2f64.sqrt()).abs() < 1e-9);
}

#[test]
fn test_unscaled_without_calibration() {
    let plane = rect_plane("p1", 0.0, 0.0, 100.0, 100.0, 6.0);
    let totals = compute_totals(&[plane], &ScaleReference::default());
    assert_eq!(totals.basis, AreaBasis::Unscaled);
    assert_eq!(totals.total_squares, 0.0);
    assert_eq!(totals.total_perimeter_ft, 0.0);
    assert!(totals.edge_totals_ft.is_empty());
    assert_eq!(totals.planes[0].area_sq_ft, None);
    assert!((totals.planes[0].plan_area_px2 - 10_000.0).abs() < 1e-9);
}

#[test]
fn test_shared_edge_counted_once() {
    let mut left = rect_plane("left", 0.0, 0.0, 100.0, 100.0, 6.0);
    let mut right = rect_plane("right", 100.0, 0.0, 200.0, 100.0, 6.0);
    left.set_edge_type(1, EdgeType::Valley).unwrap();
    right.set_edge_type(3, EdgeType::Eave).unwrap();
    let planes = vec![left, right];

    let edges = measured_edges(&planes);
    assert_eq!(edges.len(), 7);
    let shared: Vec<_> = edges.iter().filter(|e| e.shared_with.is_some()).collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].plane_index, 0);
    assert_eq!(shared[0].edge_type, EdgeType::Valley);

    let totals = compute_totals(&planes, &ScaleReference::with_gsd(0.1));
    assert!(totals.edge_total(EdgeType::Eave).abs() < 1e-9);
    // Six exterior edges of 100 px each
    assert!((totals.total_perimeter_ft - 6.0 * 32.8084).abs() < 1e-6);
}

#[test]
fn test_edges_on_other_layers_not_shared() {
    let left = rect_plane("left", 0.0, 0.0, 100.0, 100.0, 6.0);
    let right = Plane::new(
        PlaneId::new("right"),
        LayerId::new("B"),
        vec![
            Point::new(100.0, 0.0),
            Point::new(200.0, 0.0),
            Point::new(200.0, 100.0),
            Point::new(100.0, 100.0),
        ],
        6.0,
    )
    .unwrap();
    let edges = measured_edges(&[left, right]);
    assert_eq!(edges.len(), 8);
    assert!(edges.iter().all(|e| e.shared_with.is_none()));
}

#[test]
fn test_accessory_totals_included() {
    let mut plane = rect_plane("p1", 0.0, 0.0, 100.0, 100.0, 6.0);
    plane
        .add_accessory(AccessoryKind::PipeFlange, Point::new(50.0, 50.0))
        .unwrap();
    let totals = compute_totals(&[plane], &ScaleReference::default());
    assert_eq!(totals.accessory_totals["Pipe flange"]["1\"-2\""], 1);
}

#[test]
fn test_totals_serialize_camel_case() {
    let totals = compute_totals(
        &[rect_plane("p1", 0.0, 0.0, 10.0, 10.0, 4.0)],
        &ScaleReference::with_gsd(0.2),
    );
    let json = serde_json::to_value(&totals).unwrap();
    assert!(json.get("totalSquares").is_some());
    assert!(json.get("edgeTotalsFt").is_some());
    assert_eq!(json["basis"], "groundSample");
}

proptest! {
    #[test]
    fn prop_correction_factors_at_least_one(pitch in 0.0f64..24.0) {
        for edge_type in EdgeType::ALL {
            prop_assert!(edge_type.correction_factor(pitch) >= 1.0);
        }
        prop_assert!(area_weight(pitch) >= 1.0);
    }

    #[test]
    fn prop_totals_idempotent(
        w in 10.0f64..500.0,
        h in 10.0f64..500.0,
        pitch in 0.0f64..18.0,
        gsd in 0.01f64..1.0,
    ) {
        let planes = vec![
            rect_plane("a", 0.0, 0.0, w, h, pitch),
            rect_plane("b", w, 0.0, 2.0 * w, h, pitch),
        ];
        let scale = ScaleReference::with_gsd(gsd);
        prop_assert_eq!(compute_totals(&planes, &scale), compute_totals(&planes, &scale));
    }
}

#[test]
fn test_hip_and_valley_factor_at_flat() {
    assert!((EdgeType::Hip.correction_factor(0.0) - 2f64.sqrt()).abs() < 1e-12);
    assert!((EdgeType::Valley.correction_factor(0.0) - 2f64.sqrt()).abs() < 1e-12);
    assert_eq!(EdgeType::Rake.correction_factor(0.0), 1.0);
}
