use roofkit_core::EditError;
use roofkit_designer::model::Point;
use roofkit_designer::viewport::{ViewBox, Viewport};

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

#[test]
fn test_viewport_creation() {
    let vp = Viewport::new(2000.0, 1000.0, 1000.0, 500.0).unwrap();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.view_box(), ViewBox::new(0.0, 0.0, 2000.0, 1000.0));
    assert_eq!(vp.world_units_per_screen_px(), 2.0);
    assert_eq!(vp.screen_tolerance(6.0), 12.0);
}

#[test]
fn test_invalid_dimensions_rejected() {
    assert!(matches!(
        Viewport::new(0.0, 100.0, 100.0, 100.0),
        Err(EditError::InvalidDimensions { .. })
    ));
    assert!(Viewport::new(100.0, 100.0, f64::NAN, 100.0).is_err());
}

#[test]
fn test_round_trip_under_rotation_and_zoom() {
    let mut vp = Viewport::new(1200.0, 800.0, 600.0, 400.0).unwrap();
    vp.set_angle(37.0);
    vp.zoom_at(Point::new(150.0, 100.0), -400.0);

    for world in [
        Point::new(0.0, 0.0),
        Point::new(600.0, 400.0),
        Point::new(1100.0, 50.0),
    ] {
        let back = vp.screen_to_world(vp.world_to_screen(world));
        assert!(close(back, world), "{:?} -> {:?}", world, back);
    }
}

#[test]
fn test_rotation_about_image_center() {
    let mut vp = Viewport::new(100.0, 100.0, 100.0, 100.0).unwrap();
    vp.set_angle(90.0);
    // The centre is fixed, a point right of centre moves below it on screen
    assert!(close(vp.world_to_screen(Point::new(50.0, 50.0)), Point::new(50.0, 50.0)));
    assert!(close(vp.world_to_screen(Point::new(60.0, 50.0)), Point::new(50.0, 60.0)));
}

#[test]
fn test_zoom_keeps_cursor_point_fixed() {
    let mut vp = Viewport::new(1000.0, 1000.0, 500.0, 500.0).unwrap();
    let cursor = Point::new(200.0, 300.0);
    let before = vp.screen_to_world(cursor);
    vp.zoom_at(cursor, -500.0);
    assert!(vp.zoom() > 1.0);
    assert!(close(vp.screen_to_world(cursor), before));
}

#[test]
fn test_zoom_clamped() {
    let mut vp = Viewport::new(1000.0, 1000.0, 500.0, 500.0).unwrap();
    vp.zoom_at(Point::new(250.0, 250.0), -100_000.0);
    assert!((vp.zoom() - 8.0).abs() < 1e-9);
    vp.zoom_at(Point::new(250.0, 250.0), 100_000.0);
    assert!((vp.zoom() - 1.0).abs() < 1e-9);
}

#[test]
fn test_pan_clamped_to_image() {
    let mut vp = Viewport::new(1000.0, 1000.0, 500.0, 500.0).unwrap();
    vp.set_zoom_at(Point::new(0.0, 0.0), 2.0);
    vp.pan_by_screen(-10_000.0, -10_000.0);
    let vb = vp.view_box();
    assert!((vb.x - 500.0).abs() < 1e-9);
    assert!((vb.y - 500.0).abs() < 1e-9);

    vp.pan_by_screen(10_000.0, 10_000.0);
    assert_eq!(vp.view_box().x, 0.0);
    assert_eq!(vp.view_box().y, 0.0);
}

#[test]
fn test_angle_normalized() {
    let mut vp = Viewport::new(100.0, 100.0, 100.0, 100.0).unwrap();
    vp.set_angle(-90.0);
    assert_eq!(vp.angle_deg(), 270.0);
    vp.rotate_by(180.0);
    assert_eq!(vp.angle_deg(), 90.0);
}
