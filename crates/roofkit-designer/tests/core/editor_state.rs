use roofkit_core::{EditError, Error};
use roofkit_designer::model::{AccessoryKind, EdgeType, PlaneId, Point};
use roofkit_designer::{
    AreaBasis, ClickOutcome, EditorConfig, EditorMode, EditorState, Interaction, PointerButton,
    ScaleReference,
};

/// Editor over a 1000x1000 image shown 1:1, so screen and world coincide.
fn editor() -> EditorState {
    let mut editor = EditorState::default();
    editor.set_image(1000.0, 1000.0, 1000.0, 1000.0).unwrap();
    editor
}

fn click(editor: &mut EditorState, x: f64, y: f64) -> roofkit_core::Result<ClickOutcome> {
    let p = Point::new(x, y);
    let outcome = editor.pointer_down(p, PointerButton::Primary)?;
    match outcome {
        ClickOutcome::DragStarted | ClickOutcome::AccessorySelected { .. } => {
            editor.pointer_up(p)
        }
        other => Ok(other),
    }
}

/// Draw a closed polygon by clicking each corner then the first again.
fn draw_polygon(editor: &mut EditorState, corners: &[(f64, f64)]) -> PlaneId {
    for &(x, y) in corners {
        let outcome = click(editor, x, y).unwrap();
        assert!(
            matches!(
                outcome,
                ClickOutcome::DrawingStarted | ClickOutcome::PointAdded
            ),
            "unexpected {:?} at ({}, {})",
            outcome,
            x,
            y
        );
    }
    let (x, y) = corners[0];
    match click(editor, x, y).unwrap() {
        ClickOutcome::PlaneCreated(id) => id,
        other => panic!("expected plane, got {:?}", other),
    }
}

const LEFT: [(f64, f64); 4] = [(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)];

#[test]
fn test_pointer_requires_viewport() {
    let mut editor = EditorState::default();
    let err = editor
        .pointer_down(Point::new(10.0, 10.0), PointerButton::Primary)
        .unwrap_err();
    assert!(matches!(err, Error::Edit(EditError::ViewportUninitialized)));
    assert!(editor.zoom_at(Point::new(0.0, 0.0), 100.0).is_err());
}

#[test]
fn test_draw_plane_with_clicks() {
    let mut editor = editor();
    let id = draw_polygon(&mut editor, &LEFT);

    assert_eq!(editor.planes().len(), 1);
    let plane = editor.plane(&id).unwrap();
    assert_eq!(plane.ring().len(), 4);
    assert_eq!(plane.pitch(), editor.config.default_pitch);
    assert!((plane.area_px2() - 40_000.0).abs() < 1e-9);
    assert_eq!(editor.selected_plane(), Some(&id));
    assert_eq!(editor.interaction(), &Interaction::Idle);
    assert_eq!(editor.totals().planes.len(), 1);
}

#[test]
fn test_neighbour_shares_edge_via_vertex_snaps() {
    let mut editor = editor();
    draw_polygon(&mut editor, &LEFT);
    // Starts on the first plane's top-right vertex and ends on its
    // bottom-right one
    let right = draw_polygon(
        &mut editor,
        &[(300.0, 100.0), (500.0, 100.0), (500.0, 300.0), (300.0, 300.0)],
    );
    assert_eq!(editor.plane(&right).unwrap().ring().len(), 4);

    editor.set_scale(ScaleReference::with_gsd(0.1));
    let totals = editor.totals();
    assert_eq!(totals.basis, AreaBasis::GroundSample);
    // 6 exterior edges of 200 px at 0.1 m/px
    assert!((totals.total_perimeter_ft - 6.0 * 20.0 * 3.28084).abs() < 1e-6);
}

#[test]
fn test_start_inside_plane_rejected() {
    let mut editor = editor();
    draw_polygon(&mut editor, &LEFT);
    let err = click(&mut editor, 150.0, 150.0).unwrap_err();
    assert!(err.is_topology_error());
    assert!(editor.drawing().is_none());
}

#[test]
fn test_overlapping_plane_allowed_on_other_layer() {
    let mut editor = editor();
    draw_polygon(&mut editor, &LEFT);
    let layer_b = editor.add_layer();
    editor.set_active_layer(&layer_b).unwrap();
    assert_eq!(editor.layers()[1].name, "B");

    let id = draw_polygon(
        &mut editor,
        &[(200.0, 200.0), (400.0, 200.0), (400.0, 400.0), (200.0, 400.0)],
    );
    assert_eq!(editor.plane(&id).unwrap().layer_id(), &layer_b);
}

#[test]
fn test_undo_and_cancel() {
    let mut editor = editor();
    click(&mut editor, 100.0, 100.0).unwrap();
    click(&mut editor, 300.0, 100.0).unwrap();
    assert_eq!(editor.drawing().unwrap().len(), 2);

    let outcome = editor
        .pointer_down(Point::new(0.0, 0.0), PointerButton::Secondary)
        .unwrap();
    assert_eq!(outcome, ClickOutcome::PointRemoved);
    assert_eq!(editor.undo_point(), ClickOutcome::DrawingCancelled);
    assert!(editor.drawing().is_none());

    click(&mut editor, 100.0, 100.0).unwrap();
    assert_eq!(editor.cancel_drawing(), ClickOutcome::DrawingCancelled);
    assert!(matches!(
        editor.finish_drawing(),
        Err(Error::Edit(EditError::NoDrawingSession))
    ));
}

#[test]
fn test_mode_change_cancels_drawing() {
    let mut editor = editor();
    click(&mut editor, 100.0, 100.0).unwrap();
    assert!(editor.drawing().is_some());
    editor.set_mode(EditorMode::Label);
    assert!(editor.drawing().is_none());
    assert_eq!(editor.mode(), EditorMode::Label);
}

#[test]
fn test_pan_resumes_drawing() {
    let mut editor = editor();
    click(&mut editor, 100.0, 100.0).unwrap();
    assert_eq!(
        editor
            .pointer_down(Point::new(500.0, 500.0), PointerButton::Middle)
            .unwrap(),
        ClickOutcome::PanStarted
    );
    editor.pointer_move(Point::new(520.0, 500.0)).unwrap();
    assert!(editor.drawing().is_some());
    assert_eq!(
        editor.pointer_up(Point::new(520.0, 500.0)).unwrap(),
        ClickOutcome::PanFinished
    );
    assert!(matches!(editor.interaction(), Interaction::Drawing(_)));
}

#[test]
fn test_preview_follows_pointer_while_drawing() {
    let mut editor = editor();
    editor.pointer_move(Point::new(40.0, 40.0)).unwrap();
    assert!(editor.preview().is_none());
    click(&mut editor, 100.0, 100.0).unwrap();
    editor.pointer_move(Point::new(251.0, 101.0)).unwrap();
    assert_eq!(editor.preview().unwrap().point.y, 100.0);
}

#[test]
fn test_vertex_drag() {
    let mut editor = editor();
    let id = draw_polygon(&mut editor, &LEFT);

    assert_eq!(
        editor
            .pointer_down(Point::new(100.0, 100.0), PointerButton::Primary)
            .unwrap(),
        ClickOutcome::DragStarted
    );
    editor.pointer_move(Point::new(50.0, 75.0)).unwrap();
    assert_eq!(
        editor.pointer_up(Point::new(50.0, 75.0)).unwrap(),
        ClickOutcome::DragFinished
    );
    assert_eq!(editor.plane(&id).unwrap().ring()[0], Point::new(50.0, 75.0));
}

#[test]
fn test_move_vertex_rejects_self_intersection() {
    let mut editor = editor();
    let id = draw_polygon(&mut editor, &LEFT);
    let before = editor.plane(&id).unwrap().ring().to_vec();

    let err = editor
        .move_vertex(&id, 0, Point::new(100.0, 500.0))
        .unwrap_err();
    assert!(err.is_geometry_error());
    assert_eq!(editor.plane(&id).unwrap().ring(), before.as_slice());

    assert!(matches!(
        editor.move_vertex(&id, 9, Point::new(0.0, 0.0)),
        Err(Error::Edit(EditError::EdgeOutOfRange { .. }))
    ));
}

#[test]
fn test_plane_click_selects_and_translate_checks_overlap() {
    let mut editor = editor();
    let left = draw_polygon(&mut editor, &LEFT);
    let right = draw_polygon(
        &mut editor,
        &[(300.0, 100.0), (500.0, 100.0), (500.0, 300.0), (300.0, 300.0)],
    );

    // Press and release at the centroid without moving
    assert_eq!(
        click(&mut editor, 200.0, 200.0).unwrap(),
        ClickOutcome::PlaneSelected(left.clone())
    );
    assert_eq!(editor.selected_plane(), Some(&left));

    let err = editor.translate_plane(&right, -50.0, 0.0).unwrap_err();
    assert!(err.is_topology_error());
    editor.translate_plane(&right, 50.0, 0.0).unwrap();
    assert_eq!(
        editor.plane(&right).unwrap().ring()[0],
        Point::new(350.0, 100.0)
    );
}

#[test]
fn test_label_pitch_and_accessory_modes() {
    let mut editor = editor();
    let id = draw_polygon(&mut editor, &LEFT);

    editor.set_mode(EditorMode::Label);
    editor.current_edge_type = EdgeType::Ridge;
    assert_eq!(
        click(&mut editor, 200.0, 95.0).unwrap(),
        ClickOutcome::EdgeLabeled {
            plane_id: id.clone(),
            edge_index: 0,
            edge_type: EdgeType::Ridge,
        }
    );
    assert_eq!(editor.plane(&id).unwrap().edges()[0], EdgeType::Ridge);

    editor.set_mode(EditorMode::Pitch);
    editor.current_pitch = 9.0;
    assert_eq!(
        click(&mut editor, 150.0, 250.0).unwrap(),
        ClickOutcome::PitchApplied {
            plane_id: id.clone(),
            pitch: 9.0
        }
    );
    assert_eq!(editor.plane(&id).unwrap().pitch(), 9.0);
    assert_eq!(click(&mut editor, 600.0, 600.0).unwrap(), ClickOutcome::Nothing);

    editor.set_mode(EditorMode::Accessories);
    editor.current_accessory = AccessoryKind::Vent;
    let accessory_id = match click(&mut editor, 150.0, 150.0).unwrap() {
        ClickOutcome::AccessoryAdded { accessory_id, .. } => accessory_id,
        other => panic!("expected accessory, got {:?}", other),
    };
    assert_eq!(editor.totals().accessory_totals["Vents"]["(blank)"], 1);

    // Grab and drag it, staying inside the plane
    assert!(matches!(
        editor
            .pointer_down(Point::new(152.0, 150.0), PointerButton::Primary)
            .unwrap(),
        ClickOutcome::AccessorySelected { .. }
    ));
    editor.pointer_move(Point::new(250.0, 250.0)).unwrap();
    editor.pointer_move(Point::new(900.0, 900.0)).unwrap();
    editor.pointer_up(Point::new(900.0, 900.0)).unwrap();
    let plane = editor.plane(&id).unwrap();
    assert_eq!(
        plane.accessory(&accessory_id).unwrap().position,
        Point::new(250.0, 250.0)
    );

    assert_eq!(
        editor
            .add_accessory_named(&id, Point::new(120.0, 120.0), "chimney")
            .unwrap(),
        None
    );
    editor.remove_accessory(&accessory_id).unwrap();
    assert!(editor.totals().accessory_totals.is_empty());
}

#[test]
fn test_move_layer_renumbers() {
    let mut editor = editor();
    let a = editor.active_layer_id().clone();
    let b = editor.add_layer();
    let c = editor.add_layer();

    editor.move_layer(&c, -5).unwrap();
    let order: Vec<_> = editor.layers().iter().map(|l| (l.id.clone(), l.order)).collect();
    assert_eq!(order, vec![(c.clone(), 0), (a.clone(), 1), (b.clone(), 2)]);

    editor.rename_layer(&a, "Garage").unwrap();
    assert!(editor.set_active_layer(&"missing".into()).is_err());
}

#[test]
fn test_delete_plane_clears_selection() {
    let mut editor = editor();
    let id = draw_polygon(&mut editor, &LEFT);
    assert!(editor.delete_selected().is_some());
    assert!(editor.planes().is_empty());
    assert!(editor.selected_plane().is_none());
    assert!(editor.delete_plane(&id).is_err());
}

#[test]
fn test_snapshot_restore_before_viewport() {
    let mut source = editor();
    draw_polygon(&mut source, &LEFT);
    source.set_rotation(30.0).unwrap();
    source.set_scale(ScaleReference::with_gsd(0.1));
    let snapshot = source.to_snapshot();

    let mut restored = EditorState::default();
    restored.restore(snapshot.clone());
    assert_eq!(restored.planes(), source.planes());
    assert_eq!(restored.totals(), source.totals());
    assert_eq!(restored.active_layer_id(), source.active_layer_id());
    assert!(restored.viewport().is_none());

    restored.set_image(1000.0, 1000.0, 1000.0, 1000.0).unwrap();
    assert_eq!(restored.viewport().unwrap().angle_deg(), 30.0);
}

#[test]
fn test_fit_actions_keep_labels_by_index() {
    let mut editor = editor();
    let id = draw_polygon(&mut editor, &LEFT);
    editor.assign_edge_type(&id, 0, EdgeType::Eave).unwrap();

    editor.fit_triangle(&id).unwrap();
    let plane = editor.plane(&id).unwrap();
    assert_eq!(plane.ring().len(), 3);
    assert_eq!(plane.edges().len(), 3);
    assert_eq!(plane.edges()[0], EdgeType::Eave);

    editor.fit_rectangle(&id).unwrap();
    let plane = editor.plane(&id).unwrap();
    assert_eq!(plane.ring().len(), 4);
    assert_eq!(plane.edges()[0], EdgeType::Eave);
    assert_eq!(plane.edges()[3], EdgeType::Unknown);

    assert!(editor.orthogonalize(&"missing".into()).is_err());
}

#[test]
fn test_configured_minimum_area_applies_to_all_ring_edits() {
    let mut editor = EditorState::new(EditorConfig {
        min_plane_area_px2: 50_000.0,
        ..Default::default()
    });
    editor.set_image(1000.0, 1000.0, 1000.0, 1000.0).unwrap();

    // 200 x 200 is below the configured minimum
    for &(x, y) in &LEFT {
        click(&mut editor, x, y).unwrap();
    }
    let err = click(&mut editor, 100.0, 100.0).unwrap_err();
    assert!(err.is_geometry_error());
    assert!(editor.drawing().is_some());
    editor.cancel_drawing();

    let id = draw_polygon(
        &mut editor,
        &[(100.0, 100.0), (400.0, 100.0), (400.0, 400.0), (100.0, 400.0)],
    );

    // Pulling a corner inward leaves 15000 px2
    let err = editor
        .move_vertex(&id, 2, Point::new(150.0, 150.0))
        .unwrap_err();
    assert!(err.is_geometry_error());
    assert_eq!(editor.plane(&id).unwrap().ring()[2], Point::new(400.0, 400.0));
}
