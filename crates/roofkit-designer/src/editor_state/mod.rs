//! Editor state container.
//!
//! Owns the plane set, layers, viewport and the current pointer interaction,
//! and exposes every edit as a named action. Totals are recomputed whenever
//! the plane set changes.
//!
//! This module is split into submodules:
//! - `pointer`: pointer and wheel event routing
//! - `drawing`: drawing session actions
//! - `planes`: plane, annotation and accessory edits
//! - `layers`: layer management
//! - `view`: viewport setup, zoom, pan and rotation

mod drawing;
mod layers;
mod planes;
mod pointer;
mod view;

use std::fmt;

use crate::drawing::DrawingSession;
use crate::measurement::{compute_totals, MeasurementTotals, ScaleReference};
use crate::model::{
    layer_name_for_index, AccessoryId, AccessoryKind, EdgeType, Layer, LayerId, Plane, PlaneId,
    Point,
};
use crate::serialization::{Snapshot, ViewState};
use crate::snapping::{SnapConfig, SnapResult};
use crate::viewport::Viewport;
use roofkit_core::constants;
use roofkit_core::EditError;
use serde::{Deserialize, Serialize};

/// Editor interaction mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Draw,
    Label,
    Pitch,
    Accessories,
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditorMode::Draw => "draw",
            EditorMode::Label => "label",
            EditorMode::Pitch => "pitch",
            EditorMode::Accessories => "accessories",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// In-progress pointer interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Idle,
    Drawing(DrawingSession),
    DraggingVertex {
        plane_id: PlaneId,
        index: usize,
        moved: bool,
    },
    DraggingPlane {
        plane_id: PlaneId,
        last_world: Point,
        moved: bool,
    },
    DraggingAccessory {
        plane_id: PlaneId,
        accessory_id: AccessoryId,
    },
    /// Panning; a drawing session interrupted by the pan resumes afterwards.
    Panning {
        last_screen: Point,
        resume: Option<Box<DrawingSession>>,
    },
}

/// Tolerances and defaults used by the editor. Screen-space values are
/// converted through the viewport scale at the point of use.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub snap: SnapConfig,
    pub label_tolerance_px: f64,
    pub accessory_hit_radius_px: f64,
    pub plane_grab_radius_px: f64,
    pub min_segment_px: f64,
    pub min_plane_area_px2: f64,
    pub default_pitch: f64,
    pub max_zoom: f64,
    pub zoom_sensitivity: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            label_tolerance_px: constants::LABEL_TOLERANCE_PX,
            accessory_hit_radius_px: constants::ACCESSORY_HIT_RADIUS_PX,
            plane_grab_radius_px: constants::PLANE_GRAB_RADIUS_PX,
            min_segment_px: constants::MIN_SEGMENT_PX,
            min_plane_area_px2: constants::MIN_PLANE_AREA_PX2,
            default_pitch: constants::DEFAULT_PITCH,
            max_zoom: constants::MAX_ZOOM,
            zoom_sensitivity: constants::ZOOM_SENSITIVITY,
        }
    }
}

/// What a pointer action did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Nothing,
    DrawingStarted,
    PointAdded,
    PointIgnored,
    PointRemoved,
    DrawingCancelled,
    PlaneCreated(PlaneId),
    PlaneSelected(PlaneId),
    EdgeLabeled {
        plane_id: PlaneId,
        edge_index: usize,
        edge_type: EdgeType,
    },
    PitchApplied {
        plane_id: PlaneId,
        pitch: f64,
    },
    AccessoryAdded {
        plane_id: PlaneId,
        accessory_id: AccessoryId,
    },
    AccessorySelected {
        plane_id: PlaneId,
        accessory_id: AccessoryId,
    },
    DragStarted,
    DragFinished,
    PanStarted,
    PanFinished,
}

/// Roof editor state.
#[derive(Debug, Clone)]
pub struct EditorState {
    planes: Vec<Plane>,
    layers: Vec<Layer>,
    active_layer_id: LayerId,
    viewport: Option<Viewport>,
    /// View restored from a snapshot before the viewport existed.
    pending_view: Option<ViewState>,
    mode: EditorMode,
    interaction: Interaction,
    pub config: EditorConfig,
    /// Label applied by clicks in label mode.
    pub current_edge_type: EdgeType,
    /// Pitch applied by clicks in pitch mode.
    pub current_pitch: f64,
    /// Kind placed by clicks in accessories mode.
    pub current_accessory: AccessoryKind,
    selected_plane: Option<PlaneId>,
    selected_accessory: Option<(PlaneId, AccessoryId)>,
    preview: Option<SnapResult>,
    scale: ScaleReference,
    totals: MeasurementTotals,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    /// Creates an empty editor with a single layer "A".
    pub fn new(config: EditorConfig) -> Self {
        let layer = Layer::new(LayerId::generate(), layer_name_for_index(0), 0);
        let current_pitch = config.default_pitch;
        Self {
            planes: Vec::new(),
            active_layer_id: layer.id.clone(),
            layers: vec![layer],
            viewport: None,
            pending_view: None,
            mode: EditorMode::Draw,
            interaction: Interaction::Idle,
            config,
            current_edge_type: EdgeType::Eave,
            current_pitch,
            current_accessory: AccessoryKind::Skylight,
            selected_plane: None,
            selected_accessory: None,
            preview: None,
            scale: ScaleReference::default(),
            totals: MeasurementTotals::default(),
        }
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn plane(&self, id: &PlaneId) -> Option<&Plane> {
        self.planes.iter().find(|p| p.id() == id)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn active_layer_id(&self) -> &LayerId {
        &self.active_layer_id
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// The drawing session in progress, if any.
    pub fn drawing(&self) -> Option<&DrawingSession> {
        match &self.interaction {
            Interaction::Drawing(session) => Some(session),
            Interaction::Panning {
                resume: Some(session),
                ..
            } => Some(session),
            _ => None,
        }
    }

    pub fn selected_plane(&self) -> Option<&PlaneId> {
        self.selected_plane.as_ref()
    }

    pub fn selected_accessory(&self) -> Option<&(PlaneId, AccessoryId)> {
        self.selected_accessory.as_ref()
    }

    /// Snapped position of the pointer while drawing.
    pub fn preview(&self) -> Option<&SnapResult> {
        self.preview.as_ref()
    }

    pub fn totals(&self) -> &MeasurementTotals {
        &self.totals
    }

    pub fn scale(&self) -> &ScaleReference {
        &self.scale
    }

    pub fn set_scale(&mut self, scale: ScaleReference) {
        self.scale = scale;
        self.recompute_totals();
    }

    /// Switch modes. An active drawing session is discarded.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.mode == mode {
            return;
        }
        if self.drawing().is_some() {
            tracing::debug!(from = %self.mode, to = %mode, "Mode change cancels drawing");
        }
        self.interaction = Interaction::Idle;
        self.preview = None;
        self.mode = mode;
    }

    /// Replace totals with authoritative values from the recompute service.
    pub fn apply_remote_totals(&mut self, totals: MeasurementTotals) {
        self.totals = totals;
    }

    /// Recompute totals locally from the current planes.
    pub fn recompute_totals(&mut self) -> &MeasurementTotals {
        self.totals = compute_totals(&self.planes, &self.scale);
        &self.totals
    }

    fn plane_index(&self, id: &PlaneId) -> Result<usize, EditError> {
        self.planes
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| EditError::PlaneNotFound { id: id.to_string() })
    }

    fn require_viewport(&self) -> Result<&Viewport, EditError> {
        self.viewport.as_ref().ok_or(EditError::ViewportUninitialized)
    }

    /// Capture the full state.
    pub fn to_snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new(
            self.planes.clone(),
            self.layers.clone(),
            self.active_layer_id.clone(),
        );
        snapshot.view = ViewState {
            view_box: self.viewport.as_ref().map(|v| v.view_box()),
            angle_deg: self.viewport.as_ref().map_or(0.0, |v| v.angle_deg()),
            mode: self.mode,
        };
        snapshot.totals = Some(self.totals.clone());
        snapshot
    }

    /// Replace the whole state with a snapshot. Any interaction in progress
    /// is discarded.
    pub fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot {
            planes,
            mut layers,
            active_layer_id,
            view,
            totals,
            ..
        } = snapshot;

        for plane in &planes {
            if !layers.iter().any(|l| l.id == *plane.layer_id()) {
                let order = layers.len() as u32;
                layers.push(Layer::new(
                    plane.layer_id().clone(),
                    layer_name_for_index(layers.len()),
                    order,
                ));
            }
        }
        if layers.is_empty() {
            layers.push(Layer::new(LayerId::generate(), layer_name_for_index(0), 0));
        }
        layers.sort_by_key(|l| l.order);

        self.active_layer_id = if layers.iter().any(|l| l.id == active_layer_id) {
            active_layer_id
        } else {
            layers[0].id.clone()
        };
        self.planes = planes;
        self.layers = layers;
        self.interaction = Interaction::Idle;
        self.preview = None;
        self.selected_plane = None;
        self.selected_accessory = None;
        self.mode = view.mode;

        match self.viewport.as_mut() {
            Some(viewport) => {
                apply_view(viewport, &view);
                self.pending_view = None;
            }
            None => self.pending_view = Some(view),
        }

        match totals {
            Some(totals) => self.totals = totals,
            None => {
                self.recompute_totals();
            }
        }
        tracing::info!(
            planes = self.planes.len(),
            layers = self.layers.len(),
            "Snapshot restored"
        );
    }
}

fn apply_view(viewport: &mut Viewport, view: &ViewState) {
    viewport.set_angle(view.angle_deg);
    match view.view_box {
        Some(view_box) => viewport.set_view_box(view_box),
        None => viewport.reset(),
    }
}
