//! # RoofKit Designer
//!
//! Roof-plane measurement and annotation engine: a polygon editor over a
//! georeferenced raster image that turns hand-drawn roof facets into
//! slope-corrected real-world measurements.
//!
//! ## Core Components
//!
//! - **Viewport**: screen/world mapping under pan, zoom and rotation
//! - **Geometry**: containment, intersection, area, hull and ring fits
//! - **Snapping**: vertex, edge, orientation, axis and grid snaps
//! - **Topology**: no-overlap rule between planes of one layer
//! - **Drawing**: click sequence to ring, with auto-close and shared-ring
//!   completion
//! - **Annotation / Accessories**: edge labels, pitch and point markers
//! - **Measurement**: squares, perimeter, per-type footage, accessory counts
//! - **Serialization**: snapshots for save and restore
//!
//! ## Architecture
//!
//! ```text
//! pointer event
//!   └── Viewport (screen -> world)
//!         └── Snapping
//!               └── Drawing / Annotation / Accessories
//!                     └── Topology (gate)
//!                           └── Measurement
//!                                 └── Snapshot
//! ```
//!
//! Everything below [`EditorState`] is plain data and pure functions; the
//! state container owns the interaction state machine.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roofkit_designer::{EditorState, EditorMode, PointerButton, Point};
//!
//! let mut editor = EditorState::default();
//! editor.set_image(1024.0, 768.0, 1024.0, 768.0)?;
//! editor.pointer_down(Point::new(100.0, 100.0), PointerButton::Primary)?;
//! ```

pub mod accessories;
pub mod annotation;
pub mod drawing;
pub mod editor_state;
pub mod geometry;
pub mod measurement;
pub mod model;
pub mod serialization;
pub mod snapping;
pub mod topology;
pub mod viewport;

pub use accessories::{accessory_breakdown, AccessoryBreakdown, AccessoryHit};
pub use annotation::{pick_edge, plane_at, EdgeHit};
pub use drawing::{DrawStep, DrawingSession};
pub use editor_state::{
    ClickOutcome, EditorConfig, EditorMode, EditorState, Interaction, PointerButton,
};
pub use measurement::{
    compute_totals, AreaBasis, MeasurementTotals, PlaneMeasurement, ScaleReference,
};
pub use model::{
    Accessory, AccessoryData, AccessoryId, AccessoryKind, AccessoryPayload, EdgeType, Layer,
    LayerId, Plane, PlaneId, Point,
};
pub use serialization::{Snapshot, ViewState};
pub use snapping::{SnapConfig, SnapResult, SnapTarget, VertexRef};
pub use topology::TopologyValidator;
pub use viewport::{ViewBox, Viewport};
