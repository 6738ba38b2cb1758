//! Default tolerances and limits for the roof editor.
//!
//! Screen-space values are in CSS pixels and get converted to image pixels
//! through the current viewport scale at the point of use.

/// Radius within which a pointer snaps to an existing vertex.
pub const VERTEX_SNAP_PX: f64 = 6.0;

/// Distance within which a pointer snaps onto an existing edge.
pub const SEGMENT_SNAP_PX: f64 = 10.0;

/// Tolerance for orientation and axis alignment snaps.
pub const ALIGNMENT_SNAP_PX: f64 = 4.0;

/// Spacing of the fallback snapping grid, in image pixels.
pub const GRID_SPACING_PX: f64 = 25.0;

/// Fraction of the alignment tolerance applied to the grid.
pub const GRID_TOLERANCE_FACTOR: f64 = 0.75;

/// Width of the angle buckets used to deduplicate snap directions.
pub const ANGLE_BUCKET_DEG: f64 = 5.0;

/// Maximum number of distinct snap directions considered.
pub const MAX_SNAP_DIRECTIONS: usize = 24;

/// Edge pick tolerance in label mode.
pub const LABEL_TOLERANCE_PX: f64 = 18.0;

/// Hit radius for accessory markers.
pub const ACCESSORY_HIT_RADIUS_PX: f64 = 10.0;

/// Radius around a plane's centroid that grabs the whole plane for dragging.
pub const PLANE_GRAB_RADIUS_PX: f64 = 28.0;

/// Points closer than this to the previous point are ignored while drawing.
pub const MIN_SEGMENT_PX: f64 = 1.0;

/// Smallest ring area accepted as a plane, in square image pixels.
pub const MIN_PLANE_AREA_PX2: f64 = 1e-2;

/// Pitch assigned to freshly drawn planes (6/12).
pub const DEFAULT_PITCH: f64 = 6.0;

/// Upper bound for the zoom factor relative to the initial fit.
pub const MAX_ZOOM: f64 = 8.0;

/// Exponential zoom rate per unit of wheel delta.
pub const ZOOM_SENSITIVITY: f64 = 0.0015;

/// Distance under which a point is considered to lie on a boundary.
pub const BOUNDARY_EPSILON: f64 = 1e-3;

/// Midpoint tolerance used to detect edges shared by two planes.
pub const SHARED_EDGE_TOLERANCE_PX: f64 = 0.5;

/// Number of snapshots kept by the local fallback store.
pub const LOCAL_SNAPSHOT_CAPACITY: usize = 50;
