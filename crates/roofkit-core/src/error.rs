//! Error handling for RoofKit
//!
//! Provides error types for each layer of the editor:
//! - Geometry errors (degenerate or invalid rings)
//! - Topology errors (same-layer overlaps)
//! - Edit errors (invalid targets and arguments of editor actions)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised when a ring cannot become a plane. Rejection happens before the
/// ring reaches the plane set, so no invalid plane is ever created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Ring has fewer than three distinct points
    #[error("Ring needs at least 3 distinct points, got {count}")]
    TooFewPoints {
        /// Number of distinct points supplied.
        count: usize,
    },

    /// Ring area is below the minimum plane area
    #[error("Ring area {area:.4} px² is below the minimum of {min_area} px²")]
    DegenerateArea {
        /// Absolute ring area in square pixels.
        area: f64,
        /// Minimum accepted area in square pixels.
        min_area: f64,
    },

    /// Two non-adjacent ring edges intersect
    #[error("Ring intersects itself at edges {first} and {second}")]
    SelfIntersecting {
        /// Index of the first offending edge.
        first: usize,
        /// Index of the second offending edge.
        second: usize,
    },

    /// Two consecutive vertices coincide
    #[error("Ring repeats vertex {index}")]
    DuplicateVertex {
        /// Index of the repeated vertex.
        index: usize,
    },

    /// A coordinate is NaN or infinite
    #[error("Ring contains a non-finite coordinate at index {index}")]
    NonFinite {
        /// Index of the offending vertex.
        index: usize,
    },
}

/// Topology error type
///
/// Raised when an edit would make two planes on the same layer overlap.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// A drawn segment passes through another plane
    #[error("Segment crosses plane {plane_id}")]
    SegmentCrossesPlane {
        /// Id of the plane that would be crossed.
        plane_id: String,
    },

    /// A ring overlaps another plane
    #[error("Ring overlaps plane {plane_id}")]
    RingOverlapsPlane {
        /// Id of the overlapped plane.
        plane_id: String,
    },

    /// A point lies strictly inside another plane
    #[error("Point lies inside plane {plane_id}")]
    PointInsidePlane {
        /// Id of the plane containing the point.
        plane_id: String,
    },
}

impl TopologyError {
    /// Id of the plane the violation was detected against
    pub fn plane_id(&self) -> &str {
        match self {
            TopologyError::SegmentCrossesPlane { plane_id }
            | TopologyError::RingOverlapsPlane { plane_id }
            | TopologyError::PointInsidePlane { plane_id } => plane_id,
        }
    }
}

/// Edit error type
///
/// Represents invalid targets or arguments passed to editor actions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// No plane with this id
    #[error("Plane not found: {id}")]
    PlaneNotFound {
        /// The missing plane id.
        id: String,
    },

    /// No layer with this id
    #[error("Layer not found: {id}")]
    LayerNotFound {
        /// The missing layer id.
        id: String,
    },

    /// No accessory with this id
    #[error("Accessory not found: {id}")]
    AccessoryNotFound {
        /// The missing accessory id.
        id: String,
    },

    /// Edge index outside the plane's ring
    #[error("Edge index {index} out of range for plane {plane_id} with {edge_count} edges")]
    EdgeOutOfRange {
        /// The plane id.
        plane_id: String,
        /// The requested edge index.
        index: usize,
        /// Number of edges on the plane.
        edge_count: usize,
    },

    /// Pitch is negative or not finite
    #[error("Invalid pitch {pitch}: must be a finite value >= 0")]
    InvalidPitch {
        /// The rejected pitch.
        pitch: f64,
    },

    /// Accessory position is outside its plane
    #[error("Accessory position is outside plane {plane_id}")]
    AccessoryOutsidePlane {
        /// The owning plane id.
        plane_id: String,
    },

    /// Accessory payload does not match the accessory kind
    #[error("Accessory {id} is a {expected}, cannot store {actual} data")]
    AccessoryKindMismatch {
        /// The accessory id.
        id: String,
        /// Kind of the existing accessory.
        expected: String,
        /// Kind of the supplied payload.
        actual: String,
    },

    /// Accessory has an unrecognized type and cannot be edited
    #[error("Accessory {id} has unrecognized type {kind} and is read-only")]
    AccessoryNotEditable {
        /// The accessory id.
        id: String,
        /// Raw type name of the accessory.
        kind: String,
    },

    /// Geometry operation attempted before imagery dimensions are known
    #[error("Viewport is not initialized")]
    ViewportUninitialized,

    /// Imagery or container dimensions are unusable
    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Supplied width.
        width: f64,
        /// Supplied height.
        height: f64,
    },

    /// Action requires an active drawing session
    #[error("No drawing session in progress")]
    NoDrawingSession,
}

/// Main error type for RoofKit
///
/// A unified error type that can represent any error from the editor core.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Topology error
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// Edit error
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this rejection came from the topology validator
    pub fn is_topology_error(&self) -> bool {
        matches!(self, Error::Topology(_))
    }

    /// Check if this rejection came from ring validation
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is an edit error
    pub fn is_edit_error(&self) -> bool {
        matches!(self, Error::Edit(_))
    }
}

/// Result type alias for RoofKit operations
pub type Result<T> = std::result::Result<T, Error>;
