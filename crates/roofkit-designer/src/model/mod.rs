//! Data model of the roof editor: points, identifiers, planes, layers,
//! edge labels and accessories.
//!
//! All coordinates live in image-pixel ("world") space. Geometry is stored
//! unrotated; the viewport applies rotation only for display and pointer
//! conversion.

use serde::{Deserialize, Serialize};
use std::fmt;

mod accessory;
mod edge;
mod layer;
mod plane;

pub use accessory::{Accessory, AccessoryData, AccessoryKind, AccessoryPayload};
pub use edge::EdgeType;
pub use layer::{layer_name_for_index, Layer};
pub use plane::Plane;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Round both coordinates to a multiple of `step`.
    pub fn rounded(&self, step: f64) -> Point {
        Point::new(
            (self.x / step).round() * step,
            (self.y / step).round() * step,
        )
    }
}

/// Rotate `p` about `center` by `angle_deg` degrees (clockwise on screen,
/// since image y grows downwards).
pub fn rotate_point(p: Point, center: Point, angle_deg: f64) -> Point {
    let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(
        center.x + dx * cos_a - dy * sin_a,
        center.y + dx * sin_a + dy * cos_a,
    )
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Fresh random id.
            pub fn generate() -> Self {
                Self(format!("{}{}", $prefix, uuid::Uuid::new_v4().simple()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a roof plane.
    PlaneId,
    "U"
);
string_id!(
    /// Identifier of a layer.
    LayerId,
    "L"
);
string_id!(
    /// Identifier of an accessory marker.
    AccessoryId,
    "acc_"
);
