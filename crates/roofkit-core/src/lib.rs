//! # RoofKit Core
//!
//! Core types and utilities shared by every RoofKit crate: the error
//! taxonomy, real-world unit conversions and the default tolerances used
//! by the editor.

pub mod constants;
pub mod error;
pub mod units;

pub use error::{EditError, Error, GeometryError, Result, TopologyError};
pub use units::{
    format_feet, meters_to_feet, px_area_to_square_feet, px_length_to_feet, square_feet_to_squares,
    FEET_PER_METER, SQUARE_FEET_PER_SQUARE, SQUARE_FEET_PER_SQUARE_METER,
};
