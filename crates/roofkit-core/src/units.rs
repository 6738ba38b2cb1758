//! Unit conversion utilities
//!
//! Imagery is georeferenced by a ground-sample-distance in meters per pixel,
//! while roofing takeoffs are reported in feet and squares.

/// Feet in one meter
pub const FEET_PER_METER: f64 = 3.28084;

/// Square feet in one square meter
pub const SQUARE_FEET_PER_SQUARE_METER: f64 = 10.7639;

/// Square feet in one roofing square
pub const SQUARE_FEET_PER_SQUARE: f64 = 100.0;

/// Convert meters to feet
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Convert a pixel length to feet using a ground-sample-distance in m/px
pub fn px_length_to_feet(length_px: f64, gsd_m_per_px: f64) -> f64 {
    meters_to_feet(length_px * gsd_m_per_px)
}

/// Convert a pixel area to square feet using a ground-sample-distance in m/px
pub fn px_area_to_square_feet(area_px2: f64, gsd_m_per_px: f64) -> f64 {
    area_px2 * gsd_m_per_px * gsd_m_per_px * SQUARE_FEET_PER_SQUARE_METER
}

/// Convert square feet to roofing squares
pub fn square_feet_to_squares(square_feet: f64) -> f64 {
    square_feet / SQUARE_FEET_PER_SQUARE
}

/// Format a length in feet for display
///
/// Lengths are shown with one decimal place, e.g. `36.7 ft`.
pub fn format_feet(feet: f64) -> String {
    format!("{:.1} ft", feet)
}
