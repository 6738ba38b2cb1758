//! Viewport and coordinate transformation between screen and image space.
//!
//! World coordinates are image pixels (0,0 at the top-left of the source
//! image, +Y down). The viewport shows a `ViewBox` window of the image,
//! rotated about the image centre, stretched over the container.
//!
//! Geometry is always stored unrotated; rotation is applied only when
//! mapping between the two spaces.

use std::fmt;

use crate::model::{rotate_point, Point};
use roofkit_core::constants::{MAX_ZOOM, ZOOM_SENSITIVITY};
use roofkit_core::EditError;
use serde::{Deserialize, Serialize};

/// Visible window of the (rotated) image, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Represents the viewport transformation state (view box and rotation).
#[derive(Debug, Clone)]
pub struct Viewport {
    image_width: f64,
    image_height: f64,
    container_width: f64,
    container_height: f64,
    view_box: ViewBox,
    angle_deg: f64,
    max_zoom: f64,
    zoom_sensitivity: f64,
}

fn check_dimensions(width: f64, height: f64) -> Result<(), EditError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(EditError::InvalidDimensions { width, height })
    }
}

impl Viewport {
    /// Creates a viewport showing the whole image.
    ///
    /// Fails when either the image or the container has a non-positive or
    /// non-finite dimension; callers defer initialization until both are known.
    pub fn new(
        image_width: f64,
        image_height: f64,
        container_width: f64,
        container_height: f64,
    ) -> Result<Self, EditError> {
        check_dimensions(image_width, image_height)?;
        check_dimensions(container_width, container_height)?;
        Ok(Self {
            image_width,
            image_height,
            container_width,
            container_height,
            view_box: ViewBox::new(0.0, 0.0, image_width, image_height),
            angle_deg: 0.0,
            max_zoom: MAX_ZOOM,
            zoom_sensitivity: ZOOM_SENSITIVITY,
        })
    }

    /// Overrides the zoom ceiling and wheel sensitivity.
    pub fn with_zoom_limits(mut self, max_zoom: f64, zoom_sensitivity: f64) -> Self {
        self.max_zoom = max_zoom.max(1.0);
        self.zoom_sensitivity = zoom_sensitivity;
        self
    }

    /// Gets the image dimensions.
    pub fn image_size(&self) -> (f64, f64) {
        (self.image_width, self.image_height)
    }

    /// Gets the container dimensions.
    pub fn container_size(&self) -> (f64, f64) {
        (self.container_width, self.container_height)
    }

    /// Sets the container dimensions (typically called when the window resizes).
    pub fn set_container_size(&mut self, width: f64, height: f64) -> Result<(), EditError> {
        check_dimensions(width, height)?;
        self.container_width = width;
        self.container_height = height;
        Ok(())
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Restores a view box, clamped to the zoom range and image bounds.
    pub fn set_view_box(&mut self, view_box: ViewBox) {
        let zoom = if view_box.width > 0.0 && view_box.width.is_finite() {
            self.image_width / view_box.width
        } else {
            1.0
        };
        let zoom = zoom.clamp(1.0, self.max_zoom);
        self.view_box = ViewBox::new(
            view_box.x,
            view_box.y,
            self.image_width / zoom,
            self.image_height / zoom,
        );
        self.clamp_view_box();
    }

    /// Gets the rotation in degrees.
    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    /// Sets the rotation, normalized to `[0, 360)`.
    pub fn set_angle(&mut self, angle_deg: f64) {
        if angle_deg.is_finite() {
            self.angle_deg = angle_deg.rem_euclid(360.0);
        }
    }

    pub fn rotate_by(&mut self, delta_deg: f64) {
        self.set_angle(self.angle_deg + delta_deg);
    }

    /// Centre of rotation: the geometric centre of the image.
    pub fn image_center(&self) -> Point {
        Point::new(self.image_width / 2.0, self.image_height / 2.0)
    }

    /// Current zoom relative to the initial whole-image fit (1.0 = fit).
    pub fn zoom(&self) -> f64 {
        self.image_width / self.view_box.width
    }

    /// Image pixels covered by one screen pixel horizontally.
    pub fn world_units_per_screen_px(&self) -> f64 {
        self.view_box.width / self.container_width
    }

    /// Converts a screen-pixel tolerance into image pixels at the current zoom.
    pub fn screen_tolerance(&self, px: f64) -> f64 {
        px * self.world_units_per_screen_px()
    }

    /// Converts screen coordinates to world (image) coordinates.
    ///
    /// Formula:
    /// ```text
    /// view  = (screen.x * vb.w / cw + vb.x, screen.y * vb.h / ch + vb.y)
    /// world = rotate(view, image_center, -angle)
    /// ```
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let view = Point::new(
            screen.x * self.view_box.width / self.container_width + self.view_box.x,
            screen.y * self.view_box.height / self.container_height + self.view_box.y,
        );
        rotate_point(view, self.image_center(), -self.angle_deg)
    }

    /// Converts world (image) coordinates to screen coordinates.
    ///
    /// Formula:
    /// ```text
    /// view   = rotate(world, image_center, angle)
    /// screen = ((view.x - vb.x) * cw / vb.w, (view.y - vb.y) * ch / vb.h)
    /// ```
    pub fn world_to_screen(&self, world: Point) -> Point {
        let view = rotate_point(world, self.image_center(), self.angle_deg);
        Point::new(
            (view.x - self.view_box.x) * self.container_width / self.view_box.width,
            (view.y - self.view_box.y) * self.container_height / self.view_box.height,
        )
    }

    /// Applies a wheel event at `screen`, zooming by `exp(-delta * sensitivity)`.
    ///
    /// The world point under the cursor stays fixed unless the window has to
    /// be clamped back inside the image.
    pub fn zoom_at(&mut self, screen: Point, wheel_delta: f64) {
        if !wheel_delta.is_finite() {
            return;
        }
        let factor = (-wheel_delta * self.zoom_sensitivity).exp();
        self.set_zoom_at(screen, self.zoom() * factor);
    }

    /// Sets an absolute zoom level, clamped to `[1, max_zoom]`, keeping the
    /// point under `screen` fixed.
    pub fn set_zoom_at(&mut self, screen: Point, zoom: f64) {
        if !zoom.is_finite() || zoom <= 0.0 {
            return;
        }
        let zoom = zoom.clamp(1.0, self.max_zoom);
        let fx = screen.x / self.container_width;
        let fy = screen.y / self.container_height;
        let view_x = self.view_box.x + fx * self.view_box.width;
        let view_y = self.view_box.y + fy * self.view_box.height;

        let width = self.image_width / zoom;
        let height = self.image_height / zoom;
        self.view_box = ViewBox::new(view_x - fx * width, view_y - fy * height, width, height);
        self.clamp_view_box();
    }

    /// Pans by a screen-pixel drag delta. Dragging right moves the window left.
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) {
        self.view_box.x -= dx * self.view_box.width / self.container_width;
        self.view_box.y -= dy * self.view_box.height / self.container_height;
        self.clamp_view_box();
    }

    /// Resets to the whole-image fit. Rotation is kept.
    pub fn reset(&mut self) {
        self.view_box = ViewBox::new(0.0, 0.0, self.image_width, self.image_height);
    }

    fn clamp_view_box(&mut self) {
        let max_x = (self.image_width - self.view_box.width).max(0.0);
        let max_y = (self.image_height - self.view_box.height).max(0.0);
        self.view_box.x = self.view_box.x.clamp(0.0, max_x);
        self.view_box.y = self.view_box.y.clamp(0.0, max_y);
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | View: ({:.1}, {:.1}) | Angle: {:.1}°",
            self.zoom(),
            self.view_box.x,
            self.view_box.y,
            self.angle_deg
        )
    }
}
