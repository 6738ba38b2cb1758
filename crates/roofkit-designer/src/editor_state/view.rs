//! Viewport setup, zoom, pan and rotation for editor state.

use super::{apply_view, EditorState};
use crate::model::Point;
use crate::viewport::Viewport;
use roofkit_core::EditError;

impl EditorState {
    /// Initialise the viewport once imagery and container dimensions are
    /// known. A view restored from a snapshot earlier is applied now.
    pub fn set_image(
        &mut self,
        image_width: f64,
        image_height: f64,
        container_width: f64,
        container_height: f64,
    ) -> Result<(), EditError> {
        let mut viewport = Viewport::new(
            image_width,
            image_height,
            container_width,
            container_height,
        )?
        .with_zoom_limits(self.config.max_zoom, self.config.zoom_sensitivity);
        if let Some(view) = self.pending_view.take() {
            apply_view(&mut viewport, &view);
        }
        tracing::debug!(%viewport, "Viewport initialised");
        self.viewport = Some(viewport);
        Ok(())
    }

    pub fn resize_container(&mut self, width: f64, height: f64) -> Result<(), EditError> {
        self.viewport
            .as_mut()
            .ok_or(EditError::ViewportUninitialized)?
            .set_container_size(width, height)
    }

    pub fn screen_to_world(&self, screen: Point) -> Result<Point, EditError> {
        Ok(self.require_viewport()?.screen_to_world(screen))
    }

    pub fn world_to_screen(&self, world: Point) -> Result<Point, EditError> {
        Ok(self.require_viewport()?.world_to_screen(world))
    }

    /// Wheel zoom centred on the cursor.
    pub fn zoom_at(&mut self, screen: Point, wheel_delta: f64) -> Result<(), EditError> {
        self.viewport_mut()?.zoom_at(screen, wheel_delta);
        Ok(())
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Result<(), EditError> {
        self.viewport_mut()?.pan_by_screen(dx, dy);
        Ok(())
    }

    pub fn set_rotation(&mut self, angle_deg: f64) -> Result<(), EditError> {
        self.viewport_mut()?.set_angle(angle_deg);
        Ok(())
    }

    pub fn rotate_by(&mut self, delta_deg: f64) -> Result<(), EditError> {
        self.viewport_mut()?.rotate_by(delta_deg);
        Ok(())
    }

    /// Fit the whole image again. Rotation is kept.
    pub fn reset_view(&mut self) -> Result<(), EditError> {
        self.viewport_mut()?.reset();
        Ok(())
    }

    fn viewport_mut(&mut self) -> Result<&mut Viewport, EditError> {
        self.viewport.as_mut().ok_or(EditError::ViewportUninitialized)
    }

    /// Image pixels per screen pixel at the current zoom.
    pub(super) fn world_per_px(&self) -> Result<f64, EditError> {
        Ok(self.require_viewport()?.world_units_per_screen_px())
    }
}
