//! Drawing session actions for editor state.

use super::{ClickOutcome, EditorState, Interaction};
use crate::drawing::{DrawStep, DrawingSession};
use crate::model::{Plane, PlaneId, Point};
use crate::snapping::{self, SnapContext, SnapResult};
use crate::topology::TopologyValidator;
use roofkit_core::EditError;

impl EditorState {
    /// Closure and vertex snap radius in image pixels.
    fn closure_tolerance(&self) -> Result<f64, EditError> {
        Ok(self.config.snap.vertex_tolerance_px * self.world_per_px()?)
    }

    /// Resolve a world point against the scene and the current drawing.
    pub fn snap(&self, world: Point) -> Result<SnapResult, EditError> {
        let world_per_px = self.world_per_px()?;
        let drawing = self.drawing().map(|s| s.points()).unwrap_or(&[]);
        let ctx = SnapContext::new(&self.planes, drawing, world_per_px);
        Ok(snapping::resolve(world, &ctx, &self.config.snap))
    }

    /// Draw-mode click: start a session or extend the current one.
    pub(super) fn draw_click(&mut self, world: Point) -> roofkit_core::Result<ClickOutcome> {
        let snap = self.snap(world)?;
        let closure = self.closure_tolerance()?;
        let validator = TopologyValidator::new(&self.planes, &self.active_layer_id);

        let step = match &mut self.interaction {
            Interaction::Drawing(session) => {
                session.push(snap, &validator, closure, self.config.min_segment_px)
            }
            _ => {
                let session =
                    DrawingSession::start(self.active_layer_id.clone(), snap, &validator)
                        .inspect_err(|e| tracing::warn!("Drawing start rejected: {}", e))?;
                tracing::debug!(layer = %self.active_layer_id, "Drawing started");
                self.interaction = Interaction::Drawing(session);
                self.selected_plane = None;
                return Ok(ClickOutcome::DrawingStarted);
            }
        };

        match step {
            Ok(DrawStep::Appended) => Ok(ClickOutcome::PointAdded),
            Ok(DrawStep::Ignored) => Ok(ClickOutcome::PointIgnored),
            Ok(DrawStep::Close) => self.finish_drawing(),
            Err(e) => {
                tracing::warn!("Point rejected: {}", e);
                Err(e.into())
            }
        }
    }

    /// Commit the drawing as a new plane.
    ///
    /// On failure the session is kept so the user can undo or keep drawing.
    pub fn finish_drawing(&mut self) -> roofkit_core::Result<ClickOutcome> {
        let closure = self.closure_tolerance()?;
        let Interaction::Drawing(session) = &self.interaction else {
            return Err(EditError::NoDrawingSession.into());
        };

        let layer_id = session.layer_id().clone();
        let validator = TopologyValidator::new(&self.planes, &layer_id);
        let ring = session
            .finish(
                &self.planes,
                &validator,
                closure,
                self.config.min_plane_area_px2,
            )
            .inspect_err(|e| tracing::warn!("Plane rejected: {}", e))?;

        let plane = Plane::with_min_area(
            PlaneId::generate(),
            layer_id,
            ring,
            self.config.default_pitch,
            self.config.min_plane_area_px2,
        )?;
        let id = plane.id().clone();
        tracing::debug!(plane = %id, vertices = plane.ring().len(), "Plane created");

        self.planes.push(plane);
        self.interaction = Interaction::Idle;
        self.preview = None;
        self.selected_plane = Some(id.clone());
        self.recompute_totals();
        Ok(ClickOutcome::PlaneCreated(id))
    }

    /// Remove the last drawn point; an emptied session is discarded.
    pub fn undo_point(&mut self) -> ClickOutcome {
        let Interaction::Drawing(session) = &mut self.interaction else {
            return ClickOutcome::Nothing;
        };
        if session.undo() {
            self.interaction = Interaction::Idle;
            self.preview = None;
            ClickOutcome::DrawingCancelled
        } else {
            ClickOutcome::PointRemoved
        }
    }

    pub fn cancel_drawing(&mut self) -> ClickOutcome {
        if self.drawing().is_none() {
            return ClickOutcome::Nothing;
        }
        self.interaction = Interaction::Idle;
        self.preview = None;
        ClickOutcome::DrawingCancelled
    }
}
