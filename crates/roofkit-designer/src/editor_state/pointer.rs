//! Pointer event routing for editor state.
//!
//! Screen coordinates come in, are mapped to world space through the
//! viewport and dispatched by mode. Drags are modelled as explicit
//! [`Interaction`] states so every transition happens in one place.

use super::{ClickOutcome, EditorMode, EditorState, Interaction, PointerButton};
use crate::accessories;
use crate::annotation;
use crate::geometry::polygon_centroid;
use crate::model::Point;
use crate::snapping::{self, SnapContext};

impl EditorState {
    /// Handle a pointer press at `screen`.
    pub fn pointer_down(
        &mut self,
        screen: Point,
        button: PointerButton,
    ) -> roofkit_core::Result<ClickOutcome> {
        let world = self.screen_to_world(screen)?;

        match button {
            PointerButton::Secondary => Ok(self.undo_point()),
            PointerButton::Middle => Ok(self.start_pan(screen)),
            PointerButton::Primary => match self.mode {
                EditorMode::Draw => self.draw_press(world),
                EditorMode::Label => self.label_press(world),
                EditorMode::Pitch => Ok(self.pitch_click(world)),
                EditorMode::Accessories => self.accessory_press(world),
            },
        }
    }

    /// Handle pointer movement to `screen`.
    pub fn pointer_move(&mut self, screen: Point) -> roofkit_core::Result<()> {
        let world = self.screen_to_world(screen)?;

        match self.interaction.clone() {
            Interaction::Idle => {}
            Interaction::Drawing(_) => {
                self.preview = Some(self.snap(world)?);
            }
            Interaction::Panning {
                last_screen,
                resume,
            } => {
                self.interaction = Interaction::Panning {
                    last_screen: screen,
                    resume,
                };
                self.pan_by(screen.x - last_screen.x, screen.y - last_screen.y)?;
            }
            Interaction::DraggingVertex {
                plane_id, index, ..
            } => {
                self.interaction = Interaction::DraggingVertex {
                    plane_id: plane_id.clone(),
                    index,
                    moved: true,
                };
                let ctx = SnapContext::new(&self.planes, &[], self.world_per_px()?)
                    .excluding_vertex(&plane_id, index);
                let target = snapping::resolve(world, &ctx, &self.config.snap).point;
                if let Err(e) = self.move_vertex(&plane_id, index, target) {
                    tracing::debug!("Vertex drag step rejected: {}", e);
                }
            }
            Interaction::DraggingPlane {
                plane_id,
                last_world,
                moved,
            } => {
                let (dx, dy) = (world.x - last_world.x, world.y - last_world.y);
                if dx == 0.0 && dy == 0.0 {
                    return Ok(());
                }
                let applied = match self.translate_plane(&plane_id, dx, dy) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::debug!("Plane drag step rejected: {}", e);
                        false
                    }
                };
                self.interaction = Interaction::DraggingPlane {
                    plane_id,
                    last_world: if applied { world } else { last_world },
                    moved: moved || applied,
                };
            }
            Interaction::DraggingAccessory {
                plane_id,
                accessory_id,
            } => {
                if self.plane(&plane_id).is_some_and(|p| p.contains(world)) {
                    self.move_accessory(&accessory_id, world)?;
                }
            }
        }
        Ok(())
    }

    /// Handle a pointer release. Ends drags and pans.
    pub fn pointer_up(&mut self, screen: Point) -> roofkit_core::Result<ClickOutcome> {
        let world = self.screen_to_world(screen)?;

        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Panning { resume, .. } => {
                if let Some(session) = resume {
                    self.interaction = Interaction::Drawing(*session);
                }
                Ok(ClickOutcome::PanFinished)
            }
            // A vertex press without movement is a click on that vertex,
            // which starts a drawing there.
            Interaction::DraggingVertex { moved: false, .. } => self.draw_click(world),
            Interaction::DraggingPlane {
                plane_id,
                moved: false,
                ..
            } => {
                self.selected_plane = Some(plane_id.clone());
                Ok(ClickOutcome::PlaneSelected(plane_id))
            }
            Interaction::DraggingVertex { .. }
            | Interaction::DraggingPlane { .. }
            | Interaction::DraggingAccessory { .. } => Ok(ClickOutcome::DragFinished),
            other => {
                self.interaction = other;
                Ok(ClickOutcome::Nothing)
            }
        }
    }

    fn start_pan(&mut self, screen: Point) -> ClickOutcome {
        let resume = match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Drawing(session) => Some(Box::new(session)),
            _ => None,
        };
        self.interaction = Interaction::Panning {
            last_screen: screen,
            resume,
        };
        ClickOutcome::PanStarted
    }

    /// Draw mode press: extend a drawing, or grab a vertex or whole plane
    /// of the active layer, or start a new drawing.
    fn draw_press(&mut self, world: Point) -> roofkit_core::Result<ClickOutcome> {
        if matches!(self.interaction, Interaction::Drawing(_)) {
            return self.draw_click(world);
        }

        let world_per_px = self.world_per_px()?;
        let vertex_tol = self.config.snap.vertex_tolerance_px * world_per_px;
        let grab_tol = self.config.plane_grab_radius_px * world_per_px;
        let on_layer = || {
            self.planes
                .iter()
                .filter(|p| p.layer_id() == &self.active_layer_id)
        };

        let vertex_hit = on_layer()
            .flat_map(|plane| {
                plane
                    .ring()
                    .iter()
                    .enumerate()
                    .map(move |(i, v)| (plane.id(), i, v.distance_to(&world)))
            })
            .filter(|(_, _, d)| *d <= vertex_tol)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(id, i, _)| (id.clone(), i));
        if let Some((plane_id, index)) = vertex_hit {
            self.interaction = Interaction::DraggingVertex {
                plane_id,
                index,
                moved: false,
            };
            return Ok(ClickOutcome::DragStarted);
        }

        let centroid_hit = on_layer()
            .rev()
            .find(|plane| {
                plane.contains(world)
                    && polygon_centroid(plane.ring()).distance_to(&world) <= grab_tol
            })
            .map(|plane| plane.id().clone());
        if let Some(plane_id) = centroid_hit {
            self.interaction = Interaction::DraggingPlane {
                plane_id,
                last_world: world,
                moved: false,
            };
            return Ok(ClickOutcome::DragStarted);
        }

        self.draw_click(world)
    }

    /// Label mode press: grab an accessory, or label the picked edge.
    fn label_press(&mut self, world: Point) -> roofkit_core::Result<ClickOutcome> {
        if let Some(outcome) = self.grab_accessory(world)? {
            return Ok(outcome);
        }
        let tolerance = self.config.label_tolerance_px * self.world_per_px()?;
        let Some(hit) = annotation::pick_edge(world, &self.planes, &self.active_layer_id, tolerance)
        else {
            return Ok(ClickOutcome::Nothing);
        };
        let edge_type = self.current_edge_type;
        self.assign_edge_type(&hit.plane_id, hit.edge_index, edge_type)?;
        Ok(ClickOutcome::EdgeLabeled {
            plane_id: hit.plane_id,
            edge_index: hit.edge_index,
            edge_type,
        })
    }

    /// Pitch mode click: apply the current pitch to the plane under the pointer.
    fn pitch_click(&mut self, world: Point) -> ClickOutcome {
        let Some(plane_id) = annotation::plane_at(world, &self.planes, &self.active_layer_id)
            .map(|p| p.id().clone())
        else {
            return ClickOutcome::Nothing;
        };
        let pitch = self.current_pitch;
        match self.assign_pitch(&plane_id, pitch) {
            Ok(()) => ClickOutcome::PitchApplied { plane_id, pitch },
            Err(e) => {
                tracing::warn!("Pitch rejected: {}", e);
                ClickOutcome::Nothing
            }
        }
    }

    /// Accessories mode press: grab an existing marker, or place a new one
    /// of the current kind on the plane under the pointer.
    fn accessory_press(&mut self, world: Point) -> roofkit_core::Result<ClickOutcome> {
        if let Some(outcome) = self.grab_accessory(world)? {
            return Ok(outcome);
        }
        let Some(plane_id) = annotation::plane_at(world, &self.planes, &self.active_layer_id)
            .map(|p| p.id().clone())
        else {
            self.selected_accessory = None;
            return Ok(ClickOutcome::Nothing);
        };
        let kind = self.current_accessory;
        let accessory_id = self.add_accessory(&plane_id, world, kind)?;
        Ok(ClickOutcome::AccessoryAdded {
            plane_id,
            accessory_id,
        })
    }

    fn grab_accessory(&mut self, world: Point) -> roofkit_core::Result<Option<ClickOutcome>> {
        let radius = self.config.accessory_hit_radius_px * self.world_per_px()?;
        let on_layer = self
            .planes
            .iter()
            .filter(|p| p.layer_id() == &self.active_layer_id);
        let Some(hit) = accessories::hit_test(world, on_layer, radius) else {
            return Ok(None);
        };
        self.selected_accessory = Some((hit.plane_id.clone(), hit.accessory_id.clone()));
        self.interaction = Interaction::DraggingAccessory {
            plane_id: hit.plane_id.clone(),
            accessory_id: hit.accessory_id.clone(),
        };
        Ok(Some(ClickOutcome::AccessorySelected {
            plane_id: hit.plane_id,
            accessory_id: hit.accessory_id,
        }))
    }
}
