//! Plane, annotation and accessory edits for editor state.

use super::EditorState;
use crate::geometry;
use crate::model::{AccessoryData, AccessoryId, AccessoryKind, EdgeType, Plane, PlaneId, Point};
use crate::topology::TopologyValidator;
use roofkit_core::EditError;

impl EditorState {
    /// Delete a plane together with its accessories.
    pub fn delete_plane(&mut self, id: &PlaneId) -> Result<Plane, EditError> {
        let index = self.plane_index(id)?;
        let plane = self.planes.remove(index);
        if self.selected_plane.as_ref() == Some(id) {
            self.selected_plane = None;
        }
        if self
            .selected_accessory
            .as_ref()
            .is_some_and(|(plane_id, _)| plane_id == id)
        {
            self.selected_accessory = None;
        }
        tracing::debug!(plane = %id, "Plane deleted");
        self.recompute_totals();
        Ok(plane)
    }

    /// Delete the selected plane, if any.
    pub fn delete_selected(&mut self) -> Option<Plane> {
        let id = self.selected_plane.clone()?;
        self.delete_plane(&id).ok()
    }

    pub fn select_plane(&mut self, id: Option<PlaneId>) {
        self.selected_plane = id;
    }

    /// Validate `candidate` as a replacement for the plane at `index` and
    /// commit it.
    fn commit_plane(&mut self, index: usize, candidate: Plane) -> roofkit_core::Result<()> {
        TopologyValidator::new(&self.planes, candidate.layer_id())
            .excluding(candidate.id())
            .check_ring(candidate.ring())
            .inspect_err(|e| tracing::warn!(plane = %candidate.id(), "Edit rejected: {}", e))?;
        self.planes[index] = candidate;
        self.recompute_totals();
        Ok(())
    }

    /// Replace a plane's ring, keeping edge labels by index.
    pub fn replace_ring(&mut self, id: &PlaneId, ring: Vec<Point>) -> roofkit_core::Result<()> {
        let index = self.plane_index(id)?;
        let mut candidate = self.planes[index].clone();
        candidate.replace_ring_with_min_area(ring, self.config.min_plane_area_px2)?;
        self.commit_plane(index, candidate)
    }

    /// Move one vertex. Rejected when the ring stops being simple or starts
    /// overlapping a same-layer plane.
    pub fn move_vertex(
        &mut self,
        id: &PlaneId,
        vertex: usize,
        position: Point,
    ) -> roofkit_core::Result<()> {
        let index = self.plane_index(id)?;
        let mut ring = self.planes[index].ring().to_vec();
        let edge_count = ring.len();
        let slot = ring.get_mut(vertex).ok_or_else(|| EditError::EdgeOutOfRange {
            plane_id: id.to_string(),
            index: vertex,
            edge_count,
        })?;
        *slot = position;
        self.replace_ring(id, ring)
    }

    /// Move a whole plane and its accessories.
    pub fn translate_plane(&mut self, id: &PlaneId, dx: f64, dy: f64) -> roofkit_core::Result<()> {
        let index = self.plane_index(id)?;
        let mut candidate = self.planes[index].clone();
        candidate.translate(dx, dy);
        self.commit_plane(index, candidate)
    }

    pub fn fit_rectangle(&mut self, id: &PlaneId) -> roofkit_core::Result<()> {
        self.apply_fit(id, geometry::fit_oriented_rectangle)
    }

    pub fn fit_triangle(&mut self, id: &PlaneId) -> roofkit_core::Result<()> {
        self.apply_fit(id, geometry::fit_triangle)
    }

    pub fn orthogonalize(&mut self, id: &PlaneId) -> roofkit_core::Result<()> {
        self.apply_fit(id, geometry::orthogonalize)
    }

    fn apply_fit(
        &mut self,
        id: &PlaneId,
        fit: fn(&[Point]) -> Vec<Point>,
    ) -> roofkit_core::Result<()> {
        let index = self.plane_index(id)?;
        let ring = geometry::normalize_ring(&fit(self.planes[index].ring()));
        self.replace_ring(id, ring)
    }

    /// Set the label of one edge.
    pub fn assign_edge_type(
        &mut self,
        id: &PlaneId,
        edge_index: usize,
        edge_type: EdgeType,
    ) -> Result<(), EditError> {
        let index = self.plane_index(id)?;
        self.planes[index].set_edge_type(edge_index, edge_type)?;
        tracing::debug!(plane = %id, edge = edge_index, %edge_type, "Edge labeled");
        self.recompute_totals();
        Ok(())
    }

    pub fn assign_pitch(&mut self, id: &PlaneId, pitch: f64) -> Result<(), EditError> {
        let index = self.plane_index(id)?;
        self.planes[index].set_pitch(pitch)?;
        tracing::debug!(plane = %id, pitch, "Pitch assigned");
        self.recompute_totals();
        Ok(())
    }

    /// Place an accessory with its default payload inside a plane.
    pub fn add_accessory(
        &mut self,
        plane_id: &PlaneId,
        position: Point,
        kind: AccessoryKind,
    ) -> Result<AccessoryId, EditError> {
        let index = self.plane_index(plane_id)?;
        let id = self.planes[index].add_accessory(kind, position)?;
        self.selected_accessory = Some((plane_id.clone(), id.clone()));
        self.recompute_totals();
        Ok(id)
    }

    /// Place an accessory from its raw type name. Unknown names are ignored
    /// and yield `None`.
    pub fn add_accessory_named(
        &mut self,
        plane_id: &PlaneId,
        position: Point,
        type_name: &str,
    ) -> Result<Option<AccessoryId>, EditError> {
        match type_name.parse::<AccessoryKind>() {
            Ok(kind) => self.add_accessory(plane_id, position, kind).map(Some),
            Err(e) => {
                tracing::warn!("{}", e);
                Ok(None)
            }
        }
    }

    fn accessory_owner(&self, id: &AccessoryId) -> Result<usize, EditError> {
        self.planes
            .iter()
            .position(|p| p.accessory(id).is_some())
            .ok_or_else(|| EditError::AccessoryNotFound { id: id.to_string() })
    }

    pub fn move_accessory(&mut self, id: &AccessoryId, position: Point) -> Result<(), EditError> {
        let index = self.accessory_owner(id)?;
        self.planes[index].move_accessory(id, position)
    }

    pub fn update_accessory_data(
        &mut self,
        id: &AccessoryId,
        data: AccessoryData,
    ) -> Result<(), EditError> {
        let index = self.accessory_owner(id)?;
        self.planes[index].update_accessory_data(id, data)?;
        self.recompute_totals();
        Ok(())
    }

    pub fn remove_accessory(&mut self, id: &AccessoryId) -> Result<(), EditError> {
        let index = self.accessory_owner(id)?;
        self.planes[index].remove_accessory(id)?;
        if self
            .selected_accessory
            .as_ref()
            .is_some_and(|(_, selected)| selected == id)
        {
            self.selected_accessory = None;
        }
        self.recompute_totals();
        Ok(())
    }
}
