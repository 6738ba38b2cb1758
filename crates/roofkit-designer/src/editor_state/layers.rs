//! Layer management for editor state.

use super::{EditorState, Interaction};
use crate::model::{layer_name_for_index, Layer, LayerId};
use roofkit_core::EditError;

impl EditorState {
    /// Append a layer named after its position (A, B, C, ...) and return its id.
    pub fn add_layer(&mut self) -> LayerId {
        let layer = Layer::new(
            LayerId::generate(),
            layer_name_for_index(self.layers.len()),
            self.layers.len() as u32,
        );
        let id = layer.id.clone();
        tracing::debug!(layer = %id, name = %layer.name, "Layer added");
        self.layers.push(layer);
        id
    }

    /// Make a layer the target of pointer edits. Cancels drawing.
    pub fn set_active_layer(&mut self, id: &LayerId) -> Result<(), EditError> {
        if !self.layers.iter().any(|l| &l.id == id) {
            return Err(EditError::LayerNotFound { id: id.to_string() });
        }
        if &self.active_layer_id != id {
            self.interaction = Interaction::Idle;
            self.preview = None;
            self.selected_plane = None;
            self.active_layer_id = id.clone();
        }
        Ok(())
    }

    pub fn rename_layer(&mut self, id: &LayerId, name: impl Into<String>) -> Result<(), EditError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| EditError::LayerNotFound { id: id.to_string() })?;
        layer.name = name.into();
        Ok(())
    }

    /// Move a layer `delta` places in the stacking order and renumber
    /// every layer's `order` from zero.
    pub fn move_layer(&mut self, id: &LayerId, delta: i32) -> Result<(), EditError> {
        self.layers.sort_by_key(|l| l.order);
        let from = self
            .layers
            .iter()
            .position(|l| &l.id == id)
            .ok_or_else(|| EditError::LayerNotFound { id: id.to_string() })?;
        let last = self.layers.len() as i64 - 1;
        let to = (from as i64 + i64::from(delta)).clamp(0, last) as usize;

        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        for (order, layer) in self.layers.iter_mut().enumerate() {
            layer.order = order as u32;
        }
        Ok(())
    }
}
