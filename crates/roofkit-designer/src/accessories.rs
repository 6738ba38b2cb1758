//! Accessory placement, editing, hit-testing and breakdown.

use std::collections::BTreeMap;

use crate::geometry::point_in_polygon;
use crate::model::{
    Accessory, AccessoryData, AccessoryId, AccessoryKind, AccessoryPayload, Plane, PlaneId, Point,
};
use roofkit_core::EditError;

/// Label used in the breakdown for accessories with no values filled in.
pub const BLANK_VALUE: &str = "(blank)";

/// Counts per accessory type name, then per distinct payload value.
pub type AccessoryBreakdown = BTreeMap<String, BTreeMap<String, u32>>;

impl Plane {
    /// Place a new accessory of `kind` with its default payload.
    pub fn add_accessory(
        &mut self,
        kind: AccessoryKind,
        position: Point,
    ) -> Result<AccessoryId, EditError> {
        if !point_in_polygon(position, self.ring()) {
            return Err(EditError::AccessoryOutsidePlane {
                plane_id: self.id().to_string(),
            });
        }
        let accessory = Accessory::new(kind, position);
        let id = accessory.id.clone();
        tracing::debug!(plane = %self.id(), accessory = %id, kind = %kind, "Accessory added");
        self.accessories.push(accessory);
        Ok(id)
    }

    pub fn accessory(&self, id: &AccessoryId) -> Option<&Accessory> {
        self.accessories.iter().find(|a| &a.id == id)
    }

    fn accessory_mut(&mut self, id: &AccessoryId) -> Result<&mut Accessory, EditError> {
        self.accessories
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| EditError::AccessoryNotFound { id: id.to_string() })
    }

    pub fn move_accessory(&mut self, id: &AccessoryId, position: Point) -> Result<(), EditError> {
        self.accessory_mut(id)?.position = position;
        Ok(())
    }

    /// Replace the payload of a typed accessory. The new payload must be of
    /// the same kind; unrecognized accessories cannot be edited.
    pub fn update_accessory_data(
        &mut self,
        id: &AccessoryId,
        data: AccessoryData,
    ) -> Result<(), EditError> {
        let accessory = self.accessory_mut(id)?;
        match &accessory.data {
            AccessoryPayload::Typed(current) if current.kind() == data.kind() => {
                accessory.data = AccessoryPayload::Typed(data);
                Ok(())
            }
            AccessoryPayload::Typed(current) => Err(EditError::AccessoryKindMismatch {
                id: id.to_string(),
                expected: current.kind().to_string(),
                actual: data.kind().to_string(),
            }),
            AccessoryPayload::Unrecognized(_) => Err(EditError::AccessoryNotEditable {
                id: id.to_string(),
                kind: accessory.type_name(),
            }),
        }
    }

    pub fn remove_accessory(&mut self, id: &AccessoryId) -> Result<Accessory, EditError> {
        let index = self
            .accessories
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| EditError::AccessoryNotFound { id: id.to_string() })?;
        Ok(self.accessories.remove(index))
    }
}

/// Accessory located by a pointer lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessoryHit {
    pub plane_id: PlaneId,
    pub accessory_id: AccessoryId,
    pub distance: f64,
}

/// Closest accessory within `radius` (world units) of `p`.
pub fn hit_test<'a>(
    p: Point,
    planes: impl IntoIterator<Item = &'a Plane>,
    radius: f64,
) -> Option<AccessoryHit> {
    planes
        .into_iter()
        .flat_map(|plane| {
            plane.accessories().iter().map(move |acc| AccessoryHit {
                plane_id: plane.id().clone(),
                accessory_id: acc.id.clone(),
                distance: acc.position.distance_to(&p),
            })
        })
        .filter(|hit| hit.distance <= radius)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Count accessories across all planes by type and distinct value.
pub fn accessory_breakdown(planes: &[Plane]) -> AccessoryBreakdown {
    let mut breakdown = AccessoryBreakdown::new();
    for acc in planes.iter().flat_map(|plane| plane.accessories()) {
        let values = match &acc.data {
            AccessoryPayload::Typed(data) => data.breakdown_values(),
            AccessoryPayload::Unrecognized(_) => Vec::new(),
        };
        let counts = breakdown.entry(acc.type_name()).or_default();
        if values.is_empty() {
            *counts.entry(BLANK_VALUE.to_string()).or_default() += 1;
        }
        for value in values {
            *counts.entry(value).or_default() += 1;
        }
    }
    breakdown
}
