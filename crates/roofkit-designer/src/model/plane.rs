use super::{Accessory, EdgeType, LayerId, PlaneId, Point};
use crate::geometry;
use roofkit_core::constants::MIN_PLANE_AREA_PX2;
use roofkit_core::EditError;
use serde::{Deserialize, Serialize};

/// One roof facet: a simple polygon with a label per edge, a pitch and the
/// accessories placed on it.
///
/// The ring and edge labels are kept in lockstep (`edges.len() == ring.len()`);
/// every ring replacement goes through validation so an invalid plane
/// cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlaneRecord", into = "PlaneRecord")]
pub struct Plane {
    id: PlaneId,
    layer_id: LayerId,
    pitch: f64,
    ring: Vec<Point>,
    edges: Vec<EdgeType>,
    pub(crate) accessories: Vec<Accessory>,
}

/// Wire form of a plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaneRecord {
    id: PlaneId,
    layer_id: LayerId,
    pitch: f64,
    ring: Vec<Point>,
    #[serde(default)]
    edges: Vec<EdgeType>,
    #[serde(default)]
    accessories: Vec<Accessory>,
}

impl TryFrom<PlaneRecord> for Plane {
    type Error = String;

    fn try_from(record: PlaneRecord) -> Result<Self, Self::Error> {
        check_pitch(record.pitch).map_err(|e| e.to_string())?;
        geometry::validate_ring(&record.ring, MIN_PLANE_AREA_PX2).map_err(|e| e.to_string())?;
        let mut edges = record.edges;
        edges.resize(record.ring.len(), EdgeType::Unknown);
        Ok(Plane {
            id: record.id,
            layer_id: record.layer_id,
            pitch: record.pitch,
            ring: record.ring,
            edges,
            accessories: record.accessories,
        })
    }
}

impl From<Plane> for PlaneRecord {
    fn from(plane: Plane) -> Self {
        PlaneRecord {
            id: plane.id,
            layer_id: plane.layer_id,
            pitch: plane.pitch,
            ring: plane.ring,
            edges: plane.edges,
            accessories: plane.accessories,
        }
    }
}

fn check_pitch(pitch: f64) -> Result<(), EditError> {
    if pitch.is_finite() && pitch >= 0.0 {
        Ok(())
    } else {
        Err(EditError::InvalidPitch { pitch })
    }
}

impl Plane {
    /// Build a plane from a validated ring. All edges start as `unknown`.
    pub fn new(
        id: PlaneId,
        layer_id: LayerId,
        ring: Vec<Point>,
        pitch: f64,
    ) -> roofkit_core::Result<Self> {
        Self::with_min_area(id, layer_id, ring, pitch, MIN_PLANE_AREA_PX2)
    }

    /// Like [`Plane::new`], with the minimum ring area given explicitly.
    pub fn with_min_area(
        id: PlaneId,
        layer_id: LayerId,
        ring: Vec<Point>,
        pitch: f64,
        min_area: f64,
    ) -> roofkit_core::Result<Self> {
        geometry::validate_ring(&ring, min_area)?;
        check_pitch(pitch)?;
        let edges = vec![EdgeType::Unknown; ring.len()];
        Ok(Self {
            id,
            layer_id,
            pitch,
            ring,
            edges,
            accessories: Vec::new(),
        })
    }

    pub fn id(&self) -> &PlaneId {
        &self.id
    }

    pub fn layer_id(&self) -> &LayerId {
        &self.layer_id
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn ring(&self) -> &[Point] {
        &self.ring
    }

    pub fn edges(&self) -> &[EdgeType] {
        &self.edges
    }

    pub fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Endpoints of edge `index`.
    pub fn edge(&self, index: usize) -> Option<(Point, Point)> {
        let n = self.ring.len();
        (index < n).then(|| (self.ring[index], self.ring[(index + 1) % n]))
    }

    pub fn set_pitch(&mut self, pitch: f64) -> Result<(), EditError> {
        check_pitch(pitch)?;
        self.pitch = pitch;
        Ok(())
    }

    pub fn set_edge_type(&mut self, index: usize, edge_type: EdgeType) -> Result<(), EditError> {
        let edge_count = self.edges.len();
        let slot = self
            .edges
            .get_mut(index)
            .ok_or_else(|| EditError::EdgeOutOfRange {
                plane_id: self.id.to_string(),
                index,
                edge_count,
            })?;
        *slot = edge_type;
        Ok(())
    }

    /// Replace the ring, keeping edge labels by index. Edges beyond the old
    /// count start as `unknown`.
    pub fn replace_ring(&mut self, ring: Vec<Point>) -> roofkit_core::Result<()> {
        self.replace_ring_with_min_area(ring, MIN_PLANE_AREA_PX2)
    }

    pub fn replace_ring_with_min_area(
        &mut self,
        ring: Vec<Point>,
        min_area: f64,
    ) -> roofkit_core::Result<()> {
        geometry::validate_ring(&ring, min_area)?;
        self.edges.resize(ring.len(), EdgeType::Unknown);
        self.ring = ring;
        Ok(())
    }

    /// Move the plane and its accessories.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in self.ring.iter_mut() {
            p.x += dx;
            p.y += dy;
        }
        for acc in self.accessories.iter_mut() {
            acc.position.x += dx;
            acc.position.y += dy;
        }
    }

    /// Apply `f` to every vertex and accessory position without validation.
    pub(crate) fn map_points(&mut self, f: impl Fn(Point) -> Point) {
        for p in self.ring.iter_mut() {
            *p = f(*p);
        }
        for acc in self.accessories.iter_mut() {
            acc.position = f(acc.position);
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        geometry::point_in_polygon(p, &self.ring)
    }

    pub fn area_px2(&self) -> f64 {
        geometry::polygon_area(&self.ring)
    }

    pub fn centroid(&self) -> Point {
        geometry::polygon_centroid(&self.ring)
    }
}
