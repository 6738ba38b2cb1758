//! Edge and pitch annotation lookups.
//!
//! Label mode picks the edge nearest to the pointer across the planes of
//! the active layer; pitch mode picks the plane under the pointer.

use crate::geometry::{point_in_polygon, ring_edges, segment_distance};
use crate::model::{LayerId, Plane, PlaneId, Point};

/// Edge found by a pointer lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeHit {
    pub plane_id: PlaneId,
    pub edge_index: usize,
    pub distance: f64,
    /// Closest point on the edge.
    pub projection: Point,
}

/// Nearest edge of any plane yielded by `planes`, by point-to-segment distance.
pub fn nearest_edge<'a>(p: Point, planes: impl IntoIterator<Item = &'a Plane>) -> Option<EdgeHit> {
    let mut best: Option<EdgeHit> = None;
    for plane in planes {
        for (edge_index, a, b) in ring_edges(plane.ring()) {
            let proj = segment_distance(p, a, b);
            if best.as_ref().map_or(true, |hit| proj.distance < hit.distance) {
                best = Some(EdgeHit {
                    plane_id: plane.id().clone(),
                    edge_index,
                    distance: proj.distance,
                    projection: proj.point,
                });
            }
        }
    }
    best
}

/// Topmost plane on `layer_id` containing `p`. Later planes are drawn above
/// earlier ones.
pub fn plane_at<'a>(p: Point, planes: &'a [Plane], layer_id: &LayerId) -> Option<&'a Plane> {
    planes
        .iter()
        .rev()
        .filter(|plane| plane.layer_id() == layer_id)
        .find(|plane| point_in_polygon(p, plane.ring()))
}

/// Edge to label for a click at `p`.
///
/// The nearest edge across the active layer wins when it is within
/// `tolerance`; otherwise a click inside a plane selects that plane's
/// nearest edge regardless of distance.
pub fn pick_edge(p: Point, planes: &[Plane], layer_id: &LayerId, tolerance: f64) -> Option<EdgeHit> {
    let on_layer = planes.iter().filter(|plane| plane.layer_id() == layer_id);
    if let Some(hit) = nearest_edge(p, on_layer).filter(|hit| hit.distance <= tolerance) {
        return Some(hit);
    }
    plane_at(p, planes, layer_id).and_then(|plane| nearest_edge(p, std::iter::once(plane)))
}
