//! Topology validator
//!
//! Enforces that planes on the same layer never overlap while still letting
//! neighbours share vertices and whole or partial edges.
//!
//! Two rings overlap when an edge of one properly crosses an edge of the
//! other, or when some part of one ring's boundary runs strictly through
//! the other's interior, or when one contains the other. Corner contact,
//! T-junctions and collinear shared edges are not overlap.

use crate::geometry::{
    interior_point, point_on_ring_boundary, point_strictly_inside, ring_edges, segment_distance,
    segments_intersect,
};
use crate::model::{LayerId, Plane, PlaneId, Point};
use roofkit_core::constants::BOUNDARY_EPSILON;
use roofkit_core::TopologyError;
use smallvec::SmallVec;

/// True when the rings touch: a vertex of one lies on the other's boundary.
pub fn boundary_contact(a: &[Point], b: &[Point], tolerance: f64) -> bool {
    a.iter().any(|p| point_on_ring_boundary(*p, b, tolerance))
        || b.iter().any(|p| point_on_ring_boundary(*p, a, tolerance))
}

/// True when some edge of `a` properly crosses an edge of `b`.
pub fn rings_cross(a: &[Point], b: &[Point]) -> bool {
    ring_edges(a).any(|(_, a1, a2)| {
        ring_edges(b).any(|(_, b1, b2)| segments_intersect(a1, a2, b1, b2).is_crossing())
    })
}

/// True when the segment `p -> q` properly crosses an edge of `ring` or
/// any stretch of it lies strictly inside `ring`.
///
/// The segment is split at every vertex of `ring` lying on it; each piece
/// then either runs along the boundary, stays outside or stays inside, so
/// testing its midpoint is enough.
pub fn segment_enters_ring(p: Point, q: Point, ring: &[Point], tolerance: f64) -> bool {
    if ring_edges(ring).any(|(_, a, b)| segments_intersect(p, q, a, b).is_crossing()) {
        return true;
    }

    let length = p.distance_to(&q);
    if length <= tolerance {
        return point_strictly_inside(p, ring, tolerance);
    }

    let mut cuts: SmallVec<[f64; 8]> = SmallVec::new();
    cuts.push(0.0);
    cuts.push(1.0);
    for v in ring {
        let proj = segment_distance(*v, p, q);
        if proj.distance <= tolerance {
            cuts.push(proj.t);
        }
    }
    cuts.sort_by(f64::total_cmp);

    cuts.windows(2).any(|w| {
        if (w[1] - w[0]) * length <= 2.0 * tolerance {
            return false;
        }
        let t = (w[0] + w[1]) / 2.0;
        let mid = Point::new(p.x + (q.x - p.x) * t, p.y + (q.y - p.y) * t);
        point_strictly_inside(mid, ring, tolerance)
    })
}

/// Overlap test between two rings.
///
/// Without boundary contact, overlap is a proper crossing or containment
/// (centroid or any vertex of one strictly inside the other). With boundary
/// contact only proper crossings and boundary pieces running through the
/// other's interior count, which keeps shared ridges and hips legal.
pub fn rings_overlap(a: &[Point], b: &[Point], tolerance: f64) -> bool {
    if rings_cross(a, b) {
        return true;
    }

    if !boundary_contact(a, b, tolerance) {
        let contains = |outer: &[Point], inner: &[Point]| {
            inner
                .first()
                .is_some_and(|v| point_strictly_inside(*v, outer, tolerance))
                || point_strictly_inside(interior_point(inner), outer, tolerance)
        };
        return contains(b, a) || contains(a, b);
    }

    let penetrates = |ring: &[Point], other: &[Point]| {
        ring_edges(ring).any(|(_, p, q)| segment_enters_ring(p, q, other, tolerance))
    };
    penetrates(a, b)
        || penetrates(b, a)
        || point_strictly_inside(interior_point(a), b, tolerance)
        || point_strictly_inside(interior_point(b), a, tolerance)
}

/// Validates edits against the planes of one layer.
#[derive(Debug, Clone, Copy)]
pub struct TopologyValidator<'a> {
    planes: &'a [Plane],
    layer_id: &'a LayerId,
    exclude: Option<&'a PlaneId>,
    tolerance: f64,
}

impl<'a> TopologyValidator<'a> {
    pub fn new(planes: &'a [Plane], layer_id: &'a LayerId) -> Self {
        Self {
            planes,
            layer_id,
            exclude: None,
            tolerance: BOUNDARY_EPSILON,
        }
    }

    /// Skip one plane, typically the one being edited.
    pub fn excluding(mut self, plane_id: &'a PlaneId) -> Self {
        self.exclude = Some(plane_id);
        self
    }

    fn same_layer(&self) -> impl Iterator<Item = &'a Plane> + '_ {
        self.planes.iter().filter(move |plane| {
            plane.layer_id() == self.layer_id && self.exclude.map_or(true, |id| plane.id() != id)
        })
    }

    /// Reject a point strictly inside a same-layer plane. Points on a
    /// plane's boundary are allowed.
    pub fn check_point(&self, p: Point) -> Result<(), TopologyError> {
        match self
            .same_layer()
            .find(|plane| point_strictly_inside(p, plane.ring(), self.tolerance))
        {
            Some(plane) => Err(TopologyError::PointInsidePlane {
                plane_id: plane.id().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Reject a drawn segment that crosses or runs through a same-layer plane.
    pub fn check_segment(&self, p: Point, q: Point) -> Result<(), TopologyError> {
        match self
            .same_layer()
            .find(|plane| segment_enters_ring(p, q, plane.ring(), self.tolerance))
        {
            Some(plane) => Err(TopologyError::SegmentCrossesPlane {
                plane_id: plane.id().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Reject a ring that overlaps a same-layer plane.
    pub fn check_ring(&self, ring: &[Point]) -> Result<(), TopologyError> {
        match self
            .same_layer()
            .find(|plane| rings_overlap(ring, plane.ring(), self.tolerance))
        {
            Some(plane) => Err(TopologyError::RingOverlapsPlane {
                plane_id: plane.id().to_string(),
            }),
            None => Ok(()),
        }
    }
}
