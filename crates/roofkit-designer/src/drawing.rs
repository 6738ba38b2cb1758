//! Drawing session: turns a sequence of snapped clicks into a plane ring.
//!
//! A session exists only while one polygon is being drawn. Every committed
//! point remembers what it snapped to, so closing onto an existing plane can
//! splice in the stretch of that plane's boundary between the first and last
//! points (shared-ring completion).

use crate::geometry::{normalize_ring, validate_ring};
use crate::model::{LayerId, Plane, PlaneId, Point};
use crate::snapping::{SnapResult, SnapTarget, VertexRef};
use crate::topology::TopologyValidator;
use roofkit_core::{GeometryError, TopologyError};

/// Result of offering a point to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawStep {
    /// The point was committed.
    Appended,
    /// The point was too close to the previous one or repeated an earlier
    /// drawing point; nothing changed.
    Ignored,
    /// The point landed on the first point; the caller should finish.
    Close,
}

/// Ephemeral state of a polygon being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSession {
    layer_id: LayerId,
    points: Vec<Point>,
    targets: Vec<SnapTarget>,
}

impl DrawingSession {
    /// Start a session at a snapped point.
    ///
    /// A start strictly inside a same-layer plane is rejected; starting on a
    /// plane's boundary is how neighbouring planes get drawn.
    pub fn start(
        layer_id: LayerId,
        first: SnapResult,
        validator: &TopologyValidator<'_>,
    ) -> Result<Self, TopologyError> {
        validator.check_point(first.point)?;
        Ok(Self {
            layer_id,
            points: vec![first.point],
            targets: vec![first.target],
        })
    }

    pub fn layer_id(&self) -> &LayerId {
        &self.layer_id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Snap target recorded for each committed point.
    pub fn targets(&self) -> &[SnapTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Offer the next snapped point.
    ///
    /// With three or more points committed, a point within
    /// `closure_tolerance` of the first point closes the ring instead of being
    /// appended. A segment that would cross a same-layer plane is rejected and
    /// the session is left unchanged.
    pub fn push(
        &mut self,
        snap: SnapResult,
        validator: &TopologyValidator<'_>,
        closure_tolerance: f64,
        min_segment: f64,
    ) -> Result<DrawStep, TopologyError> {
        let Some(&last) = self.points.last() else {
            self.points.push(snap.point);
            self.targets.push(snap.target);
            return Ok(DrawStep::Appended);
        };
        let first = self.points[0];

        if self.points.len() >= 3
            && (snap.target == SnapTarget::DrawingVertex(0)
                || snap.point.distance_to(&first) <= closure_tolerance)
        {
            return Ok(DrawStep::Close);
        }

        if snap.point.distance_to(&last) < min_segment {
            return Ok(DrawStep::Ignored);
        }

        if let SnapTarget::DrawingVertex(_) = snap.target {
            tracing::debug!("Ignoring click on an earlier point of the current drawing");
            return Ok(DrawStep::Ignored);
        }

        validator.check_segment(last, snap.point)?;

        self.points.push(snap.point);
        self.targets.push(snap.target);
        Ok(DrawStep::Appended)
    }

    /// Remove the most recent point. Returns `true` when the session is now
    /// empty and should be discarded.
    pub fn undo(&mut self) -> bool {
        self.points.pop();
        self.targets.pop();
        self.points.is_empty()
    }

    /// Build the final ring.
    ///
    /// Requires three committed points, applies shared-ring completion,
    /// then rejects degenerate rings (too small, self-intersecting) and rings
    /// that overlap a same-layer plane.
    pub fn finish(
        &self,
        planes: &[Plane],
        validator: &TopologyValidator<'_>,
        closure_tolerance: f64,
        min_area: f64,
    ) -> roofkit_core::Result<Vec<Point>> {
        if self.points.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                count: self.points.len(),
            }
            .into());
        }

        let mut ring = self.points.clone();
        if let Some(completion) = self.shared_completion(planes, closure_tolerance) {
            if let Some(last) = ring.last_mut() {
                *last = completion.last_vertex;
            }
            ring.extend(completion.path);
        }
        let ring = normalize_ring(&ring);

        validate_ring(&ring, min_area)?;
        validator.check_ring(&ring)?;
        Ok(ring)
    }

    /// Vertices of the existing plane to append after the last point when
    /// the first and last points sit on that plane's vertices.
    ///
    /// If the last point did not snap but lies within `closure_tolerance` of
    /// a vertex of the first point's plane, that vertex is used. Of the two
    /// boundary walks from the last vertex back to the first, the one with
    /// fewer intermediate vertices wins.
    pub fn shared_ring_path(&self, planes: &[Plane], closure_tolerance: f64) -> Vec<Point> {
        self.shared_completion(planes, closure_tolerance)
            .map(|completion| completion.path)
            .unwrap_or_default()
    }

    fn shared_completion(
        &self,
        planes: &[Plane],
        closure_tolerance: f64,
    ) -> Option<SharedCompletion> {
        let Some(SnapTarget::Vertex(first_ref)) = self.targets.first() else {
            return None;
        };
        if self.points.len() < 2 {
            return None;
        }
        let plane = planes.iter().find(|p| p.id() == &first_ref.plane_id)?;

        let last_index = match self.targets.last() {
            Some(SnapTarget::Vertex(VertexRef { plane_id, index }))
                if plane_id == &first_ref.plane_id =>
            {
                Some(*index)
            }
            _ => self
                .points
                .last()
                .and_then(|last| nearest_vertex(plane, *last, closure_tolerance)),
        };
        let last_index = last_index?;
        if last_index == first_ref.index {
            return None;
        }

        let ring = plane.ring();
        let n = ring.len();
        let walk = |step: usize| -> Vec<Point> {
            let mut path = Vec::new();
            let mut i = (last_index + step) % n;
            while i != first_ref.index {
                path.push(ring[i]);
                i = (i + step) % n;
            }
            path
        };
        let forward = walk(1);
        let backward = walk(n - 1);
        tracing::debug!(
            plane = %plane.id(),
            forward = forward.len(),
            backward = backward.len(),
            "Shared-ring completion"
        );
        let path = if backward.len() < forward.len() {
            backward
        } else {
            forward
        };
        Some(SharedCompletion {
            last_vertex: ring[last_index],
            path,
        })
    }

    /// Plane the session started on, when the first point reused a vertex.
    pub fn anchor_plane(&self) -> Option<&PlaneId> {
        match self.targets.first() {
            Some(SnapTarget::Vertex(vref)) => Some(&vref.plane_id),
            _ => None,
        }
    }
}

/// Boundary stretch spliced in by shared-ring completion. The last drawn
/// point is replaced by `last_vertex`, which may have been inferred from an
/// unsnapped click.
struct SharedCompletion {
    last_vertex: Point,
    path: Vec<Point>,
}

fn nearest_vertex(plane: &Plane, p: Point, tolerance: f64) -> Option<usize> {
    plane
        .ring()
        .iter()
        .enumerate()
        .map(|(i, v)| (i, v.distance_to(&p)))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
