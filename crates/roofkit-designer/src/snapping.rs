//! Snapping resolver
//!
//! Resolves a raw world point against the scene in strict priority order:
//! existing vertices, existing edges, orientation-aligned lines, axis lock
//! to the previous point and finally a fixed grid. The first rule that
//! matches wins, so vertex and edge reuse always beat visual alignment.
//!
//! Tolerances are configured in screen pixels and converted to image pixels
//! through the current viewport scale on every call.

use crate::geometry::segment_distance;
use crate::model::{Plane, PlaneId, Point};
use roofkit_core::constants;

/// Snapping tolerances and grid settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapConfig {
    /// Vertex snap radius in screen pixels.
    pub vertex_tolerance_px: f64,
    /// Edge projection distance in screen pixels.
    pub segment_tolerance_px: f64,
    /// Orientation and axis-lock tolerance in screen pixels.
    pub alignment_tolerance_px: f64,
    /// Grid spacing in image pixels.
    pub grid_spacing: f64,
    /// Grid tolerance as a fraction of the alignment tolerance.
    pub grid_tolerance_factor: f64,
    /// Width of the angle buckets used to deduplicate directions.
    pub angle_bucket_deg: f64,
    /// Maximum number of directions tried by the orientation snap.
    pub max_directions: usize,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            vertex_tolerance_px: constants::VERTEX_SNAP_PX,
            segment_tolerance_px: constants::SEGMENT_SNAP_PX,
            alignment_tolerance_px: constants::ALIGNMENT_SNAP_PX,
            grid_spacing: constants::GRID_SPACING_PX,
            grid_tolerance_factor: constants::GRID_TOLERANCE_FACTOR,
            angle_bucket_deg: constants::ANGLE_BUCKET_DEG,
            max_directions: constants::MAX_SNAP_DIRECTIONS,
        }
    }
}

/// A vertex of an existing plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexRef {
    pub plane_id: PlaneId,
    pub index: usize,
}

/// What a resolved point snapped to.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapTarget {
    /// An existing plane vertex.
    Vertex(VertexRef),
    /// A point of the drawing in progress.
    DrawingVertex(usize),
    /// The projection onto an existing plane edge.
    Segment { plane_id: PlaneId, edge_index: usize },
    /// A line through the previous point parallel or perpendicular to `angle_deg`.
    Orientation { angle_deg: f64 },
    /// The previous point's x and/or y coordinate.
    Axis { x: bool, y: bool },
    /// The fixed grid.
    Grid,
    /// Nothing matched; the raw point is used.
    Free,
}

/// Final placement of a pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub point: Point,
    pub target: SnapTarget,
}

impl SnapResult {
    pub fn free(point: Point) -> Self {
        Self {
            point,
            target: SnapTarget::Free,
        }
    }

    /// The plane vertex this point reuses, if any.
    pub fn vertex_ref(&self) -> Option<&VertexRef> {
        match &self.target {
            SnapTarget::Vertex(vref) => Some(vref),
            _ => None,
        }
    }
}

/// Scene the resolver snaps against.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    /// Every committed plane, on any layer.
    pub planes: &'a [Plane],
    /// Points of the drawing in progress, oldest first.
    pub drawing: &'a [Point],
    /// Image pixels per screen pixel at the current zoom.
    pub world_per_px: f64,
    /// Vertex being dragged; it and its two edges are ignored.
    pub exclude_vertex: Option<(&'a PlaneId, usize)>,
}

impl<'a> SnapContext<'a> {
    pub fn new(planes: &'a [Plane], drawing: &'a [Point], world_per_px: f64) -> Self {
        Self {
            planes,
            drawing,
            world_per_px,
            exclude_vertex: None,
        }
    }

    pub fn excluding_vertex(mut self, plane_id: &'a PlaneId, index: usize) -> Self {
        self.exclude_vertex = Some((plane_id, index));
        self
    }

    fn is_excluded_vertex(&self, plane: &Plane, index: usize) -> bool {
        self.exclude_vertex
            .is_some_and(|(id, i)| id == plane.id() && i == index)
    }

    fn is_excluded_edge(&self, plane: &Plane, edge_index: usize) -> bool {
        self.exclude_vertex.is_some_and(|(id, i)| {
            let n = plane.ring().len();
            id == plane.id() && (edge_index == i || (edge_index + 1) % n == i)
        })
    }

    fn anchor(&self) -> Option<Point> {
        self.drawing.last().copied()
    }
}

/// Resolve `raw` against the scene, trying each rule in priority order.
pub fn resolve(raw: Point, ctx: &SnapContext<'_>, config: &SnapConfig) -> SnapResult {
    let scale = ctx.world_per_px;
    let vertex_tol = config.vertex_tolerance_px * scale;
    let segment_tol = config.segment_tolerance_px * scale;
    let align_tol = config.alignment_tolerance_px * scale;

    snap_to_vertex(raw, ctx, vertex_tol)
        .or_else(|| snap_to_segment(raw, ctx, segment_tol, vertex_tol))
        .or_else(|| snap_to_orientation(raw, ctx, config, align_tol))
        .or_else(|| snap_to_axis(raw, ctx, align_tol))
        .or_else(|| snap_to_grid(raw, config, align_tol * config.grid_tolerance_factor))
        .unwrap_or_else(|| SnapResult::free(raw))
}

/// Nearest plane vertex or drawing point within `tolerance`. Plane
/// vertices win ties so shared-ring tracing sees the structural reference.
pub fn snap_to_vertex(raw: Point, ctx: &SnapContext<'_>, tolerance: f64) -> Option<SnapResult> {
    let mut best: Option<(f64, SnapResult)> = None;
    let mut consider = |distance: f64, result: SnapResult| {
        if distance <= tolerance && best.as_ref().map_or(true, |(d, _)| distance < *d) {
            best = Some((distance, result));
        }
    };

    for plane in ctx.planes {
        for (index, p) in plane.ring().iter().enumerate() {
            if ctx.is_excluded_vertex(plane, index) {
                continue;
            }
            consider(
                raw.distance_to(p),
                SnapResult {
                    point: *p,
                    target: SnapTarget::Vertex(VertexRef {
                        plane_id: plane.id().clone(),
                        index,
                    }),
                },
            );
        }
    }
    for (index, p) in ctx.drawing.iter().enumerate() {
        consider(
            raw.distance_to(p),
            SnapResult {
                point: *p,
                target: SnapTarget::DrawingVertex(index),
            },
        );
    }

    best.map(|(_, result)| result)
}

/// Projection onto the nearest plane edge within `tolerance`. A projection
/// within `endpoint_tolerance` of the edge's own endpoint becomes that vertex.
pub fn snap_to_segment(
    raw: Point,
    ctx: &SnapContext<'_>,
    tolerance: f64,
    endpoint_tolerance: f64,
) -> Option<SnapResult> {
    let mut best: Option<(f64, &Plane, usize, Point)> = None;
    for plane in ctx.planes {
        for (edge_index, a, b) in crate::geometry::ring_edges(plane.ring()) {
            if ctx.is_excluded_edge(plane, edge_index) {
                continue;
            }
            let proj = segment_distance(raw, a, b);
            if proj.distance <= tolerance
                && best.as_ref().map_or(true, |(d, ..)| proj.distance < *d)
            {
                best = Some((proj.distance, plane, edge_index, proj.point));
            }
        }
    }

    let (_, plane, edge_index, point) = best?;
    let n = plane.ring().len();
    let start = plane.ring()[edge_index];
    let end_index = (edge_index + 1) % n;
    let end = plane.ring()[end_index];

    let endpoint = [(edge_index, start), (end_index, end)]
        .into_iter()
        .filter(|(index, p)| {
            point.distance_to(p) <= endpoint_tolerance && !ctx.is_excluded_vertex(plane, *index)
        })
        .min_by(|(_, a), (_, b)| point.distance_to(a).total_cmp(&point.distance_to(b)));

    Some(match endpoint {
        Some((index, p)) => SnapResult {
            point: p,
            target: SnapTarget::Vertex(VertexRef {
                plane_id: plane.id().clone(),
                index,
            }),
        },
        None => SnapResult {
            point,
            target: SnapTarget::Segment {
                plane_id: plane.id().clone(),
                edge_index,
            },
        },
    })
}

/// Candidate directions for the orientation snap, as angles in degrees:
/// the most recent drawn edge first, then every plane edge, then the rest
/// of the drawing. Directions that agree modulo 90° within one bucket are
/// collapsed, and at most `config.max_directions` are kept.
pub fn snap_directions(ctx: &SnapContext<'_>, config: &SnapConfig) -> Vec<f64> {
    let mut edges: Vec<(Point, Point)> = Vec::new();
    let drawing = ctx.drawing;
    if drawing.len() >= 2 {
        edges.push((drawing[drawing.len() - 2], drawing[drawing.len() - 1]));
    }
    for plane in ctx.planes {
        edges.extend(
            crate::geometry::ring_edges(plane.ring()).map(|(_, a, b)| (a, b)),
        );
    }
    edges.extend(drawing.windows(2).map(|w| (w[0], w[1])));

    let bucket_count = (90.0 / config.angle_bucket_deg).ceil().max(1.0) as usize;
    let mut seen = vec![false; bucket_count];
    let mut angles = Vec::new();
    for (a, b) in edges {
        if angles.len() >= config.max_directions {
            break;
        }
        if a.distance_to(&b) <= f64::EPSILON {
            continue;
        }
        let angle = (b.y - a.y).atan2(b.x - a.x).to_degrees();
        let bucket =
            ((angle.rem_euclid(90.0) / config.angle_bucket_deg).round() as usize) % bucket_count;
        if !seen[bucket] {
            seen[bucket] = true;
            angles.push(angle);
        }
    }
    angles
}

/// Project onto the nearest line through the previous point that is
/// parallel or perpendicular to a scene direction.
pub fn snap_to_orientation(
    raw: Point,
    ctx: &SnapContext<'_>,
    config: &SnapConfig,
    tolerance: f64,
) -> Option<SnapResult> {
    let anchor = ctx.anchor()?;
    let mut best: Option<(f64, Point, f64)> = None;

    for angle in snap_directions(ctx, config) {
        for candidate in [angle, angle + 90.0] {
            let (dy, dx) = candidate.to_radians().sin_cos();
            let along = (raw.x - anchor.x) * dx + (raw.y - anchor.y) * dy;
            let proj = Point::new(anchor.x + along * dx, anchor.y + along * dy);
            let distance = raw.distance_to(&proj);
            if distance <= tolerance && best.as_ref().map_or(true, |(d, ..)| distance < *d) {
                best = Some((distance, proj, candidate));
            }
        }
    }

    best.map(|(_, point, angle_deg)| SnapResult {
        point,
        target: SnapTarget::Orientation { angle_deg },
    })
}

/// Lock x and/or y to the previous point.
pub fn snap_to_axis(raw: Point, ctx: &SnapContext<'_>, tolerance: f64) -> Option<SnapResult> {
    let anchor = ctx.anchor()?;
    let lock_x = (raw.x - anchor.x).abs() <= tolerance;
    let lock_y = (raw.y - anchor.y).abs() <= tolerance;
    if !lock_x && !lock_y {
        return None;
    }
    Some(SnapResult {
        point: Point::new(
            if lock_x { anchor.x } else { raw.x },
            if lock_y { anchor.y } else { raw.y },
        ),
        target: SnapTarget::Axis {
            x: lock_x,
            y: lock_y,
        },
    })
}

/// Round each coordinate to the grid when it is within `tolerance` of a line.
pub fn snap_to_grid(raw: Point, config: &SnapConfig, tolerance: f64) -> Option<SnapResult> {
    let spacing = config.grid_spacing;
    if spacing <= 0.0 {
        return None;
    }
    let gx = (raw.x / spacing).round() * spacing;
    let gy = (raw.y / spacing).round() * spacing;
    let snap_x = (raw.x - gx).abs() <= tolerance;
    let snap_y = (raw.y - gy).abs() <= tolerance;
    if !snap_x && !snap_y {
        return None;
    }
    Some(SnapResult {
        point: Point::new(
            if snap_x { gx } else { raw.x },
            if snap_y { gy } else { raw.y },
        ),
        target: SnapTarget::Grid,
    })
}
