//! Geometry kernel
//!
//! Stateless 2D functions over rings of [`Point`]s in image-pixel space:
//! containment, segment projection and intersection, area and centroid,
//! convex hull and the ring cleanup fits (oriented rectangle, triangle,
//! orthogonal outline).
//!
//! Rings are implicitly closed: the edge `i` runs from `ring[i]` to
//! `ring[(i + 1) % n]` and the closing point is never repeated.

use crate::model::Point;
use nalgebra::{Matrix2, SymmetricEigen};
use roofkit_core::constants::BOUNDARY_EPSILON;
use roofkit_core::GeometryError;

/// Angle (as a sine) below which two segments are treated as parallel.
const PARALLEL_SINE: f64 = 1e-9;

/// Z component of `(a - o) x (b - o)`. Positive when `o -> a -> b` turns
/// counter-clockwise in a y-up frame.
pub fn orientation(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Iterate the edges of an implicitly closed ring as `(index, start, end)`.
pub fn ring_edges(ring: &[Point]) -> impl Iterator<Item = (usize, Point, Point)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (i, ring[i], ring[(i + 1) % n]))
}

/// Ray-casting parity test. Points exactly on the boundary may land on
/// either side; callers that care check the boundary separately.
pub fn point_in_polygon(p: Point, ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Projection of a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Closest point on the segment.
    pub point: Point,
    /// Distance from the query point to `point`.
    pub distance: f64,
    /// Position of `point` along the segment, clamped to `[0, 1]`.
    pub t: f64,
}

/// Point-to-segment distance via clamped scalar projection.
pub fn segment_distance(p: Point, a: Point, b: Point) -> SegmentProjection {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len2 = abx * abx + aby * aby;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let point = Point::new(a.x + t * abx, a.y + t * aby);
    SegmentProjection {
        point,
        distance: p.distance_to(&point),
        t,
    }
}

pub fn point_on_segment(p: Point, a: Point, b: Point, tolerance: f64) -> bool {
    segment_distance(p, a, b).distance <= tolerance
}

/// True when `p` lies within `tolerance` of any edge of `ring`.
pub fn point_on_ring_boundary(p: Point, ring: &[Point], tolerance: f64) -> bool {
    ring_edges(ring).any(|(_, a, b)| point_on_segment(p, a, b, tolerance))
}

/// True when `p` is inside `ring` and not on its boundary.
pub fn point_strictly_inside(p: Point, ring: &[Point], tolerance: f64) -> bool {
    point_in_polygon(p, ring) && !point_on_ring_boundary(p, ring, tolerance)
}

/// Relation between two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// No common point.
    Disjoint,
    /// A single common point that is an endpoint of at least one segment:
    /// shared corners and T-junctions.
    Touching(Point),
    /// Interiors cross at a single point.
    Crossing(Point),
    /// The segments share a sub-segment of positive length.
    CollinearOverlap,
}

impl SegmentIntersection {
    pub fn is_crossing(&self) -> bool {
        matches!(self, SegmentIntersection::Crossing(_))
    }

    pub fn is_disjoint(&self) -> bool {
        matches!(self, SegmentIntersection::Disjoint)
    }
}

/// Orientation-based segment intersection with a boundary tolerance.
///
/// Pure endpoint contact is reported as [`SegmentIntersection::Touching`],
/// never as a crossing, so polygons may meet at corners; collinear overlap
/// is reported separately so shared edges can be told apart from crossings.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> SegmentIntersection {
    let tol = BOUNDARY_EPSILON;
    let (rx, ry) = (a2.x - a1.x, a2.y - a1.y);
    let (sx, sy) = (b2.x - b1.x, b2.y - b1.y);
    let len_r = rx.hypot(ry);
    let len_s = sx.hypot(sy);

    if len_r <= tol || len_s <= tol {
        let (p, q1, q2) = if len_r <= tol { (a1, b1, b2) } else { (b1, a1, a2) };
        return if point_on_segment(p, q1, q2, tol) {
            SegmentIntersection::Touching(p)
        } else {
            SegmentIntersection::Disjoint
        };
    }

    let denom = rx * sy - ry * sx;
    let (qx, qy) = (b1.x - a1.x, b1.y - a1.y);

    if (denom / (len_r * len_s)).abs() < PARALLEL_SINE {
        // Parallel: collinear only if b1 lies on the line through a
        let line_distance = (qx * ry - qy * rx).abs() / len_r;
        if line_distance > tol {
            return SegmentIntersection::Disjoint;
        }
        let r2 = len_r * len_r;
        let t0 = (qx * rx + qy * ry) / r2;
        let t1 = ((b2.x - a1.x) * rx + (b2.y - a1.y) * ry) / r2;
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);
        let overlap = (hi - lo) * len_r;
        return if overlap > tol {
            SegmentIntersection::CollinearOverlap
        } else if overlap >= -tol {
            SegmentIntersection::Touching(Point::new(a1.x + lo * rx, a1.y + lo * ry))
        } else {
            SegmentIntersection::Disjoint
        };
    }

    let t = (qx * sy - qy * sx) / denom;
    let u = (qx * ry - qy * rx) / denom;
    let t_tol = tol / len_r;
    let u_tol = tol / len_s;
    if t < -t_tol || t > 1.0 + t_tol || u < -u_tol || u > 1.0 + u_tol {
        return SegmentIntersection::Disjoint;
    }

    let at_a_end = t <= t_tol || t >= 1.0 - t_tol;
    let at_b_end = u <= u_tol || u >= 1.0 - u_tol;
    let point = Point::new(a1.x + t * rx, a1.y + t * ry);
    if at_a_end || at_b_end {
        SegmentIntersection::Touching(point)
    } else {
        SegmentIntersection::Crossing(point)
    }
}

/// Shoelace area, positive for counter-clockwise rings in a y-up frame.
pub fn signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    ring_edges(ring)
        .map(|(_, a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
        / 2.0
}

/// Absolute shoelace area in square pixels.
pub fn polygon_area(ring: &[Point]) -> f64 {
    signed_area(ring).abs()
}

/// Area centroid. Falls back to the vertex average for degenerate rings.
pub fn polygon_centroid(ring: &[Point]) -> Point {
    if ring.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let area = signed_area(ring);
    if area.abs() < 1e-12 {
        let n = ring.len() as f64;
        let (sx, sy) = ring
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return Point::new(sx / n, sy / n);
    }
    let (cx, cy) = ring_edges(ring).fold((0.0, 0.0), |(cx, cy), (_, a, b)| {
        let f = a.x * b.y - b.x * a.y;
        (cx + (a.x + b.x) * f, cy + (a.y + b.y) * f)
    });
    Point::new(cx / (6.0 * area), cy / (6.0 * area))
}

pub fn polygon_perimeter(ring: &[Point]) -> f64 {
    ring_edges(ring).map(|(_, a, b)| a.distance_to(&b)).sum()
}

/// A point guaranteed to be strictly inside a simple ring: the centroid
/// when it qualifies, otherwise the middle of the widest horizontal chord
/// through the centroid's row.
pub fn interior_point(ring: &[Point]) -> Point {
    let centroid = polygon_centroid(ring);
    if point_strictly_inside(centroid, ring, BOUNDARY_EPSILON) {
        return centroid;
    }

    let mut y = centroid.y;
    if ring.iter().any(|p| (p.y - y).abs() < BOUNDARY_EPSILON) {
        y += BOUNDARY_EPSILON * 10.0;
    }
    let mut xs: Vec<f64> = ring_edges(ring)
        .filter(|(_, a, b)| (a.y > y) != (b.y > y))
        .map(|(_, a, b)| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
        .collect();
    xs.sort_by(f64::total_cmp);

    xs.chunks_exact(2)
        .max_by(|l, r| (l[1] - l[0]).total_cmp(&(r[1] - r[0])))
        .map(|pair| Point::new((pair[0] + pair[1]) / 2.0, y))
        .unwrap_or(centroid)
}

/// First pair of edges `(i, j)` with `i < j` that violates simplicity:
/// non-adjacent edges that meet, or adjacent edges that fold back onto
/// each other.
pub fn first_self_intersection(ring: &[Point]) -> Option<(usize, usize)> {
    let n = ring.len();
    for i in 0..n {
        let (a1, a2) = (ring[i], ring[(i + 1) % n]);
        for j in (i + 1)..n {
            let (b1, b2) = (ring[j], ring[(j + 1) % n]);
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            let hit = segments_intersect(a1, a2, b1, b2);
            let bad = if adjacent {
                matches!(hit, SegmentIntersection::CollinearOverlap)
            } else {
                !hit.is_disjoint()
            };
            if bad {
                return Some((i, j));
            }
        }
    }
    None
}

pub fn is_simple(ring: &[Point]) -> bool {
    first_self_intersection(ring).is_none()
}

/// Drop consecutive duplicates and a repeated closing point.
pub fn normalize_ring(points: &[Point]) -> Vec<Point> {
    let mut ring: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if ring
            .last()
            .map_or(true, |last| last.distance_to(p) > BOUNDARY_EPSILON)
        {
            ring.push(*p);
        }
    }
    while ring.len() > 1 && ring[0].distance_to(&ring[ring.len() - 1]) <= BOUNDARY_EPSILON {
        ring.pop();
    }
    ring
}

/// Check that a ring can be a plane: finite, at least three distinct
/// vertices, no repeated vertex, area of at least `min_area`, simple.
pub fn validate_ring(ring: &[Point], min_area: f64) -> Result<(), GeometryError> {
    if let Some(index) = ring.iter().position(|p| !p.is_finite()) {
        return Err(GeometryError::NonFinite { index });
    }

    let n = ring.len();
    if n < 3 {
        return Err(GeometryError::TooFewPoints { count: n });
    }

    if let Some((index, _, _)) =
        ring_edges(ring).find(|(_, a, b)| a.distance_to(b) <= BOUNDARY_EPSILON)
    {
        let distinct = normalize_ring(ring).len();
        if distinct < 3 {
            return Err(GeometryError::TooFewPoints { count: distinct });
        }
        return Err(GeometryError::DuplicateVertex {
            index: (index + 1) % n,
        });
    }

    let area = polygon_area(ring);
    if area < min_area {
        return Err(GeometryError::DegenerateArea { area, min_area });
    }

    if let Some((first, second)) = first_self_intersection(ring) {
        return Err(GeometryError::SelfIntersecting { first, second });
    }

    Ok(())
}

/// Convex hull by Andrew's monotone chain. Counter-clockwise in a y-up
/// frame, collinear points dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| a.distance_to(b) <= BOUNDARY_EPSILON);
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2
            && orientation(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2
            && orientation(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Mean of the points and the angle (radians) of the principal axis of
/// their covariance.
pub fn principal_axis(points: &[Point]) -> Option<(Point, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let mean = Point::new(sx / n, sy / n);

    let (mut cxx, mut cxy, mut cyy) = (0.0, 0.0, 0.0);
    for p in points {
        let dx = p.x - mean.x;
        let dy = p.y - mean.y;
        cxx += dx * dx;
        cxy += dx * dy;
        cyy += dy * dy;
    }
    let cov = Matrix2::new(cxx / n, cxy / n, cxy / n, cyy / n);
    let eigen = SymmetricEigen::new(cov);
    let major = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
        0
    } else {
        1
    };
    let axis = eigen.eigenvectors.column(major);
    Some((mean, axis[1].atan2(axis[0])))
}

/// Express `p` in the frame centred at `origin` with x along `angle`.
fn to_frame(p: Point, origin: Point, angle: f64) -> Point {
    let (sin_a, cos_a) = angle.sin_cos();
    let dx = p.x - origin.x;
    let dy = p.y - origin.y;
    Point::new(dx * cos_a + dy * sin_a, -dx * sin_a + dy * cos_a)
}

fn from_frame(p: Point, origin: Point, angle: f64) -> Point {
    let (sin_a, cos_a) = angle.sin_cos();
    Point::new(
        origin.x + p.x * cos_a - p.y * sin_a,
        origin.y + p.x * sin_a + p.y * cos_a,
    )
}

/// Replace a ring with the four corners of its bounding box aligned to the
/// principal axis.
pub fn fit_oriented_rectangle(ring: &[Point]) -> Vec<Point> {
    let Some((origin, angle)) = principal_axis(ring) else {
        return ring.to_vec();
    };
    let local: Vec<Point> = ring.iter().map(|p| to_frame(*p, origin, angle)).collect();
    let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in &local {
        min_u = min_u.min(p.x);
        max_u = max_u.max(p.x);
        min_v = min_v.min(p.y);
        max_v = max_v.max(p.y);
    }
    [
        Point::new(min_u, min_v),
        Point::new(max_u, min_v),
        Point::new(max_u, max_v),
        Point::new(min_u, max_v),
    ]
    .iter()
    .map(|p| from_frame(*p, origin, angle))
    .collect()
}

fn triangle_perimeter(a: Point, b: Point, c: Point) -> f64 {
    a.distance_to(&b) + b.distance_to(&c) + c.distance_to(&a)
}

/// Reduce a ring to a triangle: take the convex hull, seed with three
/// evenly spaced hull vertices and repeatedly substitute whichever hull
/// vertex most increases the triangle's perimeter.
pub fn fit_triangle(ring: &[Point]) -> Vec<Point> {
    let hull = convex_hull(ring);
    let n = hull.len();
    if n <= 3 {
        return hull;
    }

    let mut picks = [0, n / 3, 2 * n / 3];
    for _ in 0..3 {
        let mut improved = false;
        for slot in 0..3 {
            let mut best = triangle_perimeter(hull[picks[0]], hull[picks[1]], hull[picks[2]]);
            for candidate in 0..n {
                if picks.contains(&candidate) {
                    continue;
                }
                let mut trial = picks;
                trial[slot] = candidate;
                let perimeter = triangle_perimeter(hull[trial[0]], hull[trial[1]], hull[trial[2]]);
                if perimeter > best + 1e-9 {
                    best = perimeter;
                    picks = trial;
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }

    picks.sort_unstable();
    picks.iter().map(|&i| hull[i]).collect()
}

/// Square up a ring: in the principal-axis frame each edge becomes
/// horizontal or vertical, whichever displacement component dominates.
/// The last vertex also squares the closing edge against the first.
pub fn orthogonalize(ring: &[Point]) -> Vec<Point> {
    let Some((origin, angle)) = principal_axis(ring) else {
        return ring.to_vec();
    };
    let local: Vec<Point> = ring.iter().map(|p| to_frame(*p, origin, angle)).collect();
    let n = local.len();

    let mut out: Vec<Point> = Vec::with_capacity(n);
    let mut last_horizontal = false;
    out.push(local[0]);
    for cur in local.iter().skip(1) {
        let prev = out[out.len() - 1];
        last_horizontal = (cur.x - prev.x).abs() > (cur.y - prev.y).abs();
        out.push(if last_horizontal {
            Point::new(cur.x, prev.y)
        } else {
            Point::new(prev.x, cur.y)
        });
    }

    if n >= 3 {
        let first = out[0];
        let last = n - 1;
        if last_horizontal {
            out[last].x = first.x;
        } else {
            out[last].y = first.y;
        }
    }

    out.iter().map(|p| from_frame(*p, origin, angle)).collect()
}
