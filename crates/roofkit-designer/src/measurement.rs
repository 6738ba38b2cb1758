//! Measurement aggregator
//!
//! Derives real-world totals from plane geometry, pitch and edge labels:
//! slope-corrected edge footage per type, exterior perimeter, per-plane and
//! total area, and accessory counts.
//!
//! Area has two scales. When an externally measured total square footage
//! is available it is distributed over the planes in proportion to their
//! slope-weighted pixel area. Otherwise the ground-sample-distance converts
//! the weighted pixel area directly into a provisional figure.
//!
//! An edge whose midpoint lies on an edge of another plane of the same
//! layer is shared; it is counted once, by the plane that comes first.

use std::collections::BTreeMap;

use crate::accessories::{accessory_breakdown, AccessoryBreakdown};
use crate::geometry::{point_on_segment, ring_edges};
use crate::model::{EdgeType, Plane, PlaneId, Point};
use roofkit_core::constants::SHARED_EDGE_TOLERANCE_PX;
use roofkit_core::{px_area_to_square_feet, px_length_to_feet, square_feet_to_squares};
use serde::{Deserialize, Serialize};

/// External calibration for converting pixels to real-world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleReference {
    /// Ground-sample-distance in meters per image pixel.
    pub gsd_m_per_px: Option<f64>,
    /// Measured total roof area in square feet.
    pub reference_total_sq_ft: Option<f64>,
}

impl ScaleReference {
    pub fn with_gsd(gsd_m_per_px: f64) -> Self {
        Self {
            gsd_m_per_px: Some(gsd_m_per_px),
            reference_total_sq_ft: None,
        }
    }

    pub fn with_reference_total(mut self, total_sq_ft: f64) -> Self {
        self.reference_total_sq_ft = Some(total_sq_ft);
        self
    }

    fn gsd(&self) -> Option<f64> {
        self.gsd_m_per_px.filter(|g| g.is_finite() && *g > 0.0)
    }

    fn reference_total(&self) -> Option<f64> {
        self.reference_total_sq_ft
            .filter(|t| t.is_finite() && *t >= 0.0)
    }
}

/// How the area figures were scaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AreaBasis {
    /// Distributed from an externally supplied total.
    ReferenceTotal,
    /// Provisional, from the ground-sample-distance alone.
    GroundSample,
    /// No calibration available.
    #[default]
    Unscaled,
}

/// Area breakdown for one plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneMeasurement {
    pub plane_id: PlaneId,
    pub pitch: f64,
    pub plan_area_px2: f64,
    /// Plan area multiplied by the rake factor of the plane's pitch.
    pub weighted_area_px2: f64,
    pub area_sq_ft: Option<f64>,
}

/// Derived totals for a plane set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeasurementTotals {
    /// Total roof area in squares (100 sq ft).
    pub total_squares: f64,
    /// Slope-corrected length of exterior edges in feet.
    pub total_perimeter_ft: f64,
    pub edge_totals_ft: BTreeMap<EdgeType, f64>,
    pub accessory_totals: AccessoryBreakdown,
    pub planes: Vec<PlaneMeasurement>,
    pub basis: AreaBasis,
}

impl MeasurementTotals {
    /// Total area in square feet.
    pub fn total_sq_ft(&self) -> f64 {
        self.total_squares * roofkit_core::SQUARE_FEET_PER_SQUARE
    }

    pub fn edge_total(&self, edge_type: EdgeType) -> f64 {
        self.edge_totals_ft.get(&edge_type).copied().unwrap_or(0.0)
    }
}

/// Slope multiplier applied to a plane's plan area.
pub fn area_weight(pitch: f64) -> f64 {
    EdgeType::Rake.correction_factor(pitch)
}

/// A plane edge after shared-edge resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMeasurement {
    pub plane_index: usize,
    pub edge_index: usize,
    pub edge_type: EdgeType,
    pub length_px: f64,
    pub factor: f64,
    /// Index of the other plane when the edge is shared.
    pub shared_with: Option<usize>,
}

impl EdgeMeasurement {
    pub fn corrected_length_px(&self) -> f64 {
        self.length_px * self.factor
    }
}

/// First same-layer plane and edge that `a -> b` lies on, judged by its
/// midpoint.
fn matching_edge(
    planes: &[Plane],
    plane_index: usize,
    a: Point,
    b: Point,
) -> Option<(usize, usize)> {
    let mid = a.midpoint(&b);
    let layer = planes[plane_index].layer_id();
    planes
        .iter()
        .enumerate()
        .filter(|(k, other)| *k != plane_index && other.layer_id() == layer)
        .find_map(|(k, other)| {
            ring_edges(other.ring())
                .find(|(_, p, q)| point_on_segment(mid, *p, *q, SHARED_EDGE_TOLERANCE_PX))
                .map(|(j, _, _)| (k, j))
        })
}

/// Every edge counted once, in plane then edge order.
pub fn measured_edges(planes: &[Plane]) -> Vec<EdgeMeasurement> {
    let mut out = Vec::new();
    for (i, plane) in planes.iter().enumerate() {
        for (j, a, b) in ring_edges(plane.ring()) {
            let own_type = plane.edges()[j];
            let own_factor = own_type.correction_factor(plane.pitch());
            let length_px = a.distance_to(&b);

            match matching_edge(planes, i, a, b) {
                Some((k, _)) if k < i => continue,
                Some((k, other_edge)) => {
                    let other = &planes[k];
                    let other_type = other.edges()[other_edge];
                    let edge_type = EdgeType::resolve_shared(own_type, other_type);
                    let factor = own_factor.max(other_type.correction_factor(other.pitch()));
                    out.push(EdgeMeasurement {
                        plane_index: i,
                        edge_index: j,
                        edge_type,
                        length_px,
                        factor,
                        shared_with: Some(k),
                    });
                }
                None => out.push(EdgeMeasurement {
                    plane_index: i,
                    edge_index: j,
                    edge_type: own_type,
                    length_px,
                    factor: own_factor,
                    shared_with: None,
                }),
            }
        }
    }
    out
}

/// Compute totals for `planes` under `scale`.
///
/// Deterministic: identical input always yields identical output.
pub fn compute_totals(planes: &[Plane], scale: &ScaleReference) -> MeasurementTotals {
    let mut totals = MeasurementTotals {
        accessory_totals: accessory_breakdown(planes),
        ..Default::default()
    };

    if let Some(gsd) = scale.gsd() {
        for edge in measured_edges(planes) {
            let feet = px_length_to_feet(edge.corrected_length_px(), gsd);
            *totals.edge_totals_ft.entry(edge.edge_type).or_insert(0.0) += feet;
            if edge.shared_with.is_none() {
                totals.total_perimeter_ft += feet;
            }
        }
    }

    let weighted: Vec<f64> = planes
        .iter()
        .map(|p| p.area_px2() * area_weight(p.pitch()))
        .collect();
    let weight_sum: f64 = weighted.iter().sum();

    let (basis, areas): (AreaBasis, Vec<Option<f64>>) =
        match (scale.reference_total(), scale.gsd()) {
            (Some(reference), _) if weight_sum > 0.0 => (
                AreaBasis::ReferenceTotal,
                weighted
                    .iter()
                    .map(|w| Some(reference * w / weight_sum))
                    .collect(),
            ),
            (_, Some(gsd)) => (
                AreaBasis::GroundSample,
                weighted
                    .iter()
                    .map(|w| Some(px_area_to_square_feet(*w, gsd)))
                    .collect(),
            ),
            _ => (AreaBasis::Unscaled, vec![None; planes.len()]),
        };

    totals.basis = basis;
    totals.total_squares = match (basis, scale.reference_total()) {
        (AreaBasis::ReferenceTotal, Some(reference)) => square_feet_to_squares(reference),
        _ => square_feet_to_squares(areas.iter().flatten().sum()),
    };
    totals.planes = planes
        .iter()
        .zip(weighted)
        .zip(areas)
        .map(|((plane, weighted_area_px2), area_sq_ft)| PlaneMeasurement {
            plane_id: plane.id().clone(),
            pitch: plane.pitch(),
            plan_area_px2: plane.area_px2(),
            weighted_area_px2,
            area_sq_ft,
        })
        .collect();

    tracing::debug!(
        planes = planes.len(),
        squares = totals.total_squares,
        perimeter_ft = totals.total_perimeter_ft,
        ?basis,
        "Totals recomputed"
    );
    totals
}
