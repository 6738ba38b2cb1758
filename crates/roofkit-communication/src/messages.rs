//! Request and response bodies exchanged with the measurement API.

use chrono::{DateTime, Utc};
use roofkit_designer::{AccessoryBreakdown, Layer, LayerId, MeasurementTotals, Plane, Snapshot};
use serde::{Deserialize, Serialize};

/// Listing entry for a stored snapshot version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of a version listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionList {
    #[serde(default)]
    pub versions: Vec<VersionSummary>,
}

/// A stored version with its snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub payload: Snapshot,
}

impl VersionRecord {
    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            id: self.id.clone(),
            name: self.payload.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Plane and layer set sent for authoritative totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeRequest {
    pub planes: Vec<Plane>,
    pub layers: Vec<Layer>,
}

impl From<&Snapshot> for RecomputeRequest {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            planes: snapshot.planes.clone(),
            layers: snapshot.layers.clone(),
        }
    }
}

/// One line of the report's plane table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneSummary {
    /// 1-based position in the plane list.
    pub index: usize,
    pub pitch: f64,
    pub vertex_count: usize,
    pub layer_id: LayerId,
}

impl PlaneSummary {
    pub fn from_planes(planes: &[Plane]) -> Vec<Self> {
        planes
            .iter()
            .enumerate()
            .map(|(i, plane)| Self {
                index: i + 1,
                pitch: plane.pitch(),
                vertex_count: plane.ring().len(),
                layer_id: plane.layer_id().clone(),
            })
            .collect()
    }
}

/// Everything the report generator renders from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub planes: Vec<Plane>,
    pub totals: MeasurementTotals,
    pub accessory_breakdown: AccessoryBreakdown,
    pub plane_summaries: Vec<PlaneSummary>,
    pub image_rotation_deg: f64,
    /// Rendered overlay as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_image: Option<String>,
    pub save_to_files: bool,
}

impl ReportRequest {
    pub fn new(snapshot: &Snapshot, totals: MeasurementTotals) -> Self {
        Self {
            plane_summaries: PlaneSummary::from_planes(&snapshot.planes),
            accessory_breakdown: roofkit_designer::accessory_breakdown(&snapshot.planes),
            planes: snapshot.planes.clone(),
            totals,
            image_rotation_deg: snapshot.view.angle_deg,
            overlay_image: None,
            save_to_files: true,
        }
    }

    pub fn with_overlay(mut self, data_url: impl Into<String>) -> Self {
        self.overlay_image = Some(data_url.into());
        self
    }
}

/// Reference to a generated report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportReference {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub file_id: Option<String>,
}

impl ReportReference {
    /// Download link for the stored file, relative to the API base.
    pub fn link(&self, base_url: &str) -> Option<String> {
        self.file_id
            .as_ref()
            .map(|id| format!("{}/files/{}", base_url.trim_end_matches('/'), id))
    }
}
