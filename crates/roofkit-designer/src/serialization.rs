//! Snapshot serialization.
//!
//! A snapshot is an immutable, timestamped capture of the full plane,
//! layer and view state. Loading one replaces the editor state wholesale.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::editor_state::EditorMode;
use crate::measurement::MeasurementTotals;
use crate::model::{Layer, LayerId, Plane};
use crate::viewport::ViewBox;

/// Snapshot format version
pub const SNAPSHOT_FORMAT_VERSION: &str = "1.0";

/// Coordinate step used when compacting a snapshot for upload.
const COMPACT_STEP_PX: f64 = 0.1;

/// View settings stored with a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(default)]
    pub view_box: Option<ViewBox>,
    #[serde(default)]
    pub angle_deg: f64,
    #[serde(default)]
    pub mode: EditorMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view_box: None,
            angle_deg: 0.0,
            mode: EditorMode::Draw,
        }
    }
}

/// Full annotation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub name: Option<String>,
    pub planes: Vec<Plane>,
    pub layers: Vec<Layer>,
    pub active_layer_id: LayerId,
    #[serde(default)]
    pub view: ViewState,
    /// Totals current when the snapshot was taken.
    #[serde(default)]
    pub totals: Option<MeasurementTotals>,
}

impl Snapshot {
    pub fn new(planes: Vec<Plane>, layers: Vec<Layer>, active_layer_id: LayerId) -> Self {
        Self {
            version: SNAPSHOT_FORMAT_VERSION.to_string(),
            created_at: Utc::now(),
            name: None,
            planes,
            layers,
            active_layer_id,
            view: ViewState::default(),
            totals: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize snapshot")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse snapshot")
    }

    /// Save snapshot to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).with_context(|| {
            format!("Failed to write snapshot file {}", path.as_ref().display())
        })?;
        Ok(())
    }

    /// Load snapshot from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read snapshot file {}", path.as_ref().display())
        })?;
        Self::from_json(&content)
    }

    /// Copy with every coordinate rounded to 0.1 px, for upload.
    pub fn compacted(&self) -> Self {
        let mut compact = self.clone();
        for plane in compact.planes.iter_mut() {
            plane.map_points(|p| p.rounded(COMPACT_STEP_PX));
        }
        compact
    }
}
