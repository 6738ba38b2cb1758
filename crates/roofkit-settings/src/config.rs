//! Configuration and settings management for RoofKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, selected by file extension.
//!
//! Configuration is organized into logical sections:
//! - Snapping tolerances (vertex, segment, alignment, grid)
//! - Interaction limits (label picking, accessory hits, minimum sizes)
//! - Viewport zoom behaviour
//! - Snapshot store endpoints and local fallback

use crate::error::{ConfigError, SettingsError, SettingsResult};
use roofkit_core::constants;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Snapping tolerances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Vertex snap radius in screen pixels
    pub vertex_tolerance_px: f64,
    /// Edge projection snap distance in screen pixels
    pub segment_tolerance_px: f64,
    /// Orientation and axis-lock tolerance in screen pixels
    pub alignment_tolerance_px: f64,
    /// Grid spacing in image pixels
    pub grid_spacing_px: f64,
    /// Grid tolerance as a fraction of the alignment tolerance
    pub grid_tolerance_factor: f64,
    /// Angle bucket used to deduplicate snap directions, in degrees
    pub angle_bucket_deg: f64,
    /// Maximum number of snap directions considered
    pub max_directions: usize,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            vertex_tolerance_px: constants::VERTEX_SNAP_PX,
            segment_tolerance_px: constants::SEGMENT_SNAP_PX,
            alignment_tolerance_px: constants::ALIGNMENT_SNAP_PX,
            grid_spacing_px: constants::GRID_SPACING_PX,
            grid_tolerance_factor: constants::GRID_TOLERANCE_FACTOR,
            angle_bucket_deg: constants::ANGLE_BUCKET_DEG,
            max_directions: constants::MAX_SNAP_DIRECTIONS,
        }
    }
}

/// Pointer interaction limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Edge pick tolerance in label mode, screen pixels
    pub label_tolerance_px: f64,
    /// Accessory hit radius, screen pixels
    pub accessory_hit_radius_px: f64,
    /// Centroid grab radius for dragging a whole plane, screen pixels
    pub plane_grab_radius_px: f64,
    /// Minimum spacing between consecutive drawn points, image pixels
    pub min_segment_px: f64,
    /// Minimum plane area, square image pixels
    pub min_plane_area_px2: f64,
    /// Pitch assigned to new planes
    pub default_pitch: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            label_tolerance_px: constants::LABEL_TOLERANCE_PX,
            accessory_hit_radius_px: constants::ACCESSORY_HIT_RADIUS_PX,
            plane_grab_radius_px: constants::PLANE_GRAB_RADIUS_PX,
            min_segment_px: constants::MIN_SEGMENT_PX,
            min_plane_area_px2: constants::MIN_PLANE_AREA_PX2,
            default_pitch: constants::DEFAULT_PITCH,
        }
    }
}

/// Viewport zoom settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Maximum zoom relative to the initial fit
    pub max_zoom: f64,
    /// Exponential zoom rate per unit of wheel delta
    pub zoom_sensitivity: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            max_zoom: constants::MAX_ZOOM,
            zoom_sensitivity: constants::ZOOM_SENSITIVITY,
        }
    }
}

/// Snapshot store and service endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Base URL of the measurement API, e.g. `https://example.com/api`
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of snapshots kept by the local fallback store
    pub local_capacity: usize,
    /// Directory of the local fallback store; platform data dir when unset
    pub local_store_dir: Option<PathBuf>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api".to_string(),
            timeout_secs: 30,
            local_capacity: constants::LOCAL_SNAPSHOT_CAPACITY,
            local_store_dir: None,
        }
    }
}

impl SyncSettings {
    /// Resolve the local snapshot directory
    pub fn resolved_store_dir(&self) -> PathBuf {
        self.local_store_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("roofkit")
                .join("snapshots")
        })
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapping tolerances
    pub snapping: SnapSettings,
    /// Interaction limits
    pub interaction: InteractionSettings,
    /// Viewport behaviour
    pub viewport: ViewportSettings,
    /// Snapshot store settings
    pub sync: SyncSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roofkit")
            .join("config.toml")
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                )
                .into())
            }
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                )
                .into())
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("snapping.vertex_tolerance_px", self.snapping.vertex_tolerance_px),
            ("snapping.segment_tolerance_px", self.snapping.segment_tolerance_px),
            ("snapping.alignment_tolerance_px", self.snapping.alignment_tolerance_px),
            ("snapping.grid_spacing_px", self.snapping.grid_spacing_px),
            ("snapping.angle_bucket_deg", self.snapping.angle_bucket_deg),
            ("interaction.label_tolerance_px", self.interaction.label_tolerance_px),
            ("interaction.accessory_hit_radius_px", self.interaction.accessory_hit_radius_px),
            ("interaction.plane_grab_radius_px", self.interaction.plane_grab_radius_px),
            ("interaction.min_plane_area_px2", self.interaction.min_plane_area_px2),
            ("viewport.zoom_sensitivity", self.viewport.zoom_sensitivity),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(out_of_range(key, value));
            }
        }

        if !(0.0..=1.0).contains(&self.snapping.grid_tolerance_factor) {
            return Err(out_of_range(
                "snapping.grid_tolerance_factor",
                self.snapping.grid_tolerance_factor,
            ));
        }

        if self.snapping.max_directions == 0 {
            return Err(out_of_range("snapping.max_directions", 0));
        }

        if !(self.interaction.min_segment_px.is_finite() && self.interaction.min_segment_px >= 0.0)
        {
            return Err(out_of_range(
                "interaction.min_segment_px",
                self.interaction.min_segment_px,
            ));
        }

        if !(self.interaction.default_pitch.is_finite() && self.interaction.default_pitch >= 0.0) {
            return Err(out_of_range(
                "interaction.default_pitch",
                self.interaction.default_pitch,
            ));
        }

        if !(self.viewport.max_zoom.is_finite() && self.viewport.max_zoom >= 1.0) {
            return Err(out_of_range("viewport.max_zoom", self.viewport.max_zoom));
        }

        if self.sync.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingValue("sync.endpoint".to_string()));
        }

        if self.sync.timeout_secs == 0 {
            return Err(out_of_range("sync.timeout_secs", 0));
        }

        if self.sync.local_capacity == 0 {
            return Err(out_of_range("sync.local_capacity", 0));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn out_of_range(key: &str, value: impl std::fmt::Display) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
