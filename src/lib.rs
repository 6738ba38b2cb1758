//! # RoofKit
//!
//! Roof-plane measurement and annotation engine. Roof facets are drawn as
//! polygons over an aerial or drone image, labelled by edge type and pitch,
//! and turned into slope-corrected area, perimeter and accessory totals.
//!
//! ## Architecture
//!
//! RoofKit is organized as a workspace with multiple crates:
//!
//! 1. **roofkit-core** - Error types, constants and unit formatting
//! 2. **roofkit-settings** - Configuration file handling and validation
//! 3. **roofkit-designer** - Geometry, snapping, topology, editor state and
//!    measurement
//! 4. **roofkit-communication** - Snapshot store, recompute and report
//!    services, local fallback storage
//! 5. **roofkit** - This crate: wiring and the command-line takeoff tool

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub use roofkit_communication as communication;
pub use roofkit_designer as designer;
pub use roofkit_settings as settings;

pub use roofkit_communication::{HttpClient, LocalSnapshotStore, SaveWorkflow, SyncError};
pub use roofkit_core::{EditError, Error, GeometryError, Result, TopologyError};
pub use roofkit_designer::{
    compute_totals, EditorConfig, EditorMode, EditorState, MeasurementTotals, Point,
    ScaleReference, SnapConfig, Snapshot,
};
pub use roofkit_settings::{Config, SyncSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// File name of the local fallback store inside the store directory.
pub const LOCAL_STORE_FILE: &str = "snapshots.json";

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting, on stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Editor tolerances from a loaded configuration.
pub fn editor_config(config: &Config) -> EditorConfig {
    let snapping = &config.snapping;
    let interaction = &config.interaction;
    EditorConfig {
        snap: SnapConfig {
            vertex_tolerance_px: snapping.vertex_tolerance_px,
            segment_tolerance_px: snapping.segment_tolerance_px,
            alignment_tolerance_px: snapping.alignment_tolerance_px,
            grid_spacing: snapping.grid_spacing_px,
            grid_tolerance_factor: snapping.grid_tolerance_factor,
            angle_bucket_deg: snapping.angle_bucket_deg,
            max_directions: snapping.max_directions,
        },
        label_tolerance_px: interaction.label_tolerance_px,
        accessory_hit_radius_px: interaction.accessory_hit_radius_px,
        plane_grab_radius_px: interaction.plane_grab_radius_px,
        min_segment_px: interaction.min_segment_px,
        min_plane_area_px2: interaction.min_plane_area_px2,
        default_pitch: interaction.default_pitch,
        max_zoom: config.viewport.max_zoom,
        zoom_sensitivity: config.viewport.zoom_sensitivity,
    }
}

/// Path of the local fallback store file.
pub fn local_store_path(sync: &SyncSettings) -> PathBuf {
    sync.resolved_store_dir().join(LOCAL_STORE_FILE)
}

/// Save workflow for one measurement: the measurement API for storage,
/// recompute and reports, with the local store as fallback.
pub fn save_workflow(sync: &SyncSettings, measurement_id: &str) -> anyhow::Result<SaveWorkflow> {
    let client = Arc::new(HttpClient::new(
        sync.endpoint.clone(),
        measurement_id,
        Duration::from_secs(sync.timeout_secs),
    ));
    let local = Arc::new(LocalSnapshotStore::open(
        local_store_path(sync),
        sync.local_capacity,
    )?);
    Ok(SaveWorkflow::new(client.clone(), client.clone())
        .with_fallback(local)
        .with_reports(client))
}
