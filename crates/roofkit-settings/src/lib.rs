//! RoofKit Settings Crate
//!
//! Handles editor configuration: snapping tolerances, interaction limits,
//! viewport zoom behaviour and the remote/local snapshot store settings.

pub mod config;
pub mod error;

pub use config::{Config, InteractionSettings, SnapSettings, SyncSettings, ViewportSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
