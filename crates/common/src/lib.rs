//! Shared types and configuration for the wayfarer scene.
//!
//! # Invariants
//! - All tuning values are construction-time constants; nothing here is
//!   reconfigured mid-run.
//! - Run speed is always derived from walk speed, never configured separately.

pub mod config;
pub mod types;

pub use config::{
    CameraConfig, ClipNames, ConfigError, LocomotionConfig, SceneConfig, TerrainConfig,
};
pub use types::{CameraState, CharacterPose};

pub fn crate_info() -> &'static str {
    "wayfarer-common v0.1.0"
}
