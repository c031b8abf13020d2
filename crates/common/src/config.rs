use crate::types::CameraState;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Top-level scene configuration. Every section falls back to its defaults,
/// so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub locomotion: LocomotionConfig,
    pub camera: CameraConfig,
    pub terrain: TerrainConfig,
}

impl SceneConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.locomotion.validate()?;
        self.camera.validate()?;
        self.terrain.validate()
    }
}

/// Exact clip names looked up in the loaded clip set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipNames {
    pub idle: String,
    pub walk: String,
    pub run: String,
    pub jump: String,
}

impl Default for ClipNames {
    fn default() -> Self {
        Self {
            idle: "Human Armature|Idle".into(),
            walk: "Human Armature|Walk".into(),
            run: "Human Armature|Run".into(),
            jump: "Human Armature|Jump".into(),
        }
    }
}

/// Character motion and animation blending parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Translation per tick in world units, and turn rate per tick in radians.
    pub walk_speed: f32,
    /// Fade-in/fade-out duration for clip crossfades, in animation time units.
    pub blend_duration: f32,
    /// Animation time advanced by the mixer on every tick.
    pub mixer_step: f32,
    pub clips: ClipNames,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 0.05,
            blend_duration: 0.3,
            mixer_step: 0.01,
            clips: ClipNames::default(),
        }
    }
}

impl LocomotionConfig {
    /// Run speed is exactly double the walk speed.
    pub fn run_speed(&self) -> f32 {
        self.walk_speed * 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.walk_speed.is_finite() || self.walk_speed <= 0.0 {
            return Err(ConfigError::invalid(
                "locomotion.walk_speed",
                format!("must be finite and positive, got {}", self.walk_speed),
            ));
        }
        if !self.blend_duration.is_finite() || self.blend_duration <= 0.0 {
            return Err(ConfigError::invalid(
                "locomotion.blend_duration",
                format!("must be positive, got {}", self.blend_duration),
            ));
        }
        if !self.mixer_step.is_finite() || self.mixer_step < 0.0 {
            return Err(ConfigError::invalid(
                "locomotion.mixer_step",
                format!("must not be negative, got {}", self.mixer_step),
            ));
        }
        Ok(())
    }
}

/// Chase camera rig parameters. Offsets are in character-local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub initial_position: Vec3,
    pub offset: Vec3,
    pub look_at: Vec3,
    /// Fraction of the remaining distance covered per tick.
    pub smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_position: Vec3::new(0.0, 5.0, 10.0),
            offset: Vec3::new(-3.0, 5.0, -5.0),
            look_at: Vec3::new(0.0, 2.0, 10.0),
            smoothing: 0.1,
        }
    }
}

impl CameraConfig {
    /// Camera placement before the first tick: at the configured start,
    /// looking at the origin.
    pub fn initial_state(&self) -> CameraState {
        CameraState {
            position: self.initial_position,
            look_at_target: Vec3::ZERO,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing > 0.0 && self.smoothing < 1.0) {
            return Err(ConfigError::invalid(
                "camera.smoothing",
                format!("must be in (0, 1), got {}", self.smoothing),
            ));
        }
        Ok(())
    }
}

/// Height-field grid dimensions and noise seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: f32,
    pub height: f32,
    pub segments_x: u32,
    pub segments_y: u32,
    /// Fixed noise seed. `None` draws a fresh seed per run.
    pub seed: Option<u32>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::with_size(100, 100)
    }
}

impl TerrainConfig {
    /// Grid sized like the reference scene: half as many segments as units
    /// along X, one extra segment along Y.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            segments_x: width / 2,
            segments_y: height / 2 + 1,
            seed: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        (self.segments_x as usize + 1) * (self.segments_y as usize + 1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConfigError::invalid(
                "terrain.width",
                format!("must be positive, got {}", self.width),
            ));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::invalid(
                "terrain.height",
                format!("must be positive, got {}", self.height),
            ));
        }
        if self.segments_x == 0 || self.segments_y == 0 {
            return Err(ConfigError::invalid(
                "terrain.segments",
                format!(
                    "need at least one segment per axis, got {}x{}",
                    self.segments_x, self.segments_y
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn run_speed_is_double_walk_speed() {
        let cfg = LocomotionConfig {
            walk_speed: 0.07,
            ..LocomotionConfig::default()
        };
        assert_eq!(cfg.run_speed(), 0.14);
    }

    #[test]
    fn default_grid_matches_reference_resolution() {
        let cfg = TerrainConfig::default();
        assert_eq!(cfg.segments_x, 50);
        assert_eq!(cfg.segments_y, 51);
        assert_eq!(cfg.vertex_count(), 51 * 52);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg = SceneConfig::from_yaml_str("locomotion:\n  walk_speed: 0.1\n").unwrap();
        assert_eq!(cfg.locomotion.walk_speed, 0.1);
        assert_eq!(cfg.locomotion.blend_duration, 0.3);
        assert_eq!(cfg.camera, CameraConfig::default());
        assert_eq!(cfg.terrain, TerrainConfig::default());
    }

    #[test]
    fn zero_walk_speed_is_rejected() {
        let err = SceneConfig::from_yaml_str("locomotion:\n  walk_speed: 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "locomotion.walk_speed",
                ..
            }
        ));
    }

    #[test]
    fn zero_segments_are_rejected() {
        let cfg = TerrainConfig {
            segments_x: 0,
            ..TerrainConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn smoothing_out_of_range_is_rejected() {
        let cfg = CameraConfig {
            smoothing: 1.5,
            ..CameraConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn full_smoothing_would_teleport_and_is_rejected() {
        let snap = CameraConfig {
            smoothing: 1.0,
            ..CameraConfig::default()
        };
        assert!(matches!(
            snap.validate(),
            Err(ConfigError::Invalid {
                field: "camera.smoothing",
                ..
            })
        ));
        let eased = CameraConfig {
            smoothing: 0.99,
            ..CameraConfig::default()
        };
        eased.validate().unwrap();
    }

    #[test]
    fn initial_state_uses_configured_start() {
        let cfg = CameraConfig {
            initial_position: Vec3::new(2.0, 3.0, 4.0),
            ..CameraConfig::default()
        };
        let state = cfg.initial_state();
        assert_eq!(state.position, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(state.look_at_target, Vec3::ZERO);
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = SceneConfig::from_yaml_str("locomotion: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn yaml_round_trip_through_file() {
        let mut cfg = SceneConfig::default();
        cfg.terrain.seed = Some(9);
        cfg.camera.offset = Vec3::new(-1.0, 4.0, -6.0);

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(cfg.to_yaml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = SceneConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
