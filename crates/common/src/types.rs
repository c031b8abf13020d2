use crate::config::CameraConfig;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Character transform: world position plus heading about +Y.
///
/// The facing direction is derived from `yaw`, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterPose {
    pub position: Vec3,
    /// Heading in radians, counter-clockwise about +Y.
    pub yaw: f32,
}

impl CharacterPose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Orientation quaternion of the character.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// The character's local +Z axis in world space.
    pub fn facing_direction(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    /// Transform a character-local point into world space.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.rotation() * local + self.position
    }
}

/// Camera placement as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub look_at_target: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        CameraConfig::default().initial_state()
    }
}
