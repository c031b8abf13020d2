use glam::{Mat4, Vec3};
use wayfarer_common::{CameraConfig, CameraState, CharacterPose};

/// Third-person chase camera.
///
/// Position eases toward a point fixed in the character's local frame; the
/// look-at target snaps to its ideal point every tick.
#[derive(Debug, Clone)]
pub struct CameraRig {
    state: CameraState,
    offset: Vec3,
    look_at: Vec3,
    smoothing: f32,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            state: config.initial_state(),
            offset: config.offset,
            look_at: config.look_at,
            smoothing: config.smoothing,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn look_at_target(&self) -> Vec3 {
        self.state.look_at_target
    }

    /// Where the camera wants to sit for `pose`.
    pub fn ideal_offset(&self, pose: &CharacterPose) -> Vec3 {
        pose.to_world(self.offset)
    }

    /// Where the camera wants to look for `pose`.
    pub fn ideal_look_at(&self, pose: &CharacterPose) -> Vec3 {
        pose.to_world(self.look_at)
    }

    /// Ease toward the ideal offset and aim at the ideal look-at point.
    pub fn follow(&mut self, pose: &CharacterPose) {
        let ideal_offset = self.ideal_offset(pose);
        let ideal_look_at = self.ideal_look_at(pose);
        self.state.position = self.state.position.lerp(ideal_offset, self.smoothing);
        self.state.look_at_target = ideal_look_at;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.state.position, self.state.look_at_target, Vec3::Y)
    }
}
