use crate::camera::CameraRig;
use crate::mixer::{AnimationMixer, ClipId, ClipSet};
use crate::state::{AnimationState, Resolved, integrate, resolve};
use wayfarer_common::{CameraConfig, CharacterPose, LocomotionConfig, SceneConfig};
use wayfarer_input::{ActionConsumer, ActionSnapshot};

/// The crossfade started on a state change.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendTransition {
    pub from: Option<AnimationState>,
    pub to: AnimationState,
    pub fade_out: Option<ClipId>,
    pub fade_in: ClipId,
    /// Same for both legs.
    pub duration: f32,
}

/// Drives the player character: resolves actions into an animation state,
/// crossfades clips on state changes, integrates motion and moves the chase
/// camera.
///
/// Clips arrive asynchronously. Until they do, every animation operation is
/// skipped while motion keeps working.
#[derive(Debug)]
pub struct LocomotionController {
    config: LocomotionConfig,
    pose: CharacterPose,
    camera: CameraRig,
    mixer: AnimationMixer,
    current: AnimationState,
    previous: Option<AnimationState>,
    speed: f32,
    last_transition: Option<BlendTransition>,
}

impl LocomotionController {
    pub fn new(locomotion: &LocomotionConfig, camera: &CameraConfig) -> Self {
        Self {
            config: locomotion.clone(),
            pose: CharacterPose::default(),
            camera: CameraRig::new(camera),
            mixer: AnimationMixer::default(),
            current: AnimationState::Idle,
            previous: None,
            speed: locomotion.walk_speed,
            last_transition: None,
        }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(&config.locomotion, &config.camera)
    }

    /// Install the model's clips. Starts a fresh mixer; the current state
    /// fades in on the next tick.
    pub fn load_clips(&mut self, clips: ClipSet) {
        tracing::debug!(clips = clips.len(), "animation clips installed");
        self.mixer = AnimationMixer::new(clips);
        self.previous = None;
    }

    pub fn has_clips(&self) -> bool {
        !self.mixer.clips().is_empty()
    }

    pub fn pose(&self) -> &CharacterPose {
        &self.pose
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// State resolved on the last tick.
    pub fn current_state(&self) -> AnimationState {
        self.current
    }

    /// State whose clip is currently faded in, if any transition has run.
    pub fn previous_state(&self) -> Option<AnimationState> {
        self.previous
    }

    /// Effective speed resolved on the last tick.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Crossfade started on the last tick, if any.
    pub fn last_transition(&self) -> Option<&BlendTransition> {
        self.last_transition.as_ref()
    }

    pub fn clip_name(&self, state: AnimationState) -> &str {
        let clips = &self.config.clips;
        match state {
            AnimationState::Idle => &clips.idle,
            AnimationState::Walk => &clips.walk,
            AnimationState::Run => &clips.run,
            AnimationState::Jump => &clips.jump,
        }
    }

    pub fn clip_for(&self, state: AnimationState) -> Option<ClipId> {
        self.mixer.find(self.clip_name(state))
    }

    /// Advance animation playback by one fixed step.
    pub fn update(&mut self) {
        self.mixer.update(self.config.mixer_step);
    }

    /// One tick of locomotion: resolve state, crossfade on change, turn and
    /// translate, then move the camera.
    pub fn update_position(&mut self, actions: ActionSnapshot) -> Option<BlendTransition> {
        let Resolved { state, speed } = resolve(actions, self.config.walk_speed);
        self.current = state;
        self.speed = speed;

        let transition = if self.previous != Some(state) {
            self.begin_transition(state)
        } else {
            None
        };

        integrate(&mut self.pose, actions, speed);
        self.camera.follow(&self.pose);
        self.last_transition.clone_from(&transition);
        transition
    }

    fn begin_transition(&mut self, state: AnimationState) -> Option<BlendTransition> {
        let Some(fade_in) = self.clip_for(state) else {
            tracing::trace!(%state, clip = self.clip_name(state), "clip missing, transition skipped");
            return None;
        };
        let duration = self.config.blend_duration;
        let fade_out = self.previous.and_then(|previous| self.clip_for(previous));

        if let Some(action) = fade_out.and_then(|id| self.mixer.clip_action(id)) {
            action.fade_out(duration);
        }
        if let Some(action) = self.mixer.clip_action(fade_in) {
            action.reset().fade_in(duration).play();
        }

        tracing::debug!(from = ?self.previous, to = %state, "animation transition");
        let transition = BlendTransition {
            from: self.previous,
            to: state,
            fade_out,
            fade_in,
            duration,
        };
        self.previous = Some(state);
        Some(transition)
    }
}

impl ActionConsumer for LocomotionController {
    fn apply_actions(&mut self, actions: ActionSnapshot) {
        self.update_position(actions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::AnimationClip;
    use glam::Vec3;
    use wayfarer_common::ClipNames;
    use wayfarer_input::Action;

    fn standard_clips() -> ClipSet {
        let names = ClipNames::default();
        ClipSet::new(vec![
            AnimationClip::new(names.idle, 2.0),
            AnimationClip::new(names.walk, 1.0),
            AnimationClip::new(names.run, 0.8),
            AnimationClip::new(names.jump, 1.2),
        ])
    }

    fn controller() -> LocomotionController {
        let mut c = LocomotionController::from_config(&SceneConfig::default());
        c.load_clips(standard_clips());
        c
    }

    fn snap(actions: &[Action]) -> ActionSnapshot {
        ActionSnapshot::with(actions.iter().copied())
    }

    #[test]
    fn first_tick_fades_in_idle_without_fade_out() {
        let mut c = controller();
        let t = c.update_position(ActionSnapshot::default()).unwrap();
        assert_eq!(t.from, None);
        assert_eq!(t.to, AnimationState::Idle);
        assert_eq!(t.fade_out, None);
        assert_eq!(t.fade_in, c.clip_for(AnimationState::Idle).unwrap());
        assert_eq!(t.duration, 0.3);

        let idle = c.mixer().action(t.fade_in).unwrap();
        assert!(idle.is_playing());
        assert_eq!(idle.time(), 0.0);
        assert_eq!(idle.fade().unwrap().duration, 0.3);
    }

    #[test]
    fn state_change_fades_out_previous_and_fades_in_next() {
        let mut c = controller();
        c.update_position(ActionSnapshot::default());
        for _ in 0..50 {
            c.update();
        }

        let t = c.update_position(snap(&[Action::Forward])).unwrap();
        let idle = c.clip_for(AnimationState::Idle).unwrap();
        let walk = c.clip_for(AnimationState::Walk).unwrap();
        assert_eq!(t.from, Some(AnimationState::Idle));
        assert_eq!(t.to, AnimationState::Walk);
        assert_eq!(t.fade_out, Some(idle));
        assert_eq!(t.fade_in, walk);

        let out = c.mixer().action(idle).unwrap().fade().unwrap();
        assert_eq!((out.from, out.to, out.duration), (1.0, 0.0, 0.3));
        let incoming = c.mixer().action(walk).unwrap();
        assert_eq!(incoming.time(), 0.0);
        let fade = incoming.fade().unwrap();
        assert_eq!((fade.from, fade.to, fade.duration), (0.0, 1.0, 0.3));
        assert_eq!(c.previous_state(), Some(AnimationState::Walk));
    }

    #[test]
    fn staying_in_state_is_a_no_op_for_clips() {
        let mut c = controller();
        c.update_position(snap(&[Action::Forward]));
        c.update();
        let walk = c.clip_for(AnimationState::Walk).unwrap();
        let before = c.mixer().action(walk).unwrap().clone();

        assert!(c.update_position(snap(&[Action::Forward])).is_none());
        assert_eq!(c.mixer().action(walk).unwrap(), &before);
        // Motion still applied.
        assert!(c.pose().position.z > 0.05);
    }

    #[test]
    fn run_resolves_at_double_speed() {
        let mut c = controller();
        c.update_position(snap(&[Action::Forward, Action::Modifier]));
        assert_eq!(c.current_state(), AnimationState::Run);
        assert_eq!(c.speed(), 2.0 * c.config().walk_speed);
        assert!(c.pose().position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.1), 1e-6));
    }

    #[test]
    fn idle_tick_leaves_pose_unchanged() {
        let mut c = controller();
        c.update_position(snap(&[Action::Forward, Action::Left]));
        let before = *c.pose();
        c.update_position(ActionSnapshot::default());
        assert_eq!(c.current_state(), AnimationState::Idle);
        assert_eq!(*c.pose(), before);
    }

    #[test]
    fn jump_keeps_moving_and_turning() {
        let mut c = controller();
        let t = c
            .update_position(snap(&[Action::Forward, Action::Right, Action::Jump]))
            .unwrap();
        assert_eq!(t.to, AnimationState::Jump);
        assert!(c.pose().yaw < 0.0);
        assert!(c.pose().position.length() > 0.0);
    }

    #[test]
    fn missing_clips_skip_animation_but_not_motion() {
        let mut c = LocomotionController::from_config(&SceneConfig::default());
        assert!(!c.has_clips());

        let t = c.update_position(snap(&[Action::Forward]));
        assert!(t.is_none());
        assert_eq!(c.previous_state(), None);
        assert_eq!(c.current_state(), AnimationState::Walk);
        assert!(c.pose().position.z > 0.0);
        c.update();
    }

    #[test]
    fn transition_retried_once_clips_arrive() {
        let mut c = LocomotionController::from_config(&SceneConfig::default());
        c.update_position(snap(&[Action::Forward]));
        c.load_clips(standard_clips());

        let t = c.update_position(snap(&[Action::Forward])).unwrap();
        assert_eq!(t.to, AnimationState::Walk);
        assert_eq!(t.fade_out, None);
    }

    #[test]
    fn partial_clip_set_skips_only_missing_states() {
        let mut c = LocomotionController::from_config(&SceneConfig::default());
        let names = ClipNames::default();
        c.load_clips(ClipSet::from_names([names.idle], 1.0));

        assert!(c.update_position(ActionSnapshot::default()).is_some());
        assert!(c.update_position(snap(&[Action::Jump])).is_none());
        assert_eq!(c.previous_state(), Some(AnimationState::Idle));
        assert!(c.update_position(ActionSnapshot::default()).is_none());
    }

    #[test]
    fn camera_follows_after_motion() {
        let mut c = controller();
        let start = c.camera().position();
        c.update_position(snap(&[Action::Forward]));
        let ideal = c.camera().ideal_offset(c.pose());
        let expected = start + 0.1 * (ideal - start);
        assert!(c.camera().position().abs_diff_eq(expected, 1e-5));
        assert_eq!(c.camera().look_at_target(), c.camera().ideal_look_at(c.pose()));
    }

    #[test]
    fn consumer_trait_drives_the_same_tick() {
        let mut c = controller();
        let consumer: &mut dyn ActionConsumer = &mut c;
        consumer.apply_actions(snap(&[Action::Backward]));
        assert_eq!(c.current_state(), AnimationState::Walk);
        assert!(c.pose().position.z < 0.0);
        assert_eq!(c.last_transition().unwrap().to, AnimationState::Walk);

        c.apply_actions(snap(&[Action::Backward]));
        assert!(c.last_transition().is_none());
    }
}
