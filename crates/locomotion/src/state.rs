use serde::{Deserialize, Serialize};
use wayfarer_common::CharacterPose;
use wayfarer_input::ActionSnapshot;

/// Animation state of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Walk,
    Run,
    Jump,
}

impl AnimationState {
    pub const ALL: [AnimationState; 4] = [
        AnimationState::Idle,
        AnimationState::Walk,
        AnimationState::Run,
        AnimationState::Jump,
    ];
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnimationState::Idle => "idle",
            AnimationState::Walk => "walk",
            AnimationState::Run => "run",
            AnimationState::Jump => "jump",
        };
        f.write_str(name)
    }
}

/// Result of resolving one tick's actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub state: AnimationState,
    pub speed: f32,
}

/// Resolve the animation state and effective speed. Later rules override
/// earlier ones; jump replaces the state but keeps the speed.
pub fn resolve(actions: ActionSnapshot, walk_speed: f32) -> Resolved {
    let mut state = AnimationState::Idle;
    let mut speed = walk_speed;

    if actions.any_movement() {
        state = AnimationState::Walk;
        speed = walk_speed;
    }

    if actions.forward && actions.modifier {
        state = AnimationState::Run;
        speed = walk_speed * 2.0;
    }

    if actions.jump {
        state = AnimationState::Jump;
    }

    Resolved { state, speed }
}

/// Apply one tick of turning and translation from the raw flags.
///
/// Independent of the resolved animation state: a jumping character still
/// turns and moves. Turning happens first, so translation follows the new
/// heading.
pub fn integrate(pose: &mut CharacterPose, actions: ActionSnapshot, speed: f32) {
    if actions.left {
        pose.yaw += speed;
    }
    if actions.right {
        pose.yaw -= speed;
    }

    if actions.forward || actions.backward {
        let mut direction = pose.facing_direction();
        if actions.backward && !actions.forward {
            direction = -direction;
        }
        pose.position += direction * speed;
    }
}
