//! Character locomotion: action snapshot in, pose, clip crossfades and chase
//! camera out.
//!
//! # Invariants
//! - The animation state and the motion integration are two separate
//!   projections of the same snapshot; jump changes the state, not the motion.
//! - `previous` state only changes when a crossfade actually starts.
//! - Missing clips are a steady state, never an error.

pub mod camera;
pub mod controller;
pub mod mixer;
pub mod state;

pub use camera::CameraRig;
pub use controller::{BlendTransition, LocomotionController};
pub use mixer::{AnimationClip, AnimationMixer, ClipAction, ClipId, ClipSet, Fade};
pub use state::{AnimationState, Resolved, integrate, resolve};

pub fn crate_info() -> &'static str {
    "wayfarer-locomotion v0.1.0"
}
