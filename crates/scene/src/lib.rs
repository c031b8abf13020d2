//! Scene: the headless frame driver tying input, locomotion and terrain
//! together.
//!
//! # Invariants
//! - Per tick order is fixed: asset inbox, animation mixer, actions
//!   (indicator sync then controller), terrain.
//! - The action set is read exactly once per tick.
//! - Clip loading never blocks a tick; missing clips are a steady state.

pub mod scene;

pub use scene::{EVENT_LOG_CAPACITY, Scene, SceneError, SceneEvent};

pub fn crate_info() -> &'static str {
    "wayfarer-scene v0.1.0"
}
