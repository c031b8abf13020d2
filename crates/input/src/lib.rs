//! Input actions: raw key events folded into six boolean movement intents.
//!
//! # Invariants
//! - Exactly one pressed flag per action; the last event before a tick wins.
//! - Releasing any key bound to an action clears that action, even if another
//!   bound key is still held.
//! - Key listeners are scoped: dropping the owner unsubscribes.

pub mod action;
pub mod keyboard;
pub mod mapper;
#[cfg(feature = "winit")]
pub mod winit_keys;

pub use action::{Action, ActionBindings, BindingError, Key, KeyEvent, KeyState, ParseKeyError};
pub use keyboard::{KeyboardHub, Subscription};
pub use mapper::{ActionConsumer, ActionIndicator, ActionMapper, ActionSnapshot, IndicatorFlag};

pub fn crate_info() -> &'static str {
    "wayfarer-input v0.1.0"
}
