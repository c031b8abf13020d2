//! Translation from winit keyboard events into action-layer keys.

use crate::action::{Key, KeyEvent, KeyState};
use ::winit::event::ElementState;
use ::winit::keyboard::{Key as WinitKey, NamedKey};

/// Map a winit logical key. Keys the action layer never binds map to `None`.
pub fn key_from_winit(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::character(c)),
                _ => None,
            }
        }
        WinitKey::Named(NamedKey::ArrowUp) => Some(Key::ArrowUp),
        WinitKey::Named(NamedKey::ArrowDown) => Some(Key::ArrowDown),
        WinitKey::Named(NamedKey::ArrowLeft) => Some(Key::ArrowLeft),
        WinitKey::Named(NamedKey::ArrowRight) => Some(Key::ArrowRight),
        WinitKey::Named(NamedKey::Shift) => Some(Key::Shift),
        WinitKey::Named(NamedKey::Space) => Some(Key::Space),
        _ => None,
    }
}

pub fn key_event_from_winit(event: &::winit::event::KeyEvent) -> Option<KeyEvent> {
    let key = key_from_winit(&event.logical_key)?;
    let state = match event.state {
        ElementState::Pressed => KeyState::Pressed,
        ElementState::Released => KeyState::Released,
    };
    Some(KeyEvent { key, state })
}
