use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// A semantic movement intent. Locomotion consumes actions, never raw keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    /// Held together with forward to run.
    Modifier,
    Jump,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Modifier,
        Action::Jump,
    ];

    /// Dense index, stable across runs.
    pub fn index(self) -> usize {
        self as usize
    }

    /// UI element name for the action's indicator.
    pub fn name(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Backward => "backward",
            Action::Left => "left",
            Action::Right => "right",
            Action::Modifier => "shift",
            Action::Jump => "jump",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A logical key. Characters are stored lower-case so that a key pressed
/// with Shift held still matches its binding on both press and release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Char(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Shift,
    Space,
}

impl Key {
    /// Build a key from a typed character.
    pub fn character(c: char) -> Self {
        if c == ' ' {
            return Key::Space;
        }
        Key::Char(c.to_lowercase().next().unwrap_or(c))
    }

    /// Canonical form used for binding lookups.
    pub fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::character(c),
            other => other,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::ArrowUp => f.write_str("ArrowUp"),
            Key::ArrowDown => f.write_str("ArrowDown"),
            Key::ArrowLeft => f.write_str("ArrowLeft"),
            Key::ArrowRight => f.write_str("ArrowRight"),
            Key::Shift => f.write_str("Shift"),
            Key::Space => f.write_str("Space"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseKeyError {
    #[error("empty key name")]
    Empty,
    #[error("unknown key name: {0:?}")]
    Unknown(String),
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseKeyError::Empty);
        }
        if s == " " {
            return Ok(Key::Space);
        }
        let lower = s.trim().to_lowercase();
        let key = match lower.as_str() {
            "up" | "arrowup" => Key::ArrowUp,
            "down" | "arrowdown" => Key::ArrowDown,
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,
            "shift" => Key::Shift,
            "space" => Key::Space,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::character(c),
                    (None, _) => return Err(ParseKeyError::Empty),
                    _ => return Err(ParseKeyError::Unknown(s.to_string())),
                }
            }
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// A raw keyboard event as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }

    pub fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
        }
    }
}

/// Errors from building an action table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("action {0} has no bound keys")]
    Unbound(Action),
}

/// Action to key-set table. Several keys may drive one action, and one key
/// may drive several actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionBindings {
    keys: BTreeMap<Action, BTreeSet<Key>>,
}

impl ActionBindings {
    /// An empty table. Must be filled for every action before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default layout: WASD, ZQSD and arrows, Shift to run, Space to jump.
    pub fn standard() -> Self {
        Self::new()
            .bind(
                Action::Forward,
                [Key::Char('z'), Key::Char('w'), Key::ArrowUp],
            )
            .bind(Action::Backward, [Key::Char('s'), Key::ArrowDown])
            .bind(
                Action::Left,
                [Key::Char('q'), Key::Char('a'), Key::ArrowLeft],
            )
            .bind(Action::Right, [Key::Char('d'), Key::ArrowRight])
            .bind(Action::Modifier, [Key::Shift])
            .bind(Action::Jump, [Key::Space])
    }

    /// Add keys to an action's set.
    pub fn bind(mut self, action: Action, keys: impl IntoIterator<Item = Key>) -> Self {
        self.keys
            .entry(action)
            .or_default()
            .extend(keys.into_iter().map(Key::normalized));
        self
    }

    /// Keys bound to `action`, in key order.
    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = Key> + '_ {
        self.keys.get(&action).into_iter().flatten().copied()
    }

    /// Every action whose key set contains `key`.
    pub fn actions_for(&self, key: Key) -> impl Iterator<Item = Action> + '_ {
        let key = key.normalized();
        self.keys
            .iter()
            .filter(move |(_, keys)| keys.contains(&key))
            .map(|(action, _)| *action)
    }

    /// Every action must have at least one key.
    pub fn validate(&self) -> Result<(), BindingError> {
        for action in Action::ALL {
            if self.keys.get(&action).is_none_or(|keys| keys.is_empty()) {
                return Err(BindingError::Unbound(action));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }

    #[test]
    fn modifier_is_named_shift_for_the_hud() {
        assert_eq!(Action::Modifier.name(), "shift");
        assert_eq!(Action::Forward.to_string(), "forward");
    }

    #[test]
    fn standard_bindings_are_complete() {
        let bindings = ActionBindings::standard();
        bindings.validate().unwrap();
        let forward: Vec<Key> = bindings.keys_for(Action::Forward).collect();
        assert_eq!(forward.len(), 3);
        assert!(forward.contains(&Key::ArrowUp));
    }

    #[test]
    fn missing_action_fails_validation() {
        let bindings = ActionBindings::standard();
        let partial = ActionBindings::new()
            .bind(Action::Forward, bindings.keys_for(Action::Forward))
            .bind(Action::Backward, bindings.keys_for(Action::Backward));
        assert_eq!(partial.validate(), Err(BindingError::Unbound(Action::Left)));
    }

    #[test]
    fn empty_key_set_fails_validation() {
        let bindings = ActionBindings::standard().bind(Action::Jump, []);
        bindings.validate().unwrap();
        let unbound = ActionBindings::new()
            .bind(Action::Forward, [Key::Char('w')])
            .bind(Action::Backward, [Key::Char('s')])
            .bind(Action::Left, [Key::Char('a')])
            .bind(Action::Right, [Key::Char('d')])
            .bind(Action::Modifier, [Key::Shift])
            .bind(Action::Jump, []);
        assert_eq!(unbound.validate(), Err(BindingError::Unbound(Action::Jump)));
    }

    #[test]
    fn shared_key_maps_to_every_action() {
        let bindings = ActionBindings::standard().bind(Action::Jump, [Key::Char('w')]);
        let actions: Vec<Action> = bindings.actions_for(Key::Char('W')).collect();
        assert_eq!(actions, vec![Action::Forward, Action::Jump]);
    }

    #[test]
    fn characters_are_case_folded() {
        assert_eq!(Key::character('W'), Key::Char('w'));
        assert_eq!(Key::Char('Q').normalized(), Key::Char('q'));
        assert_eq!(Key::character(' '), Key::Space);
    }

    #[test]
    fn parse_key_names() {
        assert_eq!("w".parse::<Key>(), Ok(Key::Char('w')));
        assert_eq!("W".parse::<Key>(), Ok(Key::Char('w')));
        assert_eq!("up".parse::<Key>(), Ok(Key::ArrowUp));
        assert_eq!("ArrowLeft".parse::<Key>(), Ok(Key::ArrowLeft));
        assert_eq!("shift".parse::<Key>(), Ok(Key::Shift));
        assert_eq!("space".parse::<Key>(), Ok(Key::Space));
        assert_eq!("".parse::<Key>(), Err(ParseKeyError::Empty));
        assert!(matches!(
            "jumpy".parse::<Key>(),
            Err(ParseKeyError::Unknown(_))
        ));
    }
}
