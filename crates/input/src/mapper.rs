use crate::action::{Action, ActionBindings, BindingError, Key, KeyEvent, KeyState};
use crate::keyboard::{KeyboardHub, Subscription};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The six action flags read once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub modifier: bool,
    pub jump: bool,
}

impl ActionSnapshot {
    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.forward,
            Action::Backward => self.backward,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Modifier => self.modifier,
            Action::Jump => self.jump,
        }
    }

    /// Snapshot with exactly the given actions held.
    pub fn with(actions: impl IntoIterator<Item = Action>) -> Self {
        let mut snapshot = Self::default();
        for action in actions {
            match action {
                Action::Forward => snapshot.forward = true,
                Action::Backward => snapshot.backward = true,
                Action::Left => snapshot.left = true,
                Action::Right => snapshot.right = true,
                Action::Modifier => snapshot.modifier = true,
                Action::Jump => snapshot.jump = true,
            }
        }
        snapshot
    }

    /// Any of the four directional actions.
    pub fn any_movement(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Receives the action snapshot once per tick.
pub trait ActionConsumer {
    fn apply_actions(&mut self, actions: ActionSnapshot);
}

/// A visual element that reflects whether an action is held.
pub trait ActionIndicator {
    fn set_active(&mut self, active: bool);
}

/// Shareable indicator flag: the HUD keeps one clone and reads it back.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFlag(Rc<Cell<bool>>);

impl IndicatorFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.0.get()
    }
}

impl ActionIndicator for IndicatorFlag {
    fn set_active(&mut self, active: bool) {
        self.0.set(active);
    }
}

#[derive(Debug)]
struct ActionTable {
    bindings: ActionBindings,
    pressed: [bool; Action::ALL.len()],
}

impl ActionTable {
    fn handle(&mut self, event: &KeyEvent) {
        let pressed = event.state == KeyState::Pressed;
        let mut matched = false;
        for action in self.bindings.actions_for(event.key) {
            self.pressed[action.index()] = pressed;
            matched = true;
        }
        if matched {
            tracing::trace!(key = %event.key, pressed, "action key");
        }
    }

    fn snapshot(&self) -> ActionSnapshot {
        let p = &self.pressed;
        ActionSnapshot {
            forward: p[Action::Forward.index()],
            backward: p[Action::Backward.index()],
            left: p[Action::Left.index()],
            right: p[Action::Right.index()],
            modifier: p[Action::Modifier.index()],
            jump: p[Action::Jump.index()],
        }
    }
}

/// Folds key events into per-action pressed flags and forwards them once
/// per tick.
///
/// One flag per action: with two keys bound to the same action, releasing
/// either one clears the action even while the other is still held.
pub struct ActionMapper {
    table: Rc<RefCell<ActionTable>>,
    indicators: [Option<Box<dyn ActionIndicator>>; Action::ALL.len()],
    subscription: Option<Subscription>,
}

impl ActionMapper {
    /// Build an unattached mapper. Events are fed through [`Self::handle`].
    pub fn new(bindings: ActionBindings) -> Result<Self, BindingError> {
        bindings.validate()?;
        Ok(Self {
            table: Rc::new(RefCell::new(ActionTable {
                bindings,
                pressed: [false; Action::ALL.len()],
            })),
            indicators: Default::default(),
            subscription: None,
        })
    }

    /// Build a mapper that listens on `hub` for as long as it lives.
    pub fn attach(bindings: ActionBindings, hub: &KeyboardHub) -> Result<Self, BindingError> {
        let mut mapper = Self::new(bindings)?;
        let table = Rc::clone(&mapper.table);
        mapper.subscription = Some(hub.subscribe(move |event| table.borrow_mut().handle(event)));
        Ok(mapper)
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop listening. The pressed flags keep their last values.
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    /// Resolve the indicator element for `action`. Done once at setup.
    pub fn bind_indicator(&mut self, action: Action, indicator: Box<dyn ActionIndicator>) {
        self.indicators[action.index()] = Some(indicator);
    }

    pub fn handle(&mut self, event: KeyEvent) {
        self.table.borrow_mut().handle(&event);
    }

    pub fn key_down(&mut self, key: Key) {
        self.handle(KeyEvent::pressed(key));
    }

    pub fn key_up(&mut self, key: Key) {
        self.handle(KeyEvent::released(key));
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.table.borrow().pressed[action.index()]
    }

    /// Current state of all six actions.
    pub fn snapshot(&self) -> ActionSnapshot {
        self.table.borrow().snapshot()
    }

    /// Refresh every bound indicator from its action's flag. Actions without
    /// an indicator are skipped.
    pub fn sync_indicators(&mut self) {
        let table = self.table.borrow();
        for (index, slot) in self.indicators.iter_mut().enumerate() {
            if let Some(indicator) = slot {
                indicator.set_active(table.pressed[index]);
            }
        }
    }

    /// Per-tick update: sync indicators, then hand one snapshot to the
    /// consumer.
    pub fn update(&mut self, consumer: &mut dyn ActionConsumer) -> ActionSnapshot {
        self.sync_indicators();
        let snapshot = self.snapshot();
        consumer.apply_actions(snapshot);
        snapshot
    }
}

impl std::fmt::Debug for ActionMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionMapper")
            .field("actions", &self.snapshot())
            .field("attached", &self.is_attached())
            .finish()
    }
}
