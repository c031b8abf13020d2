use crate::action::{Key, KeyEvent};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

type Listener = Box<dyn FnMut(&KeyEvent)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
    /// Set while `dispatch` has the listeners checked out.
    dispatching: bool,
    /// Ids unsubscribed while their listener was checked out.
    cancelled: Vec<u64>,
    /// Events raised from inside a listener, delivered by the outer dispatch.
    queued: VecDeque<KeyEvent>,
}

/// Single-threaded key event fan-out, standing in for the window's
/// key-down/key-up listener lists.
///
/// Listeners are registered with [`KeyboardHub::subscribe`] and stay alive
/// exactly as long as the returned [`Subscription`].
#[derive(Clone, Default)]
pub struct KeyboardHub {
    registry: Rc<RefCell<Registry>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Dropping the returned guard unregisters it.
    pub fn subscribe(&self, listener: impl FnMut(&KeyEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, Box::new(listener));
        tracing::trace!(id, "key listener subscribed");
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver one event to every live listener, in subscription order.
    ///
    /// Listeners may subscribe or drop subscriptions from inside the callback;
    /// those changes take effect from the next event on. Events dispatched
    /// from inside a listener are queued and delivered, in order, once the
    /// current event has reached every listener.
    pub fn dispatch(&self, event: KeyEvent) {
        let mut listeners = {
            let mut registry = self.registry.borrow_mut();
            if registry.dispatching {
                registry.queued.push_back(event);
                return;
            }
            registry.dispatching = true;
            std::mem::take(&mut registry.listeners)
        };

        let mut next = Some(event);
        while let Some(event) = next {
            for listener in listeners.values_mut() {
                listener(&event);
            }

            let mut registry = self.registry.borrow_mut();
            for id in std::mem::take(&mut registry.cancelled) {
                listeners.remove(&id);
            }
            listeners.append(&mut registry.listeners);
            next = registry.queued.pop_front();
        }

        let mut registry = self.registry.borrow_mut();
        registry.dispatching = false;
        registry.listeners = listeners;
    }

    pub fn press(&self, key: Key) {
        self.dispatch(KeyEvent::pressed(key));
    }

    pub fn release(&self, key: Key) {
        self.dispatch(KeyEvent::released(key));
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl std::fmt::Debug for KeyboardHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Scoped listener registration. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Whether the hub this subscription belongs to is still alive.
    pub fn is_live(&self) -> bool {
        self.registry.strong_count() > 0
    }

    /// Explicitly unsubscribe. Equivalent to dropping the guard.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.borrow_mut();
        if registry.listeners.remove(&self.id).is_none() && registry.dispatching {
            registry.cancelled.push(self.id);
        }
        tracing::trace!(id = self.id, "key listener unsubscribed");
    }
}
