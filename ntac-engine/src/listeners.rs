//! Subscriber registry for state notifications

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::state::GameState;

/// Callback invoked with every new snapshot
pub type Listener = Rc<dyn Fn(&GameState)>;

/// Handle identifying one subscription
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Registry of listeners keyed by subscription id
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: FxHashMap<SubscriptionId, Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, listener);
        id
    }

    /// Returns false if the id was already gone
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Listeners in subscription order, detached from the registry so
    /// callbacks may subscribe, unsubscribe or dispatch while running
    pub fn snapshot(&self) -> Vec<Listener> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|(id, _)| **id);
        entries.into_iter().map(|(_, l)| Rc::clone(l)).collect()
    }
}

/// Capability returned by `subscribe`; consuming it removes the listener.
/// Dropping it keeps the listener registered for the engine's lifetime.
#[must_use = "dropping the subscription leaves no way to unsubscribe"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<RefCell<Listeners>>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, registry: &Rc<RefCell<Listeners>>) -> Self {
        Self {
            id,
            registry: Rc::downgrade(registry),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the listener. Returns false if it was already removed or the
    /// engine is gone.
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.borrow_mut().remove(self.id),
            None => false,
        }
    }
}

/// Call every listener in `snapshot` with `state`
pub fn broadcast(snapshot: &[Listener], state: &GameState) {
    for listener in snapshot {
        listener(state);
    }
}
