//! # Back Navigation Registry
//!
//! One per process, owned by `App`. Components that want first say on the
//! hardware back key register a listener when they mount and remove it when
//! they unmount. A listener that is never removed keeps firing against
//! whatever context it is dispatched with, so teardown is mandatory.
//!
//! Dispatch walks listeners newest first and stops at the first one that
//! returns `true` (consumed). If none consumes the event the caller runs
//! the default back action.

use log::debug;

/// Handle returned by [`BackHandler::add_listener`], used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<C> = Box<dyn FnMut(&mut C) -> bool>;

pub struct BackHandler<C> {
    listeners: Vec<(ListenerId, Listener<C>)>,
    next_id: u64,
}

impl<C> Default for BackHandler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> BackHandler<C> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&mut C) -> bool + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!("Back listener {:?} registered ({} total)", id, self.listeners.len());
        id
    }

    /// Returns false if the listener was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        let removed = self.listeners.len() != before;
        debug!("Back listener {:?} removed: {}", id, removed);
        removed
    }

    /// Offer a back event to listeners, newest first. True if one consumed it.
    pub fn dispatch(&mut self, context: &mut C) -> bool {
        for (id, listener) in self.listeners.iter_mut().rev() {
            if listener(context) {
                debug!("Back event consumed by listener {:?}", id);
                return true;
            }
        }
        false
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
