//! Platform media-query primitive.
//!
//! The monitor assumes nothing beyond this shape: a watch object per raw
//! query string, with a synchronous `matches` flag and listener
//! registration. Implementations deliver notifications synchronously.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::Result;

/// Token returned by [`QueryWatch::add_listener`].
pub type ListenerId = u64;

/// Listener invoked with the new `matches` value.
pub type QueryListener = Rc<dyn Fn(bool)>;

/// A live watch on one media query.
pub trait QueryWatch {
    /// Raw query text this watch evaluates.
    fn query(&self) -> &str;

    /// Current match state.
    fn matches(&self) -> bool;

    /// Register a listener for match changes.
    fn add_listener(&self, listener: QueryListener) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    /// Number of registered listeners.
    fn listener_count(&self) -> usize;
}

/// Source of query watches.
pub trait MediaPlatform {
    /// Start watching `query`.
    ///
    /// Fails with [`ResponsiveError::InvalidMediaQuery`](crate::ResponsiveError::InvalidMediaQuery)
    /// when the platform cannot evaluate the text.
    fn watch(&self, query: &str) -> Result<Rc<dyn QueryWatch>>;

    /// Evaluate `query` once without keeping a watch.
    ///
    /// Fails like [`watch`](Self::watch) for text the platform cannot evaluate.
    fn matches(&self, query: &str) -> Result<bool>;
}

/// Listener bookkeeping shared by platform implementations.
#[derive(Default)]
pub struct ListenerList {
    listeners: RefCell<Vec<(ListenerId, QueryListener)>>,
    next_id: Cell<ListenerId>,
}

impl ListenerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: QueryListener) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    pub fn remove(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(listener_id, _)| *listener_id != id);
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Clone the current listeners so they can be called without holding a borrow.
    pub fn snapshot(&self) -> Vec<QueryListener> {
        self.listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    /// Call every listener with `matches`.
    ///
    /// Listeners may add or remove listeners while being notified.
    pub fn notify(&self, matches: bool) {
        for listener in self.snapshot() {
            listener(matches);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_list() {
        let list = ListenerList::new();
        let hits = Rc::new(Cell::new(0));

        let hits_clone = hits.clone();
        let a = list.add(Rc::new(move |_| hits_clone.set(hits_clone.get() + 1)));
        let hits_clone = hits.clone();
        let _b = list.add(Rc::new(move |m| {
            if m {
                hits_clone.set(hits_clone.get() + 10);
            }
        }));

        list.notify(true);
        assert_eq!(hits.get(), 11);

        list.remove(a);
        list.remove(a);
        list.notify(true);
        assert_eq!(hits.get(), 21);
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());

        list.remove(1);
        assert!(list.is_empty());
    }
}
