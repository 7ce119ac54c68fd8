//! Test double for [`MediaPlatform`]: queries are opaque strings whose
//! match state is flipped by hand.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::{ResponsiveError, Result};

use super::platform::{ListenerId, ListenerList, MediaPlatform, QueryListener, QueryWatch};

struct FakeWatch {
    query: String,
    matches: Cell<bool>,
    listeners: ListenerList,
}

impl QueryWatch for FakeWatch {
    fn query(&self) -> &str {
        &self.query
    }

    fn matches(&self) -> bool {
        self.matches.get()
    }

    fn add_listener(&self, listener: QueryListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[derive(Default)]
pub struct FakePlatform {
    state: RefCell<HashMap<String, bool>>,
    watches: RefCell<Vec<Rc<FakeWatch>>>,
    rejected: RefCell<HashSet<String>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `watch(query)` fail.
    pub fn reject(&self, query: &str) {
        self.rejected.borrow_mut().insert(query.to_string());
    }

    /// Set a query's state and notify its watches if it changed.
    pub fn set_matches(&self, query: &str, matches: bool) {
        self.state.borrow_mut().insert(query.to_string(), matches);
        let affected: Vec<Rc<FakeWatch>> = self
            .watches
            .borrow()
            .iter()
            .filter(|watch| watch.query == query && watch.matches.get() != matches)
            .cloned()
            .collect();
        for watch in affected {
            watch.matches.set(matches);
            watch.listeners.notify(matches);
        }
    }

    pub fn watches_created(&self) -> usize {
        self.watches.borrow().len()
    }

    pub fn listener_count(&self, query: &str) -> usize {
        self.watches
            .borrow()
            .iter()
            .filter(|watch| watch.query == query)
            .map(|watch| watch.listeners.len())
            .sum()
    }
}

impl FakePlatform {
    fn check(&self, query: &str) -> Result<bool> {
        if self.rejected.borrow().contains(query) {
            return Err(ResponsiveError::InvalidMediaQuery {
                query: query.to_string(),
                reason: "rejected by test platform".to_string(),
            });
        }
        Ok(self.state.borrow().get(query).copied().unwrap_or(false))
    }
}

impl MediaPlatform for FakePlatform {
    fn watch(&self, query: &str) -> Result<Rc<dyn QueryWatch>> {
        let matches = self.check(query)?;
        let watch = Rc::new(FakeWatch {
            query: query.to_string(),
            matches: Cell::new(matches),
            listeners: ListenerList::new(),
        });
        self.watches.borrow_mut().push(Rc::clone(&watch));
        Ok(watch)
    }

    fn matches(&self, query: &str) -> Result<bool> {
        self.check(query)
    }
}
