//! Media Monitor - Breakpoint activation streams over platform watches.
//!
//! Translates platform media-query state into per-alias activation events.
//! Watches are shared by query text: `xs` and `lt-sm` use the same query,
//! so they share one platform watch. Each watch is reference-counted by the
//! subscriptions that need it and removed from the platform when the last
//! one is released.
//!
//! # API
//!
//! - `observe(alias, listener)` - events for one breakpoint
//! - `observe_all(listener)` - one subscription over every registered breakpoint
//! - `is_active(alias)` - synchronous state, agrees with the last delivered event
//!
//! # Example
//!
//! ```ignore
//! let monitor = MediaMonitor::new(registry, platform);
//! let mut subscription = monitor.observe_all(|change| {
//!     println!("{} -> {}", change.alias, change.active);
//! })?;
//!
//! // Later
//! subscription.unsubscribe();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::breakpoints::{BreakpointDefinition, BreakpointRegistry};
use crate::error::Result;

use super::platform::{ListenerId, MediaPlatform, QueryWatch};

// =============================================================================
// TYPES
// =============================================================================

/// Activation or deactivation of one breakpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaChange {
    pub active: bool,
    pub alias: String,
    pub media_query: String,
    pub suffix: String,
    pub priority: i32,
}

impl MediaChange {
    fn new(def: &BreakpointDefinition, active: bool) -> Self {
        Self {
            active,
            alias: def.alias.clone(),
            media_query: def.media_query.clone(),
            suffix: def.suffix.clone(),
            priority: def.priority,
        }
    }
}

/// Listener for breakpoint changes.
pub type MediaListener = Rc<dyn Fn(&MediaChange)>;

type SubscriberId = u64;

struct QueryEntry {
    watch: Rc<dyn QueryWatch>,
    listener_id: ListenerId,
    matches: bool,
    refs: usize,
}

struct Subscriber {
    id: SubscriberId,
    breakpoints: Vec<BreakpointDefinition>,
    queries: Vec<String>,
    listener: MediaListener,
}

#[derive(Default)]
struct MonitorState {
    queries: HashMap<String, QueryEntry>,
    subscribers: Vec<Subscriber>,
    next_id: SubscriberId,
}

struct MonitorShared {
    registry: Rc<BreakpointRegistry>,
    platform: Rc<dyn MediaPlatform>,
    state: RefCell<MonitorState>,
}

// =============================================================================
// MONITOR
// =============================================================================

/// Shared handle over the platform's media-query watches.
///
/// Cloning is cheap; clones observe the same watches.
#[derive(Clone)]
pub struct MediaMonitor {
    shared: Rc<MonitorShared>,
}

impl MediaMonitor {
    pub fn new(registry: Rc<BreakpointRegistry>, platform: Rc<dyn MediaPlatform>) -> Self {
        Self {
            shared: Rc::new(MonitorShared {
                registry,
                platform,
                state: RefCell::new(MonitorState::default()),
            }),
        }
    }

    /// Registry this monitor resolves aliases against.
    pub fn registry(&self) -> &Rc<BreakpointRegistry> {
        &self.shared.registry
    }

    /// Subscribe to one breakpoint.
    pub fn observe<F>(&self, alias: &str, listener: F) -> Result<Subscription>
    where
        F: Fn(&MediaChange) + 'static,
    {
        self.observe_many(&[alias], listener)
    }

    /// Subscribe to every registered breakpoint with a single handle.
    pub fn observe_all<F>(&self, listener: F) -> Result<Subscription>
    where
        F: Fn(&MediaChange) + 'static,
    {
        let aliases: Vec<&str> = self.shared.registry.aliases().collect();
        self.observe_many(&aliases, listener)
    }

    /// Subscribe to a set of breakpoints with a single handle.
    ///
    /// Fails with `UnknownBreakpoint` before anything is watched, or with
    /// `InvalidMediaQuery` after releasing whatever was acquired so far.
    pub fn observe_many<F>(&self, aliases: &[&str], listener: F) -> Result<Subscription>
    where
        F: Fn(&MediaChange) + 'static,
    {
        let mut breakpoints: Vec<BreakpointDefinition> = Vec::with_capacity(aliases.len());
        for alias in aliases {
            let def = self.shared.registry.get(alias)?;
            if !breakpoints.iter().any(|it| it.alias == def.alias) {
                breakpoints.push(def.clone());
            }
        }

        let mut queries: Vec<String> = Vec::new();
        for def in &breakpoints {
            if !queries.contains(&def.media_query) {
                queries.push(def.media_query.clone());
            }
        }

        for (acquired, query) in queries.iter().enumerate() {
            if let Err(err) = self.acquire(query) {
                for done in &queries[..acquired] {
                    self.shared.release_query(done);
                }
                return Err(err);
            }
        }

        let id = {
            let mut state = self.shared.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push(Subscriber {
                id,
                breakpoints,
                queries,
                listener: Rc::new(listener),
            });
            id
        };
        tracing::debug!(subscriber = id, "media subscription created");

        Ok(Subscription {
            monitor: Rc::downgrade(&self.shared),
            id,
            released: false,
        })
    }

    fn acquire(&self, query: &str) -> Result<()> {
        {
            let mut state = self.shared.state.borrow_mut();
            if let Some(entry) = state.queries.get_mut(query) {
                entry.refs += 1;
                return Ok(());
            }
        }

        let watch = self.shared.platform.watch(query)?;
        let weak = Rc::downgrade(&self.shared);
        let key = query.to_string();
        let listener_id = watch.add_listener(Rc::new(move |matches| {
            if let Some(shared) = weak.upgrade() {
                shared.dispatch(&key, matches);
            }
        }));
        let matches = watch.matches();
        tracing::debug!(query, matches, "media watch created");

        self.shared.state.borrow_mut().queries.insert(
            query.to_string(),
            QueryEntry {
                watch,
                listener_id,
                matches,
                refs: 1,
            },
        );
        Ok(())
    }

    /// Whether the breakpoint is currently active.
    ///
    /// Answers from the tracked state when a watch is live, so the result
    /// agrees with the most recent event delivered for the alias. Otherwise
    /// asks the platform for a one-off evaluation.
    pub fn is_active(&self, alias: &str) -> Result<bool> {
        let def = self.shared.registry.get(alias)?;
        let tracked = self
            .shared
            .state
            .borrow()
            .queries
            .get(&def.media_query)
            .map(|entry| entry.matches);
        match tracked {
            Some(matches) => Ok(matches),
            None => self.shared.platform.matches(&def.media_query),
        }
    }

    /// Active breakpoints, highest priority first.
    pub fn active_breakpoints(&self) -> Result<Vec<BreakpointDefinition>> {
        let mut active = Vec::new();
        for def in self.shared.registry.all() {
            if self.is_active(&def.alias)? {
                active.push(def.clone());
            }
        }
        Ok(active)
    }

    /// Number of live platform watches.
    pub fn watch_count(&self) -> usize {
        self.shared.state.borrow().queries.len()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.state.borrow().subscribers.len()
    }
}

impl MonitorShared {
    fn dispatch(&self, query: &str, matches: bool) {
        let deliveries: Vec<(SubscriberId, MediaListener, MediaChange)> = {
            let mut state = self.state.borrow_mut();
            let Some(entry) = state.queries.get_mut(query) else {
                tracing::warn!(query, "notification for a query that is no longer watched");
                return;
            };
            if entry.matches == matches {
                return;
            }
            entry.matches = matches;

            state
                .subscribers
                .iter()
                .flat_map(|sub| {
                    sub.breakpoints
                        .iter()
                        .filter(move |def| def.media_query == query)
                        .map(move |def| (sub.id, Rc::clone(&sub.listener), MediaChange::new(def, matches)))
                })
                .collect()
        };

        for (id, listener, change) in deliveries {
            // A listener earlier in this batch may have released this one.
            if !self.is_subscribed(id) {
                continue;
            }
            tracing::trace!(alias = %change.alias, active = change.active, "media change");
            listener(&change);
        }
    }

    fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.state.borrow().subscribers.iter().any(|sub| sub.id == id)
    }

    fn release(&self, id: SubscriberId) {
        let queries = {
            let mut state = self.state.borrow_mut();
            let Some(position) = state.subscribers.iter().position(|sub| sub.id == id) else {
                return;
            };
            state.subscribers.remove(position).queries
        };
        for query in &queries {
            self.release_query(query);
        }
        tracing::debug!(subscriber = id, "media subscription released");
    }

    fn release_query(&self, query: &str) {
        let removed = {
            let mut state = self.state.borrow_mut();
            let Some(entry) = state.queries.get_mut(query) else {
                return;
            };
            entry.refs -= 1;
            if entry.refs > 0 {
                return;
            }
            state.queries.remove(query)
        };
        if let Some(entry) = removed {
            entry.watch.remove_listener(entry.listener_id);
            tracing::debug!(query, "media watch released");
        }
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Live registration with a [`MediaMonitor`].
///
/// Released exactly once: by [`unsubscribe`](Self::unsubscribe) or on drop,
/// whichever comes first. Release is synchronous; no event is delivered to
/// the listener afterwards.
pub struct Subscription {
    monitor: Weak<MonitorShared>,
    id: SubscriberId,
    released: bool,
}

impl Subscription {
    /// Stop delivery and release the underlying watches. Idempotent.
    pub fn unsubscribe(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(shared) = self.monitor.upgrade() {
            shared.release(self.id);
        }
    }

    /// Whether the subscription still receives events.
    pub fn is_active(&self) -> bool {
        !self.released && self.monitor.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}
