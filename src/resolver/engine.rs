//! Responsive Input Resolver - Picks the active input for the current breakpoints.
//!
//! Each binding instance owns one resolver. The resolver caches inputs by
//! key (`"class"`, `"classXs"`, `"classGtMd"`), holds one subscription to
//! the monitor's combined stream while bound, and re-resolves on every
//! relevant breakpoint change.
//!
//! Resolution order:
//!
//! 1. Walk the registry from the highest priority down. The first breakpoint
//!    that is active *and* has `prefix + suffix` cached wins.
//! 2. Otherwise the base key (`prefix` itself), if cached.
//! 3. Otherwise the default value.
//!
//! The callback fires only when the resolved value differs from the
//! previous one, which also bounds re-entrant update chains.
//!
//! Without a default, resolution can fall through to nothing. The
//! activation is then cleared but the callback is not invoked, so output
//! written by an earlier callback stays as it was. Bindings whose output
//! must reset set a default (both directives do).
//!
//! # Lifecycle
//!
//! ```text
//! Unbound --activate()--> Bound --deactivate()/drop--> Unbound
//! ```
//!
//! # Example
//!
//! ```ignore
//! let resolver = ResponsiveInputResolver::new(monitor, "wrap").with_default("wrap".to_string());
//! resolver.cache_input("wrapXs", "nowrap".to_string(), InputFlags::empty());
//! resolver.activate(|value, alias| println!("{value} via {alias:?}"))?;
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::breakpoints::BreakpointDefinition;
use crate::error::Result;
use crate::media::{MediaChange, MediaMonitor, Subscription};

use super::cache::{InputCache, InputFlags};

// =============================================================================
// TYPES
// =============================================================================

/// The winning (breakpoint, value) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Activation<T> {
    /// Cache key that supplied the value.
    pub key: String,
    pub value: T,
    /// `None` when the base key or the default supplied the value.
    pub breakpoint: Option<BreakpointDefinition>,
}

impl<T> Activation<T> {
    /// Alias of the activating breakpoint.
    pub fn alias(&self) -> Option<&str> {
        self.breakpoint.as_ref().map(|bp| bp.alias.as_str())
    }
}

/// Called with the newly resolved value and the activating alias.
pub type ResolvedCallback<T> = Rc<dyn Fn(&T, Option<&str>)>;

struct ResolverState<T> {
    cache: InputCache<T>,
    default_value: Option<T>,
    activation: Option<Activation<T>>,
    subscription: Option<Subscription>,
    on_resolved: Option<ResolvedCallback<T>>,
}

struct ResolverShared<T> {
    monitor: MediaMonitor,
    base_key: String,
    state: RefCell<ResolverState<T>>,
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Per-binding responsive input resolver.
///
/// Dropping the resolver releases its subscription.
pub struct ResponsiveInputResolver<T: Clone + PartialEq + 'static> {
    shared: Rc<ResolverShared<T>>,
}

impl<T: Clone + PartialEq + 'static> ResponsiveInputResolver<T> {
    /// Create an unbound resolver for inputs prefixed with `base_key`.
    pub fn new(monitor: MediaMonitor, base_key: impl Into<String>) -> Self {
        Self {
            shared: Rc::new(ResolverShared {
                monitor,
                base_key: base_key.into(),
                state: RefCell::new(ResolverState {
                    cache: InputCache::new(),
                    default_value: None,
                    activation: None,
                    subscription: None,
                    on_resolved: None,
                }),
            }),
        }
    }

    /// Set the value used when neither a breakpoint key nor the base key is cached.
    pub fn with_default(self, value: T) -> Self {
        self.set_default(value);
        self
    }

    pub fn set_default(&self, value: T) {
        self.shared.state.borrow_mut().default_value = Some(value);
    }

    pub fn base_key(&self) -> &str {
        &self.shared.base_key
    }

    pub fn monitor(&self) -> &MediaMonitor {
        &self.shared.monitor
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Overwrite a cached input. Does not recompute.
    pub fn cache_input(&self, key: impl Into<String>, value: T, flags: InputFlags) {
        let key = key.into();
        tracing::trace!(base_key = %self.shared.base_key, key = %key, "input cached");
        self.shared.state.borrow_mut().cache.insert(key, value, flags);
    }

    /// Cache an input and, while bound, recompute.
    ///
    /// Returns true if the callback was invoked.
    pub fn update_input(&self, key: impl Into<String>, value: T, flags: InputFlags) -> Result<bool> {
        self.cache_input(key, value, flags);
        if self.is_bound() {
            self.shared.recompute()
        } else {
            Ok(false)
        }
    }

    /// Last cached value for `key`.
    pub fn query_input(&self, key: &str) -> Option<T> {
        self.shared.state.borrow().cache.value(key).cloned()
    }

    /// Flags stored with `key`.
    pub fn input_flags(&self, key: &str) -> Option<InputFlags> {
        self.shared.state.borrow().cache.get(key).map(|entry| entry.flags)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bind to the monitor and resolve once synchronously.
    ///
    /// Subscribes to every registered breakpoint through a single
    /// subscription. `on_resolved` only sees values; set a default if
    /// losing every input must reach it. Binding an already bound resolver releases the old
    /// subscription first.
    pub fn activate<F>(&self, on_resolved: F) -> Result<()>
    where
        F: Fn(&T, Option<&str>) + 'static,
    {
        self.deactivate();

        let weak: Weak<ResolverShared<T>> = Rc::downgrade(&self.shared);
        let subscription = self.shared.monitor.observe_all(move |change| {
            if let Some(shared) = weak.upgrade() {
                shared.on_media_change(change);
            }
        })?;

        {
            let mut state = self.shared.state.borrow_mut();
            state.subscription = Some(subscription);
            state.on_resolved = Some(Rc::new(on_resolved));
        }
        tracing::debug!(base_key = %self.shared.base_key, "resolver bound");

        // Initial paint must not wait for the first event.
        if let Err(err) = self.shared.recompute() {
            self.deactivate();
            return Err(err);
        }
        Ok(())
    }

    /// Release the subscription. Idempotent, never notifies.
    pub fn deactivate(&self) {
        let subscription = {
            let mut state = self.shared.state.borrow_mut();
            state.on_resolved = None;
            state.activation = None;
            state.subscription.take()
        };
        if let Some(mut subscription) = subscription {
            subscription.unsubscribe();
            tracing::debug!(base_key = %self.shared.base_key, "resolver unbound");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.shared.state.borrow().subscription.is_some()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve the base key against the current breakpoints.
    ///
    /// Pure: nothing is recorded and no callback fires.
    pub fn resolve(&self) -> Result<Option<Activation<T>>> {
        let state = self.shared.state.borrow();
        resolve_from(
            &self.shared.monitor,
            &state.cache,
            &self.shared.base_key,
            state.default_value.as_ref(),
        )
    }

    /// Resolve an arbitrary key prefix with an explicit default.
    pub fn resolve_with(&self, prefix: &str, default: Option<&T>) -> Result<Option<Activation<T>>> {
        let state = self.shared.state.borrow();
        resolve_from(&self.shared.monitor, &state.cache, prefix, default)
    }

    /// Resolve, record the activation and notify if the value changed.
    ///
    /// Returns true if the callback was invoked.
    pub fn recompute(&self) -> Result<bool> {
        self.shared.recompute()
    }

    /// The last recorded activation.
    pub fn activation(&self) -> Option<Activation<T>> {
        self.shared.state.borrow().activation.clone()
    }

    /// The last recorded value.
    pub fn activated_value(&self) -> Option<T> {
        self.shared
            .state
            .borrow()
            .activation
            .as_ref()
            .map(|activation| activation.value.clone())
    }
}

impl<T: Clone + PartialEq + 'static> ResolverShared<T> {
    fn on_media_change(&self, change: &MediaChange) {
        // A breakpoint with no cached input cannot change the result.
        let relevant = {
            let state = self.state.borrow();
            state.cache.contains(&format!("{}{}", self.base_key, change.suffix))
        };
        if !relevant {
            return;
        }
        if let Err(err) = self.recompute() {
            tracing::warn!(base_key = %self.base_key, error = %err, "recompute failed");
        }
    }

    fn recompute(&self) -> Result<bool> {
        let resolved = {
            let state = self.state.borrow();
            resolve_from(&self.monitor, &state.cache, &self.base_key, state.default_value.as_ref())?
        };

        let notify = {
            let mut state = self.state.borrow_mut();
            let previous = state.activation.as_ref().map(|activation| &activation.value);
            let changed = previous != resolved.as_ref().map(|activation| &activation.value);
            if changed && resolved.is_none() {
                tracing::debug!(base_key = %self.base_key, "activation cleared");
            }
            state.activation = resolved.clone();
            match (changed, resolved, &state.on_resolved) {
                (true, Some(activation), Some(callback)) => Some((Rc::clone(callback), activation)),
                _ => None,
            }
        };

        // Borrow released: the callback may write inputs and recompute.
        match notify {
            Some((callback, activation)) => {
                tracing::debug!(
                    base_key = %self.base_key,
                    key = %activation.key,
                    alias = activation.alias().unwrap_or("-"),
                    "activation changed"
                );
                callback(&activation.value, activation.alias());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn resolve_from<T: Clone>(
    monitor: &MediaMonitor,
    cache: &InputCache<T>,
    prefix: &str,
    default: Option<&T>,
) -> Result<Option<Activation<T>>> {
    for def in monitor.registry().all() {
        let key = def.key_for(prefix);
        let Some(value) = cache.value(&key) else {
            continue;
        };
        if monitor.is_active(&def.alias)? {
            return Ok(Some(Activation {
                key,
                value: value.clone(),
                breakpoint: Some(def.clone()),
            }));
        }
    }

    let fallback = cache.value(prefix).or(default);
    Ok(fallback.map(|value| Activation {
        key: prefix.to_string(),
        value: value.clone(),
        breakpoint: None,
    }))
}
