//! Viewport platform - media queries evaluated against a reactive viewport.
//!
//! The viewport size is held in a signal so layout deriveds can track it
//! like any other root state. Changing it re-evaluates only the watches
//! whose queries read a feature that actually changed, then notifies their
//! listeners synchronously.
//!
//! Notification order within one resize: watches that became active are
//! notified before watches that became inactive, so listeners observe
//! a superset of the final active set during the hand-off rather than
//! an empty one.
//!
//! # Example
//!
//! ```ignore
//! use spark_responsive::media::{ViewportPlatform, Viewport};
//!
//! let platform = ViewportPlatform::new(Viewport::new(1024.0, 768.0));
//! let watch = platform.watch("(min-width: 960px)")?;
//! assert!(watch.matches());
//!
//! platform.set_viewport(Viewport::new(800.0, 600.0));
//! assert!(!watch.matches());
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use spark_signals::{signal, Signal};

use crate::error::{ResponsiveError, Result};

use super::platform::{ListenerId, ListenerList, MediaPlatform, QueryListener, QueryWatch};
use super::query::{MediaQuery, QueryFeatures};

// =============================================================================
// VIEWPORT
// =============================================================================

/// Viewport orientation. Square viewports count as portrait.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Terminal cells scaled to pixels.
    pub fn from_cells(columns: u16, rows: u16, config: &ViewportConfig) -> Self {
        Self {
            width: f32::from(columns) * config.cell_width,
            height: f32::from(rows) * config.cell_height,
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.height >= self.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    /// Features that differ between two viewports.
    pub fn changed_features(&self, other: &Viewport) -> QueryFeatures {
        let mut changed = QueryFeatures::empty();
        if self.width != other.width {
            changed |= QueryFeatures::WIDTH;
        }
        if self.height != other.height {
            changed |= QueryFeatures::HEIGHT;
        }
        if self.orientation() != other.orientation() {
            changed |= QueryFeatures::ORIENTATION;
        }
        changed
    }
}

/// Cell-to-pixel scale used when the viewport is a terminal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Pixels per terminal column.
    pub cell_width: f32,
    /// Pixels per terminal row.
    pub cell_height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

// =============================================================================
// WATCH
// =============================================================================

struct ViewportWatch {
    query: MediaQuery,
    features: QueryFeatures,
    matches: Cell<bool>,
    listeners: ListenerList,
}

impl QueryWatch for ViewportWatch {
    fn query(&self) -> &str {
        self.query.source()
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

// =============================================================================
// PLATFORM
// =============================================================================

/// A [`MediaPlatform`] backed by a viewport signal.
///
/// Cloning shares the same viewport and watch set.
#[derive(Clone)]
pub struct ViewportPlatform {
    viewport: Signal<Viewport>,
    watches: Rc<RefCell<Vec<Weak<ViewportWatch>>>>,
    config: ViewportConfig,
}

impl ViewportPlatform {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: signal(viewport),
            watches: Rc::new(RefCell::new(Vec::new())),
            config: ViewportConfig::default(),
        }
    }

    /// Use a custom cell scale for terminal detection.
    pub fn with_config(mut self, config: ViewportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> ViewportConfig {
        self.config
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    /// The viewport signal, for reactive tracking.
    pub fn viewport_signal(&self) -> Signal<Viewport> {
        self.viewport.clone()
    }

    /// Number of watches still alive.
    pub fn live_watch_count(&self) -> usize {
        self.watches
            .borrow()
            .iter()
            .filter(|watch| watch.strong_count() > 0)
            .count()
    }

    /// Resize the viewport and notify affected watches.
    pub fn set_viewport(&self, viewport: Viewport) {
        let previous = self.viewport.get();
        if previous == viewport {
            return;
        }
        self.viewport.set(viewport);

        let changed = previous.changed_features(&viewport);
        let mut activated = Vec::new();
        let mut deactivated = Vec::new();
        {
            let mut watches = self.watches.borrow_mut();
            watches.retain(|watch| watch.strong_count() > 0);
            for watch in watches.iter().filter_map(Weak::upgrade) {
                if !watch.features.intersects(changed) {
                    continue;
                }
                let matches = watch.query.matches(&viewport);
                if matches == watch.matches.get() {
                    continue;
                }
                watch.matches.set(matches);
                if matches {
                    activated.push(watch);
                } else {
                    deactivated.push(watch);
                }
            }
        }

        tracing::trace!(
            width = viewport.width,
            height = viewport.height,
            activated = activated.len(),
            deactivated = deactivated.len(),
            "viewport changed"
        );

        for watch in activated {
            watch.listeners.notify(true);
        }
        for watch in deactivated {
            watch.listeners.notify(false);
        }
    }

    /// Resize from terminal dimensions.
    pub fn set_terminal_size(&self, columns: u16, rows: u16) {
        self.set_viewport(Viewport::from_cells(columns, rows, &self.config));
    }

    /// Detect the real terminal size. Returns false when it cannot be queried.
    pub fn detect_terminal_size(&self) -> bool {
        match crossterm::terminal::size() {
            Ok((columns, rows)) => {
                self.set_terminal_size(columns, rows);
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "terminal size unavailable");
                false
            }
        }
    }

    /// Feed a terminal event; resize events update the viewport.
    ///
    /// Returns true if the event was a resize.
    pub fn handle_event(&self, event: &crossterm::event::Event) -> bool {
        match *event {
            crossterm::event::Event::Resize(columns, rows) => {
                self.set_terminal_size(columns, rows);
                true
            }
            _ => false,
        }
    }
}

fn parse_query(query: &str) -> Result<MediaQuery> {
    MediaQuery::parse(query).map_err(|reason| ResponsiveError::InvalidMediaQuery {
        query: query.to_string(),
        reason,
    })
}

impl MediaPlatform for ViewportPlatform {
    fn watch(&self, query: &str) -> Result<Rc<dyn QueryWatch>> {
        let parsed = parse_query(query)?;
        let watch = Rc::new(ViewportWatch {
            features: parsed.features(),
            matches: Cell::new(parsed.matches(&self.viewport.get())),
            query: parsed,
            listeners: ListenerList::new(),
        });

        let mut watches = self.watches.borrow_mut();
        watches.retain(|watch| watch.strong_count() > 0);
        watches.push(Rc::downgrade(&watch));
        Ok(watch)
    }

    fn matches(&self, query: &str) -> Result<bool> {
        Ok(parse_query(query)?.matches(&self.viewport.get()))
    }
}
