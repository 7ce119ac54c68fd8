//! Media - Query watching and breakpoint activation streams.
//!
//! ```text
//! MediaPlatform (watch per query) → MediaMonitor (per-alias events) → listeners
//! ```
//!
//! - [`platform`] - the watch primitive the monitor builds on
//! - [`ViewportPlatform`] - queries evaluated against a reactive viewport
//! - [`MediaMonitor`] - shared, reference-counted watches and subscriptions
//! - [`query`] - media query parsing and evaluation

mod monitor;
pub mod platform;
pub mod query;
mod viewport;

#[cfg(test)]
pub(crate) mod testing;

pub use monitor::{MediaChange, MediaListener, MediaMonitor, Subscription};
pub use platform::{ListenerId, ListenerList, MediaPlatform, QueryListener, QueryWatch};
pub use query::{MediaQuery, QueryFeatures};
pub use viewport::{Orientation, Viewport, ViewportConfig, ViewportPlatform};
