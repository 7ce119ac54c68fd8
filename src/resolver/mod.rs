//! Resolver - Responsive input resolution.
//!
//! - [`InputCache`] - last value per input key
//! - [`ResponsiveInputResolver`] - picks the active input and notifies on change

mod cache;
mod engine;

pub use cache::{CacheEntry, InputCache, InputFlags};
pub use engine::{Activation, ResolvedCallback, ResponsiveInputResolver};
