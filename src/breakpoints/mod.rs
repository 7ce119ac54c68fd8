//! Breakpoints - Named viewport conditions and their registry.
//!
//! - [`BreakpointDefinition`] - alias, media query, priority, suffix
//! - [`BreakpointRegistry`] - ordered lookup, highest priority first
//! - [`defaults`] - the standard size and orientation tables
//! - [`BreakpointConfig`] - TOML configuration for custom sets

mod config;
pub mod defaults;
mod definition;
mod registry;

pub use config::{BreakpointConfig, BreakpointSpec};
pub use defaults::{default_breakpoints, orientation_breakpoints, responsive_breakpoints};
pub use definition::{suffix_for_alias, BreakpointDefinition};
pub use registry::BreakpointRegistry;
