//! Directives - Bindings that turn resolved inputs into element output.
//!
//! Each directive owns one [`ResponsiveInputResolver`](crate::resolver::ResponsiveInputResolver)
//! and writes through a [`HostElement`]:
//!
//! - [`ClassDirective`] - responsive class lists
//! - [`LayoutWrapDirective`] - responsive `flex-wrap`
//!
//! Lifecycle: set inputs, `init()` once, set inputs again at will,
//! `destroy()` (or drop) at teardown.

mod class;
mod host;
mod layout_wrap;

pub use class::{ClassDirective, ClassValue, CLASS_KEY};
pub use host::{apply_styles, HostElement, StyleMap, StyledElement};
pub use layout_wrap::{build_css, LayoutDirection, LayoutWrapDirective, WrapMode, DEFAULT_WRAP, WRAP_KEY};

use crate::error::Result;
use crate::media::MediaMonitor;

/// Cache key for `base` at `breakpoint`, or `base` itself for the base input.
///
/// The suffix comes from the registry, so every registered alias is a
/// valid input without per-alias setters.
pub fn input_key(monitor: &MediaMonitor, base: &str, breakpoint: Option<&str>) -> Result<String> {
    match breakpoint {
        None => Ok(base.to_string()),
        Some(alias) => Ok(monitor.registry().get(alias)?.key_for(base)),
    }
}
