//! Layout Wrap Directive - Responsive `flex-wrap`.
//!
//! Resolves the active `wrap` input and writes
//! `display: flex; flex-wrap: <mode>; flex-direction: <layout>` to the host.
//! The direction follows the parent layout and can change independently of
//! breakpoints.
//!
//! Value mapping (case-insensitive):
//!
//! | input                     | flex-wrap      |
//! |---------------------------|----------------|
//! | `reverse`, `wrap-reverse` | `wrap-reverse` |
//! | `no`, `none`, `nowrap`    | `nowrap`       |
//! | anything else             | `wrap`         |

use std::cell::Cell;
use std::rc::Rc;

use taffy::{Display, FlexDirection as TaffyFlexDirection, FlexWrap as TaffyFlexWrap, Style};

use crate::error::Result;
use crate::media::MediaMonitor;
use crate::resolver::{InputFlags, ResponsiveInputResolver};

use super::host::{apply_styles, HostElement, StyleMap};
use super::input_key;

/// Base input key.
pub const WRAP_KEY: &str = "wrap";

/// Value used when no input is set.
pub const DEFAULT_WRAP: &str = "wrap";

// =============================================================================
// VALUES
// =============================================================================

/// Normalized `flex-wrap` value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    #[default]
    Wrap,
    NoWrap,
    WrapReverse,
}

impl WrapMode {
    /// Map a raw input to a wrap mode. Unknown values wrap.
    pub fn from_input(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "reverse" | "wrap-reverse" => Self::WrapReverse,
            "no" | "none" | "nowrap" => Self::NoWrap,
            _ => Self::Wrap,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Wrap => "wrap",
            Self::NoWrap => "nowrap",
            Self::WrapReverse => "wrap-reverse",
        }
    }

    pub fn to_taffy(self) -> TaffyFlexWrap {
        match self {
            Self::Wrap => TaffyFlexWrap::Wrap,
            Self::NoWrap => TaffyFlexWrap::NoWrap,
            Self::WrapReverse => TaffyFlexWrap::WrapReverse,
        }
    }
}

/// Parent layout direction, with `-reverse` stripped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutDirection {
    #[default]
    Row,
    Column,
}

impl LayoutDirection {
    /// Normalize a parent `flex-direction`. Unknown values become `row`.
    pub fn from_input(direction: &str) -> Self {
        let lowered = direction.trim().to_ascii_lowercase();
        match lowered.replace("-reverse", "").as_str() {
            "column" => Self::Column,
            _ => Self::Row,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
        }
    }

    pub fn to_taffy(self) -> TaffyFlexDirection {
        match self {
            Self::Row => TaffyFlexDirection::Row,
            Self::Column => TaffyFlexDirection::Column,
        }
    }
}

/// CSS written for a wrap mode within a layout direction.
pub fn build_css(wrap: WrapMode, layout: LayoutDirection) -> StyleMap {
    vec![
        ("flex-wrap", wrap.as_css().to_string()),
        ("display", "flex".to_string()),
        ("flex-direction", layout.as_css().to_string()),
    ]
}

// =============================================================================
// DIRECTIVE
// =============================================================================

/// Responsive flex-wrap binding on one host element.
pub struct LayoutWrapDirective {
    resolver: ResponsiveInputResolver<String>,
    host: Rc<dyn HostElement>,
    layout: Rc<Cell<LayoutDirection>>,
    wrap: Rc<Cell<WrapMode>>,
}

impl LayoutWrapDirective {
    pub fn new(monitor: MediaMonitor, host: Rc<dyn HostElement>) -> Self {
        Self {
            resolver: ResponsiveInputResolver::new(monitor, WRAP_KEY)
                .with_default(DEFAULT_WRAP.to_string()),
            host,
            layout: Rc::new(Cell::new(LayoutDirection::Row)),
            wrap: Rc::new(Cell::new(WrapMode::Wrap)),
        }
    }

    /// Set the wrap input for `breakpoint` (`None` for the base input).
    pub fn set_wrap(&self, breakpoint: Option<&str>, value: impl Into<String>) -> Result<()> {
        let key = input_key(self.resolver.monitor(), WRAP_KEY, breakpoint)?;
        self.resolver.update_input(key, value.into(), InputFlags::empty())?;
        Ok(())
    }

    /// Bind to breakpoint changes and apply the initial styles.
    pub fn init(&self) -> Result<()> {
        let host = Rc::clone(&self.host);
        let layout = Rc::clone(&self.layout);
        let wrap = Rc::clone(&self.wrap);
        self.resolver.activate(move |value: &String, _alias| {
            let mode = WrapMode::from_input(value);
            wrap.set(mode);
            apply_styles(host.as_ref(), &build_css(mode, layout.get()));
        })
    }

    /// The parent layout changed direction; re-apply with the current value.
    pub fn set_layout_direction(&self, direction: &str) -> Result<()> {
        let layout = LayoutDirection::from_input(direction);
        self.layout.set(layout);

        let value = match self.resolver.activated_value() {
            Some(value) => value,
            None => self
                .resolver
                .resolve()?
                .map_or_else(|| DEFAULT_WRAP.to_string(), |activation| activation.value),
        };
        let mode = WrapMode::from_input(&value);
        self.wrap.set(mode);
        apply_styles(self.host.as_ref(), &build_css(mode, layout));
        Ok(())
    }

    /// Release the breakpoint subscription.
    pub fn destroy(&self) {
        self.resolver.deactivate();
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap.get()
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.layout.get()
    }

    /// Current state as a taffy flex container style.
    pub fn taffy_style(&self) -> Style {
        Style {
            display: Display::Flex,
            flex_direction: self.layout.get().to_taffy(),
            flex_wrap: self.wrap.get().to_taffy(),
            ..Style::default()
        }
    }

    pub fn resolver(&self) -> &ResponsiveInputResolver<String> {
        &self.resolver
    }
}
