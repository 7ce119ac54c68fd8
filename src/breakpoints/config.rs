//! Breakpoint configuration, decoded from TOML.
//!
//! ```toml
//! include_defaults = false
//!
//! [[breakpoints]]
//! alias = "compact"
//! media_query = "(max-width: 479px)"
//! priority = 10
//!
//! [[breakpoints]]
//! alias = "wide"
//! media_query = "(min-width: 1440px)"
//! priority = 5
//! suffix = "Wide"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::definition::BreakpointDefinition;

/// A breakpoint set as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointConfig {
    /// Start from the built-in breakpoints before adding `breakpoints`.
    #[serde(default = "default_true")]
    pub include_defaults: bool,
    /// Additional (or, without defaults, the only) breakpoints.
    #[serde(default)]
    pub breakpoints: Vec<BreakpointSpec>,
}

/// One configured breakpoint. The suffix is derived from the alias when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointSpec {
    pub alias: String,
    pub media_query: String,
    pub priority: i32,
    #[serde(default)]
    pub suffix: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            breakpoints: Vec::new(),
        }
    }
}

impl BreakpointConfig {
    /// Decode a configuration document.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

impl BreakpointSpec {
    /// Convert into a registry definition.
    pub fn to_definition(&self) -> BreakpointDefinition {
        let def = BreakpointDefinition::new(&self.alias, &self.media_query, self.priority);
        match &self.suffix {
            Some(suffix) => def.with_suffix(suffix),
            None => def,
        }
    }
}
