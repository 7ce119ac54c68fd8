//! Error types for breakpoint registration, media monitoring and configuration.

use thiserror::Error;

/// Errors surfaced by the responsive engine.
///
/// Missing cache entries are never errors: they are the normal
/// "no override at this breakpoint" state handled by fallback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponsiveError {
    /// A breakpoint with this alias is already registered.
    #[error("breakpoint alias '{0}' is already registered")]
    DuplicateAlias(String),

    /// Another breakpoint already uses this priority.
    #[error("breakpoint '{alias}' reuses priority {priority} already held by '{existing}'")]
    DuplicatePriority {
        alias: String,
        priority: i32,
        existing: String,
    },

    /// Another breakpoint already uses this suffix.
    #[error("breakpoint '{alias}' reuses suffix '{suffix}' already held by '{existing}'")]
    DuplicateSuffix {
        alias: String,
        suffix: String,
        existing: String,
    },

    /// The alias is not present in the registry.
    #[error("unknown breakpoint '{0}'")]
    UnknownBreakpoint(String),

    /// The platform refused to watch a media query.
    #[error("invalid media query '{query}': {reason}")]
    InvalidMediaQuery { query: String, reason: String },

    /// A breakpoint configuration document could not be decoded.
    #[error("invalid breakpoint configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ResponsiveError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ResponsiveError>;
