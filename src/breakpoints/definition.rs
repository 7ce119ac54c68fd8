//! Breakpoint definitions.

use serde::{Deserialize, Serialize};

/// A named viewport condition bound to a media query.
///
/// Higher `priority` wins when several breakpoints are active at once.
/// `gt-*` and `lt-*` ranges routinely overlap the base sizes, so the
/// priority is the only tie-break the resolver uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakpointDefinition {
    /// Unique alias, e.g. `"xs"`, `"gt-md"`, `"handset.portrait"`.
    pub alias: String,
    /// Raw media query text handed to the platform.
    pub media_query: String,
    /// Resolution priority. Unique within a registry.
    pub priority: i32,
    /// Suffix appended to a logical input key, e.g. `"GtMd"`.
    pub suffix: String,
}

impl BreakpointDefinition {
    /// Create a definition whose suffix is derived from the alias.
    pub fn new(alias: impl Into<String>, media_query: impl Into<String>, priority: i32) -> Self {
        let alias = alias.into();
        let suffix = suffix_for_alias(&alias);
        Self {
            alias,
            media_query: media_query.into(),
            priority,
            suffix,
        }
    }

    /// Override the derived suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Cache key for `prefix` at this breakpoint (`"class"` + `"GtMd"`).
    pub fn key_for(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.suffix)
    }
}

/// Camel-case an alias into its input-key suffix.
///
/// `"gt-md"` becomes `"GtMd"`, `"handset.portrait"` becomes `"HandsetPortrait"`.
pub fn suffix_for_alias(alias: &str) -> String {
    alias
        .split(['-', '.'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_derivation() {
        assert_eq!(suffix_for_alias("xs"), "Xs");
        assert_eq!(suffix_for_alias("gt-md"), "GtMd");
        assert_eq!(suffix_for_alias("lt-xl"), "LtXl");
        assert_eq!(suffix_for_alias("handset.portrait"), "HandsetPortrait");
        assert_eq!(suffix_for_alias("web"), "Web");
    }

    #[test]
    fn test_key_for() {
        let bp = BreakpointDefinition::new("gt-md", "(min-width: 1280px)", 3);
        assert_eq!(bp.key_for("class"), "classGtMd");
        assert_eq!(bp.key_for("wrap"), "wrapGtMd");
    }

    #[test]
    fn test_suffix_override() {
        let bp = BreakpointDefinition::new("phone", "(max-width: 400px)", 9).with_suffix("Mobile");
        assert_eq!(bp.key_for("class"), "classMobile");
    }
}
