//! Breakpoint Registry - Ordered, read-only breakpoint lookup.
//!
//! Built once at startup, then shared as `Rc<BreakpointRegistry>`.
//! Definitions are kept sorted by descending priority so iteration order
//! is the resolution order.

use std::collections::HashMap;

use crate::error::{ResponsiveError, Result};

use super::config::BreakpointConfig;
use super::defaults::default_breakpoints;
use super::definition::BreakpointDefinition;

/// Ordered collection of breakpoint definitions, unique by alias,
/// priority and suffix.
#[derive(Debug, Clone, Default)]
pub struct BreakpointRegistry {
    items: Vec<BreakpointDefinition>,
    by_alias: HashMap<String, usize>,
}

impl BreakpointRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the standard responsive and orientation breakpoints.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for def in default_breakpoints() {
            // The default table is unique by construction.
            registry.insert_unchecked(def);
        }
        registry
    }

    /// Build a registry from definitions, failing on the first conflict.
    pub fn from_definitions<I>(defs: I) -> Result<Self>
    where
        I: IntoIterator<Item = BreakpointDefinition>,
    {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def)?;
        }
        Ok(registry)
    }

    /// Build a registry from a decoded configuration.
    pub fn from_config(config: &BreakpointConfig) -> Result<Self> {
        let mut registry = if config.include_defaults {
            Self::with_defaults()
        } else {
            Self::new()
        };
        for spec in &config.breakpoints {
            registry.register(spec.to_definition())?;
        }
        Ok(registry)
    }

    /// Register a breakpoint.
    ///
    /// Fails fast on a duplicate alias, priority or suffix; existing
    /// definitions are never overridden.
    pub fn register(&mut self, def: BreakpointDefinition) -> Result<()> {
        if self.by_alias.contains_key(&def.alias) {
            return Err(ResponsiveError::DuplicateAlias(def.alias));
        }
        if let Some(existing) = self.items.iter().find(|it| it.priority == def.priority) {
            return Err(ResponsiveError::DuplicatePriority {
                alias: def.alias,
                priority: def.priority,
                existing: existing.alias.clone(),
            });
        }
        if let Some(existing) = self.items.iter().find(|it| it.suffix == def.suffix) {
            return Err(ResponsiveError::DuplicateSuffix {
                alias: def.alias,
                suffix: def.suffix,
                existing: existing.alias.clone(),
            });
        }
        tracing::trace!(alias = %def.alias, priority = def.priority, "registering breakpoint");
        self.insert_unchecked(def);
        Ok(())
    }

    fn insert_unchecked(&mut self, def: BreakpointDefinition) {
        let position = self
            .items
            .iter()
            .position(|it| it.priority < def.priority)
            .unwrap_or(self.items.len());
        self.items.insert(position, def);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.by_alias = self
            .items
            .iter()
            .enumerate()
            .map(|(index, it)| (it.alias.clone(), index))
            .collect();
    }

    /// Find a definition by alias.
    pub fn find(&self, alias: &str) -> Option<&BreakpointDefinition> {
        self.by_alias.get(alias).map(|&index| &self.items[index])
    }

    /// Like [`find`](Self::find), but reports a missing alias as an error.
    pub fn get(&self, alias: &str) -> Result<&BreakpointDefinition> {
        self.find(alias)
            .ok_or_else(|| ResponsiveError::UnknownBreakpoint(alias.to_string()))
    }

    /// Find a definition by its input-key suffix.
    pub fn find_by_suffix(&self, suffix: &str) -> Option<&BreakpointDefinition> {
        self.items.iter().find(|it| it.suffix == suffix)
    }

    /// Whether the alias is registered.
    pub fn contains(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }

    /// All definitions, highest priority first.
    ///
    /// The iterator is lazy and borrows the registry, so calling `all()`
    /// again restarts from the top.
    pub fn all(&self) -> impl Iterator<Item = &BreakpointDefinition> + '_ {
        self.items.iter()
    }

    /// All aliases, highest priority first.
    pub fn aliases(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|it| it.alias.as_str())
    }

    /// Number of registered breakpoints.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(alias: &str, priority: i32) -> BreakpointDefinition {
        BreakpointDefinition::new(alias, format!("(min-width: {}px)", priority * 100), priority)
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = BreakpointRegistry::new();
        registry.register(bp("xs", 1)).unwrap();
        registry.register(bp("gt-md", 3)).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("gt-md").unwrap().suffix, "GtMd");
        assert!(registry.find("md").is_none());
        assert_eq!(registry.find_by_suffix("Xs").unwrap().alias, "xs");
    }

    #[test]
    fn test_duplicate_alias_fails() {
        let mut registry = BreakpointRegistry::new();
        registry.register(bp("xs", 1)).unwrap();

        let err = registry.register(bp("xs", 2)).unwrap_err();
        assert_eq!(err, ResponsiveError::DuplicateAlias("xs".to_string()));
        // Original definition is untouched.
        assert_eq!(registry.find("xs").unwrap().priority, 1);
    }

    #[test]
    fn test_duplicate_priority_fails() {
        let mut registry = BreakpointRegistry::new();
        registry.register(bp("xs", 1)).unwrap();

        let err = registry.register(bp("sm", 1)).unwrap_err();
        assert!(matches!(err, ResponsiveError::DuplicatePriority { ref existing, .. } if existing == "xs"));
    }

    #[test]
    fn test_duplicate_suffix_fails() {
        let mut registry = BreakpointRegistry::new();
        registry.register(bp("xs", 1)).unwrap();

        let err = registry
            .register(bp("phone", 2).with_suffix("Xs"))
            .unwrap_err();
        assert!(matches!(err, ResponsiveError::DuplicateSuffix { .. }));
    }

    #[test]
    fn test_all_is_ordered_and_restartable() {
        let registry =
            BreakpointRegistry::from_definitions([bp("md", 2), bp("xs", 1), bp("gt-md", 3)]).unwrap();

        let first: Vec<&str> = registry.aliases().collect();
        assert_eq!(first, vec!["gt-md", "md", "xs"]);

        let second: Vec<i32> = registry.all().map(|it| it.priority).collect();
        assert_eq!(second, vec![3, 2, 1]);
    }

    #[test]
    fn test_get_unknown() {
        let registry = BreakpointRegistry::new();
        assert_eq!(
            registry.get("xl").unwrap_err(),
            ResponsiveError::UnknownBreakpoint("xl".to_string())
        );
    }

    #[test]
    fn test_defaults_are_consistent() {
        let registry = BreakpointRegistry::with_defaults();
        assert!(registry.contains("xs"));
        assert!(registry.contains("gt-lg"));
        assert!(registry.contains("handset.portrait"));

        // Re-registering the defaults one by one must succeed.
        let rebuilt = BreakpointRegistry::from_definitions(registry.all().cloned()).unwrap();
        assert_eq!(rebuilt.len(), registry.len());
    }
}
