//! Input Cache - Last assigned value per logical input key.
//!
//! Keys are overwritten, never removed. Presence of a key, not the
//! truthiness of its value, is what makes it a resolution candidate.

use std::collections::HashMap;

use bitflags::bitflags;

bitflags! {
    /// Per-entry input flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InputFlags: u8 {
        /// The value is a class or style binding and is cached as given.
        const CLASS_OR_STYLE = 1 << 0;
    }
}

/// A cached input value.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub flags: InputFlags,
}

/// Key → last assigned value.
#[derive(Clone, Debug)]
pub struct InputCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T> Default for InputCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> InputCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `key`, returning the previous entry.
    pub fn insert(&mut self, key: impl Into<String>, value: T, flags: InputFlags) -> Option<CacheEntry<T>> {
        self.entries.insert(key.into(), CacheEntry { value, flags })
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&T> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
