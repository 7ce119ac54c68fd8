//! Host element interface.
//!
//! Directives never touch a renderer directly: they write inline styles and
//! class names through [`HostElement`]. [`StyledElement`] is an in-memory
//! element that records what was written.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// Inline style properties in write order.
pub type StyleMap = Vec<(&'static str, String)>;

/// The element a directive is attached to.
pub trait HostElement {
    /// Set an inline style property; `None` removes it.
    fn set_style(&self, property: &str, value: Option<&str>);

    fn add_class(&self, name: &str);

    fn remove_class(&self, name: &str);
}

/// Write every property of `styles` to `host`.
pub fn apply_styles(host: &dyn HostElement, styles: &StyleMap) {
    for (property, value) in styles {
        host.set_style(property, Some(value));
    }
}

#[derive(Default)]
struct ElementState {
    styles: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    writes: usize,
}

/// In-memory host element. Clones share state.
#[derive(Clone, Default)]
pub struct StyledElement {
    state: Rc<RefCell<ElementState>>,
}

impl StyledElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.state.borrow().styles.get(property).cloned()
    }

    pub fn styles(&self) -> BTreeMap<String, String> {
        self.state.borrow().styles.clone()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.state.borrow().classes.contains(name)
    }

    /// Class names, sorted.
    pub fn classes(&self) -> Vec<String> {
        self.state.borrow().classes.iter().cloned().collect()
    }

    /// Total style and class writes so far.
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }
}

impl HostElement for StyledElement {
    fn set_style(&self, property: &str, value: Option<&str>) {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        match value {
            Some(value) => {
                state.styles.insert(property.to_string(), value.to_string());
            }
            None => {
                state.styles.remove(property);
            }
        }
    }

    fn add_class(&self, name: &str) {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        state.classes.insert(name.to_string());
    }

    fn remove_class(&self, name: &str) {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        state.classes.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_element() {
        let element = StyledElement::new();
        let shared = element.clone();

        apply_styles(&element, &vec![("display", "flex".to_string())]);
        shared.add_class("card");
        element.set_style("display", None);

        assert_eq!(shared.style("display"), None);
        assert!(element.has_class("card"));
        assert_eq!(element.write_count(), 3);
    }
}
