//! Class Directive - Responsive class lists.
//!
//! Inputs are set per breakpoint alias (`None` for the base input) and
//! cached under `"class"` + suffix. Whenever the active input changes the
//! directive diffs the classes it applied last time against the new set,
//! so unrelated classes on the host are left alone.
//!
//! # Example
//!
//! ```ignore
//! let directive = ClassDirective::new(monitor, Rc::new(element.clone()));
//! directive.set_class(None, "card")?;
//! directive.set_class(Some("xs"), vec!["card", "compact"])?;
//! directive.init()?;
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::error::Result;
use crate::media::MediaMonitor;
use crate::resolver::{InputFlags, ResponsiveInputResolver};

use super::host::HostElement;
use super::input_key;

/// Base input key.
pub const CLASS_KEY: &str = "class";

/// Accepted class input shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassValue {
    /// Whitespace separated names.
    Names(String),
    List(Vec<String>),
    Set(BTreeSet<String>),
    /// Name → enabled.
    Map(BTreeMap<String, bool>),
}

impl Default for ClassValue {
    fn default() -> Self {
        Self::Names(String::new())
    }
}

impl ClassValue {
    /// Normalized set of class names.
    pub fn class_names(&self) -> BTreeSet<String> {
        let split = |s: &str| s.split_whitespace().map(str::to_string).collect::<Vec<_>>();
        match self {
            Self::Names(names) => split(names.as_str()).into_iter().collect(),
            Self::List(list) => list.iter().flat_map(|it| split(it.as_str())).collect(),
            Self::Set(set) => set.iter().flat_map(|it| split(it.as_str())).collect(),
            Self::Map(map) => map
                .iter()
                .filter(|&(_, &enabled)| enabled)
                .flat_map(|(name, _)| split(name.as_str()))
                .collect(),
        }
    }
}

impl From<&str> for ClassValue {
    fn from(names: &str) -> Self {
        Self::Names(names.to_string())
    }
}

impl From<String> for ClassValue {
    fn from(names: String) -> Self {
        Self::Names(names)
    }
}

impl From<Vec<&str>> for ClassValue {
    fn from(list: Vec<&str>) -> Self {
        Self::List(list.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for ClassValue {
    fn from(list: Vec<String>) -> Self {
        Self::List(list)
    }
}

impl From<BTreeSet<String>> for ClassValue {
    fn from(set: BTreeSet<String>) -> Self {
        Self::Set(set)
    }
}

impl From<BTreeMap<String, bool>> for ClassValue {
    fn from(map: BTreeMap<String, bool>) -> Self {
        Self::Map(map)
    }
}

/// Responsive class binding on one host element.
pub struct ClassDirective {
    resolver: ResponsiveInputResolver<ClassValue>,
    host: Rc<dyn HostElement>,
    applied: Rc<RefCell<BTreeSet<String>>>,
}

impl ClassDirective {
    pub fn new(monitor: MediaMonitor, host: Rc<dyn HostElement>) -> Self {
        Self {
            resolver: ResponsiveInputResolver::new(monitor, CLASS_KEY).with_default(ClassValue::default()),
            host,
            applied: Rc::new(RefCell::new(BTreeSet::new())),
        }
    }

    /// Set the class input for `breakpoint` (`None` for the base input).
    ///
    /// Fails with `UnknownBreakpoint` for an unregistered alias.
    pub fn set_class(&self, breakpoint: Option<&str>, value: impl Into<ClassValue>) -> Result<()> {
        let key = input_key(self.resolver.monitor(), CLASS_KEY, breakpoint)?;
        self.resolver
            .update_input(key, value.into(), InputFlags::CLASS_OR_STYLE)?;
        Ok(())
    }

    /// Bind to breakpoint changes and apply the initial classes.
    pub fn init(&self) -> Result<()> {
        let host = Rc::clone(&self.host);
        let applied = Rc::clone(&self.applied);
        self.resolver.activate(move |value: &ClassValue, _alias| {
            apply_classes(host.as_ref(), &applied, value.class_names());
        })
    }

    /// Release the breakpoint subscription.
    pub fn destroy(&self) {
        self.resolver.deactivate();
    }

    /// Classes this directive currently has applied, sorted.
    pub fn applied_classes(&self) -> Vec<String> {
        self.applied.borrow().iter().cloned().collect()
    }

    pub fn resolver(&self) -> &ResponsiveInputResolver<ClassValue> {
        &self.resolver
    }
}

fn apply_classes(host: &dyn HostElement, applied: &RefCell<BTreeSet<String>>, next: BTreeSet<String>) {
    let mut applied = applied.borrow_mut();
    for stale in applied.difference(&next) {
        host.remove_class(stale);
    }
    for fresh in next.difference(&applied) {
        host.add_class(fresh);
    }
    *applied = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoints::{BreakpointDefinition, BreakpointRegistry};
    use crate::directives::StyledElement;
    use crate::error::ResponsiveError;
    use crate::media::testing::FakePlatform;
    use pretty_assertions::assert_eq;

    fn setup() -> (MediaMonitor, Rc<FakePlatform>, StyledElement) {
        let registry = BreakpointRegistry::from_definitions([
            BreakpointDefinition::new("xs", "q-xs", 1),
            BreakpointDefinition::new("gt-md", "q-gt-md", 3),
        ])
        .unwrap();
        let platform = Rc::new(FakePlatform::new());
        let monitor = MediaMonitor::new(Rc::new(registry), platform.clone());
        (monitor, platform, StyledElement::new())
    }

    #[test]
    fn test_class_value_normalization() {
        assert_eq!(
            ClassValue::from("  a b  a ").class_names().into_iter().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(
            ClassValue::from(vec!["x y", "z"]).class_names().len(),
            3
        );
        let map: BTreeMap<String, bool> =
            [("on".to_string(), true), ("off".to_string(), false)].into_iter().collect();
        assert_eq!(
            ClassValue::from(map).class_names().into_iter().collect::<Vec<_>>(),
            vec!["on"]
        );
        assert!(ClassValue::default().class_names().is_empty());
    }

    #[test]
    fn test_responsive_classes() {
        let (monitor, platform, element) = setup();
        platform.set_matches("q-xs", true);

        let directive = ClassDirective::new(monitor, Rc::new(element.clone()));
        directive.set_class(None, "card base").unwrap();
        directive.set_class(Some("xs"), vec!["card", "stack"]).unwrap();
        directive.set_class(Some("gt-md"), "card grid").unwrap();
        directive.init().unwrap();

        assert_eq!(element.classes(), vec!["card", "stack"]);

        platform.set_matches("q-gt-md", true);
        assert_eq!(element.classes(), vec!["card", "grid"]);
        assert_eq!(directive.applied_classes(), vec!["card", "grid"]);

        platform.set_matches("q-gt-md", false);
        platform.set_matches("q-xs", false);
        assert_eq!(element.classes(), vec!["base", "card"]);
    }

    #[test]
    fn test_foreign_classes_untouched() {
        let (monitor, platform, element) = setup();
        element.add_class("external");

        let directive = ClassDirective::new(monitor, Rc::new(element.clone()));
        directive.set_class(Some("xs"), "compact").unwrap();
        directive.init().unwrap();
        assert_eq!(element.classes(), vec!["external"]);

        platform.set_matches("q-xs", true);
        assert_eq!(element.classes(), vec!["compact", "external"]);

        platform.set_matches("q-xs", false);
        assert_eq!(element.classes(), vec!["external"]);
    }

    #[test]
    fn test_unknown_breakpoint_input() {
        let (monitor, _platform, element) = setup();
        let directive = ClassDirective::new(monitor, Rc::new(element));
        assert_eq!(
            directive.set_class(Some("md"), "x").unwrap_err(),
            ResponsiveError::UnknownBreakpoint("md".to_string())
        );
    }

    #[test]
    fn test_input_change_while_bound() {
        let (monitor, _platform, element) = setup();
        let directive = ClassDirective::new(monitor, Rc::new(element.clone()));
        directive.init().unwrap();
        assert!(element.classes().is_empty());

        directive.set_class(None, "a").unwrap();
        assert_eq!(element.classes(), vec!["a"]);
        assert!(directive
            .resolver()
            .input_flags("class")
            .unwrap()
            .contains(InputFlags::CLASS_OR_STYLE));

        directive.destroy();
        directive.set_class(None, "b").unwrap();
        assert_eq!(element.classes(), vec!["a"]);
    }
}
