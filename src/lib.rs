//! # spark-responsive
//!
//! Breakpoint-driven input resolution for reactive UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! reactive viewport and [taffy](https://docs.rs/taffy) for layout output.
//!
//! ## Architecture
//!
//! A binding declares one input per breakpoint (`class`, `classXs`,
//! `classGtMd`, ...). Whenever the set of active breakpoints changes the
//! highest-priority active breakpoint that has an input wins:
//!
//! ```text
//! Viewport signal → ViewportPlatform → MediaMonitor → ResponsiveInputResolver → directive
//! ```
//!
//! ## Modules
//!
//! - [`breakpoints`] - Breakpoint definitions, registry, defaults, config
//! - [`media`] - Media queries, platform watches, the shared monitor
//! - [`resolver`] - Input cache and priority resolution
//! - [`directives`] - Class and layout-wrap bindings on host elements
//! - [`error`] - Error type
//!
//! ## Example
//!
//! ```ignore
//! let platform = Rc::new(ViewportPlatform::new(Viewport::new(800.0, 600.0)));
//! let monitor = MediaMonitor::new(Rc::new(BreakpointRegistry::with_defaults()), platform.clone());
//!
//! let element = StyledElement::new();
//! let wrap = LayoutWrapDirective::new(monitor, Rc::new(element.clone()));
//! wrap.set_wrap(Some("gt-sm"), "nowrap")?;
//! wrap.init()?;
//!
//! platform.set_viewport(Viewport::new(1280.0, 800.0));
//! assert_eq!(element.style("flex-wrap").as_deref(), Some("nowrap"));
//! ```

pub mod breakpoints;
pub mod directives;
pub mod error;
pub mod media;
pub mod resolver;

// Re-export commonly used items
pub use breakpoints::{BreakpointConfig, BreakpointDefinition, BreakpointRegistry};
pub use directives::{
    ClassDirective, ClassValue, HostElement, LayoutDirection, LayoutWrapDirective, StyledElement,
    WrapMode,
};
pub use error::{ResponsiveError, Result};
pub use media::{
    MediaChange, MediaMonitor, MediaPlatform, MediaQuery, Orientation, Subscription, Viewport,
    ViewportConfig, ViewportPlatform,
};
pub use resolver::{Activation, InputFlags, ResponsiveInputResolver};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup(width: f32, height: f32) -> (Rc<ViewportPlatform>, MediaMonitor) {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();

        let platform = Rc::new(ViewportPlatform::new(Viewport::new(width, height)));
        let monitor = MediaMonitor::new(
            Rc::new(BreakpointRegistry::with_defaults()),
            platform.clone(),
        );
        (platform, monitor)
    }

    fn active_aliases(monitor: &MediaMonitor) -> Vec<String> {
        let mut aliases: Vec<String> = monitor
            .active_breakpoints()
            .unwrap()
            .into_iter()
            .map(|def| def.alias)
            .collect();
        aliases.sort();
        aliases
    }

    #[test]
    fn test_default_set_at_landscape_800() {
        let (_platform, monitor) = setup(800.0, 600.0);
        assert_eq!(
            active_aliases(&monitor),
            vec![
                "gt-xs",
                "handset",
                "handset.landscape",
                "lt-lg",
                "lt-md",
                "lt-xl",
                "sm",
            ]
        );
    }

    #[test]
    fn test_default_set_at_portrait_400() {
        let (_platform, monitor) = setup(400.0, 800.0);
        assert_eq!(
            active_aliases(&monitor),
            vec![
                "handset",
                "handset.portrait",
                "lt-lg",
                "lt-md",
                "lt-sm",
                "lt-xl",
                "xs",
            ]
        );
    }

    #[test]
    fn test_resize_drives_directives() {
        let (platform, monitor) = setup(800.0, 600.0);

        let element = StyledElement::new();
        let classes = ClassDirective::new(monitor.clone(), Rc::new(element.clone()));
        classes.set_class(None, "panel").unwrap();
        classes.set_class(Some("gt-sm"), "panel wide").unwrap();
        classes.set_class(Some("xs"), "panel narrow").unwrap();
        classes.init().unwrap();

        let wrap = LayoutWrapDirective::new(monitor.clone(), Rc::new(element.clone()));
        wrap.set_wrap(Some("lt-md"), "nowrap").unwrap();
        wrap.init().unwrap();

        assert_eq!(element.classes(), vec!["panel"]);
        assert_eq!(element.style("flex-wrap").as_deref(), Some("nowrap"));

        platform.set_viewport(Viewport::new(1280.0, 800.0));
        assert_eq!(element.classes(), vec!["panel", "wide"]);
        assert_eq!(element.style("flex-wrap").as_deref(), Some("wrap"));

        platform.set_viewport(Viewport::new(360.0, 640.0));
        assert_eq!(element.classes(), vec!["narrow", "panel"]);
        assert_eq!(wrap.wrap_mode(), WrapMode::NoWrap);

        classes.destroy();
        wrap.destroy();
        assert_eq!(monitor.subscriber_count(), 0);
        assert_eq!(monitor.watch_count(), 0);
    }

    #[test]
    fn test_orientation_outranks_size() {
        let (platform, monitor) = setup(800.0, 600.0);
        let resolver = ResponsiveInputResolver::new(monitor, "layout");
        resolver.cache_input("layoutSm", "sm".to_string(), InputFlags::empty());
        resolver.cache_input("layoutHandsetLandscape", "hl".to_string(), InputFlags::empty());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        resolver
            .activate(move |value: &String, alias| {
                seen_clone
                    .borrow_mut()
                    .push((value.clone(), alias.map(str::to_string)));
            })
            .unwrap();

        // Rotating to portrait leaves handset.landscape; sm still matches.
        platform.set_viewport(Viewport::new(800.0, 900.0));
        assert_eq!(
            *seen.borrow(),
            vec![
                ("hl".to_string(), Some("handset.landscape".to_string())),
                ("sm".to_string(), Some("sm".to_string())),
            ]
        );
    }

    #[test]
    fn test_custom_config_registry() {
        let config = BreakpointConfig::from_toml(
            r#"
            include_defaults = false

            [[breakpoints]]
            alias = "compact"
            media_query = "(max-width: 479px)"
            priority = 10
            "#,
        )
        .unwrap();
        let registry = BreakpointRegistry::from_config(&config).unwrap();
        let platform = Rc::new(ViewportPlatform::new(Viewport::new(320.0, 480.0)));
        let monitor = MediaMonitor::new(Rc::new(registry), platform);

        assert!(monitor.is_active("compact").unwrap());
        assert_eq!(
            monitor.is_active("xs").unwrap_err(),
            ResponsiveError::UnknownBreakpoint("xs".to_string())
        );
    }
}
