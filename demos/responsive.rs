//! Responsive Example - Breakpoints driving directives
//!
//! This example walks a viewport through a few sizes and shows:
//! - Which default breakpoints are active at each size
//! - A class directive picking the highest-priority input
//! - A layout-wrap directive writing flex styles
//! - Debug logs for bindings and activation changes
//!
//! Run with: cargo run --example responsive

use std::rc::Rc;

use spark_responsive::{
    BreakpointRegistry, ClassDirective, LayoutWrapDirective, MediaMonitor, StyledElement,
    Viewport, ViewportPlatform,
};

fn main() -> spark_responsive::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    println!("=== spark-responsive Example ===\n");

    let platform = Rc::new(ViewportPlatform::new(Viewport::new(1280.0, 800.0)));
    let monitor = MediaMonitor::new(Rc::new(BreakpointRegistry::with_defaults()), platform.clone());

    let element = StyledElement::new();

    let classes = ClassDirective::new(monitor.clone(), Rc::new(element.clone()));
    classes.set_class(None, "card")?;
    classes.set_class(Some("xs"), "card compact")?;
    classes.set_class(Some("gt-md"), "card spacious")?;
    classes.init()?;

    let wrap = LayoutWrapDirective::new(monitor.clone(), Rc::new(element.clone()));
    wrap.set_wrap(None, "wrap")?;
    wrap.set_wrap(Some("lt-md"), "nowrap")?;
    wrap.init()?;

    // Follow the real terminal when there is one.
    if platform.detect_terminal_size() {
        let viewport = platform.viewport();
        println!("Terminal viewport: {}x{}\n", viewport.width, viewport.height);
    }

    let sizes = [
        Viewport::new(1280.0, 800.0),
        Viewport::new(800.0, 600.0),
        Viewport::new(360.0, 640.0),
        Viewport::new(1920.0, 1080.0),
    ];

    for viewport in sizes {
        platform.set_viewport(viewport);

        let active: Vec<String> = monitor
            .active_breakpoints()?
            .into_iter()
            .map(|def| def.alias)
            .collect();

        println!("Viewport {}x{}", viewport.width, viewport.height);
        println!("  active:    {}", active.join(", "));
        println!("  classes:   {}", element.classes().join(" "));
        println!(
            "  flex-wrap: {}",
            element.style("flex-wrap").unwrap_or_default()
        );
        println!("  taffy:     {:?}\n", wrap.taffy_style().flex_wrap);
    }

    classes.destroy();
    wrap.destroy();
    println!("Watches after teardown: {}", monitor.watch_count());

    println!("\n=== Example Complete ===");
    Ok(())
}
