//! Default breakpoint tables.
//!
//! Priorities form an explicit total order:
//!
//! - orientation breakpoints (`handset`, `tablet`, `web` and their
//!   `.portrait`/`.landscape` variants): 2000..=2220, variants above
//!   their parent
//! - exact sizes and `lt-*` ranges, narrowest first: 1000 (`xs`) down to
//!   600 (`xl`), each `lt-*` sitting just below the size it excludes
//! - `gt-*` ranges: negative, wider ranges lower (`gt-xs` = -950,
//!   `gt-lg` = -650)
//!
//! A more specific condition always outranks a broader one that overlaps it.

use super::definition::BreakpointDefinition;

/// Media query for handsets held in portrait.
pub const HANDSET_PORTRAIT: &str = "(orientation: portrait) and (max-width: 599px)";
/// Media query for handsets held in landscape.
pub const HANDSET_LANDSCAPE: &str = "(orientation: landscape) and (max-width: 959px)";
/// Media query for tablets held in portrait.
pub const TABLET_PORTRAIT: &str =
    "(orientation: portrait) and (min-width: 600px) and (max-width: 839px)";
/// Media query for tablets held in landscape.
pub const TABLET_LANDSCAPE: &str =
    "(orientation: landscape) and (min-width: 960px) and (max-width: 1279px)";
/// Media query for desktop viewports in portrait.
pub const WEB_PORTRAIT: &str = "(orientation: portrait) and (min-width: 840px)";
/// Media query for desktop viewports in landscape.
pub const WEB_LANDSCAPE: &str = "(orientation: landscape) and (min-width: 1280px)";

const RESPONSIVE: &[(&str, &str, i32)] = &[
    ("xs", "screen and (max-width: 599px)", 1000),
    ("lt-sm", "screen and (max-width: 599px)", 950),
    ("sm", "screen and (min-width: 600px) and (max-width: 959px)", 900),
    ("lt-md", "screen and (max-width: 959px)", 850),
    ("md", "screen and (min-width: 960px) and (max-width: 1279px)", 800),
    ("lt-lg", "screen and (max-width: 1279px)", 750),
    ("lg", "screen and (min-width: 1280px) and (max-width: 1919px)", 700),
    ("lt-xl", "screen and (max-width: 1919px)", 650),
    ("xl", "screen and (min-width: 1920px) and (max-width: 5000px)", 600),
    ("gt-lg", "screen and (min-width: 1920px)", -650),
    ("gt-md", "screen and (min-width: 1280px)", -750),
    ("gt-sm", "screen and (min-width: 960px)", -850),
    ("gt-xs", "screen and (min-width: 600px)", -950),
];

/// Standard size breakpoints (`xs`..`xl`, `lt-*`, `gt-*`).
pub fn responsive_breakpoints() -> Vec<BreakpointDefinition> {
    RESPONSIVE
        .iter()
        .map(|&(alias, query, priority)| BreakpointDefinition::new(alias, query, priority))
        .collect()
}

/// Device-orientation breakpoints.
pub fn orientation_breakpoints() -> Vec<BreakpointDefinition> {
    vec![
        BreakpointDefinition::new("handset", format!("{HANDSET_PORTRAIT}, {HANDSET_LANDSCAPE}"), 2000),
        BreakpointDefinition::new("handset.landscape", HANDSET_LANDSCAPE, 2010),
        BreakpointDefinition::new("handset.portrait", HANDSET_PORTRAIT, 2020),
        BreakpointDefinition::new("tablet", format!("{TABLET_PORTRAIT}, {TABLET_LANDSCAPE}"), 2100),
        BreakpointDefinition::new("tablet.landscape", TABLET_LANDSCAPE, 2110),
        BreakpointDefinition::new("tablet.portrait", TABLET_PORTRAIT, 2120),
        BreakpointDefinition::new("web", format!("{WEB_PORTRAIT}, {WEB_LANDSCAPE}"), 2200),
        BreakpointDefinition::new("web.landscape", WEB_LANDSCAPE, 2210),
        BreakpointDefinition::new("web.portrait", WEB_PORTRAIT, 2220),
    ]
}

/// Every built-in breakpoint.
pub fn default_breakpoints() -> Vec<BreakpointDefinition> {
    let mut all = responsive_breakpoints();
    all.extend(orientation_breakpoints());
    all
}
