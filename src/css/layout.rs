//! Layout CSS: responsive collapse rules and the shell's custom properties.
//!
//! [`generate_layout_css`] turns a [`LayoutInput`] into a media query that
//! zeroes margins and drawer offsets below a breakpoint, followed by a
//! `:root` block of `--uizy-*` custom properties.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::scalar::Scalar;

/// Named breakpoint widths in pixels.
pub const BREAKPOINTS: &[(&str, f64)] = &[
    ("sm", 576.0),
    ("md", 768.0),
    ("lg", 992.0),
    ("xl", 1200.0),
    ("xxl", 1400.0),
];

/// Pixel width of a named breakpoint.
pub fn breakpoint_width(name: &str) -> Option<f64> {
    BREAKPOINTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, w)| *w)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which surfaces collapse below the breakpoint, and on which edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakpointConfig {
    /// Named breakpoint (`sm` to `xxl`). Takes precedence over `width`.
    pub name: String,
    pub width: f64,
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub main: bool,
    pub header: bool,
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: 0.0,
            top: false,
            bottom: false,
            left: false,
            right: false,
            main: true,
            header: true,
        }
    }
}

impl BreakpointConfig {
    /// The media query width: the named breakpoint if set, else `width`.
    pub fn resolved_width(&self) -> f64 {
        if self.name.is_empty() {
            return self.width;
        }
        breakpoint_width(&self.name).unwrap_or_else(|| {
            warn!(name = %self.name, width = self.width, "unknown breakpoint name, using width");
            self.width
        })
    }
}

/// Shell dimensions. Lengths are pixels, `drawer_speed` is seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub system: f64,
    pub header: f64,
    pub footer: f64,
    pub left: f64,
    pub right: f64,
    pub left_mini: f64,
    pub right_mini: f64,
    pub drawer_speed: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            system: 0.0,
            header: 56.0,
            footer: 48.0,
            left: 240.0,
            right: 240.0,
            left_mini: 64.0,
            right_mini: 64.0,
            drawer_speed: 0.2,
        }
    }
}

/// Overlay mask appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub opacity: f64,
    pub color: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            opacity: 0.45,
            color: "black".to_owned(),
        }
    }
}

/// Input to [`generate_layout_css`]. Missing sections and fields take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutInput {
    pub breakpoint: BreakpointConfig,
    pub layout: LayoutConfig,
    pub overlay: OverlayConfig,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate the full layout stylesheet.
pub fn generate_layout_css(input: &LayoutInput) -> String {
    let mut css = breakpoint_css(&input.breakpoint);
    css.push_str(&variables_css(&input.layout, &input.overlay));
    css
}

/// The `@media (max-width: ...)` block.
pub fn breakpoint_css(bp: &BreakpointConfig) -> String {
    let mut margin = Vec::new();
    if bp.left {
        margin.push("margin-left: 0 !important;");
    }
    if bp.right {
        margin.push("margin-right: 0 !important;");
    }
    let mut drawer = Vec::new();
    if bp.top {
        drawer.push("top: 0 !important;");
    }
    if bp.bottom {
        drawer.push("bottom: 0 !important;");
    }

    let margin = margin.join(" ");
    let mut rules = Vec::new();
    if bp.main {
        rules.push(format!(".uizy-main {{ {margin} }}"));
    }
    if bp.header {
        rules.push(format!(".uizy-header {{ {margin} }}"));
    }

    format!(
        "@media (max-width: {}) {{{}.uizy-drawer {{ {} }}}}",
        Scalar::px(bp.resolved_width()),
        rules.join(" "),
        drawer.join(" "),
    )
}

/// The `:root` custom properties plus the full-overlay override.
pub fn variables_css(layout: &LayoutConfig, overlay: &OverlayConfig) -> String {
    let vars = [
        ("--uizy-system-bar-height", Scalar::px(layout.system).to_string()),
        ("--uizy-header-height", Scalar::px(layout.header).to_string()),
        ("--uizy-footer-height", Scalar::px(layout.footer).to_string()),
        ("--uizy-left-width", Scalar::px(layout.left).to_string()),
        ("--uizy-right-width", Scalar::px(layout.right).to_string()),
        ("--uizy-left-mini-width", Scalar::px(layout.left_mini).to_string()),
        ("--uizy-right-mini-width", Scalar::px(layout.right_mini).to_string()),
        ("--uizy-drawer-speed", Scalar::seconds(layout.drawer_speed).to_string()),
        ("--uizy-overlay-color", overlay.color.clone()),
        ("--uizy-overlay-opacity", Scalar::plain(overlay.opacity).to_string()),
    ];
    let body = vars
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        ":root {{ {body} }} uizy-overlay.full {{ z-index: 100 !important; top: 0 !important; bottom: 0 !important; }}"
    )
}

// ===========================================================================
// Tests
// ===========================================================================
