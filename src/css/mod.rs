//! CSS generation: layout custom properties, theme palettes, and injection
//! into named `<style>` elements.

pub mod inject;
pub mod layout;
pub mod scalar;
pub mod theme;

pub use inject::{inject_css, minify_css, style_element, DEFAULT_STYLE_ID, STYLE_ATTR};
pub use layout::{
    breakpoint_css, breakpoint_width, generate_layout_css, variables_css, BreakpointConfig,
    LayoutConfig, LayoutInput, OverlayConfig, BREAKPOINTS,
};
pub use scalar::{format_number, Scalar, Unit};
pub use theme::{
    brand_css, scrollbar_css, system_css, BrandOptions, ScrollbarOptions, SystemColors, Theme,
    ThemeConfig,
};
