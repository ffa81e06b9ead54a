//! Theme CSS: system colors, scrollbar and brand palettes as custom
//! properties.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::scalar::format_number;

/// Color name to CSS color, in declaration order.
pub type SystemColors = IndexMap<String, String>;

const DEFAULT_SCROLLBAR_SIZE: f64 = 22.0;
const DEFAULT_SCROLLBAR_COLOR: &str = "rgba(121, 121, 121, 0.4)";
const DEFAULT_SCROLLBAR_HOVER: &str = "rgba(121, 121, 121, 0.7)";

/// Scrollbar appearance. Unset fields take the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarOptions {
    pub size: Option<f64>,
    pub color: Option<String>,
    pub hover: Option<String>,
}

/// A named brand palette. Empty or unset colors are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandOptions {
    pub name: String,
    #[serde(default)]
    pub back: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub line: Option<String>,
}

impl BrandOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_back(mut self, color: impl Into<String>) -> Self {
        self.back = Some(color.into());
        self
    }

    pub fn with_text(mut self, color: impl Into<String>) -> Self {
        self.text = Some(color.into());
        self
    }

    pub fn with_line(mut self, color: impl Into<String>) -> Self {
        self.line = Some(color.into());
        self
    }
}

/// Theme section of the start configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: Option<SystemColors>,
    pub scrollbar: Option<ScrollbarOptions>,
    pub brands: Vec<BrandOptions>,
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

pub fn system_css(colors: &SystemColors) -> String {
    colors
        .iter()
        .map(|(name, value)| format!("--color-{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn scrollbar_css(options: &ScrollbarOptions) -> String {
    let size = options.size.unwrap_or(DEFAULT_SCROLLBAR_SIZE);
    let color = options.color.as_deref().unwrap_or(DEFAULT_SCROLLBAR_COLOR);
    let hover = options.hover.as_deref().unwrap_or(DEFAULT_SCROLLBAR_HOVER);
    format!(
        "--scrollbar-size: {}px; --scrollbar-thumb: {color}; --scrollbar-thumb-hover: {hover};",
        format_number(size)
    )
}

pub fn brand_css(brand: &BrandOptions) -> String {
    [("back", &brand.back), ("text", &brand.text), ("line", &brand.line)]
        .into_iter()
        .filter_map(|(part, color)| {
            color
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|c| format!("--color-{}-{part}: {c};", brand.name))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Accumulates theme fragments.
///
/// `system` and `scrollbar` replace their fragment; `brand` appends, with no
/// deduplication by name.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    system: String,
    scrollbar: String,
    brands: Vec<String>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system(&mut self, colors: &SystemColors) {
        self.system = system_css(colors);
    }

    pub fn scrollbar(&mut self, options: &ScrollbarOptions) {
        self.scrollbar = scrollbar_css(options);
    }

    pub fn brand(&mut self, brand: &BrandOptions) {
        let css = brand_css(brand);
        if !css.is_empty() {
            self.brands.push(css);
        }
    }

    /// Apply a whole theme section.
    pub fn apply(&mut self, config: &ThemeConfig) {
        if let Some(colors) = &config.colors {
            self.system(colors);
        }
        if let Some(scrollbar) = &config.scrollbar {
            self.scrollbar(scrollbar);
        }
        for brand in &config.brands {
            self.brand(brand);
        }
    }

    /// Drop brand palettes only.
    pub fn reset(&mut self) {
        self.brands.clear();
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.system.clear();
        self.scrollbar.clear();
        self.brands.clear();
    }

    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    /// System colors, then scrollbar, then brands.
    pub fn to_css(&self) -> String {
        let mut parts = Vec::new();
        if !self.system.is_empty() {
            parts.push(self.system.clone());
        }
        if !self.scrollbar.is_empty() {
            parts.push(self.scrollbar.clone());
        }
        if !self.brands.is_empty() {
            parts.push(self.brands.join(" "));
        }
        parts.join(" ")
    }
}

// ===========================================================================
// Tests
// ===========================================================================
