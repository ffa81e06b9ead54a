//! Class-name composition for the shell elements.

use crate::dom::Element;

pub const SYSTEM_BAR: &str = "uizy-system-bar";
pub const HEADER: &str = "uizy-header";
pub const FOOTER: &str = "uizy-footer";
pub const OVERLAY: &str = "uizy-overlay-mask";
pub const MAIN: &str = "uizy-main";
pub const DRAWER: &str = "uizy-drawer";
pub const DRAWER_OPEN: &str = "uizy-drawer--open";
pub const FLEX: &str = "d-flex";
pub const FLEX_COL: &str = "df-col";
pub const FLEX_SB: &str = "dx-sb";
pub const FULL: &str = "full";

/// Clip presence-attributes and the class each one adds, in emission order.
pub const CLIP: &[(&str, &str)] = &[
    ("clip-system", "uizy-clip-system-bar"),
    ("clip-top", "uizy-clip-top"),
    ("clip-bottom", "uizy-clip-bottom"),
    ("clip-left", "uizy-clip-left"),
    ("clip-right", "uizy-clip-right"),
    ("clip-left-mini", "uizy-clip-left-mini"),
    ("clip-right-mini", "uizy-clip-right-mini"),
];

/// Edge a shadow is cast towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl ShadowSide {
    fn letter(self) -> char {
        match self {
            Self::Top => 't',
            Self::Bottom => 'b',
            Self::Left => 'l',
            Self::Right => 'r',
        }
    }
}

/// Clip classes for every clip attribute present on `el`.
pub fn clip_classes(el: &Element) -> Vec<String> {
    CLIP.iter()
        .filter(|(attr, _)| el.has_attribute(attr))
        .map(|(_, class)| (*class).to_owned())
        .collect()
}

/// The numeric `shadow` attribute. Missing or unparsable values are 0.
pub fn shadow_level(el: &Element) -> i64 {
    el.get_attribute("shadow")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|level| level.is_finite())
        .map(|level| level.trunc() as i64)
        .unwrap_or(0)
}

/// `s{side}-{level}` when the level is positive.
pub fn shadow_class(side: ShadowSide, level: i64) -> Option<String> {
    (level > 0).then(|| format!("s{}-{level}", side.letter()))
}

/// Prepend `classes` to the element's existing classes.
pub fn update_class(el: &Element, classes: &[String]) {
    let existing = el.class_name();
    let mut tokens: Vec<&str> = classes
        .iter()
        .map(String::as_str)
        .filter(|c| !c.is_empty())
        .collect();
    if !existing.is_empty() {
        tokens.push(&existing);
    }
    el.set_class_name(&tokens.join(" "));
}
