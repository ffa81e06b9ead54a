//! Shell elements: the fixed application chrome.
//!
//! Each shell computes its class list once, when it becomes connected, from
//! its own attributes. Later state changes (opening a drawer, showing the
//! overlay) go through [`AppShell::action`](super::app_shell::AppShell::action)
//! and mutate the class list directly.

use std::any::Any;
use std::rc::Rc;

use tracing::trace;

use super::classes::{
    clip_classes, shadow_class, shadow_level, update_class, ShadowSide, DRAWER, DRAWER_OPEN,
    FLEX, FLEX_COL, FLEX_SB, FOOTER, HEADER, MAIN, OVERLAY, SYSTEM_BAR,
};
use crate::dom::{CustomElement, Element, ElementFactory};

// ---------------------------------------------------------------------------
// ShellElement trait
// ---------------------------------------------------------------------------

/// Behaviour of one shell tag.
pub trait ShellElement: 'static {
    /// The custom tag name.
    const TAG: &'static str;

    /// Apply classes and styles when the element is connected.
    fn on_attach(&self, element: &Element);
}

/// Adapts a [`ShellElement`] to the document's [`CustomElement`] protocol.
///
/// Downcasts through [`Element::with_custom`] see the inner shell type.
#[derive(Debug, Default)]
pub struct Shell<T>(pub T);

impl<T: ShellElement> CustomElement for Shell<T> {
    fn connected(&self, element: &Element) {
        trace!(tag = T::TAG, "shell attached");
        self.0.on_attach(element);
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }
}

/// Factory creating a default `T` per element.
pub fn shell_factory<T: ShellElement + Default>() -> ElementFactory {
    Rc::new(|| Rc::new(Shell(T::default())) as Rc<dyn CustomElement>)
}

fn owned(classes: &[&str]) -> Vec<String> {
    classes.iter().map(|c| (*c).to_owned()).collect()
}

// ---------------------------------------------------------------------------
// Simple shells
// ---------------------------------------------------------------------------

/// `<uizy-system-bar>`.
#[derive(Debug, Default)]
pub struct SystemBar;

impl ShellElement for SystemBar {
    const TAG: &'static str = "uizy-system-bar";

    fn on_attach(&self, element: &Element) {
        let mut classes = owned(&[SYSTEM_BAR]);
        classes.extend(shadow_class(ShadowSide::Bottom, shadow_level(element)));
        update_class(element, &classes);
    }
}

/// `<uizy-header>`.
#[derive(Debug, Default)]
pub struct Header;

impl ShellElement for Header {
    const TAG: &'static str = "uizy-header";

    fn on_attach(&self, element: &Element) {
        let mut classes = owned(&[FLEX, FLEX_SB, HEADER]);
        classes.extend(shadow_class(ShadowSide::Bottom, shadow_level(element)));
        update_class(element, &classes);
    }
}

/// `<uizy-footer>`.
#[derive(Debug, Default)]
pub struct Footer;

impl ShellElement for Footer {
    const TAG: &'static str = "uizy-footer";

    fn on_attach(&self, element: &Element) {
        let mut classes = owned(&[FOOTER]);
        classes.extend(shadow_class(ShadowSide::Top, shadow_level(element)));
        update_class(element, &classes);
    }
}

/// `<uizy-overlay>`: starts hidden, colored by the overlay custom
/// properties.
#[derive(Debug, Default)]
pub struct Overlay;

impl ShellElement for Overlay {
    const TAG: &'static str = "uizy-overlay";

    fn on_attach(&self, element: &Element) {
        let mut classes = owned(&[OVERLAY]);
        classes.extend(clip_classes(element));
        update_class(element, &classes);
        let style = element.style();
        style.set("background", "var(--uizy-overlay-color)");
        style.set("opacity", "var(--uizy-overlay-opacity)");
        style.set("display", "none");
    }
}

/// `<uizy-main>`.
#[derive(Debug, Default)]
pub struct Main;

impl ShellElement for Main {
    const TAG: &'static str = "uizy-main";

    fn on_attach(&self, element: &Element) {
        let mut classes = owned(&[MAIN]);
        classes.extend(clip_classes(element));
        update_class(element, &classes);
    }
}

/// `<uizy-drawer>`: left unless `right` is present; `open` and `mini` are
/// read once at attach time.
#[derive(Debug, Default)]
pub struct Drawer;

impl ShellElement for Drawer {
    const TAG: &'static str = "uizy-drawer";

    fn on_attach(&self, element: &Element) {
        let left = !element.has_attribute("right");
        let position = if left { "left" } else { "right" };
        let side = if left { ShadowSide::Right } else { ShadowSide::Left };

        let mut classes = owned(&[FLEX, FLEX_COL, DRAWER]);
        classes.push(format!("uizy-{position}"));
        classes.push(format!("uizy-drawer--{position}"));
        classes.extend(shadow_class(side, shadow_level(element)));
        if element.has_attribute("mini") {
            classes.push(format!("uizy-{position}--mini"));
        }
        if element.has_attribute("open") {
            classes.push(DRAWER_OPEN.to_owned());
        }
        classes.extend(clip_classes(element));
        update_class(element, &classes);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use pretty_assertions::assert_eq;

    fn mount<T: ShellElement + Default>(attrs: &[(&str, &str)]) -> Element {
        let doc = Document::new();
        doc.define(T::TAG, shell_factory::<T>());
        let el = doc.create_element(T::TAG);
        for (name, value) in attrs {
            el.set_attribute(name, value);
        }
        doc.body().append_child(&el);
        el
    }

    #[test]
    fn header_with_shadow() {
        let el = mount::<Header>(&[("shadow", "2"), ("class", "mine")]);
        assert_eq!(el.class_name(), "d-flex dx-sb uizy-header sb-2 mine");
    }

    #[test]
    fn footer_without_shadow() {
        let el = mount::<Footer>(&[("shadow", "0")]);
        assert_eq!(el.class_name(), "uizy-footer");
    }

    #[test]
    fn system_bar() {
        let el = mount::<SystemBar>(&[]);
        assert_eq!(el.class_name(), "uizy-system-bar");
    }

    #[test]
    fn overlay_starts_hidden_and_clipped() {
        let el = mount::<Overlay>(&[("clip-top", ""), ("clip-left-mini", "")]);
        assert_eq!(
            el.class_name(),
            "uizy-overlay-mask uizy-clip-top uizy-clip-left-mini"
        );
        assert_eq!(el.style().get("display").as_deref(), Some("none"));
        assert_eq!(
            el.style().get("opacity").as_deref(),
            Some("var(--uizy-overlay-opacity)")
        );
    }

    #[test]
    fn main_with_clips() {
        let el = mount::<Main>(&[("clip-right", "")]);
        assert_eq!(el.class_name(), "uizy-main uizy-clip-right");
    }

    #[test]
    fn left_open_drawer() {
        let el = mount::<Drawer>(&[("open", ""), ("shadow", "1")]);
        assert_eq!(
            el.class_name(),
            "d-flex df-col uizy-drawer uizy-left uizy-drawer--left sr-1 uizy-drawer--open"
        );
    }

    #[test]
    fn right_mini_closed_drawer() {
        let el = mount::<Drawer>(&[("right", ""), ("mini", ""), ("shadow", "4")]);
        let classes = el.class_list();
        assert!(classes.contains("uizy-right"));
        assert!(classes.contains("uizy-drawer--right"));
        assert!(classes.contains("uizy-right--mini"));
        assert!(classes.contains("sl-4"));
        assert!(!classes.contains("uizy-drawer--open"));
    }

    #[test]
    fn attributes_changed_after_attach_are_ignored() {
        let el = mount::<Drawer>(&[]);
        el.set_attribute("open", "");
        assert!(!el.class_list().contains(DRAWER_OPEN));
    }
}
