//! `<uizy-app>`: the shell root and its imperative `action` API.
//!
//! The first `action` call indexes the document for one element of each
//! shell part. The index is kept for the lifetime of the app element and is
//! never rebuilt, so parts added to the document afterwards are not seen.

use std::cell::RefCell;

use tracing::{debug, trace};

use super::classes::{DRAWER_OPEN, FULL};
use super::shell::ShellElement;
use crate::dom::{Element, NodeId, WeakElement};

// ---------------------------------------------------------------------------
// Part
// ---------------------------------------------------------------------------

/// One indexed piece of chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    System,
    Header,
    Footer,
    Overlay,
    Main,
    Left,
    LeftMini,
    Right,
    RightMini,
}

impl Part {
    pub const ALL: [Part; 9] = [
        Part::System,
        Part::Header,
        Part::Footer,
        Part::Overlay,
        Part::Main,
        Part::Left,
        Part::LeftMini,
        Part::Right,
        Part::RightMini,
    ];

    /// The lookup key, e.g. `"leftMini"`.
    pub fn key(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Overlay => "overlay",
            Self::Main => "main",
            Self::Left => "left",
            Self::LeftMini => "leftMini",
            Self::Right => "right",
            Self::RightMini => "rightMini",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|part| part.key() == key)
    }

    /// The selector that finds this part.
    pub fn selector(self) -> &'static str {
        match self {
            Self::System => "uizy-system-bar",
            Self::Header => "uizy-header",
            Self::Footer => "uizy-footer",
            Self::Overlay => "uizy-overlay",
            Self::Main => "uizy-main",
            Self::Left => "uizy-drawer:not([right]):not([mini])",
            Self::LeftMini => "uizy-drawer:not([right])[mini]",
            Self::Right => "uizy-drawer[right]:not([mini])",
            Self::RightMini => "uizy-drawer[right][mini]",
        }
    }

    /// Whether `action` hands out a payload for this part.
    pub fn is_controllable(self) -> bool {
        matches!(
            self,
            Self::Overlay | Self::Left | Self::LeftMini | Self::Right | Self::RightMini
        )
    }
}

/// Turn `"left.mini"` into the key `"leftMini"`. Segments after the second
/// are ignored.
pub fn section_key(section: &str) -> String {
    let mut segments = section.split('.');
    let root = segments.next().unwrap_or_default();
    match segments.next() {
        Some(sub) if !sub.is_empty() => {
            let mut chars = sub.chars();
            let mut key = root.to_owned();
            if let Some(first) = chars.next() {
                key.extend(first.to_uppercase());
                key.push_str(chars.as_str());
            }
            key
        }
        _ => root.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// ActionPayload
// ---------------------------------------------------------------------------

/// Handed to an `action` callback for the overlay or a drawer.
#[derive(Debug, Clone)]
pub struct ActionPayload {
    part: Part,
    element: Element,
}

impl ActionPayload {
    pub fn part(&self) -> Part {
        self.part
    }

    /// The targeted element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Open (`Some(true)`), close (`Some(false)`) or flip (`None`).
    ///
    /// On the overlay this also clears the `full` modifier.
    pub fn set(&self, open: Option<bool>) {
        self.set_full(open, false);
    }

    /// Like [`set`](Self::set); on the overlay, `full` toggles the
    /// full-viewport modifier. Drawers ignore `full`.
    pub fn set_full(&self, open: Option<bool>, full: bool) {
        match self.part {
            Part::Overlay => set_overlay(&self.element, open, full),
            _ => set_drawer(&self.element, open),
        }
    }
}

fn set_overlay(el: &Element, open: Option<bool>, full: bool) {
    let style = el.style();
    let visible = match open {
        Some(open) => open,
        None => style.get("display").as_deref() == Some("none"),
    };
    style.set("display", if visible { "block" } else { "none" });
    el.class_list().toggle_force(FULL, full);
}

fn set_drawer(el: &Element, open: Option<bool>) {
    let classes = el.class_list();
    match open {
        Some(open) => {
            classes.toggle_force(DRAWER_OPEN, open);
        }
        None => {
            classes.toggle(DRAWER_OPEN);
        }
    }
}

// ---------------------------------------------------------------------------
// AppShell
// ---------------------------------------------------------------------------

/// `<uizy-app>`.
#[derive(Debug, Default)]
pub struct AppShell {
    host: RefCell<Option<WeakElement>>,
    parts: RefCell<Option<Vec<(Part, Option<NodeId>)>>>,
}

impl ShellElement for AppShell {
    const TAG: &'static str = "uizy-app";

    fn on_attach(&self, element: &Element) {
        *self.host.borrow_mut() = Some(element.downgrade());
    }
}

impl AppShell {
    /// Whether the part index has been built.
    pub fn is_indexed(&self) -> bool {
        self.parts.borrow().is_some()
    }

    fn host(&self) -> Option<Element> {
        self.host.borrow().as_ref().and_then(WeakElement::upgrade)
    }

    fn ensure_indexed(&self, host: &Element) {
        if self.is_indexed() {
            return;
        }
        let doc = host.document();
        let parts: Vec<_> = Part::ALL
            .into_iter()
            .map(|part| {
                let found = doc.query_selector(part.selector()).ok().flatten();
                (part, found.map(|el| el.node_id()))
            })
            .collect();
        debug!(
            found = parts.iter().filter(|(_, id)| id.is_some()).count(),
            "app shell indexed"
        );
        *self.parts.borrow_mut() = Some(parts);
    }

    /// The indexed element for `part`, building the index on first use.
    pub fn part(&self, part: Part) -> Option<Element> {
        let host = self.host()?;
        self.ensure_indexed(&host);
        let id = self
            .parts
            .borrow()
            .as_ref()?
            .iter()
            .find(|(p, _)| *p == part)
            .and_then(|(_, id)| *id)?;
        Some(host.document().element(id))
    }

    /// Run `callback` with a payload for the section named by `section`
    /// (`"overlay"`, `"left"`, `"right.mini"`, ...).
    ///
    /// Unknown sections, parts without a payload and missing elements are
    /// silently ignored. Returns whether the callback ran.
    pub fn action(&self, section: &str, callback: impl FnOnce(&ActionPayload)) -> bool {
        let key = section_key(section);
        let Some(part) = Part::from_key(&key) else {
            trace!(section, "unknown app section");
            return false;
        };
        let Some(element) = self.part(part) else {
            trace!(section, "app section not present");
            return false;
        };
        if !part.is_controllable() {
            return false;
        }
        callback(&ActionPayload { part, element });
        true
    }
}

/// Call [`AppShell::action`] on the app shell behind `app`.
///
/// Returns `false` if `app` is not an upgraded `<uizy-app>`.
pub fn action(app: &Element, section: &str, callback: impl FnOnce(&ActionPayload)) -> bool {
    app.with_custom(|shell: &AppShell| shell.action(section, callback))
        .unwrap_or(false)
}

// ===========================================================================
// Tests
// ===========================================================================
