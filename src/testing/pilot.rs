//! Pilot: drives a document and a uizy context without a browser.

use std::rc::Rc;

use serde_json::Value;

use crate::app::{StartConfig, Uizy};
use crate::css::style_element;
use crate::dom::{Document, Element};
use crate::event::Event;

/// A headless document with uizy started on it.
///
/// # Examples
///
/// ```ignore
/// use uizy::testing::Pilot;
///
/// let pilot = Pilot::new();
/// let el = pilot.mount("ui-box", &[(":click", "el.textContent = 'x'")]);
/// pilot.click(&el);
/// assert_eq!(el.text_content(), "x");
/// ```
pub struct Pilot {
    doc: Document,
    app: Rc<Uizy>,
}

impl Pilot {
    /// Start a fresh context with the default configuration.
    pub fn new() -> Self {
        Self::start(StartConfig::default())
    }

    /// Start a fresh context with `config` on a loaded document.
    pub fn start(config: StartConfig) -> Self {
        let doc = Document::new();
        let app = Uizy::new();
        app.start(&doc, config);
        Self { doc, app }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn app(&self) -> &Rc<Uizy> {
        &self.app
    }

    // ── Markup ───────────────────────────────────────────────────────

    /// Create an element with `attrs` (in order) without attaching it.
    pub fn build(&self, tag: &str, attrs: &[(&str, &str)]) -> Element {
        let el = self.doc.create_element(tag);
        for (name, value) in attrs {
            el.set_attribute(name, value);
        }
        el
    }

    /// Create an element and append it to `<body>`.
    pub fn mount(&self, tag: &str, attrs: &[(&str, &str)]) -> Element {
        self.mount_into(&self.doc.body(), tag, attrs)
    }

    /// Create an element and append it to `parent`.
    pub fn mount_into(&self, parent: &Element, tag: &str, attrs: &[(&str, &str)]) -> Element {
        let el = self.build(tag, attrs);
        parent.append_child(&el);
        el
    }

    /// Detach `el` from the document.
    pub fn unmount(&self, el: &Element) {
        el.remove();
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Dispatch a `click` on `el`. Returns `false` if a handler prevented the
    /// default action.
    pub fn click(&self, el: &Element) -> bool {
        self.dispatch(el, "click", Value::Null)
    }

    pub fn dispatch(&self, el: &Element, kind: &str, detail: Value) -> bool {
        el.dispatch_event(&Event::with_detail(kind, detail))
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// The class list of `el`.
    pub fn classes(&self, el: &Element) -> Vec<String> {
        el.class_list().to_vec()
    }

    /// Text of the injected `<style>` with `id`, if any.
    pub fn style_text(&self, id: &str) -> Option<String> {
        style_element(&self.doc, id).map(|el| el.text_content())
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}
