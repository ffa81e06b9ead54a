//! Element handles.
//!
//! An [`Element`] is a `(Document, NodeId)` pair. Methods on a handle whose
//! node has been purged from the arena are silent no-ops, so a stale handle
//! never panics.

use std::fmt;
use std::rc::Rc;

use super::custom::CustomElement;
use super::document::{Document, WeakDocument};
use super::node::{NodeData, NodeId};
use crate::event::{Event, EventListener, ListenerId, ListenerTable};

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// A handle to one element of a [`Document`].
#[derive(Clone)]
pub struct Element {
    doc: Document,
    id: NodeId,
}

impl Element {
    pub(crate) fn from_parts(doc: Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    /// The arena id of this element.
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// The owning document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// A handle that does not keep the document alive.
    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            doc: self.doc.downgrade(),
            id: self.id,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        let state = self.doc.state();
        state.dom.get(self.id).map(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut NodeData) -> R) -> Option<R> {
        let mut state = self.doc.state_mut();
        state.dom.get_mut(self.id).map(f)
    }

    /// Whether the node still exists in the arena.
    pub fn exists(&self) -> bool {
        self.doc.state().dom.contains(self.id)
    }

    /// Lower-case tag name; empty if the node is gone.
    pub fn tag_name(&self) -> String {
        self.read(|d| d.tag.clone()).unwrap_or_default()
    }

    // ── Attributes ───────────────────────────────────────────────────

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.read(|d| d.get_attribute(name)).flatten()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.read(|d| d.has_attribute(name)).unwrap_or(false)
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.write(|d| d.set_attribute(name, value));
    }

    pub fn remove_attribute(&self, name: &str) {
        self.write(|d| d.remove_attribute(name));
    }

    /// Attributes other than `class` and `style`, in declaration order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.read(|d| d.attributes.clone()).unwrap_or_default()
    }

    /// The class attribute as a single space-separated string.
    pub fn class_name(&self) -> String {
        self.read(|d| d.classes.join(" ")).unwrap_or_default()
    }

    /// Replace the whole class list.
    pub fn set_class_name(&self, value: &str) {
        self.write(|d| d.set_attribute("class", value));
    }

    pub fn class_list(&self) -> ClassList<'_> {
        ClassList { element: self }
    }

    pub fn style(&self) -> Style<'_> {
        Style { element: self }
    }

    // ── Text ─────────────────────────────────────────────────────────

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        self.doc.state().dom.text_content(self.id)
    }

    /// Replace every child with a single run of text.
    ///
    /// Removed children are disconnected first, then dropped from the arena.
    pub fn set_text_content(&self, text: &str) {
        let kids = self.children();
        for kid in &kids {
            kid.remove();
            self.doc.purge(kid.id);
        }
        self.write(|d| d.text = text.to_owned());
    }

    // ── Tree ─────────────────────────────────────────────────────────

    pub fn parent(&self) -> Option<Element> {
        let parent = self.doc.state().dom.parent(self.id);
        parent.map(|p| self.doc.element(p))
    }

    pub fn children(&self) -> Vec<Element> {
        let kids = self.doc.state().dom.children(self.id).to_vec();
        kids.into_iter().map(|k| self.doc.element(k)).collect()
    }

    /// Whether the element is attached under the document root.
    pub fn is_connected(&self) -> bool {
        self.doc.state().dom.is_connected(self.id)
    }

    /// Append `child` as the last child of this element.
    ///
    /// A child that is already connected elsewhere is disconnected first.
    /// Returns `false` if the move is impossible (different document, missing
    /// node, or a cycle).
    pub fn append_child(&self, child: &Element) -> bool {
        if !self.doc.ptr_eq(&child.doc) {
            return false;
        }
        {
            let state = self.doc.state();
            let dom = &state.dom;
            if !dom.contains(self.id)
                || !dom.contains(child.id)
                || child.id == self.id
                || dom.ancestors(self.id).contains(&child.id)
            {
                return false;
            }
        }
        if child.is_connected() {
            child.remove();
        }
        let moved = self.doc.state_mut().dom.reparent(child.id, self.id);
        if moved {
            self.doc.connect_subtree(child.id);
        }
        moved
    }

    /// Detach from the parent, keeping the subtree alive so it can be
    /// appended again. Custom elements in the subtree are disconnected.
    pub fn remove(&self) {
        let subtree = {
            let mut state = self.doc.state_mut();
            let connected = state.dom.is_connected(self.id);
            let nodes = if connected {
                state.dom.walk_depth_first(self.id)
            } else {
                Vec::new()
            };
            state.dom.detach(self.id);
            nodes
        };
        self.doc.disconnect_nodes(subtree);
    }

    // ── Custom element access ────────────────────────────────────────

    /// The custom element instance attached to this element, if any.
    pub fn custom_element(&self) -> Option<Rc<dyn CustomElement>> {
        self.doc.instance(self.id)
    }

    /// Run `f` against the custom element instance if it is a `T`.
    pub fn with_custom<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let instance = self.custom_element()?;
        instance.as_any().downcast_ref::<T>().map(f)
    }

    // ── Events ───────────────────────────────────────────────────────

    pub fn add_event_listener(&self, kind: &str, listener: EventListener) -> ListenerId {
        self.doc.state_mut().listeners.add(self.id, kind, listener)
    }

    /// Returns `false` if the listener was already removed.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.doc.state_mut().listeners.remove(self.id, id)
    }

    /// Number of listeners on this element, all event types.
    pub fn listener_count(&self) -> usize {
        self.doc.state().listeners.count(self.id)
    }

    /// Dispatch `event` at this element and bubble it to the root.
    ///
    /// Returns `false` if a listener called `prevent_default`.
    pub fn dispatch_event(&self, event: &Event) -> bool {
        event.begin_dispatch(self.clone());
        let path = ListenerTable::bubble_path(&self.doc.state().dom, self.id);
        for node in path {
            let listeners = self
                .doc
                .state()
                .listeners
                .listeners_for(node, event.kind());
            if listeners.is_empty() {
                continue;
            }
            event.set_current_target(Some(self.doc.element(node)));
            for listener in listeners {
                listener(event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
        event.set_current_target(None);
        !event.default_prevented()
    }

    // ── Serialization ────────────────────────────────────────────────

    /// Serialize this element and its subtree as HTML.
    pub fn outer_html(&self) -> String {
        let state = self.doc.state();
        let mut out = String::new();
        write_html(&state.dom, self.id, &mut out);
        out
    }
}

fn write_html(dom: &super::tree::Dom, id: NodeId, out: &mut String) {
    let Some(data) = dom.get(id) else {
        return;
    };
    out.push('<');
    out.push_str(&data.tag);
    for (name, value) in &data.attributes {
        push_attr(out, name, value);
    }
    if let Some(class) = data.get_attribute("class") {
        push_attr(out, "class", &class);
    }
    if let Some(style) = data.get_attribute("style") {
        push_attr(out, "style", &style);
    }
    out.push('>');
    out.push_str(&data.text);
    for &kid in dom.children(id) {
        write_html(dom, kid, out);
    }
    out.push_str("</");
    out.push_str(&data.tag);
    out.push('>');
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    if !value.is_empty() {
        out.push_str("=\"");
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.doc.ptr_eq(&other.doc)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.doc.try_tag(self.id).unwrap_or_default())
            .field("id", &self.id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// WeakElement
// ---------------------------------------------------------------------------

/// An element reference that does not keep its document alive.
///
/// Listeners and store subscriptions capture this instead of [`Element`] so
/// the document does not end up owning itself.
#[derive(Clone)]
pub struct WeakElement {
    doc: WeakDocument,
    id: NodeId,
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.doc.upgrade().map(|doc| Element::from_parts(doc, self.id))
    }
}

impl fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakElement").field("id", &self.id).finish()
    }
}

// ---------------------------------------------------------------------------
// ClassList / Style
// ---------------------------------------------------------------------------

/// `classList`-style view over an element's classes.
pub struct ClassList<'a> {
    element: &'a Element,
}

impl ClassList<'_> {
    pub fn contains(&self, class: &str) -> bool {
        self.element.read(|d| d.has_class(class)).unwrap_or(false)
    }

    pub fn add(&self, class: &str) {
        self.element.write(|d| d.add_class(class));
    }

    pub fn remove(&self, class: &str) {
        self.element.write(|d| d.remove_class(class));
    }

    /// Flip a class. Returns whether it is present afterwards.
    pub fn toggle(&self, class: &str) -> bool {
        self.element.write(|d| d.toggle_class(class)).unwrap_or(false)
    }

    /// Force a class on or off. Returns `force`.
    pub fn toggle_force(&self, class: &str, force: bool) -> bool {
        self.element.write(|d| {
            if force {
                d.add_class(class);
            } else {
                d.remove_class(class);
            }
        });
        force
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.element.read(|d| d.classes.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.element.read(|d| d.classes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inline style view over an element.
pub struct Style<'a> {
    element: &'a Element,
}

impl Style<'_> {
    pub fn get(&self, property: &str) -> Option<String> {
        self.element
            .read(|d| d.style_value(property).map(str::to_owned))
            .flatten()
    }

    /// Set a property; an empty value removes it.
    pub fn set(&self, property: &str, value: &str) {
        self.element.write(|d| d.set_style(property, value));
    }

    pub fn remove(&self, property: &str) {
        self.set(property, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn mounted(doc: &Document, tag: &str) -> Element {
        let el = doc.create_element(tag);
        doc.body().append_child(&el);
        el
    }

    // ── Attributes and classes ───────────────────────────────────────

    #[test]
    fn attributes_round_trip() {
        let doc = Document::new();
        let el = mounted(&doc, "ui-box");
        el.set_attribute("use", "button");
        assert_eq!(el.get_attribute("use").as_deref(), Some("button"));
        assert!(el.has_attribute("use"));
        el.remove_attribute("use");
        assert!(!el.has_attribute("use"));
    }

    #[test]
    fn class_list_operations() {
        let doc = Document::new();
        let el = mounted(&doc, "div");
        let classes = el.class_list();
        classes.add("a");
        classes.add("b");
        assert!(classes.contains("a"));
        assert!(!classes.toggle("a"));
        assert!(classes.toggle("c"));
        assert!(classes.toggle_force("d", true));
        assert!(!classes.toggle_force("b", false));
        assert_eq!(classes.to_vec(), vec!["c", "d"]);
        assert_eq!(el.class_name(), "c d");
    }

    #[test]
    fn style_set_and_remove() {
        let doc = Document::new();
        let el = mounted(&doc, "uizy-overlay");
        el.style().set("display", "none");
        assert_eq!(el.style().get("display").as_deref(), Some("none"));
        el.style().remove("display");
        assert!(el.style().get("display").is_none());
    }

    // ── Tree ─────────────────────────────────────────────────────────

    #[test]
    fn append_rejects_cycles() {
        let doc = Document::new();
        let a = mounted(&doc, "div");
        let b = doc.create_element("span");
        assert!(a.append_child(&b));
        assert!(!b.append_child(&a));
        assert!(!a.append_child(&a));
    }

    #[test]
    fn append_rejects_foreign_documents() {
        let doc = Document::new();
        let other = Document::new();
        let el = other.create_element("div");
        assert!(!doc.body().append_child(&el));
    }

    #[test]
    fn set_text_content_replaces_children() {
        let doc = Document::new();
        let el = mounted(&doc, "div");
        let kid = doc.create_element("span");
        el.append_child(&kid);
        kid.set_text_content("inner");
        assert_eq!(el.text_content(), "inner");
        el.set_text_content("x");
        assert_eq!(el.text_content(), "x");
        assert!(el.children().is_empty());
        assert!(!kid.exists());
    }

    #[test]
    fn stale_handle_is_a_no_op() {
        let doc = Document::new();
        let el = mounted(&doc, "div");
        let kid = doc.create_element("span");
        el.append_child(&kid);
        el.set_text_content("");
        kid.set_attribute("a", "b");
        assert!(kid.get_attribute("a").is_none());
        assert_eq!(kid.tag_name(), "");
    }

    #[test]
    fn outer_html_serializes_subtree() {
        let doc = Document::new();
        let el = mounted(&doc, "uizy-header");
        el.set_attribute("shadow", "");
        el.class_list().add("uizy-header");
        let kid = doc.create_element("span");
        kid.set_text_content("Hi");
        el.append_child(&kid);
        assert_eq!(
            el.outer_html(),
            r#"<uizy-header shadow class="uizy-header"><span>Hi</span></uizy-header>"#
        );
    }

    // ── Events ───────────────────────────────────────────────────────

    #[test]
    fn dispatch_bubbles_to_ancestors() {
        let doc = Document::new();
        let outer = mounted(&doc, "div");
        let inner = doc.create_element("button");
        outer.append_child(&inner);
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let l2 = Rc::clone(&log);
        inner.add_event_listener(
            "click",
            Rc::new(move |ev: &Event| {
                l1.borrow_mut().push(ev.current_target().unwrap().tag_name());
            }),
        );
        outer.add_event_listener(
            "click",
            Rc::new(move |ev: &Event| {
                l2.borrow_mut().push(ev.current_target().unwrap().tag_name());
                assert_eq!(ev.target().unwrap().tag_name(), "button");
            }),
        );
        assert!(inner.dispatch_event(&Event::new("click")));
        assert_eq!(*log.borrow(), vec!["button", "div"]);
    }

    #[test]
    fn stop_propagation_halts_bubbling() {
        let doc = Document::new();
        let outer = mounted(&doc, "div");
        let inner = doc.create_element("button");
        outer.append_child(&inner);
        let reached = Rc::new(RefCell::new(false));
        let r = Rc::clone(&reached);
        inner.add_event_listener("click", Rc::new(|ev: &Event| ev.stop_propagation()));
        outer.add_event_listener("click", Rc::new(move |_: &Event| *r.borrow_mut() = true));
        inner.dispatch_event(&Event::new("click"));
        assert!(!*reached.borrow());
    }

    #[test]
    fn listener_may_mutate_the_document() {
        let doc = Document::new();
        let el = mounted(&doc, "div");
        let target = el.downgrade();
        el.add_event_listener(
            "click",
            Rc::new(move |_: &Event| {
                if let Some(el) = target.upgrade() {
                    el.set_text_content("clicked");
                }
            }),
        );
        el.dispatch_event(&Event::new("click"));
        assert_eq!(el.text_content(), "clicked");
    }

    #[test]
    fn prevent_default_is_reported() {
        let doc = Document::new();
        let el = mounted(&doc, "form");
        el.add_event_listener("submit", Rc::new(|ev: &Event| ev.prevent_default()));
        assert!(!el.dispatch_event(&Event::new("submit")));
    }

    #[test]
    fn remove_listener() {
        let doc = Document::new();
        let el = mounted(&doc, "div");
        let id = el.add_event_listener("click", Rc::new(|_: &Event| {}));
        assert_eq!(el.listener_count(), 1);
        assert!(el.remove_event_listener(id));
        assert!(!el.remove_event_listener(id));
        assert_eq!(el.listener_count(), 0);
    }
}
