//! The document: a shared handle over the element arena, listener table and
//! custom element registry.
//!
//! `Document` is cheap to clone (it is an `Rc`). All mutation goes through a
//! `RefCell`, and the borrow is always released before any listener or custom
//! element callback runs.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use slotmap::SecondaryMap;
use tracing::{debug, trace};

use super::custom::{CustomElement, ElementFactory};
use super::element::Element;
use super::lifecycle::LifecycleTracker;
use super::node::{NodeData, NodeId};
use super::selector::{SelectorError, SelectorList};
use super::tree::Dom;
use crate::event::{Event, ListenerTable};

/// Event dispatched on the document element by [`Document::finish_loading`].
pub const DOM_CONTENT_LOADED: &str = "DOMContentLoaded";

/// Whether the document has finished parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Complete,
}

pub(crate) struct DocumentState {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerTable,
    definitions: IndexMap<String, ElementFactory>,
    instances: SecondaryMap<NodeId, Rc<dyn CustomElement>>,
    lifecycle: LifecycleTracker,
    html: NodeId,
    head: NodeId,
    body: NodeId,
    ready: ReadyState,
}

/// A shared, single-threaded document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentState>>,
}

/// A non-owning reference to a [`Document`].
#[derive(Clone)]
pub(crate) struct WeakDocument(Weak<RefCell<DocumentState>>);

impl WeakDocument {
    pub(crate) fn upgrade(&self) -> Option<Document> {
        self.0.upgrade().map(|inner| Document { inner })
    }
}

impl Document {
    /// Create a document that has already finished loading, with an empty
    /// `<html><head></head><body></body></html>` skeleton.
    pub fn new() -> Self {
        Self::with_ready_state(ReadyState::Complete)
    }

    /// Create a document that is still loading. Call
    /// [`finish_loading`](Self::finish_loading) to fire `DOMContentLoaded`.
    pub fn loading() -> Self {
        Self::with_ready_state(ReadyState::Loading)
    }

    fn with_ready_state(ready: ReadyState) -> Self {
        let mut dom = Dom::new();
        let html = dom.insert(NodeData::new("html"));
        let head = dom.insert_child(html, NodeData::new("head"));
        let body = dom.insert_child(html, NodeData::new("body"));
        Self {
            inner: Rc::new(RefCell::new(DocumentState {
                dom,
                listeners: ListenerTable::new(),
                definitions: IndexMap::new(),
                instances: SecondaryMap::new(),
                lifecycle: LifecycleTracker::new(),
                html,
                head,
                body,
                ready,
            })),
        }
    }

    pub(crate) fn state(&self) -> Ref<'_, DocumentState> {
        self.inner.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, DocumentState> {
        self.inner.borrow_mut()
    }

    pub(crate) fn downgrade(&self) -> WeakDocument {
        WeakDocument(Rc::downgrade(&self.inner))
    }

    /// Whether two handles point at the same document.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Tag lookup that tolerates an outstanding mutable borrow.
    pub(crate) fn try_tag(&self, id: NodeId) -> Option<String> {
        let state = self.inner.try_borrow().ok()?;
        state.dom.get(id).map(|d| d.tag.clone())
    }

    pub(crate) fn element(&self, id: NodeId) -> Element {
        Element::from_parts(self.clone(), id)
    }

    // ── Structure ────────────────────────────────────────────────────

    /// The `<html>` element.
    pub fn document_element(&self) -> Element {
        let id = self.state().html;
        self.element(id)
    }

    /// The `<head>` element.
    pub fn head(&self) -> Element {
        let id = self.state().head;
        self.element(id)
    }

    /// The `<body>` element.
    pub fn body(&self) -> Element {
        let id = self.state().body;
        self.element(id)
    }

    /// Create a detached element. It becomes live once appended under a
    /// connected parent.
    pub fn create_element(&self, tag: &str) -> Element {
        let id = self.state_mut().dom.insert_detached(NodeData::new(tag));
        self.element(id)
    }

    /// Number of nodes in the arena, connected or not.
    pub fn node_count(&self) -> usize {
        self.state().dom.len()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// First connected element whose `id` attribute matches.
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        let found = self.state().dom.query_by_id(id);
        found.map(|n| self.element(n))
    }

    /// First connected element matching a selector.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        let found = self.state().dom.query_selector(&list);
        Ok(found.map(|n| self.element(n)))
    }

    /// All connected elements matching a selector, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        let found = self.state().dom.query_selector_all(&list);
        Ok(found.into_iter().map(|n| self.element(n)).collect())
    }

    // ── Custom elements ──────────────────────────────────────────────

    /// Register a custom tag.
    ///
    /// Connected elements that already carry the tag are upgraded
    /// immediately, in document order. Returns `false` without replacing
    /// anything if the tag is already defined.
    pub fn define(&self, tag: &str, factory: ElementFactory) -> bool {
        let tag = tag.to_ascii_lowercase();
        let pending = {
            let mut state = self.state_mut();
            if state.definitions.contains_key(&tag) {
                trace!(%tag, "custom element already defined");
                return false;
            }
            state.definitions.insert(tag.clone(), factory);
            state.dom.query_by_tag(&tag)
        };
        debug!(%tag, upgraded = pending.len(), "custom element defined");
        for id in pending {
            self.connect_node(id);
        }
        true
    }

    /// Whether a custom tag has been registered.
    pub fn is_defined(&self, tag: &str) -> bool {
        self.state()
            .definitions
            .contains_key(&tag.to_ascii_lowercase())
    }

    /// Registered custom tags, in definition order.
    pub fn defined_tags(&self) -> Vec<String> {
        self.state().definitions.keys().cloned().collect()
    }

    pub(crate) fn instance(&self, id: NodeId) -> Option<Rc<dyn CustomElement>> {
        self.state().instances.get(id).cloned()
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Current ready state.
    pub fn ready_state(&self) -> ReadyState {
        self.state().ready
    }

    /// Mark the document complete and dispatch `DOMContentLoaded` on the
    /// document element. Does nothing if it already completed.
    pub fn finish_loading(&self) {
        {
            let mut state = self.state_mut();
            if state.ready == ReadyState::Complete {
                return;
            }
            state.ready = ReadyState::Complete;
        }
        debug!("document finished loading");
        self.document_element()
            .dispatch_event(&Event::new(DOM_CONTENT_LOADED));
    }

    // ── Connection protocol ──────────────────────────────────────────

    /// Fire `connected` for every custom element in the subtree at `root`,
    /// in document order.
    pub(crate) fn connect_subtree(&self, root: NodeId) {
        let nodes = {
            let state = self.state();
            if !state.dom.is_connected(root) {
                return;
            }
            state.dom.walk_depth_first(root)
        };
        for id in nodes {
            self.connect_node(id);
        }
    }

    fn connect_node(&self, id: NodeId) {
        let (existing, factory) = {
            let state = self.state();
            if !state.dom.is_connected(id) || state.lifecycle.is_connected(id) {
                return;
            }
            let Some(data) = state.dom.get(id) else {
                return;
            };
            (
                state.instances.get(id).cloned(),
                state.definitions.get(&data.tag).cloned(),
            )
        };
        let instance = match (existing, factory) {
            (Some(instance), _) => instance,
            (None, Some(factory)) => {
                let instance = factory();
                self.state_mut().instances.insert(id, Rc::clone(&instance));
                instance
            }
            (None, None) => return,
        };
        self.state_mut().lifecycle.on_connect(id);
        instance.connected(&self.element(id));
    }

    /// Fire `disconnected` for the given nodes, in order.
    pub(crate) fn disconnect_nodes(&self, nodes: Vec<NodeId>) {
        for id in nodes {
            let instance = {
                let mut state = self.state_mut();
                if !state.lifecycle.on_disconnect(id) {
                    continue;
                }
                state.instances.get(id).cloned()
            };
            if let Some(instance) = instance {
                instance.disconnected(&self.element(id));
            }
        }
    }

    /// Drop a detached subtree from the arena together with its listeners and
    /// custom element instances.
    pub(crate) fn purge(&self, root: NodeId) {
        let mut state = self.state_mut();
        let nodes = state.dom.walk_depth_first(root);
        state.dom.remove(root);
        for id in nodes {
            state.instances.remove(id);
            state.listeners.clear_node(id);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(state) => f
                .debug_struct("Document")
                .field("nodes", &state.dom.len())
                .field("ready", &state.ready)
                .field("defined", &state.definitions.len())
                .finish(),
            Err(_) => f.write_str("Document { <borrowed> }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::custom::{factory, CustomElement};
    use std::any::Any;
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        log: Log,
    }

    impl CustomElement for Recorder {
        fn connected(&self, element: &Element) {
            let label = element.get_attribute("id").unwrap_or_default();
            self.log.borrow_mut().push(format!("+{label}"));
        }

        fn disconnected(&self, element: &Element) {
            let label = element.get_attribute("id").unwrap_or_default();
            self.log.borrow_mut().push(format!("-{label}"));
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn recorder(doc: &Document, tag: &str) -> Log {
        let log: Log = Rc::default();
        let shared = Rc::clone(&log);
        doc.define(
            tag,
            factory(move || Recorder {
                log: Rc::clone(&shared),
            }),
        );
        log
    }

    #[test]
    fn skeleton_has_head_and_body() {
        let doc = Document::new();
        assert_eq!(doc.document_element().tag_name(), "html");
        assert_eq!(doc.head().tag_name(), "head");
        assert_eq!(doc.body().tag_name(), "body");
        assert_eq!(doc.ready_state(), ReadyState::Complete);
    }

    #[test]
    fn connected_fires_on_append_in_document_order() {
        let doc = Document::new();
        let log = recorder(&doc, "x-rec");
        let outer = doc.create_element("x-rec");
        outer.set_attribute("id", "outer");
        let inner = doc.create_element("x-rec");
        inner.set_attribute("id", "inner");
        outer.append_child(&inner);
        assert!(log.borrow().is_empty());

        doc.body().append_child(&outer);
        assert_eq!(*log.borrow(), vec!["+outer", "+inner"]);
    }

    #[test]
    fn define_upgrades_existing_elements() {
        let doc = Document::new();
        let el = doc.create_element("x-late");
        el.set_attribute("id", "late");
        doc.body().append_child(&el);
        let log = recorder(&doc, "x-late");
        assert_eq!(*log.borrow(), vec!["+late"]);
        assert!(doc.is_defined("X-LATE"));
    }

    #[test]
    fn define_twice_keeps_first() {
        let doc = Document::new();
        let _first = recorder(&doc, "x-once");
        assert!(!doc.define("x-once", factory(|| crate::dom::custom::Plain)));
        assert_eq!(doc.defined_tags(), vec!["x-once".to_owned()]);
    }

    #[test]
    fn remove_and_reappend_reuses_instance() {
        let doc = Document::new();
        let log = recorder(&doc, "x-rec");
        let el = doc.create_element("x-rec");
        el.set_attribute("id", "a");
        doc.body().append_child(&el);
        let first = doc.instance(el.node_id()).unwrap();
        el.remove();
        doc.body().append_child(&el);
        let second = doc.instance(el.node_id()).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*log.borrow(), vec!["+a", "-a", "+a"]);
    }

    #[test]
    fn detached_parent_does_not_connect() {
        let doc = Document::new();
        let log = recorder(&doc, "x-rec");
        let parent = doc.create_element("div");
        let child = doc.create_element("x-rec");
        parent.append_child(&child);
        assert!(log.borrow().is_empty());
        assert!(!child.is_connected());
    }

    #[test]
    fn finish_loading_dispatches_once() {
        let doc = Document::loading();
        let hits = Rc::new(std::cell::Cell::new(0));
        let h = Rc::clone(&hits);
        doc.document_element()
            .add_event_listener(DOM_CONTENT_LOADED, Rc::new(move |_: &Event| h.set(h.get() + 1)));
        doc.finish_loading();
        doc.finish_loading();
        assert_eq!(hits.get(), 1);
        assert_eq!(doc.ready_state(), ReadyState::Complete);
    }

    #[test]
    fn query_selector_reports_parse_errors() {
        let doc = Document::new();
        assert!(doc.query_selector("div > p").is_err());
        assert!(doc.query_selector("head").unwrap().is_some());
    }
}
