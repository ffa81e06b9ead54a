//! Listener table and bubble path computation.
//!
//! [`ListenerTable`] stores event listeners per node. The `bubble_path`
//! static method computes the traversal order from a node up through its
//! ancestors for bubble-phase delivery.

use std::fmt;
use std::rc::Rc;

use slotmap::SecondaryMap;

use super::dispatch::Event;
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

/// A registered event listener.
pub type EventListener = Rc<dyn Fn(&Event)>;

/// Handle returned by `add_event_listener`, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registered {
    id: ListenerId,
    kind: String,
    listener: EventListener,
}

/// Per-node listener storage.
///
/// The table never invokes listeners itself: the document snapshots the
/// listeners for a node with [`listeners_for`](Self::listeners_for), releases
/// its borrow, and only then calls them.
#[derive(Default)]
pub struct ListenerTable {
    by_node: SecondaryMap<NodeId, Vec<Registered>>,
    next_id: u64,
}

impl ListenerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for events of type `kind` on `node`.
    pub fn add(&mut self, node: NodeId, kind: &str, listener: EventListener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        let entry = Registered {
            id,
            kind: kind.to_owned(),
            listener,
        };
        match self.by_node.get_mut(node) {
            Some(list) => list.push(entry),
            None => {
                self.by_node.insert(node, vec![entry]);
            }
        }
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn remove(&mut self, node: NodeId, id: ListenerId) -> bool {
        match self.by_node.get_mut(node) {
            Some(list) => {
                let before = list.len();
                list.retain(|r| r.id != id);
                list.len() != before
            }
            None => false,
        }
    }

    /// Drop every listener registered on `node`.
    pub fn clear_node(&mut self, node: NodeId) {
        self.by_node.remove(node);
    }

    /// Snapshot the listeners for `kind` on `node`, in registration order.
    pub fn listeners_for(&self, node: NodeId, kind: &str) -> Vec<EventListener> {
        self.by_node
            .get(node)
            .map(|list| {
                list.iter()
                    .filter(|r| r.kind == kind)
                    .map(|r| Rc::clone(&r.listener))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of listeners registered on `node` (all types).
    pub fn count(&self, node: NodeId) -> usize {
        self.by_node.get(node).map_or(0, Vec::len)
    }

    /// Compute the bubble path from `start` up through its ancestors.
    ///
    /// Returns `[start, parent, grandparent, ...]`.
    /// If `start` does not exist in the DOM, returns an empty vec.
    pub fn bubble_path(dom: &Dom, start: NodeId) -> Vec<NodeId> {
        if !dom.contains(start) {
            return Vec::new();
        }
        let mut path = vec![start];
        path.extend(dom.ancestors(start));
        path
    }
}

impl fmt::Debug for ListenerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerTable")
            .field("nodes", &self.by_node.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;
    use std::cell::Cell;

    fn build_tree() -> (Dom, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("html"));
        let a = dom.insert_child(root, NodeData::new("uizy-app"));
        let c = dom.insert_child(a, NodeData::new("ui-box"));
        (dom, root, a, c)
    }

    #[test]
    fn add_and_snapshot_by_kind() {
        let (_, _, _, c) = build_tree();
        let mut table = ListenerTable::new();
        table.add(c, "click", Rc::new(|_: &Event| {}));
        table.add(c, "input", Rc::new(|_: &Event| {}));
        table.add(c, "click", Rc::new(|_: &Event| {}));
        assert_eq!(table.listeners_for(c, "click").len(), 2);
        assert_eq!(table.listeners_for(c, "input").len(), 1);
        assert!(table.listeners_for(c, "keydown").is_empty());
        assert_eq!(table.count(c), 3);
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let (_, _, _, c) = build_tree();
        let mut table = ListenerTable::new();
        let hits = Rc::new(Cell::new(0));
        let h1 = Rc::clone(&hits);
        let h2 = Rc::clone(&hits);
        table.add(c, "click", Rc::new(move |_: &Event| h1.set(h1.get() * 10 + 1)));
        table.add(c, "click", Rc::new(move |_: &Event| h2.set(h2.get() * 10 + 2)));
        let ev = Event::new("click");
        for l in table.listeners_for(c, "click") {
            l(&ev);
        }
        assert_eq!(hits.get(), 12);
    }

    #[test]
    fn remove_is_idempotent() {
        let (_, _, _, c) = build_tree();
        let mut table = ListenerTable::new();
        let id = table.add(c, "click", Rc::new(|_: &Event| {}));
        assert!(table.remove(c, id));
        assert!(!table.remove(c, id));
        assert!(table.listeners_for(c, "click").is_empty());
    }

    #[test]
    fn clear_node_drops_all() {
        let (_, _, a, c) = build_tree();
        let mut table = ListenerTable::new();
        table.add(c, "click", Rc::new(|_: &Event| {}));
        table.add(a, "click", Rc::new(|_: &Event| {}));
        table.clear_node(c);
        assert_eq!(table.count(c), 0);
        assert_eq!(table.count(a), 1);
    }

    #[test]
    fn bubble_path_from_leaf() {
        let (dom, root, a, c) = build_tree();
        assert_eq!(ListenerTable::bubble_path(&dom, c), vec![c, a, root]);
    }

    #[test]
    fn bubble_path_from_root() {
        let (dom, root, ..) = build_tree();
        assert_eq!(ListenerTable::bubble_path(&dom, root), vec![root]);
    }

    #[test]
    fn bubble_path_nonexistent_node() {
        let (mut dom, ..) = build_tree();
        let stale = dom.insert(NodeData::new("ghost"));
        dom.remove(stale);
        assert!(ListenerTable::bubble_path(&dom, stale).is_empty());
    }
}
