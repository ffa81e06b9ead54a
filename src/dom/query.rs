//! DOM queries by id, tag and selector.
//!
//! Every query walks the connected tree from the root in document order, so
//! "first match" means the same thing it does in a browser.

use super::node::{NodeData, NodeId};
use super::selector::SelectorList;
use super::tree::Dom;

impl Dom {
    /// Find the first connected node whose `id` attribute equals `id`.
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_first(|data| data.id() == Some(id))
    }

    /// Find all connected nodes with the given tag name.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.query_all(|data| data.tag == tag)
    }

    /// First connected node matching `selector`.
    pub fn query_selector(&self, selector: &SelectorList) -> Option<NodeId> {
        self.query_first(|data| selector.matches(data))
    }

    /// All connected nodes matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &SelectorList) -> Vec<NodeId> {
        self.query_all(|data| selector.matches(data))
    }

    fn query_first(&self, predicate: impl Fn(&NodeData) -> bool) -> Option<NodeId> {
        self.iter_connected()
            .find(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
    }

    fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.iter_connected()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    fn iter_connected(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        let order = self.root().map(|r| self.walk_depth_first(r)).unwrap_or_default();
        order
            .into_iter()
            .filter_map(move |id| self.get(id).map(|data| (id, data)))
    }
}
