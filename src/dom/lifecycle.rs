//! Connection tracking for custom element callbacks.
//!
//! The `LifecycleTracker` records which nodes are currently connected so a
//! node never receives two `connected` callbacks without a `disconnected` in
//! between, even when it is moved or re-appended.

use std::collections::HashSet;

use super::node::NodeId;

/// The set of nodes whose `connected` callback has run.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    connected: HashSet<NodeId>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a node became connected.
    ///
    /// Returns `false` if it already was.
    pub fn on_connect(&mut self, id: NodeId) -> bool {
        self.connected.insert(id)
    }

    /// Record that a node was disconnected.
    ///
    /// Returns `false` if it was not connected.
    pub fn on_disconnect(&mut self, id: NodeId) -> bool {
        self.connected.remove(&id)
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        self.connected.contains(&id)
    }

    /// The number of connected nodes.
    pub fn connected_count(&self) -> usize {
        self.connected.len()
    }
}
