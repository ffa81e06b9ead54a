//! Registry trees and dot-path resolution.
//!
//! A [`Tree`] is an insertion-ordered map from key to [`Node`]: either a
//! nested tree or a leaf. Leaves are addressed with dot-separated paths
//! such as `"button.primary"`.

use indexmap::IndexMap;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One entry of a registry tree.
#[derive(Debug, Clone)]
pub enum Node<L> {
    /// A nested namespace.
    Branch(Tree<L>),
    /// A registered value.
    Leaf(L),
}

impl<L> Node<L> {
    /// The leaf value, if this node is one.
    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Branch(_) => None,
        }
    }

    /// The nested tree, if this node is one.
    pub fn as_branch(&self) -> Option<&Tree<L>> {
        match self {
            Self::Branch(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// An insertion-ordered registry tree.
#[derive(Debug, Clone)]
pub struct Tree<L> {
    entries: IndexMap<String, Node<L>>,
}

impl<L> Tree<L> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add a leaf under `key` (builder).
    pub fn leaf(mut self, key: impl Into<String>, leaf: L) -> Self {
        self.insert(key, Node::Leaf(leaf));
        self
    }

    /// Add a nested tree under `key` (builder).
    pub fn branch(mut self, key: impl Into<String>, tree: Tree<L>) -> Self {
        self.insert(key, Node::Branch(tree));
        self
    }

    /// Insert or replace the node at `key`. A replaced key keeps its
    /// existing position.
    pub fn insert(&mut self, key: impl Into<String>, node: Node<L>) -> Option<Node<L>> {
        self.entries.insert(key.into(), node)
    }

    pub fn get(&self, key: &str) -> Option<&Node<L>> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Node<L>> {
        self.entries.shift_remove(key)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-level keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node<L>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<L> Default for Tree<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> IntoIterator for Tree<L> {
    type Item = (String, Node<L>);
    type IntoIter = indexmap::map::IntoIter<String, Node<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<L, K: Into<String>> FromIterator<(K, Node<L>)> for Tree<L> {
    fn from_iter<I: IntoIterator<Item = (K, Node<L>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a dot-path against `root`.
///
/// Returns `None` as soon as a segment is missing or a leaf is reached
/// before the last segment. Never panics.
pub fn resolve<'a, L>(root: &'a Tree<L>, path: &str) -> Option<&'a Node<L>> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = root.get(first)?;
    for segment in segments {
        current = match current {
            Node::Branch(tree) => tree.get(segment)?,
            Node::Leaf(_) => return None,
        };
    }
    Some(current)
}

/// Every dot-path in `root` that leads to a leaf accepted by `keep`, in
/// depth-first insertion order.
pub fn flatten<L>(root: &Tree<L>, keep: impl Fn(&L) -> bool) -> Vec<String> {
    fn walk<L>(tree: &Tree<L>, prefix: &str, keep: &dyn Fn(&L) -> bool, out: &mut Vec<String>) {
        for (key, node) in tree.iter() {
            let path = if prefix.is_empty() {
                key.to_owned()
            } else {
                format!("{prefix}.{key}")
            };
            match node {
                Node::Leaf(leaf) if keep(leaf) => out.push(path),
                Node::Leaf(_) => {}
                Node::Branch(sub) => walk(sub, &path, keep, out),
            }
        }
    }

    let mut out = Vec::new();
    walk(root, "", &keep, &mut out);
    out
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree<i32> {
        Tree::new()
            .branch(
                "drawer",
                Tree::new()
                    .branch("left", Tree::new().leaf("open", 1).leaf("close", 2))
                    .leaf("toggle", 3),
            )
            .leaf("top", 4)
    }

    // ── resolve ──────────────────────────────────────────────────────

    #[test]
    fn resolves_nested_leaf() {
        let tree = sample();
        let node = resolve(&tree, "drawer.left.close").and_then(Node::as_leaf);
        assert_eq!(node, Some(&2));
    }

    #[test]
    fn resolves_branch() {
        let tree = sample();
        let branch = resolve(&tree, "drawer.left").and_then(Node::as_branch);
        assert_eq!(branch.map(Tree::len), Some(2));
    }

    #[test]
    fn missing_segment_is_none() {
        let tree = sample();
        assert!(resolve(&tree, "drawer.right.open").is_none());
        assert!(resolve(&tree, "nope").is_none());
    }

    #[test]
    fn leaf_mid_path_short_circuits() {
        let tree = sample();
        assert!(resolve(&tree, "top.deeper").is_none());
        assert!(resolve(&tree, "drawer.toggle.x.y").is_none());
    }

    #[test]
    fn empty_and_malformed_paths() {
        let tree = sample();
        assert!(resolve(&tree, "").is_none());
        assert!(resolve(&tree, "drawer..toggle").is_none());
        assert!(resolve(&tree, ".drawer").is_none());
    }

    #[test]
    fn resolve_is_repeatable() {
        let tree = sample();
        let a = resolve(&tree, "drawer.toggle").and_then(Node::as_leaf);
        let b = resolve(&tree, "drawer.toggle").and_then(Node::as_leaf);
        assert_eq!(a, b);
    }

    // ── flatten ──────────────────────────────────────────────────────

    #[test]
    fn flatten_lists_leaves_in_order() {
        let paths = flatten(&sample(), |_| true);
        assert_eq!(
            paths,
            vec!["drawer.left.open", "drawer.left.close", "drawer.toggle", "top"]
        );
    }

    #[test]
    fn flatten_filters_leaves() {
        let paths = flatten(&sample(), |v| v % 2 == 0);
        assert_eq!(paths, vec!["drawer.left.close", "top"]);
    }

    // ── Tree ─────────────────────────────────────────────────────────

    #[test]
    fn insert_replaces_in_place() {
        let mut tree = Tree::new().leaf("a", 1).leaf("b", 2);
        tree.insert("a", Node::Leaf(9));
        let keys: Vec<_> = tree.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(tree.get("a").and_then(Node::as_leaf), Some(&9));
    }
}
