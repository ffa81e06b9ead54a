//! The generic path-addressed registry.
//!
//! [`Registry`] owns a [`Tree`] behind a `RefCell` together with a
//! memoized path cache. Lookups clone the leaf out and release every borrow
//! before returning, so a registered callable may call back into the same
//! registry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::error::{RegistryError, RegistryKind};
use super::path::{flatten, resolve, Node, Tree};

/// A value that can be stored at a registry leaf.
pub trait Leaf: Clone {
    /// Whether `has` and `paths` report this leaf. Lookups see every leaf
    /// regardless.
    fn is_addressable(&self) -> bool {
        true
    }
}

/// A dot-path addressable registry.
///
/// `add` merges at the top level only: registering a key that already
/// exists replaces its whole subtree. Every `add` and `clear` drops the
/// resolution cache in full.
pub struct Registry<L> {
    kind: RegistryKind,
    root: RefCell<Tree<L>>,
    cache: RefCell<HashMap<String, Option<L>>>,
}

impl<L: Leaf> Registry<L> {
    /// Create an empty registry of the given kind.
    pub fn new(kind: RegistryKind) -> Self {
        Self {
            kind,
            root: RefCell::new(Tree::new()),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// Merge `tree` into the root, top level only.
    pub fn add(&self, tree: Tree<L>) -> &Self {
        let added = tree.len();
        {
            let mut root = self.root.borrow_mut();
            for (key, node) in tree {
                root.insert(key, node);
            }
        }
        self.cache.borrow_mut().clear();
        debug!(kind = %self.kind, added, "registry updated");
        self
    }

    /// Resolve `path` to a leaf, memoizing the result (including misses).
    pub fn lookup(&self, path: &str) -> Option<L> {
        if let Some(cached) = self.cache.borrow().get(path) {
            trace!(kind = %self.kind, path, hit = cached.is_some(), "registry cache hit");
            return cached.clone();
        }
        let found = {
            let root = self.root.borrow();
            resolve(&*root, path).and_then(Node::as_leaf).cloned()
        };
        self.cache
            .borrow_mut()
            .insert(path.to_owned(), found.clone());
        found
    }

    /// Whether `path` resolves to an addressable leaf.
    pub fn has(&self, path: &str) -> bool {
        self.lookup(path).is_some_and(|leaf| leaf.is_addressable())
    }

    /// Every addressable path, from a full walk of the tree.
    pub fn paths(&self) -> Vec<String> {
        let root = self.root.borrow();
        flatten(&*root, L::is_addressable)
    }

    /// Remove everything.
    pub fn clear(&self) {
        self.root.borrow_mut().clear();
        self.cache.borrow_mut().clear();
        debug!(kind = %self.kind, "registry cleared");
    }

    /// A snapshot of the current tree.
    pub fn tree(&self) -> Tree<L> {
        self.root.borrow().clone()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.root.borrow().is_empty()
    }

    /// Number of memoized paths.
    pub fn cached_paths(&self) -> usize {
        self.cache.borrow().len()
    }

    pub(crate) fn not_found(&self, path: &str) -> RegistryError {
        RegistryError::NotFound {
            kind: self.kind,
            path: path.to_owned(),
        }
    }
}

impl<L> fmt::Debug for Registry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("entries", &self.root.borrow().len())
            .field("cached", &self.cache.borrow().len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
