//! Store leaves: reactive handles and plain constants.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::base::{Leaf, Registry};
use super::error::{RegistryError, RegistryKind};
use super::path::{Node, Tree};
use crate::reactive::Store;

// ---------------------------------------------------------------------------
// StoreEntry
// ---------------------------------------------------------------------------

/// What a store registry leaf holds.
#[derive(Clone)]
pub enum StoreEntry {
    /// A reactive store handle.
    Handle(Rc<dyn Store>),
    /// A static value registered alongside the stores.
    Constant(Value),
}

impl Leaf for StoreEntry {
    /// Only reactive handles count as stores for `has` and `paths`.
    fn is_addressable(&self) -> bool {
        matches!(self, Self::Handle(_))
    }
}

impl fmt::Debug for StoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handle(store) => write!(f, "Handle({})", store.get()),
            Self::Constant(value) => write!(f, "Constant({value})"),
        }
    }
}

impl Tree<StoreEntry> {
    /// Add a store handle under `key` (builder).
    pub fn store(self, key: impl Into<String>, store: Rc<dyn Store>) -> Self {
        self.leaf(key, StoreEntry::Handle(store))
    }

    /// Add a constant under `key` (builder).
    pub fn constant(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.leaf(key, StoreEntry::Constant(value.into()))
    }

    /// Build a tree of constants from JSON. Objects become branches, every
    /// other value becomes a constant leaf. A non-object root gives an empty
    /// tree.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| {
                    let node = match value {
                        Value::Object(_) => Node::Branch(Self::from_value(value)),
                        other => Node::Leaf(StoreEntry::Constant(other)),
                    };
                    (key, node)
                })
                .collect(),
            _ => Self::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// Options for [`Registry::<StoreEntry>::call`](Registry).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCallOptions {
    /// Return `Ok(None)` instead of an error when nothing is registered.
    pub silent: bool,
    /// Return the store handle itself instead of its current value.
    pub raw: bool,
}

impl StoreCallOptions {
    pub fn silent() -> Self {
        Self {
            silent: true,
            raw: false,
        }
    }

    pub fn raw() -> Self {
        Self {
            silent: true,
            raw: true,
        }
    }
}

/// The result of a store call.
#[derive(Clone)]
pub enum StoreRef {
    Handle(Rc<dyn Store>),
    Value(Value),
}

impl StoreRef {
    /// The handle, if the call returned one.
    pub fn into_handle(self) -> Option<Rc<dyn Store>> {
        match self {
            Self::Handle(store) => Some(store),
            Self::Value(_) => None,
        }
    }

    /// The value, reading through a handle if needed.
    pub fn into_value(self) -> Value {
        match self {
            Self::Handle(store) => store.get(),
            Self::Value(value) => value,
        }
    }
}

impl fmt::Debug for StoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handle(store) => write!(f, "Handle({})", store.get()),
            Self::Value(value) => write!(f, "Value({value})"),
        }
    }
}

/// Registry of reactive stores.
pub type StoreRegistry = Registry<StoreEntry>;

impl Registry<StoreEntry> {
    /// A store registry.
    pub fn stores() -> Self {
        Self::new(RegistryKind::Store)
    }

    /// Resolve `path`.
    ///
    /// With `raw`, a handle is returned as is. Otherwise a handle is read
    /// with `get`. Constants are returned unchanged either way.
    pub fn call(
        &self,
        path: &str,
        options: StoreCallOptions,
    ) -> Result<Option<StoreRef>, RegistryError> {
        match self.lookup(path) {
            Some(StoreEntry::Handle(store)) if options.raw => Ok(Some(StoreRef::Handle(store))),
            Some(StoreEntry::Handle(store)) => Ok(Some(StoreRef::Value(store.get()))),
            Some(StoreEntry::Constant(value)) => Ok(Some(StoreRef::Value(value))),
            None if options.silent => Ok(None),
            None => Err(self.not_found(path)),
        }
    }

    /// The store handle at `path`, if one is registered.
    pub fn handle(&self, path: &str) -> Option<Rc<dyn Store>> {
        match self.lookup(path)? {
            StoreEntry::Handle(store) => Some(store),
            StoreEntry::Constant(_) => None,
        }
    }

    /// The current value at `path`: a store's value or a constant.
    pub fn value(&self, path: &str) -> Option<Value> {
        self.call(path, StoreCallOptions::silent())
            .ok()
            .flatten()
            .map(StoreRef::into_value)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
