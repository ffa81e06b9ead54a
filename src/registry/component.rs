//! Callable leaves: the component and action registries.
//!
//! Components and actions share one leaf type, a [`Callable`] taking a JSON
//! argument. Component results are class-name producers and are normalized
//! with [`class_tokens`].

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use super::base::{Leaf, Registry};
use super::error::{RegistryError, RegistryKind};
use super::path::Tree;

// ---------------------------------------------------------------------------
// Callable
// ---------------------------------------------------------------------------

/// A registered function of one JSON argument.
#[derive(Clone)]
pub struct Callable(Rc<dyn Fn(&Value) -> Value>);

impl Callable {
    pub fn new(f: impl Fn(&Value) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn invoke(&self, args: &Value) -> Value {
        (self.0)(args)
    }

    /// Whether two callables are the same function object.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Leaf for Callable {}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable(<fn>)")
    }
}

impl Tree<Callable> {
    /// Add a function leaf under `key` (builder).
    pub fn func(self, key: impl Into<String>, f: impl Fn(&Value) -> Value + 'static) -> Self {
        self.leaf(key, Callable::new(f))
    }
}

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// Options for [`Registry::call`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Return `Ok(None)` instead of an error when nothing is registered.
    pub silent: bool,
}

impl CallOptions {
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// Registry of class-name producing functions.
pub type ComponentRegistry = Registry<Callable>;

/// Registry of command handlers.
pub type ActionRegistry = Registry<Callable>;

impl Registry<Callable> {
    /// A component registry.
    pub fn components() -> Self {
        Self::new(RegistryKind::Component)
    }

    /// An action registry.
    pub fn actions() -> Self {
        Self::new(RegistryKind::Action)
    }

    /// Resolve `path` and invoke it with `args`.
    ///
    /// A missing path yields `Ok(None)` when `options.silent` is set and
    /// [`RegistryError::NotFound`] otherwise.
    pub fn call(
        &self,
        path: &str,
        args: &Value,
        options: CallOptions,
    ) -> Result<Option<Value>, RegistryError> {
        match self.lookup(path) {
            Some(callable) => {
                trace!(kind = %self.kind(), path, "registry call");
                Ok(Some(callable.invoke(args)))
            }
            None if options.silent => Ok(None),
            None => Err(self.not_found(path)),
        }
    }
}

// ---------------------------------------------------------------------------
// Class-name normalization
// ---------------------------------------------------------------------------

/// Normalize a component result into class-name tokens.
///
/// A string is one token, an array contributes its string items, an object
/// contributes the keys whose values are truthy. Anything else yields
/// nothing.
pub fn class_tokens(result: &Value) -> Vec<String> {
    match result {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, enabled)| is_truthy(enabled))
            .map(|(class, _)| class.clone())
            .collect(),
        _ => Vec::new(),
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
