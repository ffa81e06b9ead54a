//! Store handles: the subscribable state containers kept in the store
//! registry.
//!
//! A [`Store`] exposes `get`, `subscribe` (immediate call plus every change)
//! and `listen` (changes only). Writable stores also accept `set`, map stores
//! accept `set_key`. [`Atom`] and [`MapStore`] are the built-in
//! implementations, both backed by a runtime [`Signal`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::runtime::{dispose_effect, effect, untrack, Signal};

/// Callback invoked with a store's value.
pub type StoreCallback = Box<dyn Fn(&Value)>;

// ---------------------------------------------------------------------------
// Unsubscribe
// ---------------------------------------------------------------------------

/// Handle returned by `subscribe`/`listen`.
///
/// Calling [`unsubscribe`](Self::unsubscribe) more than once is a no-op.
/// Dropping the handle does **not** unsubscribe.
pub struct Unsubscribe {
    release: Cell<Option<Box<dyn FnOnce()>>>,
}

impl Unsubscribe {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Cell::new(Some(Box::new(release))),
        }
    }

    /// A handle with nothing to release.
    pub fn noop() -> Self {
        Self {
            release: Cell::new(None),
        }
    }

    pub fn unsubscribe(&self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Whether `unsubscribe` has not run yet.
    pub fn is_active(&self) -> bool {
        let release = self.release.take();
        let active = release.is_some();
        self.release.set(release);
        active
    }

    /// Convert into a one-shot cleanup closure.
    pub fn into_cleanup(self) -> impl FnOnce() {
        move || self.unsubscribe()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("active", &self.is_active())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// A subscribable value.
pub trait Store {
    /// Current value.
    fn get(&self) -> Value;

    /// Call `callback` now with the current value and again on every change.
    fn subscribe(&self, callback: StoreCallback) -> Unsubscribe;

    /// Call `callback` on every future change only.
    fn listen(&self, callback: StoreCallback) -> Unsubscribe;

    /// Replace the value. Returns `false` if the store is read-only.
    fn set(&self, _value: Value) -> bool {
        false
    }

    /// Set one key of an object value. Returns `false` if the store does not
    /// support keyed writes.
    fn set_key(&self, _key: &str, _value: Value) -> bool {
        false
    }
}

/// Drive `callback` from `signal` through an effect.
///
/// The callback itself runs untracked, so reading other stores inside it does
/// not subscribe to them.
pub(crate) fn watch(signal: Signal, callback: StoreCallback, skip_initial: bool) -> Unsubscribe {
    let mut skip = skip_initial;
    let id = effect(move || {
        let value = signal.get();
        if std::mem::take(&mut skip) {
            return;
        }
        untrack(|| callback(&value));
    });
    Unsubscribe::new(move || dispose_effect(id))
}

// ---------------------------------------------------------------------------
// Atom
// ---------------------------------------------------------------------------

/// A writable single-value store.
pub struct Atom {
    signal: Signal,
}

impl Atom {
    pub fn new(initial: impl Into<Value>) -> Rc<Self> {
        Rc::new(Self {
            signal: Signal::new(initial.into()),
        })
    }

    /// The backing signal, for use inside effects.
    pub fn signal(&self) -> Signal {
        self.signal
    }
}

impl Store for Atom {
    fn get(&self) -> Value {
        self.signal.get()
    }

    fn subscribe(&self, callback: StoreCallback) -> Unsubscribe {
        watch(self.signal, callback, false)
    }

    fn listen(&self, callback: StoreCallback) -> Unsubscribe {
        watch(self.signal, callback, true)
    }

    fn set(&self, value: Value) -> bool {
        self.signal.set(value);
        true
    }
}

impl Drop for Atom {
    fn drop(&mut self) {
        self.signal.dispose();
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("value", &self.signal.get_untracked())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// MapStore
// ---------------------------------------------------------------------------

/// A store holding a JSON object, writable per key.
pub struct MapStore {
    signal: Signal,
}

impl MapStore {
    pub fn new(initial: Map<String, Value>) -> Rc<Self> {
        Rc::new(Self {
            signal: Signal::new(Value::Object(initial)),
        })
    }

    /// Current value of one key, `null` if absent.
    pub fn get_key(&self, key: &str) -> Value {
        self.signal
            .get()
            .get(key)
            .cloned()
            .unwrap_or(Value::Null)
    }
}

impl Store for MapStore {
    fn get(&self) -> Value {
        self.signal.get()
    }

    fn subscribe(&self, callback: StoreCallback) -> Unsubscribe {
        watch(self.signal, callback, false)
    }

    fn listen(&self, callback: StoreCallback) -> Unsubscribe {
        watch(self.signal, callback, true)
    }

    /// Replace the whole object. Non-object values are rejected.
    fn set(&self, value: Value) -> bool {
        if !value.is_object() {
            return false;
        }
        self.signal.set(value);
        true
    }

    fn set_key(&self, key: &str, value: Value) -> bool {
        self.signal.update(|current| {
            if let Value::Object(map) = current {
                if value.is_null() {
                    map.remove(key);
                } else {
                    map.insert(key.to_owned(), value);
                }
            }
        });
        true
    }
}

impl Drop for MapStore {
    fn drop(&mut self) {
        self.signal.dispose();
    }
}

impl fmt::Debug for MapStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapStore")
            .field("value", &self.signal.get_untracked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::runtime::reset_runtime;
    use serde_json::json;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<Value>>>, StoreCallback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        (log, Box::new(move |v: &Value| l.borrow_mut().push(v.clone())))
    }

    #[test]
    fn subscribe_calls_immediately_then_on_change() {
        reset_runtime();
        let atom = Atom::new(json!("a"));
        let (log, cb) = recorder();
        let _unsub = atom.subscribe(cb);
        atom.set(json!("b"));
        assert_eq!(*log.borrow(), vec![json!("a"), json!("b")]);
    }

    #[test]
    fn listen_skips_the_current_value() {
        reset_runtime();
        let atom = Atom::new(json!(1));
        let (log, cb) = recorder();
        let _unsub = atom.listen(cb);
        assert!(log.borrow().is_empty());
        atom.set(json!(2));
        assert_eq!(*log.borrow(), vec![json!(2)]);
    }

    #[test]
    fn unchanged_value_does_not_notify() {
        reset_runtime();
        let atom = Atom::new(json!(1));
        let (log, cb) = recorder();
        let _unsub = atom.listen(cb);
        atom.set(json!(1));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        reset_runtime();
        let atom = Atom::new(json!(0));
        let (log, cb) = recorder();
        let unsub = atom.subscribe(cb);
        assert!(unsub.is_active());
        unsub.unsubscribe();
        unsub.unsubscribe();
        assert!(!unsub.is_active());
        atom.set(json!(9));
        assert_eq!(*log.borrow(), vec![json!(0)]);
        assert_eq!(atom.signal().subscriber_count(), 0);
    }

    #[test]
    fn map_store_set_key() {
        reset_runtime();
        let map = MapStore::new(Map::new());
        let (log, cb) = recorder();
        let _unsub = map.listen(cb);
        assert!(map.set_key("name", json!("uizy")));
        assert_eq!(map.get_key("name"), json!("uizy"));
        map.set_key("name", Value::Null);
        assert_eq!(map.get(), json!({}));
        assert_eq!(log.borrow().len(), 2);
        assert!(!map.set(json!(3)));
    }

    #[test]
    fn atom_rejects_keyed_writes() {
        reset_runtime();
        let atom = Atom::new(json!({"a": 1}));
        assert!(!atom.set_key("a", json!(2)));
        assert_eq!(atom.get(), json!({"a": 1}));
    }
}
