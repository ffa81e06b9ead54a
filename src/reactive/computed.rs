//! Derived, read-only stores.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::runtime::{untrack, Signal};
use super::store::{watch, Store, StoreCallback, Unsubscribe};

/// A store whose value is derived from other stores.
///
/// The derivation re-runs whenever any source changes; subscribers are only
/// notified when the derived value actually differs. Dropping the last handle
/// detaches it from its sources.
pub struct Computed {
    signal: Signal,
    sources: Vec<Unsubscribe>,
}

impl Computed {
    /// Derive a store from `sources`. `derive` receives the current source
    /// values in the order given.
    pub fn new<F>(sources: Vec<Rc<dyn Store>>, derive: F) -> Rc<Self>
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        let derive: Rc<dyn Fn(&[Value]) -> Value> = Rc::new(derive);
        let initial = untrack(|| derive(&snapshot(&sources)));
        let signal = Signal::new(initial);

        let handles = sources
            .iter()
            .map(|source| {
                let sources = sources.clone();
                let derive = Rc::clone(&derive);
                source.listen(Box::new(move |_: &Value| {
                    signal.set(derive(&snapshot(&sources)));
                }))
            })
            .collect();

        Rc::new(Self {
            signal,
            sources: handles,
        })
    }
}

fn snapshot(sources: &[Rc<dyn Store>]) -> Vec<Value> {
    sources.iter().map(|s| s.get()).collect()
}

impl Store for Computed {
    fn get(&self) -> Value {
        self.signal.get()
    }

    fn subscribe(&self, callback: StoreCallback) -> Unsubscribe {
        watch(self.signal, callback, false)
    }

    fn listen(&self, callback: StoreCallback) -> Unsubscribe {
        watch(self.signal, callback, true)
    }
}

impl Drop for Computed {
    fn drop(&mut self) {
        for handle in &self.sources {
            handle.unsubscribe();
        }
        self.signal.dispose();
    }
}

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("value", &self.signal.get_untracked())
            .field("sources", &self.sources.len())
            .finish()
    }
}
