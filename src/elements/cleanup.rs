//! Deferred teardown callbacks collected while an element is attached.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A one-shot teardown callback.
pub type Cleanup = Box<dyn FnOnce()>;

/// A shared, ordered list of cleanups.
///
/// Clones share the same list. [`run_all`](Self::run_all) drains the list
/// before running it, so each callback runs exactly once and a re-attached
/// element starts from an empty list.
#[derive(Clone, Default)]
pub struct Cleanups(Rc<RefCell<Vec<Cleanup>>>);

impl Cleanups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, cleanup: impl FnOnce() + 'static) {
        self.0.borrow_mut().push(Box::new(cleanup));
    }

    pub fn push_boxed(&self, cleanup: Cleanup) {
        self.0.borrow_mut().push(cleanup);
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Run every pending cleanup in registration order.
    ///
    /// Cleanups registered while this runs are kept for the next call.
    pub fn run_all(&self) {
        let pending = std::mem::take(&mut *self.0.borrow_mut());
        for cleanup in pending {
            cleanup();
        }
    }
}

impl fmt::Debug for Cleanups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleanups")
            .field("pending", &self.len())
            .finish()
    }
}
