//! Signals and effects on a thread-local runtime.
//!
//! Fine-grained, synchronous reactivity: a [`Signal`] stores a JSON value,
//! effects auto-track the signals they read and re-run when one changes.
//! Single-threaded; every handle is a `Copy` key into the runtime.

use std::cell::RefCell;
use std::fmt;

use serde_json::Value;
use slotmap::{new_key_type, SlotMap};

// ---------------------------------------------------------------------------
// IDs
// ---------------------------------------------------------------------------

new_key_type! {
    /// Identifies a signal slot inside the runtime.
    pub struct SignalId;
    /// Identifies an effect slot inside the runtime.
    pub struct EffectId;
}

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

struct SignalSlot {
    value: Value,
    /// Subscribed effects, in subscription order.
    subscribers: Vec<EffectId>,
}

struct EffectSlot {
    /// Taken out while the effect runs so no runtime borrow is held across
    /// the user callback.
    callback: Option<Box<dyn FnMut()>>,
    dependencies: Vec<SignalId>,
}

#[derive(Default)]
struct Runtime {
    signals: SlotMap<SignalId, SignalSlot>,
    effects: SlotMap<EffectId, EffectSlot>,
    /// The effect currently executing, for auto-tracking.
    tracking: Option<EffectId>,
    /// Non-zero inside `batch()`; notifications are deferred.
    batch_depth: usize,
    pending: Vec<EffectId>,
    /// Set while the notification loop runs; nested writes queue instead.
    flushing: bool,
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::default());
}

fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> R {
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Like `with_runtime`, but a no-op while the runtime is borrowed or being
/// torn down at thread exit. Used from `Drop` paths.
fn try_with_runtime(f: impl FnOnce(&mut Runtime)) {
    let _ = RUNTIME.try_with(|rt| {
        if let Ok(mut rt) = rt.try_borrow_mut() {
            f(&mut rt);
        }
    });
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// A reactive cell holding a JSON value. `Copy`: it only stores an id.
///
/// Reads inside an effect subscribe that effect. A disposed signal reads as
/// `null` and ignores writes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    id: SignalId,
}

impl Signal {
    /// Create a signal with the given initial value.
    pub fn new(initial: Value) -> Self {
        let id = with_runtime(|rt| {
            rt.signals.insert(SignalSlot {
                value: initial,
                subscribers: Vec::new(),
            })
        });
        Self { id }
    }

    /// Read the current value, subscribing the running effect (if any).
    pub fn get(&self) -> Value {
        with_runtime(|rt| {
            if let Some(eid) = rt.tracking {
                if rt.effects.contains_key(eid) {
                    if let Some(slot) = rt.signals.get_mut(self.id) {
                        if !slot.subscribers.contains(&eid) {
                            slot.subscribers.push(eid);
                        }
                    }
                    if let Some(effect) = rt.effects.get_mut(eid) {
                        if !effect.dependencies.contains(&self.id) {
                            effect.dependencies.push(self.id);
                        }
                    }
                }
            }
            rt.signals
                .get(self.id)
                .map(|slot| slot.value.clone())
                .unwrap_or(Value::Null)
        })
    }

    /// Read without subscribing the running effect.
    pub fn get_untracked(&self) -> Value {
        with_runtime(|rt| {
            rt.signals
                .get(self.id)
                .map(|slot| slot.value.clone())
                .unwrap_or(Value::Null)
        })
    }

    /// Replace the value. Subscribers are notified only when the new value
    /// differs from the old one. Returns whether it changed.
    pub fn set(&self, value: Value) -> bool {
        self.update(|current| *current = value)
    }

    /// Mutate the value in place; notifies subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut Value)) -> bool {
        let subscribers = with_runtime(|rt| {
            let slot = rt.signals.get_mut(self.id)?;
            let before = slot.value.clone();
            f(&mut slot.value);
            (slot.value != before).then(|| slot.subscribers.clone())
        });
        match subscribers {
            Some(subs) => {
                notify(subs);
                true
            }
            None => false,
        }
    }

    /// Number of effects currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        with_runtime(|rt| rt.signals.get(self.id).map_or(0, |s| s.subscribers.len()))
    }

    /// Free the slot. Idempotent.
    pub fn dispose(&self) {
        try_with_runtime(|rt| {
            if let Some(slot) = rt.signals.remove(self.id) {
                for eid in slot.subscribers {
                    if let Some(effect) = rt.effects.get_mut(eid) {
                        effect.dependencies.retain(|&s| s != self.id);
                    }
                }
            }
        });
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("id", &self.id).finish()
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Create a side effect that auto-tracks signal reads.
///
/// The closure runs immediately once, then again whenever a signal it read
/// during its last run changes.
pub fn effect(f: impl FnMut() + 'static) -> EffectId {
    let eid = with_runtime(|rt| {
        rt.effects.insert(EffectSlot {
            callback: Some(Box::new(f)),
            dependencies: Vec::new(),
        })
    });
    run_effect(eid);
    eid
}

/// Stop an effect and drop its closure. Idempotent; safe to call from inside
/// the effect itself.
pub fn dispose_effect(eid: EffectId) {
    let mut dropped = None;
    try_with_runtime(|rt| {
        if let Some(slot) = rt.effects.remove(eid) {
            for sid in &slot.dependencies {
                if let Some(signal) = rt.signals.get_mut(*sid) {
                    signal.subscribers.retain(|&e| e != eid);
                }
            }
            dropped = slot.callback;
        }
    });
    // Dropped outside the borrow: the closure may own stores whose `Drop`
    // touches the runtime.
    drop(dropped);
}

/// Whether an effect is still alive.
pub fn is_effect_active(eid: EffectId) -> bool {
    with_runtime(|rt| rt.effects.contains_key(eid))
}

/// Run `f` with auto-tracking suspended.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    let prev = with_runtime(|rt| rt.tracking.take());
    let out = f();
    with_runtime(|rt| rt.tracking = prev);
    out
}

/// Group several writes so that each affected effect runs once at the end.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    with_runtime(|rt| rt.batch_depth += 1);
    let out = f();
    let pending = with_runtime(|rt| {
        rt.batch_depth -= 1;
        if rt.batch_depth == 0 {
            dedup(std::mem::take(&mut rt.pending))
        } else {
            Vec::new()
        }
    });
    notify(pending);
    out
}

fn dedup(ids: Vec<EffectId>) -> Vec<EffectId> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

fn run_effect(eid: EffectId) {
    let callback = with_runtime(|rt| {
        let slot = rt.effects.get_mut(eid)?;
        let old = std::mem::take(&mut slot.dependencies);
        let callback = slot.callback.take();
        for sid in old {
            if let Some(signal) = rt.signals.get_mut(sid) {
                signal.subscribers.retain(|&e| e != eid);
            }
        }
        callback
    });
    let Some(mut callback) = callback else {
        return;
    };

    let prev = with_runtime(|rt| rt.tracking.replace(eid));
    callback();
    let leftover = with_runtime(|rt| {
        rt.tracking = prev;
        match rt.effects.get_mut(eid) {
            Some(slot) => {
                slot.callback = Some(callback);
                None
            }
            None => Some(callback),
        }
    });
    drop(leftover);
}

fn notify(subscribers: Vec<EffectId>) {
    if subscribers.is_empty() {
        return;
    }
    let defer = with_runtime(|rt| {
        if rt.batch_depth > 0 || rt.flushing {
            rt.pending.extend(subscribers.iter().copied());
            true
        } else {
            rt.flushing = true;
            false
        }
    });
    if defer {
        return;
    }

    let mut queue = subscribers;
    while !queue.is_empty() {
        for eid in std::mem::take(&mut queue) {
            run_effect(eid);
        }
        queue = with_runtime(|rt| dedup(std::mem::take(&mut rt.pending)));
    }
    with_runtime(|rt| rt.flushing = false);
}

/// Number of live effects on this thread.
pub fn effect_count() -> usize {
    with_runtime(|rt| rt.effects.len())
}

#[cfg(test)]
pub(crate) fn reset_runtime() {
    let old = RUNTIME.with(|rt| std::mem::take(&mut *rt.borrow_mut()));
    drop(old);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
