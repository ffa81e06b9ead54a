//! Reactive state: signals, effects, stores.
//!
//! Fine-grained reactivity on a thread-local runtime, and the store handles
//! built on top of it.
//!
//! - [`Signal`]: a reactive JSON cell.
//! - [`effect`]: auto-tracking side effect; [`dispose_effect`] stops it.
//! - [`batch`]: coalesce several writes into one notification pass.
//! - [`Atom`], [`MapStore`], [`Computed`]: [`Store`] implementations.

pub mod computed;
pub mod runtime;
pub mod store;

pub use computed::Computed;
pub use runtime::{
    batch, dispose_effect, effect, effect_count, is_effect_active, untrack, EffectId, Signal,
    SignalId,
};
pub use store::{Atom, MapStore, Store, StoreCallback, Unsubscribe};
