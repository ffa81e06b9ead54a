//! Headless testing helpers: the [`Pilot`] and outline snapshots.
//!
//! The [`Pilot`] owns a [`Document`](crate::dom::Document) and a started
//! [`Uizy`](crate::app::Uizy) context, mounts markup built in code, and
//! dispatches events the way a browser would.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::outline;
