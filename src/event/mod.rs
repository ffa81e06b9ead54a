//! Event system: DOM events, listener tables, bubbling dispatch.

pub mod dispatch;
pub mod handler;

pub use dispatch::{is_native_event, Event, NATIVE_EVENTS};
pub use handler::{EventListener, ListenerId, ListenerTable};
