//! DOM events and the native event name table.

use std::cell::{Cell, RefCell};
use std::fmt;

use serde_json::Value;

use crate::dom::Element;

/// Event names treated as native DOM events by the `ui-box` binder.
///
/// Any binding whose name is not listed here is looked up in the directive
/// registry instead.
pub const NATIVE_EVENTS: &[&str] = &[
    // mouse
    "click",
    "dblclick",
    "mousedown",
    "mouseup",
    "mousemove",
    "mouseenter",
    "mouseleave",
    "mouseover",
    "mouseout",
    "contextmenu",
    "wheel",
    // pointer
    "pointerdown",
    "pointerup",
    "pointermove",
    "pointerenter",
    "pointerleave",
    "pointerover",
    "pointerout",
    "pointercancel",
    // touch
    "touchstart",
    "touchend",
    "touchmove",
    "touchcancel",
    // keyboard
    "keydown",
    "keyup",
    "keypress",
    // focus
    "focus",
    "blur",
    "focusin",
    "focusout",
    // form
    "input",
    "change",
    "submit",
    "reset",
    "invalid",
    "select",
    // drag and drop
    "drag",
    "dragstart",
    "dragend",
    "dragenter",
    "dragleave",
    "dragover",
    "drop",
    // clipboard
    "copy",
    "cut",
    "paste",
    // media and loading
    "load",
    "error",
    "scroll",
    "resize",
    // animation and transition
    "animationstart",
    "animationend",
    "animationiteration",
    "transitionstart",
    "transitionend",
    "transitionrun",
    "transitioncancel",
];

/// Whether `name` is a native DOM event name.
pub fn is_native_event(name: &str) -> bool {
    NATIVE_EVENTS.contains(&name)
}

/// A dispatched event.
///
/// Targets are filled in by [`Element::dispatch_event`]; an event can be
/// dispatched more than once.
pub struct Event {
    kind: String,
    detail: Value,
    target: RefCell<Option<Element>>,
    current_target: RefCell<Option<Element>>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Create an event of the given type with a `null` detail.
    pub fn new(kind: impl Into<String>) -> Self {
        Self::with_detail(kind, Value::Null)
    }

    /// Create an event carrying a detail payload (like `CustomEvent`).
    pub fn with_detail(kind: impl Into<String>, detail: Value) -> Self {
        Self {
            kind: kind.into(),
            detail,
            target: RefCell::new(None),
            current_target: RefCell::new(None),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// The event type, e.g. `"click"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The detail payload.
    pub fn detail(&self) -> &Value {
        &self.detail
    }

    /// The element the event was dispatched on.
    pub fn target(&self) -> Option<Element> {
        self.target.borrow().clone()
    }

    /// The element whose listeners are currently running.
    pub fn current_target(&self) -> Option<Element> {
        self.current_target.borrow().clone()
    }

    /// Mark the default action as cancelled.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether [`prevent_default`](Self::prevent_default) was called.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop bubbling after the current element's listeners.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) was called.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub(crate) fn begin_dispatch(&self, target: Element) {
        *self.target.borrow_mut() = Some(target);
        self.propagation_stopped.set(false);
    }

    pub(crate) fn set_current_target(&self, current: Option<Element>) {
        *self.current_target.borrow_mut() = current;
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("detail", &self.detail)
            .field("default_prevented", &self.default_prevented.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn native_event_table() {
        assert!(is_native_event("click"));
        assert!(is_native_event("transitionend"));
        assert!(!is_native_event("tooltip"));
        assert!(!is_native_event("text"));
    }

    #[test]
    fn new_event_defaults() {
        let ev = Event::new("click");
        assert_eq!(ev.kind(), "click");
        assert_eq!(ev.detail(), &Value::Null);
        assert!(ev.target().is_none());
        assert!(!ev.default_prevented());
    }

    #[test]
    fn prevent_default_and_stop_propagation() {
        let ev = Event::with_detail("submit", json!({"id": 1}));
        ev.prevent_default();
        ev.stop_propagation();
        assert!(ev.default_prevented());
        assert!(ev.propagation_stopped());
        assert_eq!(ev.detail()["id"], 1);
    }

    #[test]
    fn debug_output_names_kind() {
        let dbg = format!("{:?}", Event::new("input"));
        assert!(dbg.contains("Event"));
        assert!(dbg.contains("input"));
    }
}
