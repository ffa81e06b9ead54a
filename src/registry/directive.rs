//! The directive registry: flat name to handler.
//!
//! A directive is the behaviour behind a custom `ui-box` binding such as
//! `:tooltip="Save"`. Handlers receive the element and a
//! [`DirectiveContext`] describing every occurrence of the directive on it.

use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::dom::Element;
use crate::elements::cleanup::{Cleanup, Cleanups};

/// Result of a directive or event handler. Errors are logged by the caller.
pub type HandlerResult = Result<(), Box<dyn Error>>;

/// A two-argument directive handler.
pub type DirectiveHandler = Rc<dyn Fn(&Element, &DirectiveContext) -> HandlerResult>;

// ---------------------------------------------------------------------------
// DirectiveFn
// ---------------------------------------------------------------------------

/// A directive as supplied for batch registration: either element-only or
/// element plus context.
#[derive(Clone)]
pub enum DirectiveFn {
    Element(Rc<dyn Fn(&Element) -> HandlerResult>),
    Full(DirectiveHandler),
}

impl DirectiveFn {
    pub fn element(f: impl Fn(&Element) -> HandlerResult + 'static) -> Self {
        Self::Element(Rc::new(f))
    }

    pub fn full(f: impl Fn(&Element, &DirectiveContext) -> HandlerResult + 'static) -> Self {
        Self::Full(Rc::new(f))
    }

    /// Adapt to the two-argument contract.
    pub fn into_handler(self) -> DirectiveHandler {
        match self {
            Self::Full(handler) => handler,
            Self::Element(simple) => Rc::new(move |el: &Element, _: &DirectiveContext| simple(el)),
        }
    }
}

impl fmt::Debug for DirectiveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(_) => f.write_str("DirectiveFn::Element(<fn>)"),
            Self::Full(_) => f.write_str("DirectiveFn::Full(<fn>)"),
        }
    }
}

// ---------------------------------------------------------------------------
// DirectiveContext
// ---------------------------------------------------------------------------

/// One attribute occurrence of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveBinding {
    /// The attribute value.
    pub value: String,
    /// The first modifier, or empty.
    pub arg: String,
}

/// What a directive handler sees.
pub struct DirectiveContext {
    value: String,
    modifiers: Vec<String>,
    bindings: Vec<DirectiveBinding>,
    cleanups: Cleanups,
}

impl DirectiveContext {
    pub fn new(
        value: impl Into<String>,
        modifiers: Vec<String>,
        bindings: Vec<DirectiveBinding>,
        cleanups: Cleanups,
    ) -> Self {
        Self {
            value: value.into(),
            modifiers,
            bindings,
            cleanups,
        }
    }

    /// The primary attribute value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Same as [`value`](Self::value).
    pub fn expression(&self) -> &str {
        &self.value
    }

    /// Modifiers of the primary occurrence, in attribute order.
    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m == name)
    }

    /// Every occurrence of this directive on the element.
    pub fn bindings(&self) -> &[DirectiveBinding] {
        &self.bindings
    }

    /// The value of the occurrence whose first modifier is `arg`.
    pub fn binding(&self, arg: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.arg == arg)
            .map(|b| b.value.as_str())
    }

    /// Run `f` now and keep the cleanup it returns for detach.
    pub fn effect(&self, f: impl FnOnce() -> Option<Cleanup>) {
        if let Some(cleanup) = f() {
            self.cleanups.push_boxed(cleanup);
        }
    }

    /// Register a cleanup for detach.
    pub fn cleanup(&self, f: impl FnOnce() + 'static) {
        self.cleanups.push(f);
    }
}

impl fmt::Debug for DirectiveContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveContext")
            .field("value", &self.value)
            .field("modifiers", &self.modifiers)
            .field("bindings", &self.bindings)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// DirectiveRegistry
// ---------------------------------------------------------------------------

/// Flat registry of directive handlers. Registering a name twice replaces
/// the earlier handler.
#[derive(Default)]
pub struct DirectiveRegistry {
    handlers: RefCell<IndexMap<String, DirectiveHandler>>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &self,
        name: impl Into<String>,
        handler: impl Fn(&Element, &DirectiveContext) -> HandlerResult + 'static,
    ) -> &Self {
        self.add_handler(name, Rc::new(handler))
    }

    pub fn add_handler(&self, name: impl Into<String>, handler: DirectiveHandler) -> &Self {
        let name = name.into();
        debug!(%name, "directive registered");
        self.handlers.borrow_mut().insert(name, handler);
        self
    }

    /// Register a batch, adapting element-only handlers.
    pub fn add_all<K: Into<String>>(&self, directives: impl IntoIterator<Item = (K, DirectiveFn)>) -> &Self {
        for (name, directive) in directives {
            self.add_handler(name, directive.into_handler());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<DirectiveHandler> {
        self.handlers.borrow().get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.handlers.borrow().contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.handlers.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}

impl fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("names", &self.names())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn context(value: &str) -> (DirectiveContext, Cleanups) {
        let cleanups = Cleanups::new();
        let ctx = DirectiveContext::new(
            value,
            vec!["top".into(), "lazy".into()],
            vec![
                DirectiveBinding { value: value.into(), arg: "top".into() },
                DirectiveBinding { value: "8".into(), arg: "offset".into() },
            ],
            cleanups.clone(),
        );
        (ctx, cleanups)
    }

    #[test]
    fn add_get_has_names() {
        let reg = DirectiveRegistry::new();
        reg.add("tooltip", |_, _| Ok(())).add("focus", |_, _| Ok(()));
        assert!(reg.has("tooltip"));
        assert!(reg.get("focus").is_some());
        assert!(reg.get("nope").is_none());
        assert_eq!(reg.names(), vec!["tooltip", "focus"]);
        reg.clear();
        assert!(reg.is_empty());
    }

    #[test]
    fn add_all_wraps_element_only_handlers() {
        let doc = Document::new();
        let el = doc.create_element("ui-box");
        let reg = DirectiveRegistry::new();
        reg.add_all([
            (
                "mark",
                DirectiveFn::element(|el: &Element| {
                    el.set_attribute("marked", "");
                    Ok(())
                }),
            ),
            (
                "label",
                DirectiveFn::full(|el: &Element, ctx: &DirectiveContext| {
                    el.set_attribute("aria-label", ctx.value());
                    Ok(())
                }),
            ),
        ]);
        let (ctx, _) = context("Save");
        for name in ["mark", "label"] {
            let handler = reg.get(name).unwrap();
            handler(&el, &ctx).unwrap();
        }
        assert!(el.has_attribute("marked"));
        assert_eq!(el.get_attribute("aria-label").as_deref(), Some("Save"));
    }

    #[test]
    fn context_accessors() {
        let (ctx, _) = context("Hi");
        assert_eq!(ctx.expression(), "Hi");
        assert!(ctx.has_modifier("lazy"));
        assert_eq!(ctx.binding("offset"), Some("8"));
        assert_eq!(ctx.binding("missing"), None);
    }

    #[test]
    fn effect_keeps_returned_cleanup() {
        let (ctx, cleanups) = context("x");
        ctx.effect(|| None);
        ctx.effect(|| Some(Box::new(|| {})));
        ctx.cleanup(|| {});
        assert_eq!(cleanups.len(), 2);
    }
}
