//! Custom element trait: the behaviour attached to a registered tag.
//!
//! A `CustomElement` is created by its factory the first time an element with
//! the registered tag becomes connected, and the same instance is reused if
//! the element is detached and appended again. Callbacks run with no document
//! borrow held, so they may freely read and mutate the tree.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::element::Element;

// ---------------------------------------------------------------------------
// CustomElement trait
// ---------------------------------------------------------------------------

/// Behaviour attached to a custom tag.
///
/// The trait is object-safe; the document stores instances as
/// `Rc<dyn CustomElement>` and hands out downcasts through
/// [`Element::with_custom`].
pub trait CustomElement {
    /// Called when the element becomes connected to the document.
    fn connected(&self, element: &Element);

    /// Called when the element is detached from the document.
    fn disconnected(&self, _element: &Element) {}

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;
}

/// Builds a fresh instance for each element that upgrades to a custom tag.
pub type ElementFactory = Rc<dyn Fn() -> Rc<dyn CustomElement>>;

/// Wrap a constructor into an [`ElementFactory`].
pub fn factory<T, F>(make: F) -> ElementFactory
where
    T: CustomElement + 'static,
    F: Fn() -> T + 'static,
{
    Rc::new(move || Rc::new(make()) as Rc<dyn CustomElement>)
}

// ---------------------------------------------------------------------------
// Plain
// ---------------------------------------------------------------------------

/// A custom element with no behaviour.
///
/// Useful for tags that only need to be recognised (the application root is
/// one) and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl CustomElement for Plain {
    fn connected(&self, _element: &Element) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for dyn CustomElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomElement")
    }
}
