//! Document model: slotmap-backed element tree, selectors, custom elements.

pub mod custom;
pub mod document;
pub mod element;
pub mod lifecycle;
pub mod node;
pub mod query;
pub mod selector;
pub mod tree;

pub use custom::{factory, CustomElement, ElementFactory, Plain};
pub use document::{Document, ReadyState, DOM_CONTENT_LOADED};
pub use element::{ClassList, Element, Style, WeakElement};
pub use lifecycle::LifecycleTracker;
pub use node::{NodeData, NodeId};
pub use selector::{SelectorError, SelectorList};
pub use tree::Dom;
