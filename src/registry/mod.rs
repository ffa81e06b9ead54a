//! Path-addressed registries: components, actions, stores and directives.
//!
//! Components, actions and stores are trees addressed by dot-paths
//! (`"button.primary"`), backed by the generic [`Registry`]. Directives are a
//! flat name to handler map.

pub mod base;
pub mod component;
pub mod directive;
pub mod error;
pub mod path;
pub mod store;

pub use base::{Leaf, Registry};
pub use component::{
    class_tokens, is_truthy, ActionRegistry, CallOptions, Callable, ComponentRegistry,
};
pub use directive::{
    DirectiveBinding, DirectiveContext, DirectiveFn, DirectiveHandler, DirectiveRegistry,
    HandlerResult,
};
pub use error::{RegistryError, RegistryKind};
pub use path::{flatten, resolve, Node, Tree};
pub use store::{StoreCallOptions, StoreEntry, StoreRef, StoreRegistry};
