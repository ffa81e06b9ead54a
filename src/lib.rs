//! # uizy
//!
//! The runtime engine of the uizy CSS framework.
//!
//! uizy pairs utility CSS classes with a small engine: dot-path registries
//! for class-producing components, actions and reactive stores, generators
//! for layout and theme custom properties, a fixed set of application-shell
//! custom elements, and the `ui-box` element that binds attributes to
//! stores, components, events and directives.
//!
//! ## Core Systems
//!
//! - **[`registry`]**: path-addressed component, action and store registries, plus directives
//! - **[`css`]**: layout and theme CSS generation, `<style>` injection
//! - **[`elements`]**: shell elements, `ui-box`, handler scripts
//! - **[`dom`]**: slotmap-backed document model with custom elements and selectors
//! - **[`event`]**: DOM events, bubbling and listener tables
//! - **[`reactive`]**: signals, effects and the store primitives
//! - **[`app`]**: the [`Uizy`](app::Uizy) context and start-up configuration
//! - **[`testing`]**: headless [`Pilot`](testing::Pilot) and snapshot helpers

// Core systems
pub mod css;
pub mod dom;
pub mod registry;

// Events and reactivity
pub mod event;
pub mod reactive;

// Elements
pub mod elements;

// Application
pub mod app;

// Testing
pub mod testing;

pub use app::{StartConfig, Uizy, AUTHOR, NAME, VERSION};
