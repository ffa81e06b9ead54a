//! Custom elements: the application shell and the `ui-box` binder.

pub mod app_shell;
pub mod binding;
pub mod classes;
pub mod cleanup;
pub mod props;
pub mod script;
pub mod shell;
pub mod ui_box;

use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::app::Uizy;
use crate::css::scalar::format_number;
use crate::dom::{Document, ElementFactory};

pub use app_shell::{action, section_key, ActionPayload, AppShell, Part};
pub use binding::{AttrBinding, DirectiveGroup, EventModifiers};
pub use cleanup::{Cleanup, Cleanups};
pub use props::{parse_props, PropsError};
pub use script::{
    EventHandler, HandlerCompiler, HandlerScope, InlineCompiler, ScriptError, ScriptHost,
};
pub use shell::{
    shell_factory, Drawer, Footer, Header, Main, Overlay, Shell, ShellElement, SystemBar,
};
pub use ui_box::UiBox;

/// Every tag [`define_all`] registers.
pub const TAGS: [&str; 8] = [
    AppShell::TAG,
    SystemBar::TAG,
    Header::TAG,
    Footer::TAG,
    Overlay::TAG,
    Main::TAG,
    Drawer::TAG,
    ui_box::TAG,
];

/// Text shown for a value in the DOM: strings as is, `null` as nothing,
/// arrays and objects as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Define every uizy element on `doc`, skipping tags that are already
/// defined. Returns the number of newly defined tags.
pub fn define_all(doc: &Document, app: &Rc<Uizy>) -> usize {
    let factories: [(&str, ElementFactory); 8] = [
        (AppShell::TAG, shell_factory::<AppShell>()),
        (SystemBar::TAG, shell_factory::<SystemBar>()),
        (Header::TAG, shell_factory::<Header>()),
        (Footer::TAG, shell_factory::<Footer>()),
        (Overlay::TAG, shell_factory::<Overlay>()),
        (Main::TAG, shell_factory::<Main>()),
        (Drawer::TAG, shell_factory::<Drawer>()),
        (ui_box::TAG, UiBox::factory(app)),
    ];
    let mut defined = 0;
    for (tag, factory) in factories {
        if doc.define(tag, factory) {
            defined += 1;
        }
    }
    debug!(defined, "uizy elements defined");
    defined
}
