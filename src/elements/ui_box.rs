//! `<ui-box>`: the declarative attribute binder.
//!
//! On connect, a box binds its text to a store, resolves component classes
//! and wires event and directive bindings. Everything it sets up registers a
//! cleanup that runs when the box is disconnected.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use super::binding::{bindings, group, text_binding, AttrBinding, EventModifiers, TEXT};
use super::cleanup::Cleanups;
use super::display_value;
use super::props::parse_props;
use super::script::HandlerScope;
use crate::app::Uizy;
use crate::dom::{factory, CustomElement, Element, ElementFactory};
use crate::event::{is_native_event, Event, EventListener};
use crate::registry::{DirectiveContext, StoreCallOptions, StoreRef};

pub const TAG: &str = "ui-box";
pub const USE_ATTR: &str = "use";
pub const PROPS_ATTR: &str = "use:props";

pub struct UiBox {
    app: Rc<Uizy>,
    cleanups: Cleanups,
}

impl UiBox {
    pub fn new(app: Rc<Uizy>) -> Self {
        Self {
            app,
            cleanups: Cleanups::new(),
        }
    }

    pub fn factory(app: &Rc<Uizy>) -> ElementFactory {
        let app = Rc::clone(app);
        factory(move || UiBox::new(Rc::clone(&app)))
    }

    /// Cleanups waiting for disconnect.
    pub fn pending_cleanups(&self) -> usize {
        self.cleanups.len()
    }

    fn bind_text(&self, el: &Element) {
        let Some(path) = text_binding(el) else {
            return;
        };
        match self.app.stores().call(&path, StoreCallOptions::raw()) {
            Ok(Some(StoreRef::Handle(store))) => {
                let weak = el.downgrade();
                let unsub = store.subscribe(Box::new(move |value: &Value| {
                    if let Some(el) = weak.upgrade() {
                        el.set_text_content(&display_value(value));
                    }
                }));
                self.cleanups.push(unsub.into_cleanup());
            }
            Ok(Some(StoreRef::Value(value))) => el.set_text_content(&display_value(&value)),
            Ok(None) | Err(_) => debug!(%path, "text binding: no such store"),
        }
    }

    fn apply_use(&self, el: &Element) {
        let Some(attr) = el.get_attribute(USE_ATTR) else {
            return;
        };
        let paths: Vec<Value> = attr
            .split_whitespace()
            .map(|p| Value::String(p.to_owned()))
            .collect();
        if paths.is_empty() {
            return;
        }

        let props = match el.get_attribute(PROPS_ATTR) {
            Some(text) => parse_props(&text).unwrap_or_else(|error| {
                warn!(%error, "ignoring use:props");
                Value::Null
            }),
            None => Value::Null,
        };

        match self.app.use_classes(&Value::Array(paths), &props) {
            Ok(classes) => {
                for class in classes.split_whitespace() {
                    el.class_list().add(class);
                }
            }
            Err(error) => warn!(%error, "use: failed to resolve components"),
        }
    }

    fn bind_attributes(&self, el: &Element) {
        let mut directives = Vec::new();
        for binding in bindings(el) {
            if binding.name == TEXT {
                continue;
            }
            if is_native_event(&binding.name) {
                self.bind_event(el, &binding);
            } else if self.app.directives().has(&binding.name) {
                directives.push(binding);
            } else {
                debug!(name = %binding.name, "unknown binding");
            }
        }

        for group in group(directives) {
            let Some(handler) = self.app.directives().get(&group.name) else {
                continue;
            };
            let primary = group.primary();
            let ctx = DirectiveContext::new(
                primary.value.clone(),
                primary.modifiers.clone(),
                group.directive_bindings(),
                self.cleanups.clone(),
            );
            if let Err(error) = handler(el, &ctx) {
                warn!(directive = %group.name, %error, "directive failed");
            }
        }
    }

    fn bind_event(&self, el: &Element, binding: &AttrBinding) {
        let handler = match self.app.compiler().compile(&binding.value) {
            Ok(handler) => handler,
            Err(error) => {
                warn!(event = %binding.name, %error, "failed to compile handler");
                return;
            }
        };
        let modifiers = EventModifiers::from_binding(binding);
        let app = Rc::clone(&self.app);
        let kind = binding.name.clone();
        let fired = Cell::new(false);

        let listener: EventListener = Rc::new(move |event: &Event| {
            let Some(el) = event.current_target() else {
                return;
            };
            if modifiers.self_only && event.target().as_ref() != Some(&el) {
                return;
            }
            if modifiers.once && fired.replace(true) {
                return;
            }
            if modifiers.prevent {
                event.prevent_default();
            }
            if modifiers.stop {
                event.stop_propagation();
            }
            let scope = HandlerScope::new(event, &el, &*app);
            if let Err(error) = handler.handle(&scope) {
                warn!(event = %kind, %error, "event handler failed");
            }
        });

        let id = el.add_event_listener(&binding.name, listener);
        let weak = el.downgrade();
        self.cleanups.push(move || {
            if let Some(el) = weak.upgrade() {
                el.remove_event_listener(id);
            }
        });
    }
}

impl CustomElement for UiBox {
    fn connected(&self, element: &Element) {
        self.bind_text(element);
        self.apply_use(element);
        self.bind_attributes(element);
    }

    fn disconnected(&self, _element: &Element) {
        self.cleanups.run_all();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for UiBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiBox")
            .field("cleanups", &self.cleanups)
            .finish_non_exhaustive()
    }
}
