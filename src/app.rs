//! The uizy context: registries, theme, plugins and start-up.
//!
//! [`Uizy`] is created explicitly (`Uizy::new()`) and handed to whatever
//! needs it; there is no process-wide singleton. [`Uizy::start`] applies a
//! [`StartConfig`] to a document in one call. Tests that reuse a context can
//! reset it with [`Uizy::clear`].

use std::cell::{Cell, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::css::{generate_layout_css, inject_css, LayoutInput, Theme, ThemeConfig};
use crate::dom::{Document, Element, ReadyState, DOM_CONTENT_LOADED};
use crate::elements::{define_all, HandlerCompiler, InlineCompiler, ScriptHost};
use crate::event::{Event, EventListener};
use crate::reactive::{Computed, Store, Unsubscribe};
use crate::registry::{
    class_tokens, ActionRegistry, CallOptions, Callable, ComponentRegistry, DirectiveContext,
    DirectiveFn, DirectiveRegistry, HandlerResult, Registry, RegistryError, StoreCallOptions,
    StoreEntry, StoreRef, StoreRegistry, Tree,
};

/// Package name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Package authors.
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Style id used for the layout CSS.
pub const LAYOUT_STYLE_ID: &str = "main";
/// Style id used for the theme CSS.
pub const THEME_STYLE_ID: &str = "theme";

// ---------------------------------------------------------------------------
// Plugins
// ---------------------------------------------------------------------------

/// A bundle installed through [`StartConfig::plugin`].
///
/// Any `Fn(&Rc<Uizy>, &Value)` is a plugin; the value is the options passed
/// alongside it.
pub trait Plugin {
    fn install(&self, app: &Rc<Uizy>, options: &Value);
}

impl<F> Plugin for F
where
    F: Fn(&Rc<Uizy>, &Value),
{
    fn install(&self, app: &Rc<Uizy>, options: &Value) {
        self(app, options)
    }
}

/// What a plugin registers under its namespace.
#[derive(Default)]
pub struct PluginExports {
    pub components: Option<Tree<Callable>>,
    pub actions: Option<Tree<Callable>>,
    pub stores: Option<Tree<StoreEntry>>,
    pub directives: Vec<(String, DirectiveFn)>,
}

impl PluginExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_components(mut self, tree: Tree<Callable>) -> Self {
        self.components = Some(tree);
        self
    }

    pub fn with_actions(mut self, tree: Tree<Callable>) -> Self {
        self.actions = Some(tree);
        self
    }

    pub fn with_stores(mut self, tree: Tree<StoreEntry>) -> Self {
        self.stores = Some(tree);
        self
    }

    pub fn with_directive(mut self, name: impl Into<String>, directive: DirectiveFn) -> Self {
        self.directives.push((name.into(), directive));
        self
    }
}

impl fmt::Debug for PluginExports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginExports")
            .field("components", &self.components.as_ref().map(Tree::len))
            .field("actions", &self.actions.as_ref().map(Tree::len))
            .field("stores", &self.stores.as_ref().map(Tree::len))
            .field("directives", &self.directives.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// StartConfig
// ---------------------------------------------------------------------------

/// Everything [`Uizy::start`] applies.
///
/// `layout`, `theme` and `globals` deserialize from JSON with camelCase
/// names; registrations and callbacks are added with the builder methods.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartConfig {
    pub layout: Option<LayoutInput>,
    pub theme: Option<ThemeConfig>,
    pub globals: bool,
    #[serde(skip)]
    pub components: Option<Tree<Callable>>,
    #[serde(skip)]
    pub actions: Option<Tree<Callable>>,
    #[serde(skip)]
    pub stores: Option<Tree<StoreEntry>>,
    #[serde(skip)]
    pub directives: Vec<(String, DirectiveFn)>,
    #[serde(skip)]
    plugins: Vec<(Rc<dyn Plugin>, Value)>,
    #[serde(skip)]
    compiler: Option<Rc<dyn HandlerCompiler>>,
    #[serde(skip)]
    on_ready: Option<Box<dyn FnOnce()>>,
}

impl StartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the declarative part from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_layout(mut self, layout: LayoutInput) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_theme(mut self, theme: ThemeConfig) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_globals(mut self, globals: bool) -> Self {
        self.globals = globals;
        self
    }

    pub fn with_components(mut self, tree: Tree<Callable>) -> Self {
        self.components = Some(tree);
        self
    }

    pub fn with_actions(mut self, tree: Tree<Callable>) -> Self {
        self.actions = Some(tree);
        self
    }

    pub fn with_stores(mut self, tree: Tree<StoreEntry>) -> Self {
        self.stores = Some(tree);
        self
    }

    pub fn with_directive(mut self, name: impl Into<String>, directive: DirectiveFn) -> Self {
        self.directives.push((name.into(), directive));
        self
    }

    /// Install `plugin` with `options` before anything else.
    pub fn plugin(mut self, plugin: Rc<dyn Plugin>, options: Value) -> Self {
        self.plugins.push((plugin, options));
        self
    }

    /// Replace the event handler compiler.
    pub fn compiler(mut self, compiler: Rc<dyn HandlerCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn on_ready(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_ready = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for StartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartConfig")
            .field("layout", &self.layout)
            .field("theme", &self.theme)
            .field("globals", &self.globals)
            .field("directives", &self.directives.len())
            .field("plugins", &self.plugins.len())
            .field("on_ready", &self.on_ready.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Uizy
// ---------------------------------------------------------------------------

/// The uizy context.
pub struct Uizy {
    components: ComponentRegistry,
    actions: ActionRegistry,
    stores: StoreRegistry,
    directives: DirectiveRegistry,
    theme: RefCell<Theme>,
    compiler: RefCell<Rc<dyn HandlerCompiler>>,
    globals: Cell<bool>,
    plugins: RefCell<Vec<Rc<dyn Plugin>>>,
}

impl Default for Uizy {
    fn default() -> Self {
        Self {
            components: Registry::components(),
            actions: Registry::actions(),
            stores: Registry::stores(),
            directives: DirectiveRegistry::new(),
            theme: RefCell::new(Theme::new()),
            compiler: RefCell::new(Rc::new(InlineCompiler)),
            globals: Cell::new(false),
            plugins: RefCell::new(Vec::new()),
        }
    }
}

impl Uizy {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    // ── Start-up ─────────────────────────────────────────────────────

    /// Apply `config` to `doc`.
    ///
    /// Order: plugins, layout CSS, theme CSS, components, actions, stores,
    /// directives, globals, then [`init`](Self::init).
    pub fn start(self: &Rc<Self>, doc: &Document, config: StartConfig) {
        let StartConfig {
            layout,
            theme,
            globals,
            components,
            actions,
            stores,
            directives,
            plugins,
            compiler,
            on_ready,
        } = config;

        if let Some(compiler) = compiler {
            self.set_compiler(compiler);
        }
        for (plugin, options) in plugins {
            self.install(plugin, &options);
        }
        if let Some(layout) = layout {
            self.layout(doc, &layout);
        }
        if let Some(theme) = theme {
            self.apply_theme(doc, &theme);
        }
        if let Some(tree) = components {
            self.components.add(tree);
        }
        if let Some(tree) = actions {
            self.actions.add(tree);
        }
        if let Some(tree) = stores {
            self.stores.add(tree);
        }
        self.directives.add_all(directives);
        if globals {
            self.globals.set(true);
        }
        debug!(globals, "uizy started");
        self.init(doc, on_ready);
    }

    /// Define the uizy elements on `doc` and run `on_ready` once the
    /// document has loaded.
    pub fn init(self: &Rc<Self>, doc: &Document, on_ready: Option<Box<dyn FnOnce()>>) {
        define_all(doc, self);
        let Some(on_ready) = on_ready else {
            return;
        };
        if doc.ready_state() == ReadyState::Complete {
            on_ready();
            return;
        }
        let pending = RefCell::new(Some(on_ready));
        let listener: EventListener = Rc::new(move |_: &Event| {
            let callback = pending.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
        });
        doc.document_element()
            .add_event_listener(DOM_CONTENT_LOADED, listener);
    }

    /// Install `plugin`. A plugin already installed on this context is
    /// skipped with a warning. Returns whether it was installed.
    pub fn install(self: &Rc<Self>, plugin: Rc<dyn Plugin>, options: &Value) -> bool {
        {
            let mut installed = self.plugins.borrow_mut();
            if installed
                .iter()
                .any(|p| std::ptr::addr_eq(Rc::as_ptr(p), Rc::as_ptr(&plugin)))
            {
                warn!("Plugin already installed, skipping");
                return false;
            }
            installed.push(Rc::clone(&plugin));
        }
        plugin.install(self, options);
        true
    }

    /// Register a namespaced bundle: trees nest under `namespace`,
    /// directives become `{namespace}-{name}`.
    pub fn plugin(&self, namespace: &str, exports: PluginExports) {
        let PluginExports {
            components,
            actions,
            stores,
            directives,
        } = exports;
        if let Some(tree) = components {
            self.components.add(Tree::new().branch(namespace, tree));
        }
        if let Some(tree) = actions {
            self.actions.add(Tree::new().branch(namespace, tree));
        }
        if let Some(tree) = stores {
            self.stores.add(Tree::new().branch(namespace, tree));
        }
        self.directives.add_all(
            directives
                .into_iter()
                .map(|(name, directive)| (format!("{namespace}-{name}"), directive)),
        );
        debug!(%namespace, "plugin registered");
    }

    // ── CSS ──────────────────────────────────────────────────────────

    /// Generate and inject the layout CSS.
    pub fn layout(&self, doc: &Document, input: &LayoutInput) -> Element {
        inject_css(doc, &generate_layout_css(input), LAYOUT_STYLE_ID)
    }

    /// Apply `config` to the theme and inject the result, if any.
    pub fn apply_theme(&self, doc: &Document, config: &ThemeConfig) -> Option<Element> {
        let css = {
            let mut theme = self.theme.borrow_mut();
            theme.apply(config);
            theme.to_css()
        };
        if css.is_empty() {
            return None;
        }
        Some(inject_css(doc, &format!(":root {{ {css} }}"), THEME_STYLE_ID))
    }

    pub fn theme(&self) -> RefMut<'_, Theme> {
        self.theme.borrow_mut()
    }

    /// Element with the given id.
    pub fn get(&self, doc: &Document, id: &str) -> Option<Element> {
        doc.get_element_by_id(id)
    }

    // ── Registries ───────────────────────────────────────────────────

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn stores(&self) -> &StoreRegistry {
        &self.stores
    }

    pub fn directives(&self) -> &DirectiveRegistry {
        &self.directives
    }

    /// Register components.
    pub fn add(&self, tree: Tree<Callable>) -> &Self {
        self.components.add(tree);
        self
    }

    /// Register actions.
    pub fn on(&self, tree: Tree<Callable>) -> &Self {
        self.actions.add(tree);
        self
    }

    /// Register stores.
    pub fn state(&self, tree: Tree<StoreEntry>) -> &Self {
        self.stores.add(tree);
        self
    }

    pub fn directive(
        &self,
        name: impl Into<String>,
        handler: impl Fn(&Element, &DirectiveContext) -> HandlerResult + 'static,
    ) -> &Self {
        self.directives.add(name, handler);
        self
    }

    /// Empty every registry and the theme. Installed plugins are forgotten.
    pub fn clear(&self) {
        self.components.clear();
        self.actions.clear();
        self.stores.clear();
        self.directives.clear();
        self.theme.borrow_mut().clear();
        self.plugins.borrow_mut().clear();
        self.globals.set(false);
    }

    // ── Components and actions ───────────────────────────────────────

    /// Resolve components to a class string.
    ///
    /// `paths` is one path or a list of paths. A single path must be
    /// registered; unregistered entries of a list are skipped. `props`
    /// defaults to `{}`.
    pub fn use_classes(&self, paths: &Value, props: &Value) -> Result<String, RegistryError> {
        let props = match props {
            Value::Null => Value::Object(Map::new()),
            other => other.clone(),
        };
        let mut tokens = Vec::new();
        match paths {
            Value::String(path) => {
                if let Some(result) = self.components.call(path, &props, CallOptions::default())? {
                    tokens.extend(class_tokens(&result));
                }
            }
            Value::Array(list) => {
                for path in list.iter().filter_map(Value::as_str) {
                    if !self.components.has(path) {
                        continue;
                    }
                    if let Some(result) =
                        self.components.call(path, &props, CallOptions::default())?
                    {
                        tokens.extend(class_tokens(&result));
                    }
                }
            }
            _ => {}
        }
        Ok(tokens.join(" "))
    }

    /// Resolve a single component path.
    pub fn use_class(&self, path: &str, props: &Value) -> Result<String, RegistryError> {
        self.use_classes(&Value::String(path.to_owned()), props)
    }

    /// Call an action.
    pub fn emit(&self, path: &str, payload: &Value) -> Result<Value, RegistryError> {
        self.actions
            .call(path, payload, CallOptions::default())
            .map(Option::unwrap_or_default)
    }

    // ── Stores ───────────────────────────────────────────────────────

    /// A store's current value, or a registered constant.
    pub fn store_value(&self, path: &str) -> Result<Value, RegistryError> {
        self.stores
            .call(path, StoreCallOptions::default())
            .map(|found| found.map(StoreRef::into_value).unwrap_or_default())
    }

    fn raw_store(&self, path: &str) -> Option<Rc<dyn Store>> {
        self.stores
            .call(path, StoreCallOptions::raw())
            .ok()
            .flatten()
            .and_then(StoreRef::into_handle)
    }

    /// Write a store. Returns `false` when there is no writable store at
    /// `path`.
    pub fn set_store(&self, path: &str, value: Value) -> bool {
        self.raw_store(path).is_some_and(|store| store.set(value))
    }

    /// Write one key of a map store.
    pub fn set_store_key(&self, path: &str, key: &str, value: Value) -> bool {
        self.raw_store(path)
            .is_some_and(|store| store.set_key(key, value))
    }

    /// Subscribe to a store: `callback` runs now and on every change.
    /// Unknown paths return a no-op handle.
    pub fn subscribe(&self, path: &str, callback: impl Fn(&Value) + 'static) -> Unsubscribe {
        match self.raw_store(path) {
            Some(store) => store.subscribe(Box::new(callback)),
            None => Unsubscribe::noop(),
        }
    }

    /// Listen to a store's changes only.
    pub fn listen(&self, path: &str, callback: impl Fn(&Value) + 'static) -> Unsubscribe {
        match self.raw_store(path) {
            Some(store) => store.listen(Box::new(callback)),
            None => Unsubscribe::noop(),
        }
    }

    /// Derive a store from aliased store paths.
    ///
    /// Every path must resolve to a store now; `derive` receives an object
    /// mapping each alias to its store's current value.
    pub fn computed<A, P>(
        &self,
        aliases: impl IntoIterator<Item = (A, P)>,
        derive: impl Fn(&Map<String, Value>) -> Value + 'static,
    ) -> Result<Rc<Computed>, RegistryError>
    where
        A: Into<String>,
        P: Into<String>,
    {
        let mut names = Vec::new();
        let mut sources = Vec::new();
        for (alias, path) in aliases {
            let (alias, path) = (alias.into(), path.into());
            let Some(store) = self.raw_store(&path) else {
                return Err(RegistryError::StoreNotFound { path, alias });
            };
            names.push(alias);
            sources.push(store);
        }
        Ok(Computed::new(sources, move |values: &[Value]| {
            let aliased: Map<String, Value> =
                names.iter().cloned().zip(values.iter().cloned()).collect();
            derive(&aliased)
        }))
    }

    // ── Handlers ─────────────────────────────────────────────────────

    pub fn compiler(&self) -> Rc<dyn HandlerCompiler> {
        Rc::clone(&self.compiler.borrow())
    }

    pub fn set_compiler(&self, compiler: Rc<dyn HandlerCompiler>) {
        *self.compiler.borrow_mut() = compiler;
    }

    pub fn globals(&self) -> bool {
        self.globals.get()
    }

    pub fn set_globals(&self, enabled: bool) {
        self.globals.set(enabled);
    }
}

impl ScriptHost for Uizy {
    fn emit(&self, path: &str, payload: &Value) -> Result<Value, RegistryError> {
        Uizy::emit(self, path, payload)
    }

    fn store_value(&self, path: &str) -> Result<Value, RegistryError> {
        Uizy::store_value(self, path)
    }

    fn set_store(&self, path: &str, value: Value) {
        Uizy::set_store(self, path, value);
    }

    fn set_store_key(&self, path: &str, key: &str, value: Value) {
        Uizy::set_store_key(self, path, key, value);
    }

    fn use_classes(&self, paths: &Value, props: &Value) -> Result<String, RegistryError> {
        Uizy::use_classes(self, paths, props)
    }

    fn globals(&self) -> bool {
        Uizy::globals(self)
    }
}

impl fmt::Debug for Uizy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uizy")
            .field("components", &self.components)
            .field("actions", &self.actions)
            .field("stores", &self.stores)
            .field("directives", &self.directives.names())
            .field("globals", &self.globals.get())
            .field("plugins", &self.plugins.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::{style_element, BrandOptions};
    use crate::reactive::runtime::reset_runtime;
    use crate::reactive::{Atom, MapStore};
    use crate::registry::RegistryKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn app() -> Rc<Uizy> {
        reset_runtime();
        Uizy::new()
    }

    // ── use ──────────────────────────────────────────────────────────

    #[test]
    fn use_single_path_propagates_not_found() {
        let app = app();
        let err = app.use_class("nope", &Value::Null).unwrap_err();
        assert_eq!(
            err,
            RegistryError::NotFound {
                kind: RegistryKind::Component,
                path: "nope".into()
            }
        );
    }

    #[test]
    fn use_list_skips_missing_and_joins() {
        let app = app();
        app.add(
            Tree::new()
                .func("a", |_: &Value| json!("px-4 py-2"))
                .func("b", |props: &Value| json!({"lg": props["size"] == "lg", "sm": false})),
        );
        let classes = app
            .use_classes(&json!(["a", "missing", "b"]), &json!({"size": "lg"}))
            .unwrap();
        assert_eq!(classes, "px-4 py-2 lg");
    }

    #[test]
    fn use_defaults_props_to_empty_object() {
        let app = app();
        app.add(Tree::new().func("p", |props: &Value| json!(props.is_object().to_string())));
        assert_eq!(app.use_class("p", &Value::Null).unwrap(), "true");
    }

    // ── actions and stores ───────────────────────────────────────────

    #[test]
    fn emit_calls_actions() {
        let app = app();
        app.on(Tree::new().branch(
            "cart",
            Tree::new().func("total", |p: &Value| json!(p["n"].as_i64().unwrap_or(0) * 2)),
        ));
        assert_eq!(app.emit("cart.total", &json!({"n": 4})).unwrap(), json!(8));
        assert!(app.emit("cart.missing", &Value::Null).is_err());
    }

    #[test]
    fn store_shortcuts() {
        let app = app();
        let count = Atom::new(json!(0));
        let user = MapStore::new(Map::new());
        app.state(
            Tree::new()
                .store("count", count.clone())
                .store("user", user.clone())
                .constant("title", "uizy"),
        );

        assert!(app.set_store("count", json!(5)));
        assert_eq!(app.store_value("count").unwrap(), json!(5));
        assert!(app.set_store_key("user", "name", json!("ada")));
        assert_eq!(user.get_key("name"), json!("ada"));
        assert_eq!(app.store_value("title").unwrap(), json!("uizy"));

        assert!(!app.set_store("title", json!("x")));
        assert!(!app.set_store("missing", json!(1)));
        assert!(!app.set_store_key("count", "k", json!(1)));
    }

    #[test]
    fn subscribe_and_listen() {
        let app = app();
        let count = Atom::new(json!(1));
        app.state(Tree::new().store("count", count.clone()));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let sub = app.subscribe("count", move |v| s.borrow_mut().push(v.clone()));
        let changes = Rc::new(RefCell::new(0));
        let c = Rc::clone(&changes);
        let _listen = app.listen("count", move |_| *c.borrow_mut() += 1);

        count.set(json!(2));
        sub.unsubscribe();
        count.set(json!(3));
        assert_eq!(*seen.borrow(), vec![json!(1), json!(2)]);
        assert_eq!(*changes.borrow(), 2);

        let noop = app.subscribe("missing", |_| {});
        assert!(!noop.is_active());
    }

    #[test]
    fn computed_aliases() {
        let app = app();
        let first = Atom::new(json!("Ada"));
        app.state(
            Tree::new()
                .branch("user", Tree::new().store("name", first.clone()))
                .store("day", Atom::new(json!("Monday"))),
        );
        let greeting = app
            .computed([("name", "user.name"), ("day", "day")], |v| {
                json!(format!("Hello {}, it is {}", v["name"].as_str().unwrap_or(""), v["day"].as_str().unwrap_or("")))
            })
            .unwrap();
        assert_eq!(greeting.get(), json!("Hello Ada, it is Monday"));
        first.set(json!("Grace"));
        assert_eq!(greeting.get(), json!("Hello Grace, it is Monday"));
    }

    #[test]
    fn computed_fails_fast() {
        let app = app();
        let err = app
            .computed([("who", "nobody")], |_| Value::Null)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Store not found: "nobody" (alias: "who")"#
        );
    }

    // ── plugins ──────────────────────────────────────────────────────

    fn kit(app: &Rc<Uizy>, options: &Value) {
        let size = options["size"].as_str().unwrap_or("md").to_owned();
        app.plugin(
            "kit",
            PluginExports::new()
                .with_components(Tree::new().func("button", move |_: &Value| json!(format!("btn-{size}"))))
                .with_stores(Tree::new().constant("name", "kit"))
                .with_directive("hover", DirectiveFn::element(|_| Ok(()))),
        );
    }

    #[test]
    fn plugin_namespaces_exports() {
        let app = app();
        assert!(app.install(Rc::new(kit), &json!({"size": "lg"})));
        assert_eq!(app.use_class("kit.button", &Value::Null).unwrap(), "btn-lg");
        assert_eq!(app.store_value("kit.name").unwrap(), json!("kit"));
        assert!(app.directives().has("kit-hover"));
    }

    #[test]
    fn duplicate_plugins_are_skipped() {
        let app = app();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let plugin: Rc<dyn Plugin> = Rc::new(move |_: &Rc<Uizy>, _: &Value| c.set(c.get() + 1));
        assert!(app.install(Rc::clone(&plugin), &Value::Null));
        assert!(!app.install(plugin, &Value::Null));
        assert_eq!(calls.get(), 1);
    }

    // ── start ────────────────────────────────────────────────────────

    #[test]
    fn start_injects_css_and_registers() {
        let app = app();
        let doc = Document::new();
        let ready = Rc::new(Cell::new(false));
        let r = Rc::clone(&ready);
        let config = StartConfig::new()
            .with_layout(LayoutInput::default())
            .with_theme(ThemeConfig {
                brands: vec![BrandOptions::new("primary").with_back("#6b08a5")],
                ..ThemeConfig::default()
            })
            .with_components(Tree::new().func("btn", |_: &Value| json!("btn")))
            .with_globals(true)
            .on_ready(move || r.set(true));
        app.start(&doc, config);

        assert!(ready.get());
        assert!(app.globals());
        assert!(app.components().has("btn"));
        assert!(style_element(&doc, LAYOUT_STYLE_ID).is_some());
        let theme = style_element(&doc, THEME_STYLE_ID).unwrap();
        assert!(theme.text_content().starts_with(":root { "));
        assert!(theme.text_content().contains("--color-primary-back: #6b08a5;"));
        assert!(doc.is_defined("ui-box"));
    }

    #[test]
    fn empty_theme_injects_nothing() {
        let app = app();
        let doc = Document::new();
        app.start(&doc, StartConfig::new().with_theme(ThemeConfig::default()));
        assert!(style_element(&doc, THEME_STYLE_ID).is_none());
    }

    #[test]
    fn on_ready_waits_for_loading_document() {
        let app = app();
        let doc = Document::loading();
        let ready = Rc::new(Cell::new(0));
        let r = Rc::clone(&ready);
        app.init(&doc, Some(Box::new(move || r.set(r.get() + 1))));
        assert_eq!(ready.get(), 0);
        doc.finish_loading();
        doc.document_element()
            .dispatch_event(&Event::new(DOM_CONTENT_LOADED));
        assert_eq!(ready.get(), 1);
    }

    #[test]
    fn config_from_json() {
        let config = StartConfig::from_json(
            r##"{
                "layout": {"breakpoint": {"name": "md"}, "layout": {"leftMini": 70}},
                "theme": {"colors": {"primary": "#111"}},
                "globals": true
            }"##,
        )
        .unwrap();
        assert!(config.globals);
        let layout = config.layout.unwrap();
        assert_eq!(layout.breakpoint.resolved_width(), 768.0);
        assert_eq!(layout.layout.left_mini, 70.0);
        assert!(config.theme.unwrap().colors.is_some());
    }

    #[test]
    fn clear_resets_everything() {
        let app = app();
        app.add(Tree::new().func("a", |_: &Value| Value::Null));
        app.directive("d", |_: &Element, _: &DirectiveContext| Ok(()));
        app.set_globals(true);
        app.clear();
        assert!(app.components().is_empty());
        assert!(app.directives().is_empty());
        assert!(!app.globals());
    }

    #[test]
    fn package_constants() {
        assert_eq!(NAME, "uizy");
        assert!(!VERSION.is_empty());
    }
}
