//! Integration tests for uizy.
//!
//! These tests drive the public API from outside the crate: registries
//! through the `Uizy` context, CSS generation and injection, the shell
//! elements, and `ui-box` bindings mounted through the headless `Pilot`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use uizy::app::{PluginExports, StartConfig, Uizy};
use uizy::css::{
    generate_layout_css, inject_css, BreakpointConfig, LayoutInput, STYLE_ATTR,
};
use uizy::dom::{Document, Element};
use uizy::elements::{action, ActionPayload, Cleanup};
use uizy::reactive::{Atom, MapStore, Store};
use uizy::registry::{
    resolve, CallOptions, Callable, DirectiveContext, DirectiveFn, Registry, RegistryError,
    RegistryKind, Tree,
};
use uizy::testing::{outline, Pilot};

fn constant(value: Value) -> Callable {
    Callable::new(move |_: &Value| value.clone())
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

#[test]
fn test_add_is_a_shallow_merge() {
    let components = Registry::components();
    components.add(Tree::new().branch("a", Tree::new().leaf("b", constant(json!(1)))));
    components.add(Tree::new().branch("a", Tree::new().leaf("c", constant(json!(2)))));

    let tree = components.tree();
    assert!(resolve(&tree, "a.b").is_none());
    assert!(resolve(&tree, "a.c").is_some());
    assert!(!components.has("a.b"));
    assert_eq!(
        components.call("a.c", &Value::Null, CallOptions::default()),
        Ok(Some(json!(2)))
    );
}

#[test]
fn test_resolution_is_stable_between_writes() {
    let actions = Registry::actions();
    actions.add(Tree::new().branch("x", Tree::new().func("y", |_: &Value| json!("y"))));
    let first = actions.call("x.y", &Value::Null, CallOptions::default());
    let second = actions.call("x.y", &Value::Null, CallOptions::default());
    assert_eq!(first, second);
    assert_eq!(actions.paths(), vec!["x.y"]);
}

#[test]
fn test_silent_calls_never_fail() {
    let app = Uizy::new();
    for path in ["", "a", "a.b.c", "..", "a..b"] {
        assert_eq!(
            app.components().call(path, &Value::Null, CallOptions::silent()),
            Ok(None)
        );
    }
    let err = app
        .actions()
        .call("missing.path", &Value::Null, CallOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), RegistryKind::Action);
    assert_eq!(err.to_string(), r#"Action not found: "missing.path""#);
    assert!(matches!(
        app.store_value("nope"),
        Err(RegistryError::NotFound {
            kind: RegistryKind::Store,
            ..
        })
    ));
}

#[test]
fn test_component_results_normalize() {
    let app = Uizy::new();
    app.add(
        Tree::new()
            .leaf("str", constant(json!("solo")))
            .leaf("list", constant(json!(["a", "b"])))
            .leaf("flags", constant(json!({"x": true, "y": false}))),
    );
    assert_eq!(app.use_class("str", &Value::Null).unwrap(), "solo");
    assert_eq!(app.use_class("list", &Value::Null).unwrap(), "a b");
    assert_eq!(app.use_class("flags", &Value::Null).unwrap(), "x");
}

#[test]
fn test_store_constants_and_handles() {
    let app = Uizy::new();
    let theme = Atom::new(json!("dark"));
    app.state(
        Tree::new()
            .store("theme", theme.clone())
            .constant("version", 3),
    );
    assert_eq!(app.store_value("theme").unwrap(), json!("dark"));
    assert_eq!(app.store_value("version").unwrap(), json!(3));
    assert!(app.stores().handle("theme").is_some());
    assert!(app.stores().handle("version").is_none());
    assert_eq!(app.stores().paths(), vec!["theme"]);
}

// ---------------------------------------------------------------------------
// CSS
// ---------------------------------------------------------------------------

#[test]
fn test_breakpoint_name_and_width() {
    let named = LayoutInput {
        breakpoint: BreakpointConfig {
            name: "md".into(),
            ..BreakpointConfig::default()
        },
        ..LayoutInput::default()
    };
    assert!(generate_layout_css(&named).contains("@media (max-width: 768px)"));

    let sized = LayoutInput {
        breakpoint: BreakpointConfig {
            width: 900.0,
            ..BreakpointConfig::default()
        },
        ..LayoutInput::default()
    };
    assert!(generate_layout_css(&sized).contains("@media (max-width: 900px)"));
}

#[test]
fn test_default_layout_variables() {
    let css = generate_layout_css(&LayoutInput::default());
    assert!(css.contains("--uizy-header-height: 56px;"));
    assert!(css.contains("--uizy-drawer-speed: 0.2s;"));
}

#[test]
fn test_inject_css_replaces_by_id() {
    let doc = Document::new();
    inject_css(&doc, "a{color:red}", "x");
    inject_css(&doc, "b {\n  color: blue;\n}", "x");

    let styles = doc
        .query_selector_all(&format!("style[{STYLE_ATTR}=\"x\"]"))
        .unwrap();
    assert_eq!(styles.len(), 1);
    assert_eq!(styles[0].text_content(), "b { color: blue;}");
}

// ---------------------------------------------------------------------------
// Shell elements
// ---------------------------------------------------------------------------

#[test]
fn test_right_mini_drawer_classes() {
    let pilot = Pilot::new();
    let drawer = pilot.mount("uizy-drawer", &[("right", ""), ("mini", "")]);
    let classes = pilot.classes(&drawer);
    for expected in ["uizy-right", "uizy-drawer--right", "uizy-right--mini"] {
        assert!(classes.contains(&expected.to_owned()), "missing {expected}");
    }
    assert!(!classes.contains(&"uizy-drawer--open".to_owned()));
}

fn shell(pilot: &Pilot) -> Element {
    let app = pilot.mount("uizy-app", &[]);
    pilot.mount_into(&app, "uizy-system-bar", &[("shadow", "1")]);
    pilot.mount_into(&app, "uizy-header", &[("shadow", "2")]);
    pilot.mount_into(&app, "uizy-drawer", &[("id", "nav"), ("shadow", "3"), ("open", "")]);
    pilot.mount_into(&app, "uizy-drawer", &[("right", ""), ("mini", "")]);
    pilot.mount_into(&app, "uizy-main", &[("clip-top", ""), ("clip-left", "")]);
    pilot.mount_into(&app, "uizy-overlay", &[]);
    pilot.mount_into(&app, "uizy-footer", &[]);
    app
}

#[test]
fn test_shell_outline() {
    let pilot = Pilot::new();
    let app = shell(&pilot);
    insta::assert_snapshot!(outline(&app), @r"
    uizy-app
      uizy-system-bar .uizy-system-bar .sb-1
      uizy-header .d-flex .dx-sb .uizy-header .sb-2
      uizy-drawer #nav .d-flex .df-col .uizy-drawer .uizy-left .uizy-drawer--left .sr-3 .uizy-drawer--open
      uizy-drawer .d-flex .df-col .uizy-drawer .uizy-right .uizy-drawer--right .uizy-right--mini
      uizy-main .uizy-main .uizy-clip-top .uizy-clip-left
      uizy-overlay .uizy-overlay-mask
      uizy-footer .uizy-footer
    ");
}

#[test]
fn test_overlay_action() {
    let pilot = Pilot::new();
    let app = shell(&pilot);
    let overlay = pilot.document().query_selector("uizy-overlay").unwrap().unwrap();
    assert_eq!(overlay.style().get("display").as_deref(), Some("none"));

    assert!(action(&app, "overlay", |p: &ActionPayload| p.set(Some(true))));
    assert_eq!(overlay.style().get("display").as_deref(), Some("block"));
    assert!(!overlay.class_list().contains("full"));

    action(&app, "overlay", |p| p.set(Some(false)));
    assert_eq!(overlay.style().get("display").as_deref(), Some("none"));

    action(&app, "overlay", |p| p.set_full(Some(true), true));
    assert_eq!(overlay.style().get("display").as_deref(), Some("block"));
    assert!(overlay.class_list().contains("full"));
}

#[test]
fn test_drawer_actions() {
    let pilot = Pilot::new();
    let app = shell(&pilot);
    let nav = pilot.document().get_element_by_id("nav").unwrap();

    action(&app, "left", |p| p.set(None));
    assert!(!nav.class_list().contains("uizy-drawer--open"));
    action(&app, "left", |p| p.set(Some(true)));
    assert!(nav.class_list().contains("uizy-drawer--open"));

    let mini = pilot.document().query_selector("uizy-drawer[mini]").unwrap().unwrap();
    action(&app, "right.mini", |p| p.set(Some(true)));
    assert!(mini.class_list().contains("uizy-drawer--open"));
}

#[test]
fn test_missing_chrome_is_ignored() {
    let pilot = Pilot::new();
    let app = pilot.mount("uizy-app", &[]);
    let ran = Cell::new(false);
    assert!(!action(&app, "overlay", |_| ran.set(true)));
    assert!(!action(&app, "nonsense", |_| ran.set(true)));
    assert!(!action(&app, "header", |_| ran.set(true)));
    assert!(!ran.get());
}

#[test]
fn test_app_index_is_built_once() {
    let pilot = Pilot::new();
    let app = pilot.mount("uizy-app", &[]);
    assert!(!action(&app, "overlay", |_| {}));
    pilot.mount_into(&app, "uizy-overlay", &[]);
    assert!(!action(&app, "overlay", |_| {}));
}

// ---------------------------------------------------------------------------
// ui-box
// ---------------------------------------------------------------------------

#[test]
fn test_click_binding_is_removed_on_detach() {
    let pilot = Pilot::new();
    let el = pilot.mount("ui-box", &[(":click", "el.textContent='x'")]);
    pilot.click(&el);
    assert_eq!(el.text_content(), "x");

    el.set_text_content("");
    pilot.unmount(&el);
    pilot.click(&el);
    assert_eq!(el.text_content(), "");
}

#[test]
fn test_text_binding_tracks_store() {
    let count = Atom::new(json!(0));
    let pilot = Pilot::start(StartConfig::new().with_stores(Tree::new().store("count", count.clone())));
    let el = pilot.mount("ui-box", &[("u-text", "count")]);
    assert_eq!(el.text_content(), "0");
    count.set(json!(41));
    assert_eq!(el.text_content(), "41");
}

#[test]
fn test_handlers_reach_actions_and_stores() {
    let user = MapStore::new(serde_json::Map::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = Rc::clone(&log);
    let pilot = Pilot::start(
        StartConfig::new()
            .with_stores(Tree::new().store("user", user.clone()))
            .with_actions(Tree::new().func("track", move |p: &Value| {
                l.borrow_mut().push(p.clone());
                Value::Null
            })),
    );
    let el = pilot.mount(
        "ui-box",
        &[(
            ":input",
            "uizy.$key('user', 'name', event.detail); uizy.emit('track', {name: event.detail})",
        )],
    );
    pilot.dispatch(&el, "input", json!("ada"));
    assert_eq!(user.get_key("name"), json!("ada"));
    assert_eq!(*log.borrow(), vec![json!({"name": "ada"})]);
}

#[test]
fn test_events_bubble_to_boxes() {
    let pilot = Pilot::new();
    let outer = pilot.mount("ui-box", &[(":click", "el.className = 'seen ' + event.target.tagName")]);
    let inner = pilot.mount_into(&outer, "span", &[]);
    pilot.click(&inner);
    assert_eq!(pilot.classes(&outer), vec!["seen", "SPAN"]);
}

#[test]
fn test_use_with_props_from_start() {
    let pilot = Pilot::start(StartConfig::new().with_components(Tree::new().branch(
        "button",
        Tree::new()
            .func("base", |_: &Value| json!("px-4 py-2"))
            .func("size", |p: &Value| json!({"text-lg": p["size"] == "lg"})),
    )));
    let el = pilot.mount(
        "ui-box",
        &[("use", "button.base button.size"), ("use:props", "{size: 'lg'}")],
    );
    assert_eq!(pilot.classes(&el), vec!["px-4", "py-2", "text-lg"]);
}

#[test]
fn test_plugin_directive_with_cleanup() {
    let cleaned = Rc::new(Cell::new(0));
    let c = Rc::clone(&cleaned);
    let plugin = move |app: &Rc<Uizy>, _: &Value| {
        let c = Rc::clone(&c);
        app.plugin(
            "ui",
            PluginExports::new().with_directive(
                "focus",
                DirectiveFn::full(move |el: &Element, ctx: &DirectiveContext| {
                    el.set_attribute("data-focus", ctx.value());
                    let c = Rc::clone(&c);
                    ctx.effect(|| {
                        let cleanup: Cleanup = Box::new(move || c.set(c.get() + 1));
                        Some(cleanup)
                    });
                    Ok(())
                }),
            ),
        );
    };
    let pilot = Pilot::start(StartConfig::new().plugin(Rc::new(plugin), Value::Null));
    let el = pilot.mount("ui-box", &[(":ui-focus", "ring")]);
    assert_eq!(el.get_attribute("data-focus").as_deref(), Some("ring"));

    pilot.unmount(&el);
    pilot.unmount(&el);
    assert_eq!(cleaned.get(), 1);
}

#[test]
fn test_globals_gate_shortcuts() {
    let pilot = Pilot::start(
        StartConfig::new()
            .with_globals(true)
            .with_stores(Tree::new().constant("greeting", "hi")),
    );
    let el = pilot.mount("ui-box", &[(":click", "el.textContent = $('greeting')")]);
    pilot.click(&el);
    assert_eq!(el.text_content(), "hi");

    let quiet = Pilot::start(StartConfig::new().with_stores(Tree::new().constant("greeting", "hi")));
    let el = quiet.mount("ui-box", &[(":click", "el.textContent = $('greeting')")]);
    quiet.click(&el);
    assert_eq!(el.text_content(), "");
}

#[test]
fn test_start_styles() {
    let pilot = Pilot::start(
        StartConfig::from_json(
            r##"{"layout": {"layout": {"header": 64}}, "theme": {"colors": {"primary": "#111"}}}"##,
        )
        .unwrap(),
    );
    let layout = pilot.style_text("main").unwrap();
    assert!(layout.contains("--uizy-header-height: 64px;"));
    let theme = pilot.style_text("theme").unwrap();
    assert!(theme.contains("--color-primary: #111;"));
}
