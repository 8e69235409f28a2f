#![forbid(unsafe_code)]

//! End-to-end binding scenarios: model writes reach the view, input events
//! reach the model, and event directives reach their methods.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fbind::prelude::*;
use fbind_harness::{DomEvent, MemoryDom, NodeId, assert_html};
use serde_json::json;
use tracing_test::traced_test;

fn mount(
    markup: &str,
    options: ViewModelOptions<MemoryDom>,
) -> (Rc<MemoryDom>, ViewModel<MemoryDom>) {
    let dom = Rc::new(MemoryDom::from_markup(&format!("<div id=\"app\">{markup}</div>")));
    let vm = ViewModel::new(Rc::clone(&dom), options.mount("#app")).unwrap();
    (dom, vm)
}

fn node(dom: &MemoryDom, selector: &str) -> NodeId {
    dom.query_selector(selector).unwrap()
}

// ============================================================================
// Counter: text interpolation plus v-model on the same key
// ============================================================================

#[test]
fn counter_initial_render() {
    let (dom, _vm) = mount(
        "<span>{{count}}</span><input v-model=\"count\">",
        ViewModelOptions::<MemoryDom>::new().data(json!({"count": 0})),
    );
    assert_eq!(dom.text_content(&node(&dom, "span")), "0");
    assert_eq!(dom.input_value(&node(&dom, "input")), "0");
}

#[test]
fn counter_model_write_updates_both_views() {
    let (dom, vm) = mount(
        "<span>{{count}}</span><input v-model=\"count\">",
        ViewModelOptions::<MemoryDom>::new().data(json!({"count": 0})),
    );
    vm.set("count", 5).unwrap();
    assert_eq!(dom.text_content(&node(&dom, "span")), "5");
    assert_eq!(dom.input_value(&node(&dom, "input")), "5");
}

#[test]
fn counter_input_event_writes_string_without_coercion() {
    let (dom, vm) = mount(
        "<span>{{count}}</span><input v-model=\"count\">",
        ViewModelOptions::<MemoryDom>::new().data(json!({"count": 0})),
    );
    dom.type_into(node(&dom, "input"), "7").unwrap();
    assert_eq!(vm.get("count").unwrap(), Value::from("7"));
    assert_ne!(vm.get("count").unwrap(), Value::from(7));
    assert_eq!(dom.text_content(&node(&dom, "span")), "7");
}

// ============================================================================
// Interpolation re-renders the whole string
// ============================================================================

#[test]
fn updating_one_placeholder_rewrites_the_full_string() {
    let (dom, vm) = mount(
        "<p>{{a}} - {{b}}</p>",
        ViewModelOptions::<MemoryDom>::new().data(json!({"a": "x", "b": "y"})),
    );
    let p = node(&dom, "p");
    assert_eq!(dom.text_content(&p), "x - y");

    vm.set("a", "z").unwrap();
    assert_eq!(dom.text_content(&p), "z - y");

    vm.data().write("b", "w").unwrap();
    assert_eq!(dom.text_content(&p), "z - w");
}

#[test]
fn nested_paths_and_intermediate_replacement() {
    let (dom, vm) = mount(
        "<p>{{ person.name }} ({{person.age}})</p>",
        ViewModelOptions::<MemoryDom>::new().data(json!({"person": {"name": "Ada", "age": 36}})),
    );
    let p = node(&dom, "p");
    assert_eq!(dom.text_content(&p), "Ada (36)");

    vm.write_path("person.age", 37).unwrap();
    assert_eq!(dom.text_content(&p), "Ada (37)");

    vm.set("person", json!({"name": "Grace", "age": 85})).unwrap();
    assert_eq!(dom.text_content(&p), "Grace (85)");

    // Subscriptions are taken on the first read only; the replacement
    // mapping's cells have no subscribers.
    vm.write_path("person.name", "Lin").unwrap();
    assert_eq!(dom.text_content(&p), "Grace (85)");
    assert_eq!(vm.read_path("person.name").unwrap(), Value::from("Lin"));
}

#[test]
fn sequence_index_binding() {
    let (dom, vm) = mount(
        "<p>{{items.1}}/{{items.length}}</p>",
        ViewModelOptions::<MemoryDom>::new().data(json!({"items": ["a", "b"]})),
    );
    let p = node(&dom, "p");
    assert_eq!(dom.text_content(&p), "b/2");

    vm.write_path("items.1", "c").unwrap();
    assert_eq!(dom.text_content(&p), "c/2");

    // Appends are not observed.
    vm.write_path("items.2", "d").unwrap();
    assert_eq!(dom.text_content(&p), "c/2");
    assert_eq!(vm.read_path("items.length").unwrap(), Value::from(3));
}

#[test]
fn blank_placeholder_reads_the_empty_key() {
    let (dom, vm) = mount(
        "<p>{{n}} [{{ }}]</p><p>{{a..b}}</p>",
        ViewModelOptions::<MemoryDom>::new().data(json!({"n": 1, "a": {"": {"b": "deep"}}})),
    );
    let first = node(&dom, "p");
    assert_eq!(dom.text_content(&first), "1 []");
    assert_eq!(dom.text_content(&node(&dom, "#app")), "1 []deep");

    vm.set("n", 2).unwrap();
    assert_eq!(dom.text_content(&first), "2 []");
    vm.write_path("a..b", "deeper").unwrap();
    assert_eq!(dom.text_content(&node(&dom, "#app")), "2 []deeper");
}

// ============================================================================
// html / bind
// ============================================================================

#[test]
fn html_and_attribute_bindings() {
    let (dom, vm) = mount(
        "<div v-html=\"body\"></div><a :href=\"url\" v-bind:class=\"kind\">link</a>",
        ViewModelOptions::<MemoryDom>::new().data(json!({
            "body": "<em>hi</em>",
            "url": "/home",
            "kind": "primary",
        })),
    );
    assert_html!(
        dom,
        node(&dom, "#app"),
        "<div id=\"app\"><div><em>hi</em></div><a href=\"/home\" class=\"primary\">link</a></div>"
    );

    vm.set("url", "/away").unwrap();
    vm.set("body", "<b>bye</b>").unwrap();
    assert_eq!(dom.attribute(&node(&dom, "a"), "href").as_deref(), Some("/away"));
    assert_eq!(dom.text_content(&node(&dom, "b")), "bye");
}

// ============================================================================
// Event directives
// ============================================================================

#[test]
fn missing_method_faults_at_bind_time() {
    let dom = Rc::new(MemoryDom::from_markup(
        "<div id=\"app\"><button v-on:click=\"save\">save</button></div>",
    ));
    let err = ViewModel::new(dom, ViewModelOptions::<MemoryDom>::new().mount("#app")).unwrap_err();
    assert_eq!(err, BindError::MissingHandler("save".into()));
}

#[test]
fn method_receives_the_view_model() {
    let seen: Rc<RefCell<Option<ViewModel<MemoryDom>>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let (dom, vm) = mount(
        "<button @click=\"save\">save</button><span>{{saved}}</span>",
        ViewModelOptions::<MemoryDom>::new()
            .data(json!({"saved": false}))
            .method("save", move |vm, _event| {
                *sink.borrow_mut() = Some(vm.clone());
                vm.set("saved", true)
            }),
    );

    dom.click(node(&dom, "button")).unwrap();
    assert!(seen.borrow().as_ref().is_some_and(|got| got.ptr_eq(&vm)));
    assert_eq!(dom.text_content(&node(&dom, "span")), "true");
}

#[test]
fn method_errors_abort_dispatch() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let (dom, _vm) = mount(
        "<button @click=\"fail\" v-on:click=\"count\"></button>",
        ViewModelOptions::<MemoryDom>::new()
            .method("fail", |_, _| Err(BindError::Handler("nope".into())))
            .method("count", move |_, _| {
                counter.set(counter.get() + 1);
                Ok(())
            }),
    );
    let err = dom.click(node(&dom, "button")).unwrap_err();
    assert_eq!(err, BindError::Handler("nope".into()));
    assert_eq!(calls.get(), 0);
}

#[test]
fn custom_events_reach_methods() {
    let (dom, vm) = mount(
        "<input @change=\"commit\">",
        ViewModelOptions::<MemoryDom>::new()
            .data(json!({"last": null}))
            .method("commit", |vm, event: &DomEvent| {
                vm.set("last", event.value().unwrap_or_default())
            }),
    );
    dom.dispatch(node(&dom, "input"), &DomEvent::input("typed")).unwrap();
    assert_eq!(vm.get("last").unwrap(), Value::Null);

    let change = DomEvent::new("change");
    dom.dispatch(node(&dom, "input"), &change).unwrap();
    assert_eq!(vm.get("last").unwrap(), Value::from(""));
}

// ============================================================================
// Faults and configuration
// ============================================================================

#[test]
fn path_fault_in_update_aborts_the_write() {
    let (dom, vm) = mount(
        "<p>{{a.b}}</p><span>{{a}}</span>",
        ViewModelOptions::<MemoryDom>::new().data(json!({"a": {"b": 1}})),
    );
    let err = vm.set("a", 3).unwrap_err();
    assert!(matches!(err, BindError::PathResolution { .. }));
    // The write itself happened; the later effect on `a` never ran.
    assert_eq!(vm.get("a").unwrap(), Value::from(3));
    assert_eq!(dom.text_content(&node(&dom, "p")), "1");
}

#[test]
fn equality_gating_is_applied_from_config() {
    let config = EngineConfig {
        equality_gating: true,
        ..EngineConfig::default()
    };
    let (dom, vm) = mount(
        "<p>{{a}} {{b}}</p>",
        ViewModelOptions::<MemoryDom>::new().data(json!({"a": 1, "b": 2})).config(config),
    );
    let p = node(&dom, "p");
    vm.set("a", 3).unwrap();
    assert_eq!(dom.text_content(&p), "3 2");
    vm.set("b", 2).unwrap();
    assert_eq!(dom.text_content(&p), "3 2");
    assert_eq!(vm.effect_count(), 2);
    assert!(vm.config().equality_gating);
}

#[test]
fn config_loads_from_toml() {
    let config = EngineConfig::from_toml_str("proxy_data = false").unwrap();
    let (_dom, vm) = mount(
        "{{n}}",
        ViewModelOptions::<MemoryDom>::new().data(json!({"n": 1})).config(config),
    );
    assert_eq!(vm.get("n"), Err(BindError::UnknownProperty("n".into())));
    assert_eq!(vm.read_path("n").unwrap(), Value::from(1));
}

#[test]
#[traced_test]
fn mount_is_traced() {
    let (_dom, vm) = mount(
        "<p :title=\"t\">{{t}}</p>",
        ViewModelOptions::<MemoryDom>::new().data(json!({"t": "x"})),
    );
    assert_eq!(vm.effect_count(), 2);
    assert!(logs_contain("view_model_mount"));
    assert!(logs_contain("view model mounted"));
    assert!(logs_contain("template compiled"));
}
