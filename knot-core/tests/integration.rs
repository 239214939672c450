//! Integration Tests for the Binding Layer
//!
//! These tests bind in-memory element trees against models and check what
//! ends up rendered.

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use knot_core::host::{Element, ElementRef, MemoryElement};
use knot_core::model::Template;
use knot_core::registry::{Behaviors, Component, ComponentClass, Instance};
use knot_core::{BindError, Binder, BinderConfig, NotifyPolicy, Registry, Value, WeakBinder};

type Log = Arc<Mutex<Vec<String>>>;

fn bind(root: &MemoryElement, template: Template, registry: Registry) -> Binder {
    Binder::with_registry(root.clone(), template, registry, BinderConfig::default()).unwrap()
}

fn bound(name: &str) -> MemoryElement {
    MemoryElement::new("span").with_attribute("data-var", name)
}

fn sum_model() -> Template {
    Template::new().with("a", 1).with("b", 2).on_update(|m| {
        let sum = m.number("a") + m.number("b");
        m.set("sum", sum);
    })
}

/// Registers a component that appends `id=value,value...` to `log`.
fn logging_registry(log: &Log) -> Registry {
    let log = log.clone();
    let mut registry = Registry::new();
    registry.register_component(
        "log",
        Behaviors::new().on_update(move |element, values| {
            let id = element.attribute("id").unwrap_or_default();
            let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
            log.lock().push(format!("{id}={}", rendered.join(",")));
        }),
    );
    registry
}

/// Full scenario: `sum = a + b` renders through a default binding.
#[test]
fn sum_renders_and_follows_changes() {
    let label = bound("sum");
    let root = MemoryElement::new("div").with_child(label.clone());

    let binder = bind(&root, sum_model(), Registry::new());
    assert_eq!(label.text(), "3");

    binder.set_value("a", 4).unwrap();
    assert_eq!(label.text(), "7");
    assert_eq!(binder.get_value("sum"), Value::from(7));

    // The text holder is created once and reused
    assert_eq!(label.children().len(), 1);
    assert_eq!(label.first_child().unwrap().tag(), "span");
}

/// Two bindings on one variable fire in document order.
#[test]
fn fan_out_follows_document_order() {
    let log: Log = Arc::default();
    let root = MemoryElement::new("div")
        .with_child(bound("a").with_attribute("class", "log").with_attribute("id", "first"))
        .with_child(bound("a").with_attribute("class", "log").with_attribute("id", "second"));

    let binder = bind(&root, sum_model(), logging_registry(&log));
    assert_eq!(*log.lock(), vec!["first=1", "second=1"]);

    log.lock().clear();
    binder.set_value("a", 5).unwrap();
    assert_eq!(*log.lock(), vec!["first=5", "second=5"]);
}

/// A derived variable changes once per direct edit and its binding fires once.
#[test]
fn derived_cascade_fires_once() {
    let log: Log = Arc::default();
    let root = MemoryElement::new("div")
        .with_child(bound("sum").with_attribute("class", "log").with_attribute("id", "sum"));

    let binder = bind(&root, sum_model(), logging_registry(&log));
    log.lock().clear();

    binder.set_value("a", 5).unwrap();
    assert_eq!(*log.lock(), vec!["sum=7"]);
}

/// Setting the current value is a no-op for the view and the model.
#[test]
fn unchanged_value_is_suppressed() {
    let log: Log = Arc::default();
    let updates = Arc::new(AtomicUsize::new(0));
    let updates_clone = updates.clone();
    let template = sum_model().on_update(move |m| {
        updates_clone.fetch_add(1, Ordering::SeqCst);
        let sum = m.number("a") + m.number("b");
        m.set("sum", sum);
    });
    let root = MemoryElement::new("div")
        .with_child(bound("a").with_attribute("class", "log").with_attribute("id", "a"));

    let binder = bind(&root, template, logging_registry(&log));
    log.lock().clear();
    let before = updates.load(Ordering::SeqCst);

    binder.set_value("a", 1).unwrap();
    binder.set_values([("a", 1), ("b", 2)]).unwrap();

    assert!(log.lock().is_empty());
    assert_eq!(updates.load(Ordering::SeqCst), before);
}

/// A batch naming an unknown variable changes nothing.
#[test]
fn unknown_variable_discards_batch() {
    let label = bound("a");
    let sum = bound("sum");
    let root = MemoryElement::new("div")
        .with_child(label.clone())
        .with_child(sum.clone());
    let binder = bind(&root, sum_model(), Registry::new());

    let result = binder.set_values([("a", Value::from(1000)), ("cookies", Value::from(2))]);

    assert!(matches!(result, Err(BindError::UnknownVariable(name)) if name == "cookies"));
    assert_eq!(binder.get_value("a"), Value::from(1));
    assert_eq!(label.text(), "1");
    assert_eq!(sum.text(), "3");
}

/// Unknown reads fall back to zero.
#[test]
fn unknown_read_is_zero() {
    let binder = bind(&MemoryElement::new("div"), sum_model(), Registry::new());
    assert_eq!(binder.get_value("nope"), Value::from(0));
    assert_eq!(binder.value("nope"), None);
}

fn pair_registry(log: &Log) -> Registry {
    let mut registry = logging_registry(log);
    let pair_log = log.clone();
    registry.register_component(
        "pair",
        Behaviors::new().on_update(move |_, values| {
            let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
            pair_log.lock().push(rendered.join(".."));
        }),
    );
    registry
}

fn pair_root() -> MemoryElement {
    MemoryElement::new("div").with_child(bound("a b").with_attribute("class", "pair"))
}

/// A binding over `a b` sees both committed values whichever one changed.
#[test]
fn multi_variable_binding_reads_through() {
    let log: Log = Arc::default();
    let binder = bind(&pair_root(), sum_model(), pair_registry(&log));
    log.lock().clear();

    binder.set_value("b", 9).unwrap();
    assert_eq!(*log.lock(), vec!["1..9"]);

    log.lock().clear();
    binder.set_value("a", 4).unwrap();
    assert_eq!(*log.lock(), vec!["4..9"]);
}

/// Default policy: one notification per pass even if both variables change.
#[test]
fn coalesce_policy_notifies_once_per_pass() {
    let log: Log = Arc::default();
    let binder = bind(&pair_root(), sum_model(), pair_registry(&log));
    // Initial render also coalesces `a` and `b`
    assert_eq!(*log.lock(), vec!["1..2"]);

    log.lock().clear();
    binder.set_values([("a", 10), ("b", 20)]).unwrap();
    assert_eq!(*log.lock(), vec!["10..20"]);
}

/// Legacy policy: one notification per changed variable.
#[test]
fn per_variable_policy_repeats_notifications() {
    let log: Log = Arc::default();
    let config = BinderConfig {
        notify: NotifyPolicy::PerVariable,
        ..BinderConfig::default()
    };
    let binder = Binder::with_registry(pair_root(), sum_model(), pair_registry(&log), config).unwrap();
    assert_eq!(*log.lock(), vec!["1..2", "1..2"]);

    log.lock().clear();
    binder.set_values([("a", 10), ("b", 20)]).unwrap();
    // Both calls already see the whole batch
    assert_eq!(*log.lock(), vec!["10..20", "10..20"]);
}

thread_local! {
    static STEPPERS: RefCell<Vec<(WeakBinder, Vec<String>)>> = RefCell::new(Vec::new());
}

struct Stepper;

impl Component for Stepper {
    fn update(&self, element: &ElementRef, values: &[Value]) {
        element.set_content(&format!("[{}]", values[0]));
    }
}

fn stepper_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_component(
        "stepper",
        ComponentClass::constructor(|_, binder, names| {
            STEPPERS.with(|steppers| {
                steppers
                    .borrow_mut()
                    .push((binder.downgrade(), names.to_vec()));
            });
            Instance::view(Stepper)
        }),
    );
    registry
}

/// A component pushes an edit back into the model.
#[test]
fn component_writes_back_into_model() {
    let stepper = bound("cookies").with_attribute("class", "stepper");
    let calories = bound("calories");
    let root = MemoryElement::new("p")
        .with_child(stepper.clone())
        .with_child(calories.clone());
    let template = Template::new().with("cookies", 3).on_update(|m| {
        let calories = m.number("cookies") * 50.0;
        m.set("calories", calories);
    });

    let binder = bind(&root, template, stepper_registry());
    assert_eq!(stepper.text(), "[3]");
    assert_eq!(calories.text(), "150");

    // Simulate the user clicking "+"
    let (handle, names) = STEPPERS.with(|steppers| steppers.borrow()[0].clone());
    let next = handle.value(&names[0]).unwrap().to_number() + 1.0;
    handle.set_value(&names[0], next).unwrap();

    assert_eq!(stepper.text(), "[4]");
    assert_eq!(calories.text(), "200");
    assert_eq!(binder.get_value("cookies"), Value::from(4));

    drop(binder);
    assert!(matches!(handle.set_value("cookies", 1), Err(BindError::Detached)));
}

/// Constructors receive every bound name, however many there are.
#[test]
fn constructor_receives_all_names() {
    let arities = Arc::new(Mutex::new(Vec::new()));
    let arities_clone = arities.clone();
    let mut registry = Registry::new();
    registry.register_component(
        "swatch",
        ComponentClass::constructor(move |_, _, names| {
            arities_clone.lock().push(names.len());
            Instance::view(Swatch)
        }),
    );

    let swatch = bound("r g b").with_attribute("class", "swatch");
    let root = MemoryElement::new("div")
        .with_child(swatch.clone())
        .with_child(MemoryElement::new("i").with_attribute("class", "swatch"));
    let template = Template::new().with("r", 255).with("g", 128).with("b", 0);

    let binder = bind(&root, template, registry);

    assert_eq!(*arities.lock(), vec![3, 0]);
    assert_eq!(swatch.text(), "rgb(255, 128, 0)");
    assert_eq!(binder.binding_count("g"), 1);
}

struct Swatch;

impl Component for Swatch {
    fn update(&self, element: &ElementRef, values: &[Value]) {
        let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
        element.set_content(&format!("rgb({})", parts.join(", ")));
    }
}

/// A component without `update` still runs `initialize` but leaves the
/// element to the default binding.
#[test]
fn inert_component_falls_back_to_default_binding() {
    let initialized = Arc::new(AtomicUsize::new(0));
    let initialized_clone = initialized.clone();
    let mut registry = Registry::new();
    registry.register_component(
        "decor",
        Behaviors::new().on_initialize(move |_, _, _| {
            initialized_clone.fetch_add(1, Ordering::SeqCst);
        }),
    );

    let label = bound("sum").with_attribute("class", "decor unknown-token");
    let root = MemoryElement::new("div")
        .with_child(label.clone())
        .with_child(MemoryElement::new("hr").with_attribute("class", "decor"));

    let binder = bind(&root, sum_model(), registry);

    assert_eq!(initialized.load(Ordering::SeqCst), 2);
    assert_eq!(label.text(), "3");
    assert_eq!(
        binder.scan_report(),
        knot_core::ScanReport {
            elements: 2,
            components: 2,
            bindings: 1,
        }
    );
}

/// Elements inserted during component initialization do not disturb the walk.
#[test]
fn scan_walks_a_snapshot() {
    let mut registry = Registry::new();
    registry.register_component(
        "framed",
        Behaviors::new().on_initialize(|element, _, _| {
            element.prepend_child("i");
            element.prepend_child("i");
        }),
    );

    let framed = MemoryElement::new("div").with_attribute("class", "framed");
    let label = bound("sum");
    let root = MemoryElement::new("div")
        .with_child(framed.clone())
        .with_child(label.clone());

    let binder = bind(&root, sum_model(), registry);

    assert_eq!(framed.children().len(), 2);
    assert_eq!(label.text(), "3");
    assert_eq!(binder.scan_report().elements, 2);
}

/// Format attribute: named formatter, printf pattern, unknown name.
#[test]
fn format_attribute_selects_formatter() {
    let mut registry = Registry::new();
    registry
        .register_formatter("dollars", |value: &Value| format!("${:.2}", value.to_number()))
        .set_printf(Arc::new(|pattern: &str, value: &Value| {
            pattern.replace("%s", &value.to_string())
        }));

    let money = bound("a").with_attribute("data-format", "dollars");
    let pattern = bound("b").with_attribute("data-format", "%s cookies");
    let unknown = bound("sum").with_attribute("data-format", "mystery");
    let empty = bound("sum").with_attribute("data-format", "");
    let root = MemoryElement::new("div")
        .with_child(money.clone())
        .with_child(pattern.clone())
        .with_child(unknown.clone())
        .with_child(empty.clone());

    let binder = bind(&root, sum_model(), registry);
    assert_eq!(money.text(), "$1.00");
    assert_eq!(pattern.text(), "2 cookies");
    assert_eq!(unknown.text(), "3");
    assert_eq!(empty.text(), "3");

    binder.set_value("b", 12).unwrap();
    assert_eq!(pattern.text(), "12 cookies");
}

/// Default bindings only follow the first listed variable.
#[test]
fn default_binding_uses_first_name() {
    let label = bound("a b");
    let root = MemoryElement::new("div").with_child(label.clone());
    let binder = bind(&root, sum_model(), Registry::new());

    assert_eq!(label.text(), "1");
    binder.set_value("b", 30).unwrap();
    assert_eq!(label.text(), "1");
    assert_eq!(binder.binding_count("b"), 0);
}

/// Replacing the model re-renders every binding.
#[test]
fn set_model_rerenders_bindings() {
    let sum = bound("sum");
    let a = bound("a");
    let root = MemoryElement::new("div")
        .with_child(sum.clone())
        .with_child(a.clone());
    let binder = bind(&root, sum_model(), Registry::new());

    binder
        .set_model(Template::new().with("a", 10).with("b", 5).on_update(|m| {
            let product = m.number("a") * m.number("b");
            m.set("sum", product);
        }))
        .unwrap();

    assert_eq!(sum.text(), "50");
    assert_eq!(a.text(), "10");
}

/// Models loaded from JSON expose their state back as JSON.
#[test]
fn json_round_trip_of_state() {
    let template = Template::from_json(r#"{"width": 3, "height": 4}"#)
        .unwrap()
        .on_update(|m| {
            let area = m.number("width") * m.number("height");
            m.set("area", area);
        });
    let binder = bind(&MemoryElement::new("div"), template, Registry::new());

    assert_eq!(binder.variable_names(), vec!["width", "height", "area"]);
    assert_eq!(binder.to_json().unwrap(), r#"{"width":3.0,"height":4.0,"area":12.0}"#);
}

/// `Binder::new` reads components and formatters from the global registry.
#[test]
fn new_uses_global_registry() {
    Registry::global()
        .write()
        .register_formatter("integration-shout", |value: &Value| {
            format!("{}!", value.to_string().to_uppercase())
        });

    let label = bound("word").with_attribute("data-format", "integration-shout");
    let root = MemoryElement::new("div").with_child(label.clone());
    let _binder = Binder::new(root, Template::new().with("word", "hello"));

    assert_eq!(label.text(), "HELLO!");
}

/// A configuration that could never run an update is refused up front.
#[test]
fn zero_depth_config_is_refused() {
    let label = bound("sum");
    let root = MemoryElement::new("div").with_child(label.clone());
    let config = BinderConfig {
        max_depth: 0,
        ..BinderConfig::default()
    };

    let result = Binder::with_registry(root, sum_model(), Registry::new(), config);

    assert!(matches!(
        result,
        Err(BindError::InvalidSetting { name: "max_depth", .. })
    ));
    assert!(label.children().is_empty());
}
