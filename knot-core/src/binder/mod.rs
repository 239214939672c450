//! Binder
//!
//! The binder ties a model to a markup subtree. It owns the variable store
//! and the setter table, and it is the only way values move between the
//! model and the view:
//!
//! - model → view: every variable change is dispatched to the setters bound
//!   to it, which render into their elements;
//! - view → model: components call [`Binder::set_value`] (usually through a
//!   [`WeakBinder`] they kept from `initialize`), which updates the store,
//!   re-derives the model and dispatches whatever changed as a result.
//!
//! # Example
//!
//! ```rust
//! use knot_core::{Binder, host::MemoryElement, model::Template};
//!
//! let label = MemoryElement::new("span").with_attribute("data-var", "sum");
//! let root = MemoryElement::new("div").with_child(label.clone());
//!
//! let binder = Binder::new(
//!     root,
//!     Template::new().with("a", 1).with("b", 2).on_update(|m| {
//!         let sum = m.number("a") + m.number("b");
//!         m.set("sum", sum);
//!     }),
//! );
//! assert_eq!(label.text(), "3");
//!
//! binder.set_value("a", 4).unwrap();
//! assert_eq!(label.text(), "7");
//! ```
//!
//! # Ownership
//!
//! `Binder` is a single-threaded handle (`!Send`). Setters hold only weak
//! references back to it, so dropping the last `Binder` releases the store,
//! the setters and every component instance. Components that need to write
//! back should keep a [`WeakBinder`] rather than an upgraded `Binder`.

mod reconcile;
mod scan;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::warn;

use crate::config::BinderConfig;
use crate::error::{BindError, Result};
use crate::host::ElementRef;
use crate::model::{Model, VariableStore, Variables};
use crate::reactive::{Depth, SetterRegistry};
use crate::registry::Registry;
use crate::value::Value;

pub use scan::ScanReport;

struct Inner {
    root: ElementRef,
    model: RefCell<Rc<dyn Model>>,
    store: RefCell<VariableStore>,
    setters: SetterRegistry,
    registry: Registry,
    config: BinderConfig,
    depth: Depth,
    report: Cell<ScanReport>,
}

/// Two-way binding between a model and a markup subtree.
pub struct Binder {
    inner: Rc<Inner>,
}

impl Binder {
    /// Bind `root` against `model`, using a snapshot of the global registry
    /// and the default configuration.
    pub fn new(root: impl Into<ElementRef>, model: impl Model + 'static) -> Self {
        Self::bind(
            root.into(),
            Rc::new(model),
            Registry::global_snapshot(),
            BinderConfig::default(),
        )
    }

    /// Bind `root` against `model` with an explicit registry and
    /// configuration.
    ///
    /// The model's default values are in place while the markup is scanned,
    /// so components may read them from `initialize`. After the scan the
    /// model is installed as by [`set_model`](Self::set_model), which renders
    /// every binding.
    ///
    /// Fails with [`BindError::InvalidSetting`] if `config` does not pass
    /// [`BinderConfig::validate`]; nothing is scanned in that case.
    pub fn with_registry(
        root: impl Into<ElementRef>,
        model: impl Model + 'static,
        registry: Registry,
        config: BinderConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::bind(root.into(), Rc::new(model), registry, config))
    }

    fn bind(root: ElementRef, model: Rc<dyn Model>, registry: Registry, config: BinderConfig) -> Self {
        let binder = Self {
            inner: Rc::new(Inner {
                root,
                store: RefCell::new(VariableStore::from_variables(model.defaults())),
                model: RefCell::new(Rc::clone(&model)),
                setters: SetterRegistry::new(),
                registry,
                config,
                depth: Depth::new(),
                report: Cell::new(ScanReport::default()),
            }),
        };

        let report = scan::scan(&binder);
        binder.inner.report.set(report);

        binder.replace_model(model);
        binder
    }

    /// Current value of a variable.
    ///
    /// Unknown variables log a warning and read as numeric zero.
    pub fn get_value(&self, name: &str) -> Value {
        self.value(name).unwrap_or_else(|| {
            warn!(variable = name, "unknown variable");
            Value::ZERO
        })
    }

    /// Current value of a variable, `None` if it is not part of the model.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.inner.store.borrow().get(name).cloned()
    }

    /// Set one variable. See [`set_values`](Self::set_values).
    pub fn set_value(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_values([(name, value.into())])
    }

    /// Variable names in the order they joined the model.
    pub fn variable_names(&self) -> Vec<String> {
        self.inner.store.borrow().names().map(str::to_string).collect()
    }

    /// Copy of every variable.
    pub fn snapshot(&self) -> Variables {
        self.inner.store.borrow().snapshot()
    }

    /// Current variables as a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// The bound subtree.
    pub fn root(&self) -> &ElementRef {
        &self.inner.root
    }

    pub fn config(&self) -> &BinderConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// What the markup scan found.
    pub fn scan_report(&self) -> ScanReport {
        self.inner.report.get()
    }

    /// Number of setters bound to a variable.
    pub fn binding_count(&self, name: &str) -> usize {
        self.inner.setters.count_for(name)
    }

    /// Create a weak handle that does not keep the binder alive.
    pub fn downgrade(&self) -> WeakBinder {
        WeakBinder {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("variables", &self.inner.store.borrow().len())
            .field("bound_variables", &self.inner.setters.variable_count())
            .field("scan", &self.inner.report.get())
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Weak handle to a [`Binder`].
///
/// Writes through a handle whose binder is gone fail with
/// [`BindError::Detached`].
#[derive(Clone)]
pub struct WeakBinder {
    inner: Weak<Inner>,
}

impl WeakBinder {
    /// Get a strong handle if the binder is still alive.
    pub fn upgrade(&self) -> Option<Binder> {
        self.inner.upgrade().map(|inner| Binder { inner })
    }

    /// Current value of a variable, `None` if unknown or detached.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.upgrade().and_then(|binder| binder.value(name))
    }

    pub fn set_value(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.upgrade().ok_or(BindError::Detached)?.set_value(name, value)
    }

    pub fn set_values<I, K, V>(&self, changes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.upgrade().ok_or(BindError::Detached)?.set_values(changes)
    }
}

impl std::fmt::Debug for WeakBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakBinder")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
