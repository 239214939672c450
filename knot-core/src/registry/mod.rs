//! Component and Formatter Registry
//!
//! The registry is the catalogue the binding scanner consults: component
//! classes keyed by the class-list token that selects them, and formatters
//! keyed by the identifier used in the format attribute.
//!
//! # Lifecycle
//!
//! A registry can be built and handed to
//! [`Binder::with_registry`](crate::Binder::with_registry) directly, or
//! populated through the process-wide [`Registry::global`] instance, which
//! [`Binder::new`](crate::Binder::new) snapshots at construction time.
//! Populate the global registry before constructing binders: later
//! registrations do not reach binders that already exist.

mod component;
mod format;

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::value::Value;

pub use component::{
    Behaviors, Component, ComponentClass, ConstructFn, InitializeFn, Instance, UpdateFn,
};
pub use format::{identity, Formatter, PrintfFn, DEFAULT_FORMAT};

static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();

/// Component classes, formatters and the optional printf hook.
#[derive(Clone)]
pub struct Registry {
    components: IndexMap<String, ComponentClass>,
    formatters: IndexMap<String, Formatter>,
    printf: Option<PrintfFn>,
}

impl Registry {
    /// Create a registry holding only the built-in `"default"` formatter.
    pub fn new() -> Self {
        let mut formatters = IndexMap::new();
        formatters.insert(DEFAULT_FORMAT.to_string(), identity());
        Self {
            components: IndexMap::new(),
            formatters,
            printf: None,
        }
    }

    /// The shared process-wide registry.
    pub fn global() -> &'static RwLock<Registry> {
        GLOBAL.get_or_init(|| RwLock::new(Registry::new()))
    }

    /// Clone the current state of the global registry.
    pub fn global_snapshot() -> Registry {
        Self::global().read().clone()
    }

    /// Register (or replace) a component class.
    pub fn register_component(&mut self, name: &str, class: impl Into<ComponentClass>) -> &mut Self {
        self.components.insert(name.to_string(), class.into());
        self
    }

    /// Register (or replace) a formatter.
    pub fn register_formatter<F>(&mut self, name: &str, format: F) -> &mut Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatters.insert(name.to_string(), Arc::new(format));
        self
    }

    /// Install the printf function used for `%` format patterns.
    pub fn set_printf(&mut self, printf: PrintfFn) -> &mut Self {
        self.printf = Some(printf);
        self
    }

    /// Look up a component class.
    pub fn component(&self, name: &str) -> Option<&ComponentClass> {
        self.components.get(name)
    }

    /// Look up a formatter by exact name.
    pub fn formatter(&self, name: &str) -> Option<Formatter> {
        self.formatters.get(name).cloned()
    }

    pub fn printf(&self) -> Option<PrintfFn> {
        self.printf.clone()
    }

    /// Registered component names in registration order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .field("formatters", &self.formatters.keys().collect::<Vec<_>>())
            .field("has_printf", &self.printf.is_some())
            .finish()
    }
}
