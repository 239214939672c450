//! Knot Core
//!
//! Declarative two-way data binding between a plain-data model and a tree of
//! markup elements.
//!
//! A model is a set of named variables plus `initialize` and `update`
//! behaviors that derive dependent variables from independent ones. The
//! [`Binder`] scans a markup subtree for elements annotated with variable
//! names and component classes, binds each one to the model, and keeps both
//! sides in sync:
//!
//! - model → view: every changed variable is dispatched to the bindings that
//!   depend on it;
//! - view → model: components write user edits back with
//!   [`Binder::set_value`], and the model re-derives whatever depends on
//!   them.
//!
//! # Architecture
//!
//! - `value`: the scalar [`Value`] stored in variables
//! - `model`: the [`Model`](model::Model) trait, the variable store and the
//!   derivation frame
//! - `reactive`: setters, the dispatch table and the re-entrancy guard
//! - `registry`: component classes and formatters
//! - `host`: the [`Element`](host::Element) interface to the document
//! - `binder`: the facade, the reconciler and the markup scanner
//!
//! The update engine does no dependency tracking. Each change re-runs the
//! model's `update` on a full copy of the state and diffs the result against
//! the store; whatever differs is committed and dispatched.
//!
//! # Example
//!
//! ```rust
//! use knot_core::host::MemoryElement;
//! use knot_core::model::Template;
//! use knot_core::Binder;
//!
//! let total = MemoryElement::new("b").with_attribute("data-var", "calories");
//! let root = MemoryElement::new("p").with_child(total.clone());
//!
//! let binder = Binder::new(
//!     root,
//!     Template::new().with("cookies", 3).on_update(|m| {
//!         let calories = m.number("cookies") * 50.0;
//!         m.set("calories", calories);
//!     }),
//! );
//! assert_eq!(total.text(), "150");
//!
//! binder.set_value("cookies", 4).unwrap();
//! assert_eq!(total.text(), "200");
//! ```

pub mod binder;
pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod reactive;
pub mod registry;
pub mod value;

pub use binder::{Binder, ScanReport, WeakBinder};
pub use config::BinderConfig;
pub use error::{BindError, Result};
pub use reactive::NotifyPolicy;
pub use registry::Registry;
pub use value::Value;
