//! Closure-based model templates.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::value::Value;

use super::frame::Frame;
use super::store::Variables;
use super::Model;

type Behavior = Rc<dyn Fn(&mut Frame)>;

/// A [`Model`] assembled from default values and closures.
///
/// # Example
///
/// ```rust
/// use knot_core::model::Template;
///
/// let template = Template::new()
///     .with("a", 1)
///     .with("b", 2)
///     .on_update(|m| {
///         let sum = m.number("a") + m.number("b");
///         m.set("sum", sum);
///     });
/// ```
#[derive(Clone, Default)]
pub struct Template {
    defaults: Variables,
    initialize: Option<Behavior>,
    update: Option<Behavior>,
}

impl Template {
    /// Create an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed default values from a JSON object of scalars.
    pub fn from_json(json: &str) -> Result<Self> {
        let defaults: Variables = serde_json::from_str(json)?;
        Ok(Self {
            defaults,
            ..Self::default()
        })
    }

    /// Add a default value.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.defaults.insert(name.to_string(), value.into());
        self
    }

    /// Set the behavior run once when the model is installed.
    pub fn on_initialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Frame) + 'static,
    {
        self.initialize = Some(Rc::new(f));
        self
    }

    /// Set the behavior run on every reconciliation.
    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Frame) + 'static,
    {
        self.update = Some(Rc::new(f));
        self
    }
}

impl Model for Template {
    fn defaults(&self) -> Variables {
        self.defaults.clone()
    }

    fn initialize(&self, frame: &mut Frame) {
        if let Some(initialize) = &self.initialize {
            initialize(frame);
        }
    }

    fn update(&self, frame: &mut Frame) {
        if let Some(update) = &self.update {
            update(frame);
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("defaults", &self.defaults)
            .field("has_initialize", &self.initialize.is_some())
            .field("has_update", &self.update.is_some())
            .finish()
    }
}
