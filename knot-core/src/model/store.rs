//! Variable Store
//!
//! The store owns the current value of every model variable and is the
//! single source of truth for reads. It never calls out to user code: the
//! reconciler computes changes against it and then commits them.

use indexmap::IndexMap;

use crate::value::Value;

/// Ordered variable mapping. Insertion order is the order in which
/// variables were first seen, which keeps dispatch deterministic.
pub type Variables = IndexMap<String, Value>;

/// A list of `(name, new value)` pairs produced by a diff or a batch write.
pub type Changes = Vec<(String, Value)>;

/// Current values of the model's variables.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    vars: Variables,
}

impl VariableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given variables.
    pub fn from_variables(vars: Variables) -> Self {
        Self { vars }
    }

    /// Get the current value of a variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Check whether a variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variable names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Clone the full variable mapping.
    pub fn snapshot(&self) -> Variables {
        self.vars.clone()
    }

    /// Drop every variable.
    pub fn reset(&mut self) {
        self.vars.clear();
    }

    /// Return the first name in `names` that the store does not hold.
    pub fn first_unknown<'a, I>(&self, names: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().find(|name| !self.contains(name))
    }

    /// Compare a derived mapping against the store.
    ///
    /// Returns every variable of `derived` whose value differs from the
    /// stored one, including variables the store does not hold yet, in the
    /// order they appear in `derived`.
    pub fn diff(&self, derived: &Variables) -> Changes {
        diff_variables(&self.vars, derived)
    }

    /// Keep only the changes that still differ from the stored values.
    pub fn retain_changed(&self, changes: Changes) -> Changes {
        changes
            .into_iter()
            .filter(|(name, value)| self.vars.get(name) != Some(value))
            .collect()
    }

    /// Write every change into the store.
    pub fn commit(&mut self, changes: &[(String, Value)]) {
        for (name, value) in changes {
            self.vars.insert(name.clone(), value.clone());
        }
    }
}

/// Entries of `derived` that are missing from `base` or hold a different
/// value there, in `derived` order.
pub(crate) fn diff_variables(base: &Variables, derived: &Variables) -> Changes {
    derived
        .iter()
        .filter(|(name, value)| base.get(name.as_str()) != Some(*value))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
