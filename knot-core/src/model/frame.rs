//! Derivation Frame
//!
//! A frame is the working copy handed to a model's `initialize` and `update`
//! behaviors. It starts as a copy of the store, so unmodified variables read
//! through, and whatever the behaviors write stays in the frame until the
//! reconciler diffs it against the store and commits the difference.
//!
//! Writing a name the frame does not hold yet defines a new variable.

use crate::value::Value;

use super::store::{diff_variables, Changes, Variables};

/// Working copy of the model's variables during derivation.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    vars: Variables,
}

impl Frame {
    /// Create a frame starting from the given variables.
    pub fn new(vars: Variables) -> Self {
        Self { vars }
    }

    /// Variables written since the frame held `base`: new names and names
    /// whose value differs from `base`.
    pub fn changes_since(&self, base: &Variables) -> Changes {
        diff_variables(base, &self.vars)
    }

    /// Get a variable, if defined.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Get a variable by value, `Null` if undefined.
    pub fn value(&self, name: &str) -> Value {
        self.vars.get(name).cloned().unwrap_or_default()
    }

    /// Get a variable coerced to a number. Undefined variables read as `0`.
    pub fn number(&self, name: &str) -> f64 {
        self.vars.get(name).map_or(0.0, Value::to_number)
    }

    /// Get a variable's truthiness. Undefined variables read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.vars.get(name).is_some_and(Value::is_truthy)
    }

    /// Get a variable as text, using the identity stringification.
    pub fn text(&self, name: &str) -> String {
        self.vars.get(name).map(ToString::to_string).unwrap_or_default()
    }

    /// Set a variable, defining it if needed.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.vars.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.vars.insert(name.to_string(), value);
            }
        }
    }

    /// Check whether a variable is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Variable names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Borrow the variables for diffing.
    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn into_variables(self) -> Variables {
        self.vars
    }
}
