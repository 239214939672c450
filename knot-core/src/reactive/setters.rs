//! Setter Registry
//!
//! The dispatch table maps each variable name to the ordered list of setters
//! that must run when that variable changes. Registration order is document
//! order, and setters for one variable always run in that order.
//!
//! # Duplicate notifications
//!
//! A binding over several variables is registered once per variable. When
//! more than one of them changes in the same pass, the binding would be
//! notified once per changed variable. [`NotifyPolicy::Coalesce`] (the
//! default) suppresses the repeats within one [`SetterRegistry::dispatch`]
//! call; [`NotifyPolicy::PerVariable`] keeps them.
//!
//! # Re-entrancy
//!
//! Setters may call back into the binder, which can register nothing new but
//! can start a nested dispatch. The list of setters for a variable is cloned
//! out of the table before any of them runs, so no borrow is held across a
//! callback.

use std::cell::RefCell;
use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::value::Value;

use super::subscriber::Setter;

/// Most variables have one or two bindings.
type SetterList = SmallVec<[Setter; 2]>;

/// How a dispatch pass treats a binding registered under several changed
/// variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Invoke each binding at most once per dispatch pass.
    #[default]
    Coalesce,

    /// Invoke a binding once for every changed variable it is registered
    /// under.
    PerVariable,
}

/// Variable name to ordered setter list.
#[derive(Debug, Default)]
pub struct SetterRegistry {
    setters: RefCell<IndexMap<String, SetterList>>,
}

impl SetterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a setter to a variable's list, creating the list if needed.
    pub fn add_setter(&self, name: &str, setter: Setter) {
        self.setters
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(setter);
    }

    /// Clone the setters registered for a variable.
    pub fn setters_for(&self, name: &str) -> SetterList {
        self.setters
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of setters registered for a variable.
    pub fn count_for(&self, name: &str) -> usize {
        self.setters.borrow().get(name).map_or(0, SmallVec::len)
    }

    /// Number of variables with at least one setter.
    pub fn variable_count(&self) -> usize {
        self.setters.borrow().len()
    }

    /// Invoke every setter for `name` in registration order.
    ///
    /// No de-duplication happens here.
    pub fn apply_for_variable(&self, name: &str, value: &Value) -> usize {
        let setters = self.setters_for(name);
        for setter in &setters {
            setter.apply(value);
        }
        setters.len()
    }

    /// Apply a batch of changes in order.
    ///
    /// Returns the number of setter invocations.
    pub fn dispatch(&self, changes: &[(String, Value)], policy: NotifyPolicy) -> usize {
        match policy {
            NotifyPolicy::PerVariable => changes
                .iter()
                .map(|(name, value)| self.apply_for_variable(name, value))
                .sum(),
            NotifyPolicy::Coalesce => {
                let mut fired = HashSet::new();
                for (name, value) in changes {
                    for setter in self.setters_for(name) {
                        if fired.insert(setter.id()) {
                            setter.apply(value);
                        }
                    }
                }
                fired.len()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &'static str) -> Setter {
        let log = log.clone();
        Setter::new(move |value| log.borrow_mut().push(format!("{label}={value}")))
    }

    fn changes(pairs: &[(&str, i32)]) -> Vec<(String, Value)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), Value::from(*value)))
            .collect()
    }

    #[test]
    fn setters_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = SetterRegistry::new();
        registry.add_setter("x", recorder(&log, "first"));
        registry.add_setter("x", recorder(&log, "second"));

        let count = registry.apply_for_variable("x", &Value::from(3));

        assert_eq!(count, 2);
        assert_eq!(*log.borrow(), vec!["first=3", "second=3"]);
    }

    #[test]
    fn unknown_variable_has_no_setters() {
        let registry = SetterRegistry::new();
        assert_eq!(registry.apply_for_variable("nothing", &Value::Null), 0);
        assert_eq!(registry.count_for("nothing"), 0);
    }

    #[test]
    fn per_variable_policy_repeats_shared_setter() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = SetterRegistry::new();
        let shared = recorder(&log, "ab");
        registry.add_setter("a", shared.clone());
        registry.add_setter("b", shared);

        let count = registry.dispatch(&changes(&[("a", 1), ("b", 2)]), NotifyPolicy::PerVariable);

        assert_eq!(count, 2);
        assert_eq!(*log.borrow(), vec!["ab=1", "ab=2"]);
    }

    #[test]
    fn coalesce_policy_fires_shared_setter_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = SetterRegistry::new();
        let shared = recorder(&log, "ab");
        registry.add_setter("a", shared.clone());
        registry.add_setter("b", shared);
        registry.add_setter("b", recorder(&log, "b"));

        let count = registry.dispatch(&changes(&[("a", 1), ("b", 2)]), NotifyPolicy::Coalesce);

        assert_eq!(count, 2);
        assert_eq!(*log.borrow(), vec!["ab=1", "b=2"]);
    }

    #[test]
    fn setter_may_reenter_registry() {
        let registry = Rc::new(SetterRegistry::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        registry.add_setter("inner", recorder(&log, "inner"));

        let registry_clone = registry.clone();
        registry.add_setter(
            "outer",
            Setter::new(move |value| {
                registry_clone.apply_for_variable("inner", value);
            }),
        );

        registry.apply_for_variable("outer", &Value::from(9));
        assert_eq!(*log.borrow(), vec!["inner=9"]);
    }

    #[test]
    fn policy_parses_from_snake_case() {
        let policy: NotifyPolicy = serde_json::from_str("\"per_variable\"").unwrap();
        assert_eq!(policy, NotifyPolicy::PerVariable);
        assert_eq!(NotifyPolicy::default(), NotifyPolicy::Coalesce);
    }
}
