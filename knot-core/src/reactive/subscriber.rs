//! Setter types for the dispatch table.
//!
//! A setter is a binding callback that renders a changed variable into the
//! view. The same setter can be registered under several variable names
//! (multi-variable bindings), so each one carries a [`BindingId`] that lets a
//! dispatch pass recognize repeat notifications.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::Value;

/// Unique identifier for a binding.
///
/// Every registered binding gets a unique ID when created. Clones of a
/// [`Setter`] share the ID of the binding they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

impl BindingId {
    /// Generate a new unique binding ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for BindingId {
    fn default() -> Self {
        Self::new()
    }
}

/// A binding callback invoked with the changed variable's new value.
#[derive(Clone)]
pub struct Setter {
    id: BindingId,
    /// Shared so the dispatcher can clone the callback list out of the
    /// registry before invoking it.
    apply: Rc<dyn Fn(&Value)>,
}

impl Setter {
    /// Create a new setter with its own binding ID.
    pub fn new<F>(apply: F) -> Self
    where
        F: Fn(&Value) + 'static,
    {
        Self {
            id: BindingId::new(),
            apply: Rc::new(apply),
        }
    }

    /// Get the binding ID.
    pub fn id(&self) -> BindingId {
        self.id
    }

    /// Run the callback.
    pub fn apply(&self, value: &Value) {
        (self.apply)(value);
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn binding_ids_are_unique() {
        let id1 = BindingId::new();
        let id2 = BindingId::new();
        let id3 = BindingId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn setter_apply_calls_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let setter = Setter::new(move |value| {
            seen_clone.borrow_mut().push(value.clone());
        });

        assert!(seen.borrow().is_empty());
        setter.apply(&Value::from(7));
        assert_eq!(*seen.borrow(), vec![Value::from(7)]);
    }

    #[test]
    fn clones_share_id() {
        let setter = Setter::new(|_| {});
        assert_eq!(setter.clone().id(), setter.id());
    }
}
