//! Re-entrancy tracking
//!
//! Component callbacks may call back into the binder while a dispatch is in
//! progress, which nests one update inside another. Each nested call enters
//! an [`UpdateScope`]; the scope counts the current nesting depth and refuses
//! to go past a fixed limit, so two components that keep pushing values at
//! each other end in an error instead of a stack overflow.

use std::cell::Cell;

use crate::error::{BindError, Result};

/// Nesting counter owned by one binder.
#[derive(Debug, Default)]
pub struct Depth {
    current: Cell<usize>,
}

impl Depth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth. Zero when no update is running.
    pub fn get(&self) -> usize {
        self.current.get()
    }
}

/// Guard that decrements the depth when dropped.
///
/// Dropping on unwind keeps the counter correct even if a model behavior
/// panics inside the scope.
#[derive(Debug)]
pub struct UpdateScope<'a> {
    depth: &'a Depth,
}

impl<'a> UpdateScope<'a> {
    /// Enter a nested update, failing past `limit` levels.
    pub fn enter(depth: &'a Depth, limit: usize) -> Result<Self> {
        let next = depth.current.get() + 1;
        if next > limit {
            return Err(BindError::ReentrancyLimit(limit));
        }
        depth.current.set(next);
        Ok(Self { depth })
    }

    /// Depth of this scope (1 for the outermost update).
    pub fn level(&self) -> usize {
        self.depth.current.get()
    }
}

impl Drop for UpdateScope<'_> {
    fn drop(&mut self) {
        let current = self.depth.current.get();
        debug_assert!(current > 0, "UpdateScope dropped with depth 0");
        self.depth.current.set(current.saturating_sub(1));
    }
}
