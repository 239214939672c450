//! Dispatch Primitives
//!
//! This module holds the pieces the reconciler uses to push changes into the
//! view:
//!
//! - [`Setter`]: one binding callback, identified by a [`BindingId`];
//! - [`SetterRegistry`]: the variable name to setter list table, with the
//!   [`NotifyPolicy`] that decides how repeat notifications are handled;
//! - [`UpdateScope`]: the nesting guard for re-entrant updates.
//!
//! There is no dependency tracking here. Which variables changed is decided
//! by diffing whole-model snapshots (see [`crate::model`]); this module only
//! fans those changes out.

mod context;
mod setters;
mod subscriber;

pub use context::{Depth, UpdateScope};
pub use setters::{NotifyPolicy, SetterRegistry};
pub use subscriber::{BindingId, Setter};
