//! Models
//!
//! A model is a set of named variables plus two behaviors that derive
//! dependent variables from independent ones:
//!
//! - `initialize` runs exactly once when the model is installed, and seeds
//!   defaults or derived starting values;
//! - `update` runs on every reconciliation and recomputes every derived
//!   variable from the current state.
//!
//! There is no dependency graph. The reconciler hands `update` a [`Frame`]
//! holding a full copy of the state, then diffs the frame against the
//! [`VariableStore`] to learn what changed. This only works if `update` is a
//! pure function of the current state: running it twice without an
//! intervening change must produce an empty diff.

mod frame;
mod store;
mod template;

use std::rc::Rc;

pub use frame::Frame;
pub use store::{Changes, VariableStore, Variables};
pub use template::Template;

/// Behaviors and starting values of a model.
pub trait Model {
    /// Starting values of the model's variables.
    fn defaults(&self) -> Variables {
        Variables::new()
    }

    /// Called once when the model is installed, before the first `update`.
    fn initialize(&self, _frame: &mut Frame) {}

    /// Recompute derived variables from the current state.
    fn update(&self, _frame: &mut Frame) {}
}

impl<M: Model + ?Sized> Model for Rc<M> {
    fn defaults(&self) -> Variables {
        (**self).defaults()
    }

    fn initialize(&self, frame: &mut Frame) {
        (**self).initialize(frame);
    }

    fn update(&self, frame: &mut Frame) {
        (**self).update(frame);
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn defaults(&self) -> Variables {
        (**self).defaults()
    }

    fn initialize(&self, frame: &mut Frame) {
        (**self).initialize(frame);
    }

    fn update(&self, frame: &mut Frame) {
        (**self).update(frame);
    }
}
