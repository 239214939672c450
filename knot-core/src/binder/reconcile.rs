//! Model Reconciler
//!
//! Every change to the model goes through one of two entry points:
//!
//! - [`Binder::set_model`] swaps in a new model and renders it from scratch;
//! - [`Binder::set_values`] writes independent variables and lets the model
//!   react.
//!
//! Both end in a reconciliation pass:
//!
//! 1. copy the store into a [`Frame`], keeping the copy as the base;
//! 2. run `initialize` on the frame (only when a model is being installed);
//! 3. run `update` on the frame;
//! 4. collect what the behaviors wrote, relative to the base;
//! 5. keep the entries that still differ from the store and commit them;
//! 6. dispatch those entries to the setters.
//!
//! Step 4 compares against the base rather than the live store. A behavior
//! or setter that calls back into the binder starts a nested pass that
//! commits its own changes; the outer pass only writes names its behaviors
//! actually touched, so it never reverts the nested writes. The store is
//! only borrowed while copying and committing, never while user code runs.
//!
//! Installing a model derives its state on a frame built from its defaults
//! before anything is replaced. If a behavior panics, the previous model
//! and store are left as they were.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::error::{BindError, Result};
use crate::model::{Changes, Frame, Model};
use crate::reactive::UpdateScope;
use crate::value::Value;

use super::Binder;

impl Binder {
    /// Replace the model.
    ///
    /// The store is rebuilt from the new model's defaults, `initialize` and
    /// `update` run once, and every resulting variable is dispatched, so all
    /// bindings render the new state. Nothing is replaced until the new
    /// model's behaviors have returned.
    pub fn set_model(&self, model: impl Model + 'static) -> Result<()> {
        self.install(Rc::new(model))
    }

    pub(super) fn install(&self, model: Rc<dyn Model>) -> Result<()> {
        let _scope = UpdateScope::enter(&self.inner.depth, self.inner.config.max_depth)?;
        self.replace_model(model);
        Ok(())
    }

    /// Derive `model` from its defaults, then swap it in with the result as
    /// the new store. Every variable is dispatched.
    pub(super) fn replace_model(&self, model: Rc<dyn Model>) -> usize {
        let defaults = model.defaults();
        debug!(defaults = defaults.len(), "installing model");

        let mut frame = Frame::new(defaults);
        derive(&*model, &mut frame, true);

        *self.inner.model.borrow_mut() = model;
        let changes = {
            let mut store = self.inner.store.borrow_mut();
            store.reset();
            let changes = store.diff(frame.variables());
            store.commit(&changes);
            changes
        };

        self.dispatch(&changes);
        changes.len()
    }

    /// Write a batch of variables.
    ///
    /// The batch is atomic with respect to unknown names: if any name is not
    /// part of the model, a warning is logged, nothing is written, and
    /// [`BindError::UnknownVariable`] is returned.
    ///
    /// Entries equal to the stored value are skipped. If anything is left,
    /// all remaining entries are written, each is dispatched to its setters,
    /// and then one reconciliation pass lets derived variables catch up. A
    /// batch that changes nothing dispatches nothing and does not reconcile.
    pub fn set_values<I, K, V>(&self, changes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let batch: IndexMap<String, Value> = changes
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();

        let _scope = UpdateScope::enter(&self.inner.depth, self.inner.config.max_depth)?;

        let changed: Changes = {
            let mut store = self.inner.store.borrow_mut();
            if let Some(name) = store.first_unknown(batch.keys().map(String::as_str)) {
                warn!(variable = name, "setting unknown variable");
                return Err(BindError::UnknownVariable(name.to_string()));
            }

            let changed: Changes = batch
                .into_iter()
                .filter(|(name, value)| store.get(name) != Some(value))
                .collect();
            store.commit(&changed);
            changed
        };

        if changed.is_empty() {
            return Ok(());
        }

        trace!(changed = changed.len(), "applying direct changes");
        self.dispatch(&changed);
        self.reconcile(false);
        Ok(())
    }

    /// Re-derive the model from the current store. Returns the number of
    /// changed variables.
    fn reconcile(&self, should_initialize: bool) -> usize {
        let base = self.inner.store.borrow().snapshot();
        let model = Rc::clone(&*self.inner.model.borrow());

        let mut frame = Frame::new(base.clone());
        derive(&*model, &mut frame, should_initialize);

        let changes = {
            let mut store = self.inner.store.borrow_mut();
            let changes = store.retain_changed(frame.changes_since(&base));
            store.commit(&changes);
            changes
        };

        trace!(
            changed = changes.len(),
            depth = self.inner.depth.get(),
            "reconciled model"
        );
        self.dispatch(&changes);
        changes.len()
    }

    fn dispatch(&self, changes: &[(String, Value)]) {
        if changes.is_empty() {
            return;
        }
        let fired = self.inner.setters.dispatch(changes, self.inner.config.notify);
        trace!(variables = changes.len(), setters = fired, "dispatched");
    }
}

fn derive(model: &dyn Model, frame: &mut Frame, should_initialize: bool) {
    if should_initialize {
        model.initialize(frame);
    }
    model.update(frame);
}
