//! UI Components
//!
//! A component class describes how to attach behavior to an element. There
//! are two shapes:
//!
//! - [`Behaviors`]: a stateless template with an optional `initialize` and an
//!   optional `update` function;
//! - a constructor: a factory that receives the element, the binder and the
//!   bound variable names, and returns an [`Instance`].
//!
//! Both take the variable names as a slice, so a class can be bound to any
//! number of variables. Whether an instance renders anything is decided once,
//! when it is created: [`Instance::View`] gets a binding, [`Instance::Inert`]
//! does not.
//!
//! Class functions must be `Send + Sync` because a class can be registered
//! in the process-wide [`Registry::global`](crate::Registry::global). That
//! bound covers the registered functions only. The [`Component`] they
//! return lives inside one binder on one thread and may hold `Rc` state, so
//! shared state belongs in the instance rather than in captures of the class
//! function.

use std::fmt;
use std::sync::Arc;

use crate::binder::Binder;
use crate::host::ElementRef;
use crate::value::Value;

/// A live component bound to one element.
///
/// `update` receives the current values of the bound variables, in the order
/// the names appear in the element's variable attribute. It takes `&self`
/// because a component's own callbacks may write back into the binder and
/// re-enter `update`; components that keep state use interior mutability.
pub trait Component {
    fn update(&self, element: &ElementRef, values: &[Value]);
}

/// Result of instantiating a component class.
pub enum Instance {
    /// The component renders values and needs a binding.
    View(Box<dyn Component>),
    /// Presentation-only: nothing to update.
    Inert,
}

impl Instance {
    /// Wrap a component.
    pub fn view(component: impl Component + 'static) -> Self {
        Instance::View(Box::new(component))
    }

    pub fn is_view(&self) -> bool {
        matches!(self, Instance::View(_))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instance::View(_) => f.write_str("Instance::View"),
            Instance::Inert => f.write_str("Instance::Inert"),
        }
    }
}

/// `initialize(element, binder, names)`.
pub type InitializeFn = Arc<dyn Fn(&ElementRef, &Binder, &[String]) + Send + Sync>;

/// `update(element, values)`.
pub type UpdateFn = Arc<dyn Fn(&ElementRef, &[Value]) + Send + Sync>;

/// `construct(element, binder, names) -> instance`.
pub type ConstructFn = Arc<dyn Fn(&ElementRef, &Binder, &[String]) -> Instance + Send + Sync>;

/// A component template made of plain functions.
#[derive(Clone, Default)]
pub struct Behaviors {
    initialize: Option<InitializeFn>,
    update: Option<UpdateFn>,
}

impl Behaviors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_initialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&ElementRef, &Binder, &[String]) + Send + Sync + 'static,
    {
        self.initialize = Some(Arc::new(f));
        self
    }

    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&ElementRef, &[Value]) + Send + Sync + 'static,
    {
        self.update = Some(Arc::new(f));
        self
    }
}

struct BehaviorView {
    update: UpdateFn,
}

impl Component for BehaviorView {
    fn update(&self, element: &ElementRef, values: &[Value]) {
        (self.update)(element, values);
    }
}

/// A registered component description.
#[derive(Clone)]
pub enum ComponentClass {
    Behaviors(Behaviors),
    Constructor(ConstructFn),
}

impl ComponentClass {
    /// Create a constructor-style class.
    pub fn constructor<F>(construct: F) -> Self
    where
        F: Fn(&ElementRef, &Binder, &[String]) -> Instance + Send + Sync + 'static,
    {
        ComponentClass::Constructor(Arc::new(construct))
    }

    /// Create an instance attached to `element` and bound to `names`.
    pub fn instantiate(&self, element: &ElementRef, binder: &Binder, names: &[String]) -> Instance {
        match self {
            ComponentClass::Behaviors(behaviors) => {
                if let Some(initialize) = &behaviors.initialize {
                    initialize(element, binder, names);
                }
                match &behaviors.update {
                    Some(update) => Instance::View(Box::new(BehaviorView {
                        update: Arc::clone(update),
                    })),
                    None => Instance::Inert,
                }
            }
            ComponentClass::Constructor(construct) => construct(element, binder, names),
        }
    }
}

impl From<Behaviors> for ComponentClass {
    fn from(behaviors: Behaviors) -> Self {
        ComponentClass::Behaviors(behaviors)
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentClass::Behaviors(behaviors) => f
                .debug_struct("Behaviors")
                .field("has_initialize", &behaviors.initialize.is_some())
                .field("has_update", &behaviors.update.is_some())
                .finish(),
            ComponentClass::Constructor(_) => f.write_str("Constructor"),
        }
    }
}
