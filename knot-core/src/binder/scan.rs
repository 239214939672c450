//! Binding Scanner
//!
//! The scanner walks the bound subtree once, at construction, and turns
//! markup annotations into setters:
//!
//! - the variable attribute (`data-var` by default) lists the bound variable
//!   names, separated by whitespace;
//! - each token of the class attribute that names a registered component is
//!   instantiated for the element;
//! - components that render get a binding over all listed variables;
//! - elements with variables but no rendering component get a default
//!   binding on their first variable, which writes the formatted value into
//!   a lazily created child element.
//!
//! The walk runs over a snapshot of the descendants, because component
//! initialization may insert new elements.

use std::cell::RefCell;

use smallvec::SmallVec;
use tracing::debug;

use crate::host::ElementRef;
use crate::reactive::Setter;
use crate::registry::{Component, Formatter, Instance, DEFAULT_FORMAT};
use crate::value::Value;

use super::Binder;

type Names = SmallVec<[String; 2]>;

/// Counts gathered by the markup scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Elements carrying a variable list or class list.
    pub elements: usize,
    /// Component instances created.
    pub components: usize,
    /// Bindings registered, counting a multi-variable binding once.
    pub bindings: usize,
}

pub(super) fn scan(binder: &Binder) -> ScanReport {
    let inner = &binder.inner;
    let config = &inner.config;
    let mut report = ScanReport::default();

    for element in inner.root.descendants() {
        let names = element
            .attribute(&config.var_attribute)
            .map(|attribute| parse_names(&attribute))
            .filter(|names| !names.is_empty());
        let classes = element
            .attribute(&config.class_attribute)
            .unwrap_or_default();

        if names.is_none() && classes.trim().is_empty() {
            continue;
        }
        report.elements += 1;

        let mut did_bind = false;
        for token in classes.split_whitespace() {
            let Some(class) = inner.registry.component(token) else {
                continue;
            };
            report.components += 1;

            let instance = class.instantiate(&element, binder, names.as_deref().unwrap_or(&[]));
            if let (Instance::View(view), Some(names)) = (instance, &names) {
                bind_component(binder, &element, names, view);
                report.bindings += 1;
                did_bind = true;
            }
        }

        if let Some(names) = &names {
            if !did_bind {
                let format = element
                    .attribute(&config.format_attribute)
                    .filter(|format| !format.is_empty());
                let formatter = inner
                    .registry
                    .resolve_formatter(format.as_deref().unwrap_or(DEFAULT_FORMAT));
                bind_default(binder, &element, &names[0], formatter);
                report.bindings += 1;
            }
        }
    }

    debug!(
        elements = report.elements,
        components = report.components,
        bindings = report.bindings,
        "scanned markup"
    );
    report
}

fn parse_names(attribute: &str) -> Names {
    attribute.split_whitespace().map(str::to_string).collect()
}

/// Register one setter for `view` under every name in `names`.
///
/// With a single name the dispatched value is passed straight through. With
/// several, the setter reads all of them from the store when it runs, so it
/// always sees the committed values no matter which one changed.
fn bind_component(binder: &Binder, element: &ElementRef, names: &[String], view: Box<dyn Component>) {
    let element = element.clone();
    let setter = if let [_] = names {
        Setter::new(move |value| view.update(&element, std::slice::from_ref(value)))
    } else {
        let weak = binder.downgrade();
        let names = names.to_vec();
        Setter::new(move |_| {
            let Some(binder) = weak.upgrade() else {
                return;
            };
            let values: Vec<Value> = names.iter().map(|name| binder.get_value(name)).collect();
            view.update(&element, &values);
        })
    };

    for name in names {
        binder.inner.setters.add_setter(name, setter.clone());
    }
}

fn bind_default(binder: &Binder, element: &ElementRef, name: &str, formatter: Formatter) {
    let element = element.clone();
    let tag = binder.inner.config.text_holder_tag.clone();
    let holder: RefCell<Option<ElementRef>> = RefCell::new(None);

    let setter = Setter::new(move |value| {
        let text = formatter(value);
        let target = holder
            .borrow_mut()
            .get_or_insert_with(|| element.prepend_child(&tag))
            .clone();
        target.set_content(&text);
    });
    binder.inner.setters.add_setter(name, setter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_split_on_any_whitespace() {
        assert_eq!(parse_names("a  b\tc").as_slice(), ["a", "b", "c"]);
        assert!(parse_names("   ").is_empty());
    }
}
