//! Host Element Tree
//!
//! The binder never owns the document it binds. It reads markup and writes
//! rendered output through the [`Element`] trait, which the embedding
//! environment implements for its own node type.
//!
//! [`MemoryElement`] is a self-contained implementation backed by
//! reference-counted nodes. It is what the tests and benchmarks bind
//! against, and it is enough for headless use.

mod memory;

use std::rc::Rc;

pub use memory::MemoryElement;

/// Shared handle to a host element.
pub type ElementRef = Rc<dyn Element>;

/// The operations the binder needs from a host element.
pub trait Element {
    /// Tag name, e.g. `"span"`.
    fn tag(&self) -> String;

    /// Read an attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// All descendants in document order, not including `self`.
    ///
    /// Must return a snapshot: elements inserted while the caller walks the
    /// list are not part of it.
    fn descendants(&self) -> Vec<ElementRef>;

    /// Create a child element and insert it before the first child.
    fn prepend_child(&self, tag: &str) -> ElementRef;

    /// Replace the element's rendered content.
    fn set_content(&self, content: &str);

    /// The element's rendered content.
    fn content(&self) -> String;
}
