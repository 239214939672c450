//! In-memory element tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{Element, ElementRef};

#[derive(Default)]
struct Node {
    tag: String,
    attributes: RefCell<IndexMap<String, String>>,
    children: RefCell<Vec<MemoryElement>>,
    content: RefCell<String>,
}

/// A reference-counted element. Clones are handles to the same node.
///
/// # Example
///
/// ```rust
/// use knot_core::host::MemoryElement;
///
/// let root = MemoryElement::new("div").with_child(
///     MemoryElement::new("span").with_attribute("data-var", "sum"),
/// );
/// assert_eq!(root.children().len(), 1);
/// ```
#[derive(Clone)]
pub struct MemoryElement {
    node: Rc<Node>,
}

impl MemoryElement {
    /// Create a detached element.
    pub fn new(tag: &str) -> Self {
        Self {
            node: Rc::new(Node {
                tag: tag.to_string(),
                ..Node::default()
            }),
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form of [`append_child`](Self::append_child).
    pub fn with_child(self, child: MemoryElement) -> Self {
        self.append_child(child);
        self
    }

    /// Builder form of [`set_content`](Element::set_content).
    pub fn with_content(self, content: &str) -> Self {
        self.set_content(content);
        self
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.node
            .attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    pub fn append_child(&self, child: MemoryElement) {
        self.node.children.borrow_mut().push(child);
    }

    /// Direct children in order.
    pub fn children(&self) -> Vec<MemoryElement> {
        self.node.children.borrow().clone()
    }

    pub fn first_child(&self) -> Option<MemoryElement> {
        self.node.children.borrow().first().cloned()
    }

    /// Own content followed by the text of every child, depth first.
    pub fn text(&self) -> String {
        let mut out = self.node.content.borrow().clone();
        for child in self.node.children.borrow().iter() {
            out.push_str(&child.text());
        }
        out
    }

    /// Wrap this handle as a trait object.
    pub fn to_ref(&self) -> ElementRef {
        Rc::new(self.clone())
    }

    /// Whether two handles point at the same node.
    pub fn same_node(&self, other: &MemoryElement) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    fn collect_descendants(&self, out: &mut Vec<ElementRef>) {
        for child in self.node.children.borrow().iter() {
            out.push(child.to_ref());
            child.collect_descendants(out);
        }
    }
}

impl Element for MemoryElement {
    fn tag(&self) -> String {
        self.node.tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.node.attributes.borrow().get(name).cloned()
    }

    fn descendants(&self) -> Vec<ElementRef> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn prepend_child(&self, tag: &str) -> ElementRef {
        let child = MemoryElement::new(tag);
        self.node.children.borrow_mut().insert(0, child.clone());
        child.to_ref()
    }

    fn set_content(&self, content: &str) {
        *self.node.content.borrow_mut() = content.to_string();
    }

    fn content(&self) -> String {
        self.node.content.borrow().clone()
    }
}

impl From<MemoryElement> for ElementRef {
    fn from(element: MemoryElement) -> Self {
        Rc::new(element)
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("tag", &self.node.tag)
            .field("attributes", &self.node.attributes.borrow())
            .field("content", &self.node.content.borrow())
            .field("children", &self.node.children.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> MemoryElement {
        MemoryElement::new("div")
            .with_child(
                MemoryElement::new("p")
                    .with_attribute("id", "p1")
                    .with_child(MemoryElement::new("b").with_attribute("id", "b1")),
            )
            .with_child(MemoryElement::new("p").with_attribute("id", "p2"))
    }

    #[test]
    fn descendants_are_in_document_order() {
        let root = tree();
        let ids: Vec<_> = root
            .descendants()
            .iter()
            .map(|el| el.attribute("id").unwrap())
            .collect();
        assert_eq!(ids, vec!["p1", "b1", "p2"]);
    }

    #[test]
    fn descendants_is_a_snapshot() {
        let root = tree();
        let before = root.descendants();
        before[0].prepend_child("span");

        assert_eq!(before.len(), 3);
        assert_eq!(root.descendants().len(), 4);
    }

    #[test]
    fn prepend_inserts_first() {
        let root = MemoryElement::new("div").with_child(MemoryElement::new("em").with_content(" cookies"));
        let span = root.prepend_child("span");
        span.set_content("3");

        assert_eq!(root.first_child().unwrap().tag(), "span");
        assert_eq!(root.text(), "3 cookies");
    }

    #[test]
    fn clones_share_node() {
        let a = MemoryElement::new("div");
        let b = a.clone();
        b.set_attribute("class", "toggle");

        assert!(a.same_node(&b));
        assert_eq!(a.attribute("class").as_deref(), Some("toggle"));
        assert!(!a.same_node(&MemoryElement::new("div")));
    }
}
