#![forbid(unsafe_code)]

//! Element tree nodes with attributes, layout, and the focusability predicate.

use ahash::AHashMap;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for unique element IDs.
static ELEMENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Element tag. Covers every tag the interactive-element predicate cares
/// about plus a few structural ones; anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Anchor,
    Area,
    Input,
    Select,
    TextArea,
    Button,
    IFrame,
    ObjectEl,
    Embed,
    Body,
    Aside,
    Div,
    Other,
}

struct ElementNode {
    id: u64,
    tag: Tag,
    parent: RefCell<Weak<ElementNode>>,
    children: RefCell<Vec<Element>>,
    attributes: RefCell<AHashMap<String, String>>,
    /// Layout size in pixels, `(width, height)`. Set by the host after
    /// layout; defaults to zero so size queries on unmounted content
    /// degrade to a neutral value.
    layout: Cell<(u32, u32)>,
}

/// Cheap-clone handle to a node in the host element tree.
///
/// Two handles compare equal iff they refer to the same node.
#[derive(Clone)]
pub struct Element {
    node: Rc<ElementNode>,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Element {}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.node.id)
            .field("tag", &self.node.tag)
            .finish()
    }
}

impl Element {
    /// Create a detached element with the given tag.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            node: Rc::new(ElementNode {
                id: ELEMENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
                tag,
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
                attributes: RefCell::new(AHashMap::new()),
                layout: Cell::new((0, 0)),
            }),
        }
    }

    /// Unique id of the underlying node.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.node.id
    }

    /// The element's tag.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.node.tag
    }

    /// Append `child` to this element. A child already attached elsewhere
    /// is re-parented.
    pub fn append_child(&self, child: &Element) {
        if let Some(old_parent) = child.parent() {
            old_parent
                .node
                .children
                .borrow_mut()
                .retain(|c| c != child);
        }
        *child.node.parent.borrow_mut() = Rc::downgrade(&self.node);
        self.node.children.borrow_mut().push(child.clone());
    }

    /// The element's parent, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Element> {
        self.node.parent.borrow().upgrade().map(|node| Element { node })
    }

    /// Direct children, in insertion order.
    #[must_use]
    pub fn children(&self) -> Vec<Element> {
        self.node.children.borrow().clone()
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.node.attributes.borrow().get(name).cloned()
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&self, name: &str, value: &str) {
        self.node
            .attributes
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
    }

    /// Remove an attribute. Removing an absent attribute is a no-op.
    pub fn remove_attribute(&self, name: &str) {
        self.node.attributes.borrow_mut().remove(name);
    }

    /// Whether the attribute is present (regardless of value).
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.node.attributes.borrow().contains_key(name)
    }

    /// Set the layout size reported by [`width`](Self::width) /
    /// [`height`](Self::height).
    pub fn set_layout_size(&self, width: u32, height: u32) {
        self.node.layout.set((width, height));
    }

    /// Laid-out width in pixels (zero before layout).
    #[must_use]
    pub fn width(&self) -> u32 {
        self.node.layout.get().0
    }

    /// Laid-out height in pixels (zero before layout).
    #[must_use]
    pub fn height(&self) -> u32 {
        self.node.layout.get().1
    }

    /// Inclusive ancestry test: whether `other` is this element or one of
    /// its descendants.
    #[must_use]
    pub fn contains(&self, other: &Element) -> bool {
        let mut current = Some(other.clone());
        while let Some(el) = current {
            if el == *self {
                return true;
            }
            current = el.parent();
        }
        false
    }

    /// The standard interactive-element predicate: links/areas with an
    /// `href`, non-disabled form controls, embedded frames/objects, and
    /// anything bearing a `tabindex` or `contenteditable` attribute.
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        if self.has_attribute("tabindex") || self.has_attribute("contenteditable") {
            return true;
        }
        match self.node.tag {
            Tag::Anchor | Tag::Area => self.has_attribute("href"),
            Tag::Input | Tag::Select | Tag::TextArea | Tag::Button => {
                !self.has_attribute("disabled")
            }
            Tag::IFrame | Tag::ObjectEl | Tag::Embed => true,
            _ => false,
        }
    }

    /// Focusable strict descendants in document (preorder) order.
    #[must_use]
    pub fn query_focusable(&self) -> Vec<Element> {
        let mut out = Vec::new();
        for child in self.node.children.borrow().iter() {
            child.collect_focusable(&mut out);
        }
        out
    }

    fn collect_focusable(&self, out: &mut Vec<Element>) {
        if self.is_focusable() {
            out.push(self.clone());
        }
        for child in self.node.children.borrow().iter() {
            child.collect_focusable(out);
        }
    }
}
