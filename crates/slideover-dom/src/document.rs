#![forbid(unsafe_code)]

//! Document handle: active-element pointer and root-level listener
//! registries.
//!
//! # Invariants
//!
//! - Listeners fire in registration order within one `(kind, phase)` pair.
//! - A listener removed during dispatch does not fire later in that same
//!   dispatch (DOM semantics).
//! - `remove_listener` is idempotent; a stale id is ignored.
//! - `focus` dispatches `FocusIn` only when the active element actually
//!   changes.
//!
//! # Failure Modes
//!
//! - Dispatching with no matching listeners is a no-op.
//! - Focusing the already-active element is a no-op (no event).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::element::{Element, Tag};
use crate::event::{DomEvent, EventKind, Phase};

/// Handle returned by [`Document::add_listener`], used to detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    kind: EventKind,
    phase: Phase,
    callback: Rc<dyn Fn(&DomEvent)>,
}

struct DocumentInner {
    body: Element,
    active: RefCell<Option<Element>>,
    listeners: RefCell<Vec<ListenerEntry>>,
    next_listener_id: Cell<u64>,
}

/// Cheap-clone handle to the host document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl Document {
    /// Create a document with an empty `body`. The body starts as the
    /// active element, matching host-environment behavior.
    #[must_use]
    pub fn new() -> Self {
        let body = Element::new(Tag::Body);
        Self {
            inner: Rc::new(DocumentInner {
                active: RefCell::new(Some(body.clone())),
                body,
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(1),
            }),
        }
    }

    /// The document body element.
    #[must_use]
    pub fn body(&self) -> Element {
        self.inner.body.clone()
    }

    /// The currently focused element, if any.
    #[must_use]
    pub fn active_element(&self) -> Option<Element> {
        self.inner.active.borrow().clone()
    }

    /// Register a root-level listener for `(kind, phase)`.
    pub fn add_listener(
        &self,
        kind: EventKind,
        phase: Phase,
        callback: impl Fn(&DomEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.inner.next_listener_id.get());
        self.inner.next_listener_id.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push(ListenerEntry {
            id,
            kind,
            phase,
            callback: Rc::new(callback),
        });
        tracing::trace!(?kind, ?phase, id = id.0, "listener added");
        id
    }

    /// Detach a listener. Returns whether it was still registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|entry| entry.id != id);
        let removed = listeners.len() != before;
        if removed {
            tracing::trace!(id = id.0, "listener removed");
        }
        removed
    }

    /// Number of listeners registered for `(kind, phase)`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind, phase: Phase) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|entry| entry.kind == kind && entry.phase == phase)
            .count()
    }

    /// Move focus to `element`. Dispatches a capture-phase `FocusIn` only
    /// when the active element actually changes.
    pub fn focus(&self, element: &Element) {
        {
            let mut active = self.inner.active.borrow_mut();
            if active.as_ref() == Some(element) {
                return;
            }
            *active = Some(element.clone());
        }
        tracing::trace!(target = element.id(), "focus moved");
        self.dispatch(
            &DomEvent::FocusIn {
                target: element.clone(),
            },
            Phase::Capture,
        );
    }

    /// Dispatch a bubble-phase click with the given original target.
    pub fn dispatch_click(&self, target: &Element) {
        self.dispatch(
            &DomEvent::Click {
                target: target.clone(),
            },
            Phase::Bubble,
        );
    }

    /// Dispatch a bubble-phase key press.
    pub fn dispatch_keydown(&self, key_code: u32) {
        self.dispatch(&DomEvent::KeyDown { key_code }, Phase::Bubble);
    }

    fn dispatch(&self, event: &DomEvent, phase: Phase) {
        let kind = event.kind();
        // Snapshot first: callbacks may add/remove listeners, and holding
        // the registry borrow across a callback would panic.
        let snapshot: Vec<(ListenerId, Rc<dyn Fn(&DomEvent)>)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|entry| entry.kind == kind && entry.phase == phase)
            .map(|entry| (entry.id, Rc::clone(&entry.callback)))
            .collect();

        for (id, callback) in snapshot {
            let still_registered = self
                .inner
                .listeners
                .borrow()
                .iter()
                .any(|entry| entry.id == id);
            if still_registered {
                callback(event);
            }
        }
    }
}
