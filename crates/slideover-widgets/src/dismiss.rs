#![forbid(unsafe_code)]

//! Dismissal listener slots: outside-click and dismiss-key global
//! listeners with idempotent attach/detach.
//!
//! A slot is attached iff it holds a [`ListenerId`]; detaching always
//! clears the slot, and attaching an occupied slot is a no-op, so there is
//! never more than one live listener of a kind no matter how many times an
//! install is scheduled.
//!
//! The handlers themselves are supplied by the [`Sidebar`](crate::Sidebar),
//! which routes both through its single close-request entry point.

use slideover_dom::{Document, DomEvent, EventKind, ListenerId, Phase};

/// The two dismissal listener slots for one panel.
#[derive(Debug, Default)]
pub struct DismissalListeners {
    click: Option<ListenerId>,
    key: Option<ListenerId>,
}

impl DismissalListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the outside-click listener is attached.
    #[must_use]
    pub fn click_attached(&self) -> bool {
        self.click.is_some()
    }

    /// Whether the dismiss-key listener is attached.
    #[must_use]
    pub fn key_attached(&self) -> bool {
        self.key.is_some()
    }

    /// Attach the outside-click listener unless already attached.
    pub fn attach_click(&mut self, document: &Document, handler: impl Fn(&DomEvent) + 'static) {
        if self.click.is_none() {
            self.click = Some(document.add_listener(EventKind::Click, Phase::Bubble, handler));
            tracing::debug!("outside-click listener attached");
        }
    }

    /// Attach the dismiss-key listener unless already attached.
    pub fn attach_key(&mut self, document: &Document, handler: impl Fn(&DomEvent) + 'static) {
        if self.key.is_none() {
            self.key = Some(document.add_listener(EventKind::KeyDown, Phase::Bubble, handler));
            tracing::debug!("dismiss-key listener attached");
        }
    }

    /// Detach the outside-click listener if attached.
    pub fn detach_click(&mut self, document: &Document) {
        if let Some(id) = self.click.take() {
            document.remove_listener(id);
            tracing::debug!("outside-click listener detached");
        }
    }

    /// Detach the dismiss-key listener if attached.
    pub fn detach_key(&mut self, document: &Document) {
        if let Some(id) = self.key.take() {
            document.remove_listener(id);
            tracing::debug!("dismiss-key listener detached");
        }
    }

    /// Detach both listeners unconditionally. Safe when nothing is
    /// attached.
    pub fn tear_down(&mut self, document: &Document) {
        self.detach_click(document);
        self.detach_key(document);
    }
}
