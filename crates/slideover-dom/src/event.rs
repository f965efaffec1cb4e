#![forbid(unsafe_code)]

//! Event shapes dispatched through the [`Document`](crate::Document).

use crate::element::Element;

/// Listener registry selector: which event stream a listener joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer click, dispatched at the document root.
    Click,
    /// Key press, dispatched at the document root.
    KeyDown,
    /// Focus landing on an element.
    FocusIn,
}

/// Dispatch phase a listener is registered for.
///
/// The widget registers its focus trap in the capture phase and its
/// dismissal listeners in the bubble phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Capture,
    Bubble,
}

/// An event delivered to a registered listener.
#[derive(Debug, Clone)]
pub enum DomEvent {
    /// A click whose original target is `target`.
    Click { target: Element },
    /// A key press identified by its numeric key code.
    KeyDown { key_code: u32 },
    /// Focus moved to `target`.
    FocusIn { target: Element },
}

impl DomEvent {
    /// The registry this event is dispatched to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Click { .. } => EventKind::Click,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::FocusIn { .. } => EventKind::FocusIn,
        }
    }
}
