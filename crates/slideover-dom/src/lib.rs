#![forbid(unsafe_code)]

//! Host document model for the slideover widget.
//!
//! The widget crate never talks to a real UI toolkit directly; it talks to
//! this small DOM-like surface instead:
//!
//! - [`Element`]: a node in the host element tree with attributes, layout
//!   size, and the interactive-element (focusability) predicate.
//! - [`Document`]: the root handle owning the active-element pointer and
//!   the root-level listener registries (capture phase for focus, bubble
//!   phase for click/keydown).
//! - [`DomEvent`]: the three event shapes the widget consumes.
//!
//! Everything is single-threaded and `Rc`-based; handles are cheap clones
//! sharing one node.

pub mod document;
pub mod element;
pub mod event;

pub use document::{Document, ListenerId};
pub use element::{Element, Tag};
pub use event::{DomEvent, EventKind, Phase};
