#![forbid(unsafe_code)]

//! Focus bookkeeping for the panel: focusable-descendant snapshots,
//! tab-index shadowing while hidden, and the pre-open focus reference.
//!
//! The guard owns data and attribute mutation only; the capture-phase trap
//! listener itself is installed by the [`Sidebar`](crate::Sidebar), which
//! knows the dynamic trap condition (settled, mode, `trap_focus`).
//!
//! # Invariants
//!
//! - The focusable snapshot is rebuilt on every open and every close;
//!   panel content may have changed in between.
//! - The pre-open focus reference is captured only on open and consumed
//!   (restored, then cleared) only on close.
//! - An empty focusable set degrades every focus movement to a no-op.

use slideover_dom::{Document, Element};

/// Shadow attribute holding an element's tab index while the panel keeps
/// it keyboard-unreachable.
pub const PREV_TAB_INDEX_ATTR: &str = "data-prev-tabindex";

/// Rebuilt-on-demand focus scratch state for one panel.
#[derive(Debug, Default)]
pub struct FocusGuard {
    focusables: Vec<Element>,
    focus_before_open: Option<Element>,
}

impl FocusGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the focusable snapshot from the panel subtree.
    pub fn rescan(&mut self, panel_root: &Element) {
        self.focusables = panel_root.query_focusable();
        tracing::trace!(count = self.focusables.len(), "focusables rescanned");
    }

    /// Drop the snapshot (no panel root to scan).
    pub fn clear(&mut self) {
        self.focusables.clear();
    }

    /// First focusable element of the current snapshot.
    #[must_use]
    pub fn first_focusable(&self) -> Option<Element> {
        self.focusables.first().cloned()
    }

    /// Remember the host document's active element as the restore target.
    pub fn capture_prior_focus(&mut self, document: &Document) {
        self.focus_before_open = document.active_element();
    }

    /// Consume the restore target captured on open.
    #[must_use]
    pub fn take_prior_focus(&mut self) -> Option<Element> {
        self.focus_before_open.take()
    }

    /// Undo [`suppress_focusability`](Self::suppress_focusability): put a
    /// shadowed tab index back, or strip the attribute when nothing was
    /// shadowed.
    pub fn restore_focusability(&self) {
        for el in &self.focusables {
            match el.attribute(PREV_TAB_INDEX_ATTR) {
                Some(prev) => {
                    el.set_attribute("tabindex", &prev);
                    el.remove_attribute(PREV_TAB_INDEX_ATTR);
                }
                None => el.remove_attribute("tabindex"),
            }
        }
    }

    /// Make every snapshotted element keyboard-unreachable while the panel
    /// is hidden, shadowing any existing tab index first.
    pub fn suppress_focusability(&self) {
        for el in &self.focusables {
            if let Some(existing) = el.attribute("tabindex") {
                el.set_attribute(PREV_TAB_INDEX_ATTR, &existing);
            }
            el.set_attribute("tabindex", "-1");
        }
    }
}
