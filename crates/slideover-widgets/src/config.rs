#![forbid(unsafe_code)]

//! Sidebar configuration and change detection.

use bitflags::bitflags;

/// ESCAPE key code, the default dismissal key.
pub const KEY_CODE_ESCAPE: u32 = 27;

/// How the panel relates to the rest of the surface while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Panel overlays the surface; focus containment is enforced.
    #[default]
    Over,
    /// Panel pushes the surface aside; the rest stays interactive.
    Push,
}

/// Edge the panel is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

/// Immutable-per-update sidebar configuration.
///
/// Updates are discrete events handed to
/// [`Sidebar::apply_config`](crate::Sidebar::apply_config); the widget
/// branches on the computed [`ConfigChanges`] diff, not on continuous
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SidebarConfig {
    /// Requested/target open state.
    pub open: bool,
    pub mode: Mode,
    pub position: Position,
    /// Close when a click lands outside the panel root.
    pub close_on_click_outside: bool,
    /// Show the dimming backdrop while open.
    pub show_backdrop: bool,
    /// Animate open/close transitions.
    pub animate: bool,
    /// Trap keyboard focus inside the panel while settled-open in
    /// [`Mode::Over`].
    pub trap_focus: bool,
    /// Move focus into the panel on open and restore it on close.
    pub auto_focus: bool,
    /// Close when the dismissal key is pressed.
    pub key_close: bool,
    /// Key code compared against key presses when `key_close` is set.
    pub dismiss_key_code: u32,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            open: false,
            mode: Mode::Over,
            position: Position::Left,
            close_on_click_outside: false,
            show_backdrop: false,
            animate: true,
            trap_focus: true,
            auto_focus: true,
            key_close: false,
            dismiss_key_code: KEY_CODE_ESCAPE,
        }
    }
}

impl SidebarConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn close_on_click_outside(mut self, close: bool) -> Self {
        self.close_on_click_outside = close;
        self
    }

    #[must_use]
    pub fn show_backdrop(mut self, show: bool) -> Self {
        self.show_backdrop = show;
        self
    }

    #[must_use]
    pub fn animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    #[must_use]
    pub fn trap_focus(mut self, trap: bool) -> Self {
        self.trap_focus = trap;
        self
    }

    #[must_use]
    pub fn auto_focus(mut self, auto: bool) -> Self {
        self.auto_focus = auto;
        self
    }

    #[must_use]
    pub fn key_close(mut self, close: bool) -> Self {
        self.key_close = close;
        self
    }

    #[must_use]
    pub fn dismiss_key_code(mut self, code: u32) -> Self {
        self.dismiss_key_code = code;
        self
    }
}

bitflags! {
    /// Which configuration fields changed between two updates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConfigChanges: u16 {
        const OPEN = 1 << 0;
        const MODE = 1 << 1;
        const POSITION = 1 << 2;
        const CLOSE_ON_CLICK_OUTSIDE = 1 << 3;
        const SHOW_BACKDROP = 1 << 4;
        const ANIMATE = 1 << 5;
        const TRAP_FOCUS = 1 << 6;
        const AUTO_FOCUS = 1 << 7;
        const KEY_CLOSE = 1 << 8;
        const DISMISS_KEY_CODE = 1 << 9;
    }
}

impl ConfigChanges {
    /// Field-by-field diff between two configurations.
    #[must_use]
    pub fn between(old: &SidebarConfig, new: &SidebarConfig) -> Self {
        let mut changes = Self::empty();
        if old.open != new.open {
            changes |= Self::OPEN;
        }
        if old.mode != new.mode {
            changes |= Self::MODE;
        }
        if old.position != new.position {
            changes |= Self::POSITION;
        }
        if old.close_on_click_outside != new.close_on_click_outside {
            changes |= Self::CLOSE_ON_CLICK_OUTSIDE;
        }
        if old.show_backdrop != new.show_backdrop {
            changes |= Self::SHOW_BACKDROP;
        }
        if old.animate != new.animate {
            changes |= Self::ANIMATE;
        }
        if old.trap_focus != new.trap_focus {
            changes |= Self::TRAP_FOCUS;
        }
        if old.auto_focus != new.auto_focus {
            changes |= Self::AUTO_FOCUS;
        }
        if old.key_close != new.key_close {
            changes |= Self::KEY_CLOSE;
        }
        if old.dismiss_key_code != new.dismiss_key_code {
            changes |= Self::DISMISS_KEY_CODE;
        }
        changes
    }
}
