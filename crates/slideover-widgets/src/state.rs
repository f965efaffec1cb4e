#![forbid(unsafe_code)]

//! Visual state derivation and the widget's output event stream.

use crate::config::{Mode, Position};

/// Discrete visual state of the panel.
///
/// Always a pure function of `(open, animate, position)`; see
/// [`VisualState::derive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    /// Open, transition snaps instantly.
    Expanded,
    /// Open, transition runs the animated arc.
    ExpandedAnimated,
    /// Closed, parked off the given edge.
    Collapsed(Position),
}

impl VisualState {
    /// Derive the visual state from the three inputs that determine it.
    #[must_use]
    pub fn derive(open: bool, animate: bool, position: Position) -> Self {
        if open {
            if animate {
                Self::ExpandedAnimated
            } else {
                Self::Expanded
            }
        } else {
            Self::Collapsed(position)
        }
    }

    /// Whether this state is one of the expanded variants.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Expanded | Self::ExpandedAnimated)
    }
}

/// Raw payload of the animation-boundary outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEvent {
    pub from_state: VisualState,
    pub to_state: VisualState,
}

impl TransitionEvent {
    #[must_use]
    pub fn new(from_state: VisualState, to_state: VisualState) -> Self {
        Self {
            from_state,
            to_state,
        }
    }
}

/// Everything the sidebar reports to the outside world.
///
/// Within one open cycle the order is `OpenChanged(true)` →
/// `AnimationStarted` → `OpenStart` → `AnimationDone` → `Opened`; a close
/// cycle is symmetric with the `Close*` variants. `ModeChanged` fires
/// synchronously with the config change; `PositionChanged` fires from a
/// deferred task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SidebarEvent {
    /// The requested open state flipped (two-way-binding notification).
    OpenChanged(bool),
    /// Raw transition-start report.
    AnimationStarted(TransitionEvent),
    OpenStart,
    Opened,
    CloseStart,
    Closed,
    /// Raw transition-end report.
    AnimationDone(TransitionEvent),
    ModeChanged(Mode),
    PositionChanged(Position),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POSITIONS: [Position; 4] = [
        Position::Left,
        Position::Right,
        Position::Top,
        Position::Bottom,
    ];

    #[test]
    fn closed_parks_at_configured_edge() {
        for position in POSITIONS {
            assert_eq!(
                VisualState::derive(false, true, position),
                VisualState::Collapsed(position)
            );
            assert_eq!(
                VisualState::derive(false, false, position),
                VisualState::Collapsed(position)
            );
        }
    }

    #[test]
    fn open_ignores_position() {
        for position in POSITIONS {
            assert_eq!(
                VisualState::derive(true, true, position),
                VisualState::ExpandedAnimated
            );
            assert_eq!(
                VisualState::derive(true, false, position),
                VisualState::Expanded
            );
        }
    }

    fn any_position() -> impl Strategy<Value = Position> {
        prop_oneof![
            Just(Position::Left),
            Just(Position::Right),
            Just(Position::Top),
            Just(Position::Bottom),
        ]
    }

    proptest! {
        #[test]
        fn derive_is_total_and_consistent(
            open in any::<bool>(),
            animate in any::<bool>(),
            position in any_position(),
        ) {
            let state = VisualState::derive(open, animate, position);
            prop_assert_eq!(state.is_expanded(), open);
            if !open {
                prop_assert_eq!(state, VisualState::Collapsed(position));
            } else if animate {
                prop_assert_eq!(state, VisualState::ExpandedAnimated);
            } else {
                prop_assert_eq!(state, VisualState::Expanded);
            }
        }
    }
}
