//! Mouse events.
//!
//! Positions arrive in pane (global) coordinates. The router rewrites them
//! into the receiving leaf's local coordinates before delivery, see
//! [`MouseEvent::with_position`].

use crate::types::Position;

use super::keyboard::Modifiers;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
    Scroll,
}

/// Mouse button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Mouse event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Action type (down, up, move, drag, scroll)
    pub action: MouseAction,
    /// Button pressed
    pub button: MouseButton,
    pub position: Position,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Only set for scroll events
    pub scroll: Option<ScrollDirection>,
}

impl MouseEvent {
    /// Create a new mouse event
    pub fn new(action: MouseAction, button: MouseButton, position: Position) -> Self {
        Self {
            action,
            button,
            position,
            modifiers: Modifiers::empty(),
            scroll: None,
        }
    }

    /// Left button press at a position.
    pub fn down(position: Position) -> Self {
        Self::new(MouseAction::Down, MouseButton::Left, position)
    }

    /// Left button release at a position.
    pub fn up(position: Position) -> Self {
        Self::new(MouseAction::Up, MouseButton::Left, position)
    }

    pub fn scroll(direction: ScrollDirection, position: Position) -> Self {
        Self {
            scroll: Some(direction),
            ..Self::new(MouseAction::Scroll, MouseButton::None, position)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Same event at another position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}
