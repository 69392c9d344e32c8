//! Keyboard events.
//!
//! A [`KeyboardEvent`] is what the router hands to the focused leaf. Keys are
//! a closed enum rather than strings so widgets can match on them.
//!
//! # Example
//!
//! ```
//! use spark_panes::state::keyboard::{Key, KeyboardEvent, Modifiers};
//! use spark_panes::engine::InputResult;
//!
//! let tab = KeyboardEvent::new(Key::Tab);
//! assert_eq!(tab.default_focus_result(), InputResult::MoveFocusNext);
//!
//! let save = KeyboardEvent::with_modifiers(Key::Char('s'), Modifiers::CTRL);
//! assert!(save.modifiers.contains(Modifiers::CTRL));
//! ```

use crate::engine::InputResult;

// =============================================================================
// TYPES
// =============================================================================

/// Logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    /// Shift+Tab as reported by terminals.
    BackTab,
    Backspace,
    Delete,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
    Unknown,
}

bitflags::bitflags! {
    /// Keyboard modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Modifiers: u8 {
        const NONE  = 0;
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        const META  = 1 << 3;
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            state: KeyState::Press,
        }
    }

    pub fn with_state(mut self, state: KeyState) -> Self {
        self.state = state;
        self
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// Result a widget should return for a key it does not consume itself:
    /// Tab and Shift+Tab move through tab order, arrows move geometrically,
    /// everything else is unhandled.
    pub fn default_focus_result(&self) -> InputResult {
        if !self.is_press() && self.state != KeyState::Repeat {
            return InputResult::Unhandled;
        }
        match self.key {
            Key::Tab if self.modifiers.contains(Modifiers::SHIFT) => InputResult::MoveFocusPrevious,
            Key::Tab => InputResult::MoveFocusNext,
            Key::BackTab => InputResult::MoveFocusPrevious,
            Key::ArrowUp => InputResult::MoveFocusUp,
            Key::ArrowDown => InputResult::MoveFocusDown,
            Key::ArrowLeft => InputResult::MoveFocusLeft,
            Key::ArrowRight => InputResult::MoveFocusRight,
            _ => InputResult::Unhandled,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
