//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with the pane's event types.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert crossterm MouseEvent to our MouseEvent
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `convert_event` - Whole-event conversion; `None` for events panes ignore
//! - `InputSource` - What the event loop pulls events from
//! - `CrosstermInput` - `InputSource` over the real terminal
//! - `ScriptedInput` - `InputSource` over a queue, for tests and headless use
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! A source that can never produce another event reports
//! [`Error::InputClosed`]; the loop treats that as fatal.

use std::collections::VecDeque;
use std::io::{self, stdout};
use std::time::Duration;

use crossterm::event::{
    self as ct, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;

use crate::error::{Error, Result};
use crate::types::{Position, Size};

use super::keyboard::{Key, KeyState, KeyboardEvent, Modifiers};
use super::mouse::{MouseAction, MouseButton, MouseEvent, ScrollDirection};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// One event delivered to a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyboardEvent),
    Mouse(MouseEvent),
    /// Terminal resized to this size.
    Resize(Size),
}

impl InputEvent {
    pub fn key(key: Key) -> Self {
        InputEvent::Key(KeyboardEvent::new(key))
    }

    pub fn as_key(&self) -> Option<&KeyboardEvent> {
        match self {
            InputEvent::Key(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            InputEvent::Mouse(event) => Some(event),
            _ => None,
        }
    }
}

impl From<KeyboardEvent> for InputEvent {
    fn from(event: KeyboardEvent) -> Self {
        InputEvent::Key(event)
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(event: MouseEvent) -> Self {
        InputEvent::Mouse(event)
    }
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert crossterm MouseEvent to our MouseEvent
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseAction::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => (MouseAction::Scroll, MouseButton::None),
    };

    let scroll = match event.kind {
        MouseEventKind::ScrollUp => Some(ScrollDirection::Up),
        MouseEventKind::ScrollDown => Some(ScrollDirection::Down),
        MouseEventKind::ScrollLeft => Some(ScrollDirection::Left),
        MouseEventKind::ScrollRight => Some(ScrollDirection::Right),
        _ => None,
    };

    MouseEvent {
        action,
        button,
        position: Position::new(event.column, event.row),
        modifiers: convert_modifiers(event.modifiers),
        scroll,
    }
}

/// Convert crossterm MouseButton to our MouseButton
fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab if event.modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        KeyCode::Insert => Key::Insert,
        _ => Key::Unknown,
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

// =============================================================================
// MODIFIER CONVERSION
// =============================================================================

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::SHIFT, mods.contains(KeyModifiers::SHIFT));
    modifiers.set(Modifiers::ALT, mods.contains(KeyModifiers::ALT));
    modifiers.set(Modifiers::CTRL, mods.contains(KeyModifiers::CONTROL));
    modifiers.set(
        Modifiers::META,
        mods.intersects(KeyModifiers::META | KeyModifiers::SUPER),
    );
    modifiers
}

/// Convert a crossterm event. Focus, paste and other events panes don't
/// route come back as `None`.
pub fn convert_event(event: CrosstermEvent) -> Option<InputEvent> {
    match event {
        CrosstermEvent::Key(key) => Some(InputEvent::Key(convert_key_event(key))),
        CrosstermEvent::Mouse(mouse) => Some(InputEvent::Mouse(convert_mouse_event(mouse))),
        CrosstermEvent::Resize(columns, rows) => Some(InputEvent::Resize(Size::new(columns, rows))),
        _ => None,
    }
}

// =============================================================================
// INPUT SOURCES
// =============================================================================

/// Where an event loop pulls input from.
pub trait InputSource {
    /// Wait up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time; [`Error::InputClosed`] means nothing ever will.
    fn poll_input(&mut self, timeout: Duration) -> Result<Option<InputEvent>>;
}

/// Terminal input via crossterm.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl CrosstermInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for CrosstermInput {
    fn poll_input(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        if !ct::poll(timeout).map_err(closed_or_io)? {
            return Ok(None);
        }
        Ok(convert_event(ct::read().map_err(closed_or_io)?))
    }
}

/// A dead terminal stream is a closed source, anything else is plain I/O.
fn closed_or_io(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::UnexpectedEof | io::ErrorKind::BrokenPipe => Error::InputClosed,
        _ => Error::Io(err),
    }
}

/// Replays queued events. Once drained it reports "no event", or
/// [`Error::InputClosed`] if built with [`ScriptedInput::closing`].
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
    close_when_empty: bool,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            close_when_empty: false,
        }
    }

    /// Like [`ScriptedInput::new`], but the source closes once drained.
    pub fn closing(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            close_when_empty: true,
            ..Self::new(events)
        }
    }

    pub fn push(&mut self, event: impl Into<InputEvent>) {
        self.events.push_back(event.into());
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll_input(&mut self, _timeout: Duration) -> Result<Option<InputEvent>> {
        match self.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None if self.close_when_empty => Err(Error::InputClosed),
            None => Ok(None),
        }
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn crossterm_mouse(kind: MouseEventKind, modifiers: KeyModifiers) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column: 10,
            row: 5,
            modifiers,
        }
    }

    #[test]
    fn test_convert_mouse_down() {
        let event = convert_mouse_event(crossterm_mouse(
            MouseEventKind::Down(CrosstermMouseButton::Left),
            KeyModifiers::empty(),
        ));

        assert_eq!(event.action, MouseAction::Down);
        assert_eq!(event.button, MouseButton::Left);
        assert_eq!(event.position, Position::new(10, 5));
        assert!(event.modifiers.is_empty());
        assert!(event.scroll.is_none());
    }

    #[test]
    fn test_convert_mouse_scroll_directions() {
        let directions = [
            (MouseEventKind::ScrollUp, ScrollDirection::Up),
            (MouseEventKind::ScrollDown, ScrollDirection::Down),
            (MouseEventKind::ScrollLeft, ScrollDirection::Left),
            (MouseEventKind::ScrollRight, ScrollDirection::Right),
        ];

        for (kind, expected) in directions {
            let event = convert_mouse_event(crossterm_mouse(kind, KeyModifiers::empty()));
            assert_eq!(event.action, MouseAction::Scroll);
            assert_eq!(event.scroll, Some(expected));
        }
    }

    #[test]
    fn test_convert_mouse_with_modifiers() {
        let event = convert_mouse_event(crossterm_mouse(
            MouseEventKind::Drag(CrosstermMouseButton::Left),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ));

        assert_eq!(event.action, MouseAction::Drag);
        assert_eq!(event.modifiers, Modifiers::CTRL | Modifiers::SHIFT);
    }

    #[test]
    fn test_convert_keys() {
        let key = |code, modifiers| convert_key_event(CrosstermKeyEvent::new(code, modifiers));

        assert_eq!(key(KeyCode::Char('a'), KeyModifiers::NONE).key, Key::Char('a'));
        assert_eq!(key(KeyCode::Tab, KeyModifiers::NONE).key, Key::Tab);
        assert_eq!(key(KeyCode::Tab, KeyModifiers::SHIFT).key, Key::BackTab);
        assert_eq!(key(KeyCode::BackTab, KeyModifiers::SHIFT).key, Key::BackTab);
        assert_eq!(key(KeyCode::Up, KeyModifiers::NONE).key, Key::ArrowUp);
        assert_eq!(key(KeyCode::F(5), KeyModifiers::NONE).key, Key::F(5));
        assert_eq!(key(KeyCode::CapsLock, KeyModifiers::NONE).key, Key::Unknown);

        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(ctrl_c.modifiers.contains(Modifiers::CTRL));
        assert!(ctrl_c.is_press());
    }

    #[test]
    fn test_convert_event_filters_unrouted() {
        assert_eq!(
            convert_event(CrosstermEvent::Resize(80, 24)),
            Some(InputEvent::Resize(Size::new(80, 24)))
        );
        assert_eq!(convert_event(CrosstermEvent::FocusGained), None);
    }

    #[test]
    fn test_scripted_input_closes_when_drained() {
        let mut source = ScriptedInput::closing([InputEvent::key(Key::Enter)]);
        assert_eq!(
            source.poll_input(Duration::ZERO).unwrap(),
            Some(InputEvent::key(Key::Enter))
        );
        assert!(matches!(source.poll_input(Duration::ZERO), Err(Error::InputClosed)));

        let mut open = ScriptedInput::new([]);
        assert_eq!(open.poll_input(Duration::ZERO).unwrap(), None);
    }

    #[test]
    fn test_closed_stream_maps_to_input_closed() {
        let err = closed_or_io(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, Error::InputClosed));
        let err = closed_or_io(io::Error::other("boom"));
        assert!(matches!(err, Error::Io(_)));
    }
}
