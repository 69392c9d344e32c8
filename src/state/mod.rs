//! State Module - focus and input state
//!
//! - **Focus** - the focus chain, its signal and change listeners
//! - **Lookup** - spatial map of focusable leaves, directional search
//! - **Input** - unified input events, crossterm conversion, input sources
//! - **Keyboard** / **Mouse** - event payloads
//! - **Listeners** - ordered, removable, panic-isolated callback lists

pub mod focus;
pub mod input;
pub mod keyboard;
pub mod listeners;
pub mod lookup;
pub mod mouse;

pub use focus::{FocusChain, FocusChange, FocusListener};
pub use input::{CrosstermInput, InputEvent, InputSource, ScriptedInput};
pub use keyboard::{Key, KeyState, KeyboardEvent, Modifiers};
pub use listeners::{ListenerId, ListenerList};
pub use lookup::SpatialLookupMap;
pub use mouse::{MouseAction, MouseButton, MouseEvent, ScrollDirection};
