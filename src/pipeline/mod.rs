//! Pipeline - the single-threaded input → layout → draw cycle.
//!
//! ```text
//! InputSource ──► EventLoop::tick ──► RootPane::handle_input ──► focus moves
//!                      │
//!                      ├── QueuedGuiThread::drain (tasks from other threads)
//!                      └── RootPane::draw ──► layout ──► widgets ──► lookup map
//! ```

pub mod event_loop;
pub mod gui_thread;
pub mod pane;

pub use event_loop::{EventLoop, StopHandle};
pub use gui_thread::{GuiHandle, GuiThread, PaneTask, QueuedGuiThread, Task};
pub use pane::{InputListener, RootPane};
