//! Event loop - one iteration per input batch.
//!
//! Each [`EventLoop::tick`]:
//!
//! 1. Runs the tasks queued on the GUI thread, giving pane tasks the pane so
//!    their edits are laid out this frame
//! 2. Waits up to the poll timeout for input, then drains whatever else is
//!    already pending and routes it through the pane
//! 3. Redraws when the pane is invalid or the buffer changed size
//!
//! [`EventLoop::run`] repeats that until stopped or the input source closes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::renderer::{CellBuffer, Surface};
use crate::state::input::{InputEvent, InputSource};

use super::gui_thread::{GuiHandle, QueuedGuiThread};
use super::pane::RootPane;

const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Cloneable flag that ends [`EventLoop::run`] from any thread.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct EventLoop {
    gui: QueuedGuiThread,
    running: Arc<AtomicBool>,
    poll_timeout: Duration,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// The calling thread becomes the GUI thread.
    pub fn new() -> Self {
        Self {
            gui: QueuedGuiThread::new(),
            running: Arc::new(AtomicBool::new(true)),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Handle for scheduling work on this loop. Pass it to
    /// [`crate::PaneConfig::with_gui_thread`] so focus listeners run here.
    pub fn handle(&self) -> GuiHandle {
        self.gui.handle()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.running))
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// One iteration. Returns whether the pane was redrawn.
    pub fn tick(
        &mut self,
        pane: &mut RootPane,
        input: &mut dyn InputSource,
        buffer: &mut CellBuffer,
    ) -> Result<bool> {
        self.gui.drain(pane);

        let mut timeout = self.poll_timeout;
        while let Some(event) = input.poll_input(timeout)? {
            if let InputEvent::Resize(size) = event {
                buffer.resize(size);
            }
            pane.handle_input(&event);
            timeout = Duration::ZERO;
        }

        // Tasks posted while routing (e.g. focus notifications) run before
        // the frame is drawn.
        self.gui.drain(pane);

        if pane.is_invalid() || pane.size() != buffer.size() {
            buffer.clear();
            pane.draw(buffer)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Tick until [`EventLoop::stop`]. A closed input source ends the loop
    /// with [`Error::InputClosed`].
    pub fn run(
        &mut self,
        pane: &mut RootPane,
        input: &mut dyn InputSource,
        buffer: &mut CellBuffer,
    ) -> Result<()> {
        info!("event loop started");
        while self.is_running() {
            if let Err(err) = self.tick(pane, input, buffer) {
                self.stop();
                if matches!(err, Error::InputClosed) {
                    debug!("input closed");
                }
                info!("event loop stopped");
                return Err(err);
            }
        }
        info!("event loop stopped");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
