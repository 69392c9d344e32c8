//! GUI thread - marshal work onto the one thread that owns the UI.
//!
//! Layout, drawing and input routing all run on a single thread. Other
//! threads hand it closures:
//!
//! - `invoke_later` queues a task for the next loop iteration
//! - `invoke_and_wait` queues a task and blocks until it has run, or runs it
//!   inline when called from the GUI thread itself
//! - `invoke_on_pane` queues a task that gets the [`RootPane`] itself, for
//!   tree edits that the next layout must see
//!
//! [`QueuedGuiThread`] is the loop-side end of an mpsc queue; its
//! [`GuiHandle`]s are the cloneable, thread-safe ends everybody else holds.
//! A queued task always runs eventually unless the GUI thread goes away
//! first. Each drain runs only what was queued when it started; tasks posted
//! by those tasks wait for the next iteration.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, ThreadId};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::state::listeners::isolate;

use super::pane::RootPane;

/// Unit of work for the GUI thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Unit of work that needs the pane the loop is driving.
pub type PaneTask = Box<dyn FnOnce(&mut RootPane) + Send + 'static>;

enum Job {
    Plain(Task),
    Pane(PaneTask),
}

/// Scheduler contract used by panes and widgets.
pub trait GuiThread: Send + Sync {
    /// Queue `task` for the GUI thread.
    fn invoke_later(&self, task: Task) -> Result<()>;

    /// Run `task` on the GUI thread and wait for it to finish.
    fn invoke_and_wait(&self, task: Task) -> Result<()>;

    /// Whether the caller is running on the GUI thread.
    fn is_gui_thread(&self) -> bool;
}

// =============================================================================
// QueuedGuiThread
// =============================================================================

/// Loop-side end of the task queue, bound to the thread that created it.
pub struct QueuedGuiThread {
    owner: ThreadId,
    sender: Sender<Job>,
    receiver: Receiver<Job>,
}

impl Default for QueuedGuiThread {
    fn default() -> Self {
        Self::new()
    }
}

impl QueuedGuiThread {
    /// The calling thread becomes the GUI thread.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            owner: thread::current().id(),
            sender,
            receiver,
        }
    }

    /// A handle other threads can use to post work.
    pub fn handle(&self) -> GuiHandle {
        GuiHandle {
            owner: self.owner,
            sender: self.sender.clone(),
        }
    }

    /// Run the tasks queued so far in FIFO order, handing pane tasks
    /// `pane`. A panicking task is logged and skipped. Returns the number of
    /// tasks run.
    pub fn drain(&self, pane: &mut RootPane) -> usize {
        let jobs: Vec<Job> = self.receiver.try_iter().collect();
        let ran = jobs.len();
        for job in jobs {
            match job {
                Job::Plain(task) => {
                    isolate("gui task", task);
                }
                Job::Pane(task) => {
                    isolate("pane task", || task(&mut *pane));
                }
            }
        }
        if ran > 0 {
            trace!(ran, "drained gui tasks");
        }
        ran
    }
}

// The receiver is not `Sync`, so the loop side exposes the scheduler
// operations directly instead of implementing `GuiThread`.
impl QueuedGuiThread {
    pub fn invoke_later(&self, task: Task) -> Result<()> {
        self.sender.send(Job::Plain(task)).map_err(|_| Error::GuiThreadStopped)
    }

    pub fn invoke_on_pane(&self, task: impl FnOnce(&mut RootPane) + Send + 'static) -> Result<()> {
        self.handle().invoke_on_pane(task)
    }

    pub fn invoke_and_wait(&self, task: Task) -> Result<()> {
        self.handle().invoke_and_wait(task)
    }

    pub fn is_gui_thread(&self) -> bool {
        thread::current().id() == self.owner
    }
}

// =============================================================================
// GuiHandle
// =============================================================================

/// Cloneable, `Send + Sync` end of a [`QueuedGuiThread`].
#[derive(Clone)]
pub struct GuiHandle {
    owner: ThreadId,
    sender: Sender<Job>,
}

impl GuiHandle {
    /// Queue `task` to run against the pane on the next iteration, before
    /// input is routed and the frame is drawn.
    pub fn invoke_on_pane(&self, task: impl FnOnce(&mut RootPane) + Send + 'static) -> Result<()> {
        self.sender
            .send(Job::Pane(Box::new(task)))
            .map_err(|_| Error::GuiThreadStopped)
    }
}

impl std::fmt::Debug for GuiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuiHandle").field("owner", &self.owner).finish()
    }
}

impl GuiThread for GuiHandle {
    fn invoke_later(&self, task: Task) -> Result<()> {
        self.sender.send(Job::Plain(task)).map_err(|_| Error::GuiThreadStopped)
    }

    fn invoke_and_wait(&self, task: Task) -> Result<()> {
        if self.is_gui_thread() {
            // Queueing here would deadlock: the queue is only drained by us
            return match isolate("gui task", task) {
                Some(()) => Ok(()),
                None => Err(Error::TaskPanicked),
            };
        }

        let (done, finished) = mpsc::sync_channel::<bool>(1);
        self.invoke_later(Box::new(move || {
            let ok = isolate("gui task", task).is_some();
            let _ = done.send(ok);
        }))?;

        debug!("waiting on gui thread");
        match finished.recv() {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::TaskPanicked),
            // Queue dropped with our task still in it
            Err(_) => Err(Error::GuiThreadStopped),
        }
    }

    fn is_gui_thread(&self) -> bool {
        thread::current().id() == self.owner
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LinearLayout;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_drain_runs_fifo() {
        let gui = QueuedGuiThread::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let order = Arc::clone(&order);
            gui.invoke_later(Box::new(move || order.lock().unwrap().push(i)))
                .unwrap();
        }
        let mut pane = RootPane::default();
        assert_eq!(gui.drain(&mut pane), 3);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(gui.drain(&mut pane), 0);
    }

    #[test]
    fn test_panicking_task_does_not_stop_drain() {
        let gui = QueuedGuiThread::new();
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        gui.invoke_later(Box::new(|| panic!("bad task"))).unwrap();
        gui.invoke_later(Box::new(move || *flag.lock().unwrap() = true))
            .unwrap();
        assert_eq!(gui.drain(&mut RootPane::default()), 2);
        assert!(*ran.lock().unwrap());
    }

    #[test]
    fn test_invoke_and_wait_inline_on_gui_thread() {
        let gui = QueuedGuiThread::new();
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        gui.invoke_and_wait(Box::new(move || *flag.lock().unwrap() = true))
            .unwrap();
        assert!(*ran.lock().unwrap());
        assert_eq!(gui.drain(&mut RootPane::default()), 0);
    }

    #[test]
    fn test_invoke_and_wait_from_worker_blocks_until_drained() {
        let gui = QueuedGuiThread::new();
        let handle = gui.handle();
        let value = Arc::new(Mutex::new(0));
        let target = Arc::clone(&value);

        let worker = thread::spawn(move || {
            assert!(!handle.is_gui_thread());
            handle.invoke_and_wait(Box::new(move || *target.lock().unwrap() = 42))
        });

        // Keep draining until the worker's task has gone through
        let mut pane = RootPane::default();
        while !worker.is_finished() {
            gui.drain(&mut pane);
            thread::yield_now();
        }
        worker.join().unwrap().unwrap();
        assert_eq!(*value.lock().unwrap(), 42);
    }

    fn tick_forever(handle: GuiHandle, runs: Arc<AtomicUsize>) {
        let next = handle.clone();
        handle
            .invoke_later(Box::new(move || {
                runs.fetch_add(1, Ordering::SeqCst);
                tick_forever(next, runs);
            }))
            .unwrap();
    }

    #[test]
    fn test_reposted_task_waits_for_next_drain() {
        let gui = QueuedGuiThread::new();
        let runs = Arc::new(AtomicUsize::new(0));
        tick_forever(gui.handle(), Arc::clone(&runs));

        let mut pane = RootPane::default();
        assert_eq!(gui.drain(&mut pane), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(gui.drain(&mut pane), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_pane_task_runs_against_drained_pane() {
        let gui = QueuedGuiThread::new();
        let handle = gui.handle();
        let worker = thread::spawn(move || {
            handle.invoke_on_pane(|pane| {
                let column = pane.edit(|tree| tree.create_container(LinearLayout::vertical()));
                pane.set_component(column).unwrap();
            })
        });
        worker.join().unwrap().unwrap();

        let mut pane = RootPane::default();
        let before = pane.component();
        assert_eq!(gui.drain(&mut pane), 1);
        assert_ne!(pane.component(), before);
        assert!(pane.component().is_some());
    }

    #[test]
    fn test_panicking_pane_task_is_isolated() {
        let gui = QueuedGuiThread::new();
        gui.invoke_on_pane(|_| panic!("bad edit")).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ran);
        gui.invoke_on_pane(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert_eq!(gui.drain(&mut RootPane::default()), 2);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stopped_gui_thread() {
        let gui = QueuedGuiThread::new();
        let handle = gui.handle();
        drop(gui);

        let err = thread::spawn(move || handle.invoke_and_wait(Box::new(|| {})))
            .join()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, Error::GuiThreadStopped));
    }
}
