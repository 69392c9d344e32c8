//! Focus System - which leaf owns the keyboard
//!
//! One [`FocusChain`] per root pane. It holds the focused leaf in a
//! `spark_signals` signal (so renderers can track it reactively), drives
//! the enter/leave notifications on widgets and fans out [`FocusChange`]s
//! to listeners.
//!
//! # Transition order
//!
//! `set_focus(target, direction)` with `target != current`:
//! 1. `on_leave_focus(direction, target)` on the previous holder
//! 2. `on_enter_focus(direction, previous)` on the new holder
//! 3. the signal is updated
//! 4. focus-change listeners run
//!
//! A hook or listener that panics is logged; the transition still completes.
//!
//! # Example
//!
//! ```ignore
//! let chain = FocusChain::new();
//! let id = chain.on_focus_change(|change| {
//!     println!("{:?} -> {:?}", change.previous, change.current);
//! });
//! chain.set_focus(&mut tree, root, Some(button), FocusChangeDirection::Teleport);
//! chain.remove_listener(id);
//! ```

use std::sync::Arc;

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::engine::{ComponentTree, FocusChangeDirection, NodeId};
use crate::pipeline::GuiThread;

use super::listeners::{isolate, ListenerId, ListenerList};

/// Payload for focus-change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<NodeId>,
    pub current: Option<NodeId>,
    pub direction: FocusChangeDirection,
}

pub type FocusListener = dyn Fn(&FocusChange) + Send + Sync;

pub struct FocusChain {
    focused: Signal<Option<NodeId>>,
    listeners: Arc<ListenerList<FocusListener>>,
    gui_thread: Option<Arc<dyn GuiThread>>,
}

impl Default for FocusChain {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusChain {
    pub fn new() -> Self {
        Self {
            focused: signal(None),
            listeners: Arc::new(ListenerList::new()),
            gui_thread: None,
        }
    }

    /// Listener notifications raised off the GUI thread are posted to it
    /// instead of running inline.
    pub fn with_gui_thread(mut self, gui_thread: Option<Arc<dyn GuiThread>>) -> Self {
        self.gui_thread = gui_thread;
        self
    }

    /// Get the currently focused leaf
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    /// Check if any leaf is focused
    pub fn has_focus(&self) -> bool {
        self.focused().is_some()
    }

    /// The reactive focus state.
    pub fn signal(&self) -> Signal<Option<NodeId>> {
        self.focused.clone()
    }

    pub fn on_focus_change(
        &self,
        listener: impl Fn(&FocusChange) + Send + Sync + 'static,
    ) -> ListenerId {
        self.listeners.add(Arc::new(listener))
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Move focus to `target` (or nowhere with `None`).
    ///
    /// Returns false without side effects when `target` already has focus,
    /// or is not a focus candidate under `root` (stale, disabled, hidden, not
    /// focusable, not a leaf, or outside the pane).
    pub fn set_focus(
        &self,
        tree: &mut ComponentTree,
        root: NodeId,
        target: Option<NodeId>,
        direction: FocusChangeDirection,
    ) -> bool {
        let previous = self.focused();
        if previous == target {
            return false;
        }
        if let Some(target) = target {
            if !tree.is_focus_candidate(root, target) {
                debug!(%target, "focus refused");
                return false;
            }
        }

        if let Some(previous) = previous {
            if let Some(widget) = tree.widget_mut(previous) {
                isolate("focus hook", || widget.on_leave_focus(direction, target));
            }
            tree.set_focused_mirror(previous, false);
        }
        if let Some(target) = target {
            if let Some(widget) = tree.widget_mut(target) {
                isolate("focus hook", || widget.on_enter_focus(direction, previous));
            }
            tree.set_focused_mirror(target, true);
        }
        self.focused.set(target);

        debug!(?previous, current = ?target, ?direction, "focus changed");
        self.notify(FocusChange {
            previous,
            current: target,
            direction,
        });
        true
    }

    /// Drop focus, e.g. because the holder went away.
    pub fn clear(&self, tree: &mut ComponentTree, root: NodeId) -> bool {
        self.set_focus(tree, root, None, FocusChangeDirection::Teleport)
    }

    fn notify(&self, change: FocusChange) {
        if self.listeners.is_empty() {
            return;
        }
        match &self.gui_thread {
            Some(gui) if !gui.is_gui_thread() => {
                let listeners = Arc::clone(&self.listeners);
                let posted = gui.invoke_later(Box::new(move || dispatch(&listeners, &change)));
                if let Err(err) = posted {
                    debug!(%err, "focus notification dropped");
                }
            }
            _ => dispatch(&self.listeners, &change),
        }
    }
}

fn dispatch(listeners: &ListenerList<FocusListener>, change: &FocusChange) {
    for listener in listeners.snapshot() {
        isolate("focus listener", || listener(change));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{InputResult, Widget};
    use crate::layout::LinearLayout;
    use crate::pipeline::{QueuedGuiThread, RootPane};
    use crate::state::input::InputEvent;
    use crate::types::Size;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Mutex;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: Log,
    }

    impl Widget for Probe {
        fn preferred_size(&self) -> Size {
            Size::new(1, 1)
        }

        fn handle_input(&mut self, _event: &InputEvent) -> InputResult {
            InputResult::Unhandled
        }

        fn on_enter_focus(&mut self, direction: FocusChangeDirection, _previous: Option<NodeId>) {
            self.log.borrow_mut().push(format!("enter {} {:?}", self.name, direction));
        }

        fn on_leave_focus(&mut self, direction: FocusChangeDirection, _next: Option<NodeId>) {
            self.log.borrow_mut().push(format!("leave {} {:?}", self.name, direction));
        }
    }

    fn setup() -> (ComponentTree, NodeId, NodeId, NodeId, Log) {
        let log: Log = Rc::default();
        let mut tree = ComponentTree::new();
        let root = tree.create_container(LinearLayout::vertical());
        let a = tree.create_leaf(Probe { name: "a", log: Rc::clone(&log) });
        let b = tree.create_leaf(Probe { name: "b", log: Rc::clone(&log) });
        tree.add_component(root, a).unwrap();
        tree.add_component(root, b).unwrap();
        (tree, root, a, b, log)
    }

    #[test]
    fn test_leave_then_enter() {
        let (mut tree, root, a, b, log) = setup();
        let chain = FocusChain::new();

        assert!(chain.set_focus(&mut tree, root, Some(a), FocusChangeDirection::Teleport));
        assert!(chain.set_focus(&mut tree, root, Some(b), FocusChangeDirection::Next));
        assert_eq!(
            *log.borrow(),
            vec!["enter a Teleport", "leave a Next", "enter b Next"]
        );
        assert_eq!(chain.focused(), Some(b));
        assert!(tree.is_focused(b));
        assert!(!tree.is_focused(a));
    }

    #[test]
    fn test_same_target_is_noop() {
        let (mut tree, root, a, _, log) = setup();
        let chain = FocusChain::new();
        let changes = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&changes);
        chain.on_focus_change(move |_| *counter.lock().unwrap() += 1);

        assert!(chain.set_focus(&mut tree, root, Some(a), FocusChangeDirection::Teleport));
        assert!(!chain.set_focus(&mut tree, root, Some(a), FocusChangeDirection::Teleport));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(*changes.lock().unwrap(), 1);
    }

    #[test]
    fn test_refuses_disabled_and_foreign() {
        let (mut tree, root, a, _, _) = setup();
        let chain = FocusChain::new();
        tree.set_enabled(a, false).unwrap();
        assert!(!chain.set_focus(&mut tree, root, Some(a), FocusChangeDirection::Teleport));

        let outsider = tree.create_leaf(Probe { name: "x", log: Rc::default() });
        assert!(!chain.set_focus(&mut tree, root, Some(outsider), FocusChangeDirection::Teleport));
        assert!(!chain.set_focus(&mut tree, root, Some(root), FocusChangeDirection::Teleport));
        assert_eq!(chain.focused(), None);
    }

    #[test]
    fn test_signal_tracks_focus() {
        let (mut tree, root, a, _, _) = setup();
        let chain = FocusChain::new();
        let focused = chain.signal();
        chain.set_focus(&mut tree, root, Some(a), FocusChangeDirection::Teleport);
        assert_eq!(focused.get(), Some(a));
        chain.clear(&mut tree, root);
        assert_eq!(focused.get(), None);
    }

    #[test]
    fn test_panicking_listener_does_not_block_others() {
        let (mut tree, root, a, _, _) = setup();
        let chain = FocusChain::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        chain.on_focus_change(|_| panic!("faulty listener"));
        let sink = Arc::clone(&seen);
        chain.on_focus_change(move |change| sink.lock().unwrap().push(*change));

        chain.set_focus(&mut tree, root, Some(a), FocusChangeDirection::Teleport);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![FocusChange {
                previous: None,
                current: Some(a),
                direction: FocusChangeDirection::Teleport,
            }]
        );
    }

    struct Sticky;

    impl Widget for Sticky {
        fn preferred_size(&self) -> Size {
            Size::new(1, 1)
        }

        fn handle_input(&mut self, _event: &InputEvent) -> InputResult {
            InputResult::Unhandled
        }

        fn on_leave_focus(&mut self, _direction: FocusChangeDirection, _next: Option<NodeId>) {
            panic!("refuses to let go");
        }
    }

    #[test]
    fn test_panicking_leave_hook_still_moves_focus() {
        let (mut tree, root, _, b, log) = setup();
        let sticky = tree.create_leaf(Sticky);
        tree.add_component(root, sticky).unwrap();
        let chain = FocusChain::new();

        assert!(chain.set_focus(&mut tree, root, Some(sticky), FocusChangeDirection::Teleport));
        assert!(chain.set_focus(&mut tree, root, Some(b), FocusChangeDirection::Next));
        assert_eq!(chain.focused(), Some(b));
        assert!(!tree.is_focused(sticky));
        assert!(tree.is_focused(b));
        assert_eq!(*log.borrow(), vec!["enter b Next"]);
    }

    #[test]
    fn test_off_gui_thread_change_is_posted() {
        // Built on a thread that has since exited, so this one is not the GUI thread
        let gui = std::thread::spawn(QueuedGuiThread::new).join().unwrap();
        let (mut tree, root, a, _, _) = setup();
        let chain = FocusChain::new().with_gui_thread(Some(Arc::new(gui.handle())));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        chain.on_focus_change(move |change| sink.lock().unwrap().push(change.current));

        assert!(chain.set_focus(&mut tree, root, Some(a), FocusChangeDirection::Teleport));
        assert_eq!(chain.focused(), Some(a));
        assert!(seen.lock().unwrap().is_empty());

        assert_eq!(gui.drain(&mut RootPane::default()), 1);
        assert_eq!(*seen.lock().unwrap(), vec![Some(a)]);
    }

    #[test]
    fn test_removed_listener_not_called() {
        let (mut tree, root, a, b, _) = setup();
        let chain = FocusChain::new();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let id = chain.on_focus_change(move |_| *counter.lock().unwrap() += 1);

        chain.set_focus(&mut tree, root, Some(a), FocusChangeDirection::Teleport);
        assert!(chain.remove_listener(id));
        chain.set_focus(&mut tree, root, Some(b), FocusChangeDirection::Next);
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
