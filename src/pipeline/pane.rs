//! Root pane - owns a component tree and routes input through it.
//!
//! The pane is the "nearest enclosing root" of the focus model: it owns the
//! [`FocusChain`], rebuilds the [`SpatialLookupMap`] on every draw and turns
//! the [`InputResult`]s leaves return into focus moves.
//!
//! # Routing
//!
//! ```text
//! event ──► on_input listeners ──(consumed)──► done
//!             │
//!             ▼
//!   key ──► focused leaf          mouse ──► leaf under cursor / capturing leaf
//!             │
//!             ├─ Handled     ──► done
//!             ├─ MoveFocus*  ──► resolve next leaf, set_focus
//!             └─ Unhandled   ──► ancestor input filters ──► on_unhandled_input
//! ```
//!
//! Tree edits go through [`RootPane::edit`] (or the pane's own wrappers) so
//! focus can be dropped as soon as the focused leaf is removed, hidden or
//! disabled.

use std::sync::Arc;

use spark_signals::Signal;
use tracing::debug;

use crate::config::PaneConfig;
use crate::engine::{ComponentTree, FocusChangeDirection, InputResult, NodeId};
use crate::error::Result;
use crate::renderer::Surface;
use crate::state::focus::{FocusChain, FocusChange};
use crate::state::input::InputEvent;
use crate::state::listeners::{isolate, ListenerId, ListenerList};
use crate::state::lookup::SpatialLookupMap;
use crate::state::mouse::{MouseAction, MouseEvent};
use crate::types::{Position, Rect, Size};

/// Pane-level input listener. Return `true` to consume the event.
pub type InputListener = dyn Fn(&InputEvent) -> bool;

pub struct RootPane {
    tree: ComponentTree,
    /// Composite holding the pane's single top-level component.
    root: NodeId,
    config: PaneConfig,
    focus: FocusChain,
    lookup: SpatialLookupMap,
    size: Size,
    /// Leaf that received the last mouse-down, until the matching up.
    mouse_capture: Option<NodeId>,
    input_listeners: ListenerList<InputListener>,
    unhandled_listeners: ListenerList<InputListener>,
}

impl Default for RootPane {
    fn default() -> Self {
        Self::new(PaneConfig::default())
    }
}

impl RootPane {
    pub fn new(config: PaneConfig) -> Self {
        let mut tree = ComponentTree::new();
        let root = tree.create_composite();
        let focus = FocusChain::new().with_gui_thread(config.gui_thread.clone());
        Self {
            tree,
            root,
            config,
            focus,
            lookup: SpatialLookupMap::default(),
            size: Size::ZERO,
            mouse_capture: None,
            input_listeners: ListenerList::new(),
            unhandled_listeners: ListenerList::new(),
        }
    }

    pub fn config(&self) -> &PaneConfig {
        &self.config
    }

    /// Root composite. Its child is the pane's component.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    /// Mutate the tree, then drop focus if the focused leaf can no longer
    /// hold it.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut ComponentTree) -> R) -> R {
        let result = f(&mut self.tree);
        self.sync_focus();
        result
    }

    /// Replace the pane's component. Returns the previous one.
    pub fn set_component(&mut self, component: impl Into<Option<NodeId>>) -> Result<Option<NodeId>> {
        let root = self.root;
        self.edit(|tree| tree.set_component(root, component))
    }

    pub fn component(&self) -> Option<NodeId> {
        self.tree.children(self.root).ok()?.first().copied()
    }

    /// Size of the last layout pass.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn lookup_map(&self) -> &SpatialLookupMap {
        &self.lookup
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn focused(&self) -> Option<NodeId> {
        self.focus.focused()
    }

    /// Reactive view of [`RootPane::focused`].
    pub fn focus_signal(&self) -> Signal<Option<NodeId>> {
        self.focus.signal()
    }

    /// Teleport focus to `target`. `None` clears focus. Returns whether focus
    /// changed.
    pub fn set_focus(&mut self, target: impl Into<Option<NodeId>>) -> bool {
        self.focus
            .set_focus(&mut self.tree, self.root, target.into(), FocusChangeDirection::Teleport)
    }

    pub fn on_focus_change(
        &self,
        listener: impl Fn(&FocusChange) + Send + Sync + 'static,
    ) -> ListenerId {
        self.focus.on_focus_change(listener)
    }

    pub fn remove_focus_listener(&self, id: ListenerId) -> bool {
        self.focus.remove_listener(id)
    }

    /// Clear focus if its holder was removed, hidden or disabled.
    pub fn sync_focus(&mut self) {
        if let Some(focused) = self.focus.focused() {
            if !self.tree.is_focus_candidate(self.root, focused) {
                debug!(%focused, "focused leaf left the pane");
                self.focus.clear(&mut self.tree, self.root);
            }
        }
        if let Some(captured) = self.mouse_capture {
            if !self.tree.exists(captured) {
                self.mouse_capture = None;
            }
        }
    }

    /// Resolve the next leaf in `direction` and focus it. Finding nothing is
    /// not an error: focus stays where it is and this returns false.
    pub fn move_focus(&mut self, direction: FocusChangeDirection) -> bool {
        self.sync_focus();
        let current = self.focus.focused();
        let next = match direction {
            FocusChangeDirection::Next => self
                .tree
                .next_focus(self.root, current)
                .or_else(|| self.wrapped(|tree, root| tree.next_focus(root, None))),
            FocusChangeDirection::Previous => self
                .tree
                .previous_focus(self.root, current)
                .or_else(|| self.wrapped(|tree, root| tree.previous_focus(root, None))),
            FocusChangeDirection::Teleport => None,
            // Nothing to search from: enter the chain at the top
            _ if current.is_none() => self.tree.next_focus(self.root, None),
            _ => {
                let from = self.directional_start(current, direction);
                self.lookup.find_closest(from, direction, current)
            }
        };

        match next {
            Some(next) if Some(next) != current => {
                self.focus.set_focus(&mut self.tree, self.root, Some(next), direction)
            }
            _ => {
                debug!(?direction, "no focus candidate");
                false
            }
        }
    }

    fn wrapped(&self, find: impl FnOnce(&ComponentTree, NodeId) -> Option<NodeId>) -> Option<NodeId> {
        if self.config.wrap_tab_focus {
            find(&self.tree, self.root)
        } else {
            None
        }
    }

    /// Start cell for a geometric search: the leaf's cursor (or its top-left
    /// corner), pushed to the leaf's edge in the direction of travel.
    fn directional_start(&self, current: Option<NodeId>, direction: FocusChangeDirection) -> Position {
        let Some(rect) = current.and_then(|id| self.tree.global_rect(id).ok()) else {
            return Position::ORIGIN;
        };
        let cursor = current
            .and_then(|id| self.tree.widget(id))
            .and_then(|widget| widget.cursor_location())
            .map_or(rect.position, |cursor| cursor.offset_by(rect.position));
        let last_column = rect.right().saturating_sub(1).max(rect.position.column);
        let last_row = rect.bottom().saturating_sub(1).max(rect.position.row);

        match direction {
            FocusChangeDirection::Up => cursor.with_row(rect.position.row),
            FocusChangeDirection::Down => cursor.with_row(last_row),
            FocusChangeDirection::Left => cursor.with_column(rect.position.column),
            FocusChangeDirection::Right => cursor.with_column(last_column),
            _ => cursor,
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Runs before delivery. Returning `true` consumes the event.
    pub fn on_input(&self, listener: impl Fn(&InputEvent) -> bool + 'static) -> ListenerId {
        self.input_listeners.add(Arc::new(listener))
    }

    /// Runs for events nothing else handled. Returning `true` marks the
    /// event handled.
    pub fn on_unhandled_input(
        &self,
        listener: impl Fn(&InputEvent) -> bool + 'static,
    ) -> ListenerId {
        self.unhandled_listeners.add(Arc::new(listener))
    }

    pub fn remove_input_listener(&self, id: ListenerId) -> bool {
        self.input_listeners.remove(id)
    }

    pub fn remove_unhandled_listener(&self, id: ListenerId) -> bool {
        self.unhandled_listeners.remove(id)
    }

    // =========================================================================
    // Layout and drawing
    // =========================================================================

    /// Anything in the pane needs redrawing.
    pub fn is_invalid(&self) -> bool {
        self.tree.is_invalid(self.root)
    }

    /// Fails with [`crate::Error::StaleNode`] if the root was destroyed
    /// through [`RootPane::edit`].
    pub fn invalidate(&mut self) -> Result<()> {
        self.tree.invalidate(self.root)
    }

    /// Lay the pane's component out over `size`.
    pub fn layout(&mut self, size: Size) -> Result<()> {
        self.size = size;
        self.tree.set_position(self.root, Position::ORIGIN)?;
        self.tree.layout(self.root, size)
    }

    /// Lay out to the surface's size, draw, and rebuild the lookup map from
    /// the realized positions.
    pub fn draw(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.sync_focus();
        let size = surface.size();
        self.layout(size)?;
        self.lookup.reset(size);
        self.tree
            .draw(self.root, surface, &mut self.lookup, self.config.theme.as_ref())?;
        debug!(%size, leaves = self.lookup.len(), "pane drawn");
        Ok(())
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Route one event. Returns whether anything handled it.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        self.sync_focus();

        let mut consumed = false;
        for listener in self.input_listeners.snapshot() {
            consumed |= isolate("input listener", || listener(event)).unwrap_or(false);
        }
        if consumed {
            return true;
        }

        match event {
            InputEvent::Key(key) => match self.focus.focused() {
                Some(focused) => self.deliver(focused, event, event),
                None => match key.default_focus_result().focus_direction() {
                    Some(direction) if self.move_focus(direction) => true,
                    _ => self.offer_unhandled(None, event),
                },
            },
            InputEvent::Mouse(mouse) => self.route_mouse(*mouse),
            InputEvent::Resize(size) => {
                debug!(%size, "resize");
                self.invalidate().is_ok()
            }
        }
    }

    /// Hand `delivered` to `target` and act on the result. `original` is
    /// what unhandled-input consumers see.
    fn deliver(&mut self, target: NodeId, delivered: &InputEvent, original: &InputEvent) -> bool {
        let result = self
            .tree
            .widget_mut(target)
            .map_or(InputResult::Unhandled, |widget| widget.handle_input(delivered));

        match result {
            // Redraw the leaf that consumed the event. It was live for
            // widget_mut above, so this only fails if that changes.
            InputResult::Handled => self.tree.invalidate(target).is_ok(),
            InputResult::Unhandled => self.offer_unhandled(Some(target), original),
            other => {
                if let Some(direction) = other.focus_direction() {
                    self.move_focus(direction);
                }
                true
            }
        }
    }

    /// Ancestor input filters (innermost first), then unhandled listeners.
    fn offer_unhandled(&mut self, from: Option<NodeId>, event: &InputEvent) -> bool {
        let mut current = from.and_then(|id| self.tree.parent(id));
        while let Some(container) = current {
            let filtered = isolate("input filter", || self.tree.run_input_filter(container, event));
            if filtered.flatten() == Some(true) {
                return true;
            }
            current = self.tree.parent(container);
        }

        let mut handled = false;
        for listener in self.unhandled_listeners.snapshot() {
            handled |= isolate("unhandled input listener", || listener(event)).unwrap_or(false);
        }
        handled
    }

    fn route_mouse(&mut self, event: MouseEvent) -> bool {
        if self.config.ignore_mouse {
            return false;
        }

        let target = match event.action {
            MouseAction::Down => {
                let hit = self.lookup.get_at(event.position);
                self.mouse_capture = hit;
                if let Some(hit) = hit {
                    if self.config.mouse_focus && self.focus.focused() != Some(hit) {
                        self.focus.set_focus(
                            &mut self.tree,
                            self.root,
                            Some(hit),
                            FocusChangeDirection::Teleport,
                        );
                    }
                }
                hit
            }
            MouseAction::Drag => self.mouse_capture,
            MouseAction::Up => self.mouse_capture.take(),
            MouseAction::Move | MouseAction::Scroll => self.lookup.get_at(event.position),
        };

        let original = InputEvent::Mouse(event);
        let Some(target) = target.filter(|&id| self.tree.exists(id)) else {
            return self.offer_unhandled(None, &original);
        };

        let origin = self
            .tree
            .global_rect(target)
            .map_or(Position::ORIGIN, |rect: Rect| rect.position);
        let local = event
            .position
            .with_relative(-(origin.column as i32), -(origin.row as i32));
        self.deliver(target, &InputEvent::Mouse(event.with_position(local)), &original)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Widget;
    use crate::layout::{GridLayout, LinearLayout};
    use crate::renderer::CellBuffer;
    use crate::state::keyboard::Key;
    use crate::state::mouse::MouseButton;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Consumes 'x', moves focus on Tab and arrows, logs mouse events.
    struct Button {
        name: &'static str,
        log: Log,
    }

    impl Widget for Button {
        fn preferred_size(&self) -> Size {
            Size::new(3, 1)
        }

        fn handle_input(&mut self, event: &InputEvent) -> InputResult {
            match event {
                InputEvent::Key(key) if key.key == Key::Char('x') => {
                    self.log.borrow_mut().push(format!("{} x", self.name));
                    InputResult::Handled
                }
                InputEvent::Key(key) => key.default_focus_result(),
                InputEvent::Mouse(mouse) => {
                    self.log.borrow_mut().push(format!(
                        "{} {:?} {}",
                        self.name, mouse.action, mouse.position
                    ));
                    InputResult::Handled
                }
                InputEvent::Resize(_) => InputResult::Unhandled,
            }
        }
    }

    struct Fixture {
        pane: RootPane,
        column: NodeId,
        buttons: Vec<NodeId>,
        log: Log,
    }

    /// A vertical column of three buttons, drawn on a 10x5 buffer.
    fn fixture(config: PaneConfig) -> Fixture {
        let log: Log = Rc::default();
        let mut pane = RootPane::new(config);
        let (column, buttons) = pane.edit(|tree| {
            let column = tree.create_container(LinearLayout::vertical().with_spacing(1));
            let buttons: Vec<NodeId> = ["a", "b", "c"]
                .into_iter()
                .map(|name| tree.create_leaf(Button { name, log: Rc::clone(&log) }))
                .collect();
            for &button in &buttons {
                tree.add_component(column, button).unwrap();
            }
            (column, buttons)
        });
        pane.set_component(column).unwrap();
        pane.draw(&mut CellBuffer::new(Size::new(10, 5))).unwrap();
        Fixture { pane, column, buttons, log }
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::key(key)
    }

    #[test]
    fn test_tab_cycles_and_wraps() {
        let Fixture { mut pane, buttons, .. } = fixture(PaneConfig::default());
        pane.set_focus(buttons[0]);

        assert!(pane.handle_input(&key(Key::Tab)));
        assert_eq!(pane.focused(), Some(buttons[1]));
        pane.handle_input(&key(Key::Tab));
        pane.handle_input(&key(Key::Tab));
        assert_eq!(pane.focused(), Some(buttons[0]));
        pane.handle_input(&key(Key::BackTab));
        assert_eq!(pane.focused(), Some(buttons[2]));
    }

    #[test]
    fn test_tab_without_wrap_stays_put() {
        let Fixture { mut pane, buttons, .. } =
            fixture(PaneConfig::default().with_wrap_tab_focus(false));
        pane.set_focus(buttons[2]);
        assert!(pane.handle_input(&key(Key::Tab)));
        assert_eq!(pane.focused(), Some(buttons[2]));
    }

    #[test]
    fn test_arrows_use_lookup_map() {
        let Fixture { mut pane, buttons, .. } = fixture(PaneConfig::default());
        pane.set_focus(buttons[0]);
        pane.handle_input(&key(Key::ArrowDown));
        assert_eq!(pane.focused(), Some(buttons[1]));
        pane.handle_input(&key(Key::ArrowDown));
        assert_eq!(pane.focused(), Some(buttons[2]));
        // Nothing further down: focus is retained
        pane.handle_input(&key(Key::ArrowDown));
        assert_eq!(pane.focused(), Some(buttons[2]));
        pane.handle_input(&key(Key::ArrowUp));
        assert_eq!(pane.focused(), Some(buttons[1]));
    }

    #[test]
    fn test_arrows_in_grid() {
        let log: Log = Rc::default();
        let mut pane = RootPane::default();
        let (grid, cells) = pane.edit(|tree| {
            let grid = tree.create_container(GridLayout::new(2));
            let cells: Vec<NodeId> = ["tl", "tr", "bl", "br"]
                .into_iter()
                .map(|name| tree.create_leaf(Button { name, log: Rc::clone(&log) }))
                .collect();
            for &cell in &cells {
                tree.add_component(grid, cell).unwrap();
            }
            (grid, cells)
        });
        pane.set_component(grid).unwrap();
        pane.draw(&mut CellBuffer::new(Size::new(7, 2))).unwrap();

        pane.set_focus(cells[0]);
        pane.handle_input(&key(Key::ArrowRight));
        assert_eq!(pane.focused(), Some(cells[1]));
        pane.handle_input(&key(Key::ArrowDown));
        assert_eq!(pane.focused(), Some(cells[3]));
        pane.handle_input(&key(Key::ArrowLeft));
        assert_eq!(pane.focused(), Some(cells[2]));
        pane.handle_input(&key(Key::ArrowUp));
        assert_eq!(pane.focused(), Some(cells[0]));
    }

    #[test]
    fn test_handled_key_stays_with_leaf() {
        let Fixture { mut pane, buttons, log, .. } = fixture(PaneConfig::default());
        pane.set_focus(buttons[1]);
        assert!(pane.handle_input(&key(Key::Char('x'))));
        assert_eq!(*log.borrow(), vec!["b x"]);
        assert_eq!(pane.focused(), Some(buttons[1]));
    }

    #[test]
    fn test_unhandled_goes_to_filters_then_listeners() {
        let Fixture { mut pane, column, buttons, .. } = fixture(PaneConfig::default());
        pane.set_focus(buttons[0]);

        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&heard);
        pane.on_unhandled_input(move |event| {
            sink.borrow_mut().push(*event);
            false
        });
        assert!(!pane.handle_input(&key(Key::Char('q'))));
        assert_eq!(heard.borrow().len(), 1);

        pane.edit(|tree| {
            tree.set_input_filter(column, |event| {
                event.as_key().is_some_and(|k| k.key == Key::Char('q'))
            })
        })
        .unwrap();
        assert!(pane.handle_input(&key(Key::Char('q'))));
        // Filter consumed it, listener not reached
        assert_eq!(heard.borrow().len(), 1);
    }

    #[test]
    fn test_input_listener_can_consume() {
        let Fixture { mut pane, buttons, log, .. } = fixture(PaneConfig::default());
        pane.set_focus(buttons[0]);
        let id = pane.on_input(|event| event.as_key().is_some_and(|k| k.key == Key::Char('x')));

        assert!(pane.handle_input(&key(Key::Char('x'))));
        assert!(log.borrow().is_empty());

        assert!(pane.remove_input_listener(id));
        pane.handle_input(&key(Key::Char('x')));
        assert_eq!(*log.borrow(), vec!["a x"]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let Fixture { mut pane, buttons, log, .. } = fixture(PaneConfig::default());
        pane.set_focus(buttons[0]);
        pane.on_input(|_| panic!("listener bug"));
        assert!(pane.handle_input(&key(Key::Char('x'))));
        assert_eq!(*log.borrow(), vec!["a x"]);
    }

    #[rstest]
    #[case(Key::Tab, 0)]
    #[case(Key::BackTab, 2)]
    #[case(Key::ArrowDown, 0)]
    fn test_navigation_key_without_focus_enters_chain(#[case] pressed: Key, #[case] expected: usize) {
        let Fixture { mut pane, buttons, .. } = fixture(PaneConfig::default());
        assert!(pane.handle_input(&key(pressed)));
        assert_eq!(pane.focused(), Some(buttons[expected]));
    }

    #[test]
    fn test_key_without_focus_is_unhandled() {
        let Fixture { mut pane, .. } = fixture(PaneConfig::default());
        assert!(!pane.handle_input(&key(Key::Char('x'))));
    }

    #[test]
    fn test_mouse_down_teleports_and_delivers_local() {
        let Fixture { mut pane, buttons, log, .. } = fixture(PaneConfig::default());
        pane.set_focus(buttons[0]);
        let changes = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&changes);
        pane.on_focus_change(move |change| sink.lock().unwrap().push(change.direction));

        // Button c sits on row 4
        let down = InputEvent::Mouse(MouseEvent::down(Position::new(1, 4)));
        assert!(pane.handle_input(&down));
        assert_eq!(pane.focused(), Some(buttons[2]));
        assert_eq!(*changes.lock().unwrap(), vec![FocusChangeDirection::Teleport]);
        assert_eq!(*log.borrow(), vec!["c Down (1, 0)"]);
    }

    #[test]
    fn test_drag_and_up_follow_capture() {
        let Fixture { mut pane, log, .. } = fixture(PaneConfig::default());
        pane.handle_input(&InputEvent::Mouse(MouseEvent::down(Position::new(0, 0))));
        let drag = MouseEvent::new(MouseAction::Drag, MouseButton::Left, Position::new(2, 2));
        pane.handle_input(&InputEvent::Mouse(drag));
        pane.handle_input(&InputEvent::Mouse(MouseEvent::up(Position::new(2, 2))));
        // A second up has no capture and lands nowhere
        assert!(!pane.handle_input(&InputEvent::Mouse(MouseEvent::up(Position::new(2, 2)))));

        assert_eq!(
            *log.borrow(),
            vec!["a Down (0, 0)", "a Drag (2, 2)", "a Up (2, 2)"]
        );
    }

    #[test]
    fn test_mouse_focus_disabled_still_delivers() {
        let Fixture { mut pane, buttons, log, .. } =
            fixture(PaneConfig::default().with_mouse_focus(false));
        pane.set_focus(buttons[0]);
        pane.handle_input(&InputEvent::Mouse(MouseEvent::down(Position::new(0, 2))));
        assert_eq!(pane.focused(), Some(buttons[0]));
        assert_eq!(*log.borrow(), vec!["b Down (0, 0)"]);
    }

    #[test]
    fn test_ignore_mouse() {
        let Fixture { mut pane, log, .. } = fixture(PaneConfig::default().with_ignore_mouse(true));
        assert!(!pane.handle_input(&InputEvent::Mouse(MouseEvent::down(Position::new(0, 0)))));
        assert!(log.borrow().is_empty());
        assert_eq!(pane.focused(), None);
    }

    #[test]
    fn test_disabling_focused_leaf_clears_focus() {
        let Fixture { mut pane, buttons, .. } = fixture(PaneConfig::default());
        pane.set_focus(buttons[1]);
        let changes = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&changes);
        pane.on_focus_change(move |change| sink.lock().unwrap().push(*change));

        pane.edit(|tree| tree.set_enabled(buttons[1], false)).unwrap();
        assert_eq!(pane.focused(), None);
        assert_eq!(
            *changes.lock().unwrap(),
            vec![FocusChange {
                previous: Some(buttons[1]),
                current: None,
                direction: FocusChangeDirection::Teleport,
            }]
        );
    }

    #[test]
    fn test_removing_focused_leaf_clears_focus() {
        let Fixture { mut pane, column, buttons, .. } = fixture(PaneConfig::default());
        pane.set_focus(buttons[2]);
        pane.edit(|tree| tree.destroy(buttons[2])).unwrap();
        assert_eq!(pane.focused(), None);
        assert_eq!(pane.tree().child_count(column).unwrap(), 2);
    }

    #[test]
    fn test_resize_invalidates() {
        let Fixture { mut pane, .. } = fixture(PaneConfig::default());
        assert!(!pane.is_invalid());
        assert!(pane.handle_input(&InputEvent::Resize(Size::new(20, 10))));
        assert!(pane.is_invalid());
    }

    #[test]
    fn test_invalidate_reports_destroyed_root() {
        let Fixture { mut pane, .. } = fixture(PaneConfig::default());
        assert!(pane.invalidate().is_ok());

        let root = pane.root();
        pane.edit(|tree| tree.destroy(root)).unwrap();
        assert!(matches!(pane.invalidate(), Err(crate::Error::StaleNode(_))));
        assert!(!pane.handle_input(&InputEvent::Resize(Size::new(20, 10))));
    }

    #[test]
    fn test_input_and_unhandled_listeners_removed_independently() {
        let Fixture { mut pane, .. } = fixture(PaneConfig::default());
        let calls = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&calls);
        let input = pane.on_input(move |_| {
            sink.borrow_mut().push("input");
            false
        });
        let sink = Rc::clone(&calls);
        let unhandled = pane.on_unhandled_input(move |_| {
            sink.borrow_mut().push("unhandled");
            false
        });
        assert_ne!(input, unhandled);

        // Neither list holds the other's id
        assert!(!pane.remove_input_listener(unhandled));
        assert!(!pane.remove_unhandled_listener(input));

        assert!(pane.remove_unhandled_listener(unhandled));
        pane.handle_input(&key(Key::Char('z')));
        assert_eq!(*calls.borrow(), vec!["input"]);
    }
}
