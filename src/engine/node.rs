//! Node storage and the capabilities concrete widgets plug in.
//!
//! A node is one of three kinds:
//! - **Leaf**: wraps a [`Widget`]; the only kind that can hold focus
//! - **Container**: ordered children placed by a [`LayoutManager`]
//! - **Composite**: at most one child, wrapped by a [`Decorator`]

use crate::config::ThemeId;
use crate::layout::{LayoutData, LayoutManager};
use crate::renderer::Surface;
use crate::state::input::InputEvent;
use crate::types::{Position, Rect, Size};

use super::registry::NodeId;

// =============================================================================
// RESULT AND DIRECTION VOCABULARY
// =============================================================================

/// What a leaf did with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputResult {
    /// Consumed.
    Handled,
    /// Not consumed; the pane may offer it elsewhere.
    #[default]
    Unhandled,
    MoveFocusNext,
    MoveFocusPrevious,
    MoveFocusUp,
    MoveFocusDown,
    MoveFocusLeft,
    MoveFocusRight,
}

impl InputResult {
    /// The focus move this result requests, if any.
    pub fn focus_direction(self) -> Option<FocusChangeDirection> {
        match self {
            InputResult::Handled | InputResult::Unhandled => None,
            InputResult::MoveFocusNext => Some(FocusChangeDirection::Next),
            InputResult::MoveFocusPrevious => Some(FocusChangeDirection::Previous),
            InputResult::MoveFocusUp => Some(FocusChangeDirection::Up),
            InputResult::MoveFocusDown => Some(FocusChangeDirection::Down),
            InputResult::MoveFocusLeft => Some(FocusChangeDirection::Left),
            InputResult::MoveFocusRight => Some(FocusChangeDirection::Right),
        }
    }
}

/// How focus moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusChangeDirection {
    /// Tab order forward.
    Next,
    /// Tab order backward.
    Previous,
    Up,
    Down,
    Left,
    Right,
    /// Not a traversal: mouse click, programmatic focus, or focus lost
    /// because the holder went away.
    Teleport,
}

impl FocusChangeDirection {
    /// Up, Down, Left or Right.
    pub fn is_geometric(self) -> bool {
        matches!(
            self,
            FocusChangeDirection::Up
                | FocusChangeDirection::Down
                | FocusChangeDirection::Left
                | FocusChangeDirection::Right
        )
    }
}

// =============================================================================
// WIDGET CAPABILITIES
// =============================================================================

/// State handed to widgets while drawing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawContext {
    pub focused: bool,
    pub enabled: bool,
    /// Theme resolved through the parent chain.
    pub theme: Option<ThemeId>,
}

/// A concrete leaf component (button, text box, ...).
///
/// Only [`Widget::preferred_size`] is required; a passive label can ignore
/// everything else.
pub trait Widget {
    fn preferred_size(&self) -> Size;

    /// Draw into a surface already offset and clipped to the leaf's area.
    fn draw(&mut self, _surface: &mut dyn Surface, _ctx: &DrawContext) {}

    /// Events arrive only while this leaf has focus (keys) or is under or
    /// capturing the mouse. Mouse positions are local to the leaf.
    fn handle_input(&mut self, _event: &InputEvent) -> InputResult {
        InputResult::Unhandled
    }

    /// Local cursor position, used as the start of directional searches.
    fn cursor_location(&self) -> Option<Position> {
        None
    }

    fn on_enter_focus(&mut self, _direction: FocusChangeDirection, _previous: Option<NodeId>) {}

    fn on_leave_focus(&mut self, _direction: FocusChangeDirection, _next: Option<NodeId>) {}

    /// Initial value of the node's `focusable` flag.
    fn is_focusable(&self) -> bool {
        true
    }
}

/// Wrapping for a composite: reserves space around its child and draws into
/// the composite's full area before the child is drawn.
pub trait Decorator {
    /// Total size needed to show a child of `content` size.
    fn wrap_size(&self, content: Size) -> Size {
        content
    }

    /// Where the child goes inside a composite of `size`.
    fn content_area(&self, size: Size) -> Rect {
        Rect::new(Position::ORIGIN, size)
    }

    fn draw(&mut self, _surface: &mut dyn Surface, _ctx: &DrawContext) {}
}

/// Decorator that adds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Decorator for Plain {}

/// Container-level hook offered unhandled events from any descendant.
/// Return `true` to mark the event handled.
pub type InputFilter = dyn FnMut(&InputEvent) -> bool;

// =============================================================================
// NODE
// =============================================================================

pub(crate) enum NodeKind {
    Leaf(Box<dyn Widget>),
    Container {
        children: Vec<NodeId>,
        layout: Box<dyn LayoutManager>,
        filter: Option<Box<InputFilter>>,
    },
    Composite {
        child: Option<NodeId>,
        decorator: Box<dyn Decorator>,
    },
}

impl NodeKind {
    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Leaf(_) => &[],
            NodeKind::Container { children, .. } => children,
            NodeKind::Composite { child, .. } => child.as_slice(),
        }
    }
}

pub(crate) struct Node {
    /// Relative to the parent.
    pub position: Position,
    pub size: Size,
    pub preferred_override: Option<Size>,
    pub visible: bool,
    pub invalid: bool,
    pub parent: Option<NodeId>,
    pub layout_data: Option<LayoutData>,
    pub theme: Option<ThemeId>,
    pub enabled: bool,
    pub focusable: bool,
    /// Mirror of the pane's focus state, for drawing.
    pub focused: bool,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        let focusable = match &kind {
            NodeKind::Leaf(widget) => widget.is_focusable(),
            _ => false,
        };
        Self {
            position: Position::ORIGIN,
            size: Size::ZERO,
            preferred_override: None,
            visible: true,
            invalid: true,
            parent: None,
            layout_data: None,
            theme: None,
            enabled: true,
            focusable,
            focused: false,
            kind,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}
