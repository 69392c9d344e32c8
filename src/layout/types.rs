//! Layout contract shared by every manager.

use std::fmt;

use crate::types::{Alignment, Rect, Size};

use super::border::BorderLocation;

// =============================================================================
// LAYOUT DATA
// =============================================================================

/// Hint for a [`super::LinearLayout`] child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinearLayoutData {
    /// Cross-axis alignment.
    pub alignment: Alignment,
    pub grow_policy: GrowPolicy,
}

impl LinearLayoutData {
    pub fn new(alignment: Alignment) -> Self {
        Self { alignment, grow_policy: GrowPolicy::None }
    }

    pub fn growing(alignment: Alignment) -> Self {
        Self { alignment, grow_policy: GrowPolicy::CanGrow }
    }
}

/// Whether a linear child may take leftover space along the stack axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrowPolicy {
    #[default]
    None,
    CanGrow,
}

/// Hint for a [`super::GridLayout`] child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayoutData {
    pub horizontal_alignment: Alignment,
    pub vertical_alignment: Alignment,
    pub grab_extra_horizontal_space: bool,
    pub grab_extra_vertical_space: bool,
    /// Columns covered, at least 1.
    pub horizontal_span: u16,
    /// Rows covered, at least 1.
    pub vertical_span: u16,
}

impl Default for GridLayoutData {
    fn default() -> Self {
        Self {
            horizontal_alignment: Alignment::Beginning,
            vertical_alignment: Alignment::Center,
            grab_extra_horizontal_space: false,
            grab_extra_vertical_space: false,
            horizontal_span: 1,
            vertical_span: 1,
        }
    }
}

impl GridLayoutData {
    pub fn new(horizontal_alignment: Alignment, vertical_alignment: Alignment) -> Self {
        Self {
            horizontal_alignment,
            vertical_alignment,
            ..Self::default()
        }
    }

    /// Spans below 1 are raised to 1.
    pub fn with_span(mut self, horizontal_span: u16, vertical_span: u16) -> Self {
        self.horizontal_span = horizontal_span.max(1);
        self.vertical_span = vertical_span.max(1);
        self
    }

    pub fn with_grab(mut self, horizontal: bool, vertical: bool) -> Self {
        self.grab_extra_horizontal_space = horizontal;
        self.grab_extra_vertical_space = vertical;
        self
    }

    /// Fill the cell in both directions and take any extra space.
    pub fn fill() -> Self {
        Self::new(Alignment::Fill, Alignment::Fill).with_grab(true, true)
    }
}

/// Per-child hint. Each manager reads its own variant and treats anything
/// else as "no hint".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutData {
    Linear(LinearLayoutData),
    Grid(GridLayoutData),
    Border(BorderLocation),
}

impl From<LinearLayoutData> for LayoutData {
    fn from(data: LinearLayoutData) -> Self {
        Self::Linear(data)
    }
}

impl From<GridLayoutData> for LayoutData {
    fn from(data: GridLayoutData) -> Self {
        Self::Grid(data)
    }
}

impl From<BorderLocation> for LayoutData {
    fn from(location: BorderLocation) -> Self {
        Self::Border(location)
    }
}

// =============================================================================
// LAYOUT CHILD
// =============================================================================

/// What a manager knows about one child: its preferred size, its hint and
/// the rect it currently occupies (only [`super::AbsoluteLayout`] reads it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutChild<'a> {
    pub preferred: Size,
    pub data: Option<&'a LayoutData>,
    pub current: Rect,
}

impl<'a> LayoutChild<'a> {
    pub fn new(preferred: Size) -> Self {
        Self { preferred, data: None, current: Rect::EMPTY }
    }

    pub fn with_data(mut self, data: &'a LayoutData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_current(mut self, current: Rect) -> Self {
        self.current = current;
        self
    }

    pub(crate) fn linear_data(&self) -> LinearLayoutData {
        match self.data {
            Some(LayoutData::Linear(data)) => *data,
            _ => LinearLayoutData::default(),
        }
    }

    pub(crate) fn grid_data(&self) -> GridLayoutData {
        match self.data {
            Some(LayoutData::Grid(data)) => data.with_span(data.horizontal_span, data.vertical_span),
            _ => GridLayoutData::default(),
        }
    }

    pub(crate) fn border_location(&self) -> Option<BorderLocation> {
        match self.data {
            Some(LayoutData::Border(location)) => Some(*location),
            _ => None,
        }
    }
}

// =============================================================================
// LAYOUT MANAGER
// =============================================================================

/// Places the ordered children of a container inside its area.
///
/// Both methods must be deterministic: identical inputs give identical
/// output. `place` returns one rect per child, in child order, each relative
/// to the container and never extending past `area`.
pub trait LayoutManager: fmt::Debug {
    /// Size the children would like, usable before any area is known.
    fn preferred_size(&self, children: &[LayoutChild<'_>]) -> Size;

    fn place(&self, area: Size, children: &[LayoutChild<'_>]) -> Vec<Rect>;
}
