//! Core geometry types for spark-panes.
//!
//! Everything the layout managers, the component tree and the lookup map
//! exchange is expressed in terminal cells: a column/row [`Position`], a
//! columns/rows [`Size`] and the [`Rect`] that combines them.

use std::fmt;

// =============================================================================
// Position
// =============================================================================

/// A cell coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub column: u16,
    pub row: u16,
}

impl Position {
    /// The top-left corner.
    pub const ORIGIN: Self = Self { column: 0, row: 0 };

    pub const fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }

    pub const fn with_column(self, column: u16) -> Self {
        Self { column, ..self }
    }

    pub const fn with_row(self, row: u16) -> Self {
        Self { row, ..self }
    }

    /// Offset by a (possibly negative) delta, saturating at the edges.
    pub fn with_relative(self, columns: i32, rows: i32) -> Self {
        Self {
            column: saturate(self.column as i32 + columns),
            row: saturate(self.row as i32 + rows),
        }
    }

    /// Translate by another position (local → parent space).
    pub fn offset_by(self, origin: Position) -> Self {
        Self {
            column: self.column.saturating_add(origin.column),
            row: self.row.saturating_add(origin.row),
        }
    }

    /// Inverse of [`Position::offset_by`]. `None` if the point lies above or
    /// to the left of `origin`.
    pub fn relative_to(self, origin: Position) -> Option<Self> {
        Some(Self {
            column: self.column.checked_sub(origin.column)?,
            row: self.row.checked_sub(origin.row)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

fn saturate(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}

// =============================================================================
// Size
// =============================================================================

/// An extent in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub columns: u16,
    pub rows: u16,
}

impl Size {
    pub const ZERO: Self = Self { columns: 0, rows: 0 };

    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    pub const fn with_columns(self, columns: u16) -> Self {
        Self { columns, ..self }
    }

    pub const fn with_rows(self, rows: u16) -> Self {
        Self { rows, ..self }
    }

    /// Grow or shrink by a delta, saturating at zero.
    pub fn with_relative(self, columns: i32, rows: i32) -> Self {
        Self {
            columns: saturate(self.columns as i32 + columns),
            rows: saturate(self.rows as i32 + rows),
        }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Size) -> Self {
        Self {
            columns: self.columns.min(other.columns),
            rows: self.rows.min(other.rows),
        }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Self {
        Self {
            columns: self.columns.max(other.columns),
            rows: self.rows.max(other.rows),
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Extent along an axis.
    #[inline]
    pub const fn along(&self, direction: Direction) -> u16 {
        match direction {
            Direction::Vertical => self.rows,
            Direction::Horizontal => self.columns,
        }
    }

    /// Extent across an axis.
    #[inline]
    pub const fn across(&self, direction: Direction) -> u16 {
        match direction {
            Direction::Vertical => self.columns,
            Direction::Horizontal => self.rows,
        }
    }

    /// Build a size from main/cross axis extents.
    pub const fn from_axes(direction: Direction, main: u16, cross: u16) -> Self {
        match direction {
            Direction::Vertical => Self { columns: cross, rows: main },
            Direction::Horizontal => Self { columns: main, rows: cross },
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

// =============================================================================
// Rect
// =============================================================================

/// A positioned rectangle. Also used as a clip region while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub position: Position,
    pub size: Size,
}

impl Rect {
    /// A zero-size rect at the origin; what unplaced children receive.
    pub const EMPTY: Self = Self {
        position: Position::ORIGIN,
        size: Size::ZERO,
    };

    pub const fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    pub const fn from_parts(column: u16, row: u16, columns: u16, rows: u16) -> Self {
        Self {
            position: Position::new(column, row),
            size: Size::new(columns, rows),
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u16 {
        self.position.column.saturating_add(self.size.columns)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u16 {
        self.position.row.saturating_add(self.size.rows)
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        position.column >= self.position.column
            && position.column < self.right()
            && position.row >= self.position.row
            && position.row < self.bottom()
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.position.column.max(other.position.column);
        let y1 = self.position.row.max(other.position.row);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Rect::from_parts(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

// =============================================================================
// Layout enums shared by several managers
// =============================================================================

/// Stacking axis for [`crate::layout::LinearLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// Placement of a child inside the space it was allotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    Beginning,
    Center,
    End,
    /// Take the whole allotted extent.
    Fill,
}

impl Alignment {
    /// Resolve `(offset, extent)` of a child with `preferred` extent inside
    /// `available` cells.
    pub fn place(self, preferred: u16, available: u16) -> (u16, u16) {
        let extent = preferred.min(available);
        match self {
            Alignment::Beginning => (0, extent),
            Alignment::Center => ((available - extent) / 2, extent),
            Alignment::End => (available - extent, extent),
            Alignment::Fill => (0, available),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
