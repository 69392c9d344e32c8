//! Drawing surfaces.
//!
//! Rendering glyphs to a real terminal is a collaborator's job. The engine
//! only needs something with a size that widgets can write characters into;
//! [`CellBuffer`] is the in-memory version used headless and in tests, and
//! [`SubSurface`] is what each node draws through.

use crate::types::{Position, Rect, Size};

/// Opaque drawing target. The layout core only ever reads [`Surface::size`].
pub trait Surface {
    fn size(&self) -> Size;

    /// Write one character. Out-of-bounds writes are ignored.
    fn set_char(&mut self, position: Position, ch: char);
}

// =============================================================================
// CellBuffer
// =============================================================================

/// A 2D buffer of characters.
///
/// Uses flat storage with row-major indexing: `index = row * columns + column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBuffer {
    size: Size,
    cells: Vec<char>,
}

impl CellBuffer {
    /// Create a new buffer filled with spaces.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![' '; size.columns as usize * size.rows as usize],
        }
    }

    /// Resize, clearing all contents.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.cells.clear();
        self.cells.resize(size.columns as usize * size.rows as usize, ' ');
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    #[inline]
    fn index(&self, position: Position) -> Option<usize> {
        (position.column < self.size.columns && position.row < self.size.rows)
            .then(|| position.row as usize * self.size.columns as usize + position.column as usize)
    }

    pub fn get(&self, position: Position) -> Option<char> {
        self.index(position).map(|i| self.cells[i])
    }

    /// One row as a string (trailing spaces kept).
    pub fn row_text(&self, row: u16) -> String {
        if row >= self.size.rows {
            return String::new();
        }
        let start = row as usize * self.size.columns as usize;
        self.cells[start..start + self.size.columns as usize].iter().collect()
    }
}

impl Surface for CellBuffer {
    fn size(&self) -> Size {
        self.size
    }

    fn set_char(&mut self, position: Position, ch: char) {
        if let Some(i) = self.index(position) {
            self.cells[i] = ch;
        }
    }
}

// =============================================================================
// SubSurface
// =============================================================================

/// A window onto a parent surface: local coordinates are offset by the
/// window's origin and writes outside the window are dropped.
pub struct SubSurface<'a> {
    parent: &'a mut dyn Surface,
    area: Rect,
}

impl<'a> SubSurface<'a> {
    /// `area` is clipped to the parent's bounds.
    pub fn new(parent: &'a mut dyn Surface, area: Rect) -> Self {
        let bounds = Rect::new(Position::ORIGIN, parent.size());
        let area = area
            .intersect(&bounds)
            .unwrap_or(Rect::new(area.position, Size::ZERO));
        Self { parent, area }
    }

    /// Area in parent coordinates.
    pub fn area(&self) -> Rect {
        self.area
    }
}

impl Surface for SubSurface<'_> {
    fn size(&self) -> Size {
        self.area.size
    }

    fn set_char(&mut self, position: Position, ch: char) {
        if position.column < self.area.size.columns && position.row < self.area.size.rows {
            self.parent.set_char(position.offset_by(self.area.position), ch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_get_set() {
        let mut buffer = CellBuffer::new(Size::new(4, 2));
        buffer.set_char(Position::new(1, 1), 'x');
        assert_eq!(buffer.get(Position::new(1, 1)), Some('x'));
        assert_eq!(buffer.get(Position::new(4, 0)), None);
        assert_eq!(buffer.row_text(1), " x  ");
    }

    #[test]
    fn test_buffer_out_of_bounds_write_ignored() {
        let mut buffer = CellBuffer::new(Size::new(2, 2));
        buffer.set_char(Position::new(9, 9), 'x');
        assert_eq!(buffer, CellBuffer::new(Size::new(2, 2)));
    }

    #[test]
    fn test_sub_surface_offsets_and_clips() {
        let mut buffer = CellBuffer::new(Size::new(5, 3));
        {
            let mut sub = SubSurface::new(&mut buffer, Rect::from_parts(3, 1, 4, 4));
            assert_eq!(sub.size(), Size::new(2, 2));
            sub.set_char(Position::new(0, 0), 'a');
            sub.set_char(Position::new(1, 1), 'b');
            sub.set_char(Position::new(2, 0), 'c');
        }
        assert_eq!(buffer.row_text(1), "   a ");
        assert_eq!(buffer.row_text(2), "    b");
    }
}
