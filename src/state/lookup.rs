//! Spatial lookup map - per-frame cell index of focusable leaves.
//!
//! Rebuilt from scratch on every draw pass. Each enabled, focusable leaf the
//! draw walk visits is registered with its global rect; the rect's cells are
//! written into a dense row-major grid (last writer wins on overlap).
//!
//! # API
//!
//! - `register(id, rect)` - Record a leaf for this frame
//! - `get_at(position)` - Leaf occupying a cell
//! - `find_closest(from, direction, current)` - Directional or tab-order search
//! - `find_next` / `find_previous` - Registration order with wrap-around

use tracing::trace;

use crate::engine::{FocusChangeDirection, NodeId};
use crate::types::{Position, Rect, Size};

/// Marker for a cell no leaf covers.
const EMPTY: usize = usize::MAX;

#[derive(Debug, Clone, Default)]
pub struct SpatialLookupMap {
    size: Size,
    cells: Vec<usize>,
    leaves: Vec<(NodeId, Rect)>,
}

impl SpatialLookupMap {
    /// Create an empty map covering `size` cells.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![EMPTY; size.columns as usize * size.rows as usize],
            leaves: Vec::new(),
        }
    }

    /// Drop every registration and resize the grid.
    pub fn reset(&mut self, size: Size) {
        self.size = size;
        self.leaves.clear();
        self.cells.clear();
        self.cells.resize(size.columns as usize * size.rows as usize, EMPTY);
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Registered leaves in registration order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.leaves.iter().map(|(id, _)| *id)
    }

    /// Global rect a leaf was registered with.
    pub fn rect_of(&self, id: NodeId) -> Option<Rect> {
        self.leaves
            .iter()
            .find(|(leaf, _)| *leaf == id)
            .map(|(_, rect)| *rect)
    }

    /// Record a leaf occupying `rect` (global coordinates). Cells outside the
    /// map are ignored.
    pub fn register(&mut self, id: NodeId, rect: Rect) {
        let slot = self.leaves.len();
        self.leaves.push((id, rect));

        let right = rect.right().min(self.size.columns);
        let bottom = rect.bottom().min(self.size.rows);
        for row in rect.position.row..bottom {
            let start = row as usize * self.size.columns as usize;
            for column in rect.position.column..right {
                self.cells[start + column as usize] = slot;
            }
        }
        trace!(node = %id, %rect.position, %rect.size, "lookup map registered leaf");
    }

    #[inline]
    fn slot_at(&self, column: i32, row: i32) -> Option<usize> {
        if column < 0
            || row < 0
            || column >= self.size.columns as i32
            || row >= self.size.rows as i32
        {
            return None;
        }
        let slot = self.cells[row as usize * self.size.columns as usize + column as usize];
        (slot != EMPTY).then_some(slot)
    }

    /// Leaf occupying a cell, if any.
    pub fn get_at(&self, position: Position) -> Option<NodeId> {
        self.slot_at(position.column as i32, position.row as i32)
            .map(|slot| self.leaves[slot].0)
    }

    /// Find the leaf focus should move to.
    ///
    /// For `Up`/`Down`/`Left`/`Right` this scans outward from `from` along the
    /// direction of travel. At distance `d` it probes perpendicular offsets
    /// `0, +1, -1, ..., +d, -d`, so the closest offset wins within a tier. The
    /// `current` leaf and every leaf crossing `from`'s row (vertical moves) or
    /// column (horizontal moves) are never returned.
    ///
    /// `Next`/`Previous` ignore geometry and use registration order.
    /// `Teleport` has no notion of "closest" and always yields `None`.
    pub fn find_closest(
        &self,
        from: Position,
        direction: FocusChangeDirection,
        current: Option<NodeId>,
    ) -> Option<NodeId> {
        let (step_column, step_row) = match direction {
            FocusChangeDirection::Up => (0, -1),
            FocusChangeDirection::Down => (0, 1),
            FocusChangeDirection::Left => (-1, 0),
            FocusChangeDirection::Right => (1, 0),
            FocusChangeDirection::Next => return self.find_next(current),
            FocusChangeDirection::Previous => return self.find_previous(current),
            FocusChangeDirection::Teleport => return None,
        };
        if self.leaves.is_empty() || self.size.is_empty() {
            return None;
        }

        let vertical = step_row != 0;
        let disqualified = self.disqualified(from, vertical, current);
        let start_column = from.column as i32;
        let start_row = from.row as i32;

        for distance in 1i32.. {
            let ray_column = start_column + step_column * distance;
            let ray_row = start_row + step_row * distance;
            let in_bounds = if vertical {
                ray_row >= 0 && ray_row < self.size.rows as i32
            } else {
                ray_column >= 0 && ray_column < self.size.columns as i32
            };
            if !in_bounds {
                break;
            }

            for shift in 0..=distance {
                for sign in [1, -1] {
                    if shift == 0 && sign == -1 {
                        continue;
                    }
                    let offset = shift * sign;
                    let (column, row) = if vertical {
                        (ray_column + offset, ray_row)
                    } else {
                        (ray_column, ray_row + offset)
                    };
                    if let Some(slot) = self.slot_at(column, row) {
                        if !disqualified[slot] {
                            return Some(self.leaves[slot].0);
                        }
                    }
                }
            }
        }
        None
    }

    /// Registration slots excluded from a directional search.
    fn disqualified(&self, from: Position, vertical: bool, current: Option<NodeId>) -> Vec<bool> {
        let mut disqualified: Vec<bool> = self
            .leaves
            .iter()
            .map(|(id, _)| Some(*id) == current)
            .collect();

        // Clamp the start line into the grid the same way a cursor would be
        let row = (from.row as i32).min(self.size.rows as i32 - 1);
        let column = (from.column as i32).min(self.size.columns as i32 - 1);
        if vertical {
            for c in 0..self.size.columns as i32 {
                if let Some(slot) = self.slot_at(c, row) {
                    disqualified[slot] = true;
                }
            }
        } else {
            for r in 0..self.size.rows as i32 {
                if let Some(slot) = self.slot_at(column, r) {
                    disqualified[slot] = true;
                }
            }
        }
        disqualified
    }

    /// Leaf after `current` in registration order, wrapping to the first.
    /// `None` when there is no other leaf to go to.
    pub fn find_next(&self, current: Option<NodeId>) -> Option<NodeId> {
        self.step(current, true)
    }

    /// Leaf before `current` in registration order, wrapping to the last.
    pub fn find_previous(&self, current: Option<NodeId>) -> Option<NodeId> {
        self.step(current, false)
    }

    fn step(&self, current: Option<NodeId>, forward: bool) -> Option<NodeId> {
        let len = self.leaves.len();
        if len == 0 {
            return None;
        }
        let position = current.and_then(|id| self.leaves.iter().position(|(leaf, _)| *leaf == id));
        let candidate = match (position, forward) {
            (Some(index), true) => self.leaves[(index + 1) % len].0,
            (Some(index), false) => self.leaves[(index + len - 1) % len].0,
            (None, true) => self.leaves[0].0,
            (None, false) => self.leaves[len - 1].0,
        };
        (Some(candidate) != current).then_some(candidate)
    }
}

// =============================================================================
// TESTS
// =============================================================================
