//! Border layout - five named slots around a center.
//!
//! Top and Bottom span the full width at their preferred height, Left and
//! Right take their preferred width in what is left of the height, and Center
//! absorbs the remainder. Children without a slot hint are assigned the first
//! free slot in the order Center, Top, Bottom, Left, Right.

use crate::types::{Position, Rect, Size};

use super::types::{LayoutChild, LayoutManager};

/// Slot name used as [`super::LayoutData::Border`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderLocation {
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl BorderLocation {
    /// Priority order for children without a slot hint.
    pub const AUTO_ASSIGN_ORDER: [BorderLocation; 5] = [
        BorderLocation::Center,
        BorderLocation::Top,
        BorderLocation::Bottom,
        BorderLocation::Left,
        BorderLocation::Right,
    ];

    fn slot(self) -> usize {
        match self {
            BorderLocation::Center => 0,
            BorderLocation::Top => 1,
            BorderLocation::Bottom => 2,
            BorderLocation::Left => 3,
            BorderLocation::Right => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderLayout;

impl BorderLayout {
    pub fn new() -> Self {
        Self
    }

    /// Child index per slot. Named children claim their slot (a later child
    /// naming the same slot wins it), then unnamed children fill the free
    /// slots in priority order.
    fn assign(children: &[LayoutChild<'_>]) -> [Option<usize>; 5] {
        let mut slots = [None; 5];
        let mut unnamed = Vec::new();

        for (index, child) in children.iter().enumerate() {
            match child.border_location() {
                Some(location) => slots[location.slot()] = Some(index),
                None => unnamed.push(index),
            }
        }

        for index in unnamed {
            if let Some(location) = BorderLocation::AUTO_ASSIGN_ORDER
                .iter()
                .find(|location| slots[location.slot()].is_none())
            {
                slots[location.slot()] = Some(index);
            }
        }

        slots
    }
}

impl LayoutManager for BorderLayout {
    fn preferred_size(&self, children: &[LayoutChild<'_>]) -> Size {
        let slots = Self::assign(children);
        let preferred = |location: BorderLocation| {
            slots[location.slot()].map_or(Size::ZERO, |index| children[index].preferred)
        };

        let top = preferred(BorderLocation::Top);
        let bottom = preferred(BorderLocation::Bottom);
        let left = preferred(BorderLocation::Left);
        let center = preferred(BorderLocation::Center);
        let right = preferred(BorderLocation::Right);

        let middle_rows = left.rows.max(center.rows).max(right.rows);
        let middle_columns = left.columns as u32 + center.columns as u32 + right.columns as u32;

        let rows = top.rows as u32 + middle_rows as u32 + bottom.rows as u32;
        let columns = middle_columns.max(top.columns.max(bottom.columns) as u32);

        Size::new(
            columns.min(u16::MAX as u32) as u16,
            rows.min(u16::MAX as u32) as u16,
        )
    }

    fn place(&self, area: Size, children: &[LayoutChild<'_>]) -> Vec<Rect> {
        let slots = Self::assign(children);
        let mut rects = vec![Rect::EMPTY; children.len()];

        let mut remaining_columns = area.columns;
        let mut remaining_rows = area.rows;
        let mut top_height = 0;
        let mut left_width = 0;

        if let Some(index) = slots[BorderLocation::Top.slot()] {
            top_height = children[index].preferred.rows.min(remaining_rows);
            rects[index] = Rect::new(Position::ORIGIN, Size::new(area.columns, top_height));
            remaining_rows -= top_height;
        }

        if let Some(index) = slots[BorderLocation::Bottom.slot()] {
            let height = children[index].preferred.rows.min(remaining_rows);
            rects[index] = Rect::new(
                Position::new(0, area.rows - height),
                Size::new(area.columns, height),
            );
            remaining_rows -= height;
        }

        if let Some(index) = slots[BorderLocation::Left.slot()] {
            left_width = children[index].preferred.columns.min(remaining_columns);
            rects[index] = Rect::new(
                Position::new(0, top_height),
                Size::new(left_width, remaining_rows),
            );
            remaining_columns -= left_width;
        }

        if let Some(index) = slots[BorderLocation::Right.slot()] {
            let width = children[index].preferred.columns.min(remaining_columns);
            rects[index] = Rect::new(
                Position::new(area.columns - width, top_height),
                Size::new(width, remaining_rows),
            );
            remaining_columns -= width;
        }

        if let Some(index) = slots[BorderLocation::Center.slot()] {
            rects[index] = Rect::new(
                Position::new(left_width, top_height),
                Size::new(remaining_columns, remaining_rows),
            );
        }

        rects
    }
}

// =============================================================================
// TESTS
// =============================================================================
