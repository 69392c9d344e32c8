//! Linear layout - stack children vertically or horizontally.
//!
//! # Algorithm
//!
//! 1. Each child asks for its preferred extent along the stack axis
//! 2. If the sum (plus spacing) overflows, the largest children shrink one
//!    cell at a time, round-robin over ties
//! 3. If space is left over, children with [`GrowPolicy::CanGrow`] take it
//!    one cell at a time in declaration order
//! 4. Cross-axis extent and offset come from the child's [`Alignment`]

use crate::types::{Direction, Position, Rect, Size};

use super::fit::{grow_to_fill, shrink_to_fit};
use super::types::{GrowPolicy, LayoutChild, LayoutManager};

/// Stacks children along one axis with fixed spacing between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearLayout {
    direction: Direction,
    spacing: u16,
}

impl Default for LinearLayout {
    fn default() -> Self {
        Self::new(Direction::Vertical)
    }
}

impl LinearLayout {
    pub fn new(direction: Direction) -> Self {
        Self { direction, spacing: 1 }
    }

    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    pub fn with_spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn spacing(&self) -> u16 {
        self.spacing
    }

    fn spacing_total(&self, count: usize) -> u32 {
        self.spacing as u32 * count.saturating_sub(1) as u32
    }
}

impl LayoutManager for LinearLayout {
    fn preferred_size(&self, children: &[LayoutChild<'_>]) -> Size {
        let main: u32 = children
            .iter()
            .map(|c| c.preferred.along(self.direction) as u32)
            .sum::<u32>()
            + self.spacing_total(children.len());
        let cross = children
            .iter()
            .map(|c| c.preferred.across(self.direction))
            .max()
            .unwrap_or(0);

        Size::from_axes(self.direction, main.min(u16::MAX as u32) as u16, cross)
    }

    fn place(&self, area: Size, children: &[LayoutChild<'_>]) -> Vec<Rect> {
        let direction = self.direction;
        let available_main = area.along(direction) as u32;
        let available_cross = area.across(direction);

        let mut extents: Vec<u16> = children
            .iter()
            .map(|c| c.preferred.along(direction))
            .collect();
        let growable: Vec<bool> = children
            .iter()
            .map(|c| c.linear_data().grow_policy == GrowPolicy::CanGrow)
            .collect();

        let target = available_main.saturating_sub(self.spacing_total(children.len()));
        shrink_to_fit(&mut extents, target);
        grow_to_fill(&mut extents, &growable, target);

        let mut offset: u32 = 0;
        children
            .iter()
            .zip(extents)
            .map(|(child, extent)| {
                if offset >= available_main {
                    return Rect::EMPTY;
                }
                let main = (extent as u32).min(available_main - offset) as u16;
                let (cross_offset, cross) = child
                    .linear_data()
                    .alignment
                    .place(child.preferred.across(direction), available_cross);

                let position = match direction {
                    Direction::Vertical => Position::new(cross_offset, offset as u16),
                    Direction::Horizontal => Position::new(offset as u16, cross_offset),
                };
                offset += extent as u32 + self.spacing as u32;
                Rect::new(position, Size::from_axes(direction, main, cross))
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutData, LinearLayoutData};
    use crate::types::Alignment;
    use pretty_assertions::assert_eq;

    fn kids(sizes: &[(u16, u16)]) -> Vec<LayoutChild<'static>> {
        sizes
            .iter()
            .map(|&(c, r)| LayoutChild::new(Size::new(c, r)))
            .collect()
    }

    #[test]
    fn test_preferred_size_vertical() {
        let layout = LinearLayout::vertical();
        let children = kids(&[(4, 2), (7, 3), (1, 2)]);
        assert_eq!(layout.preferred_size(&children), Size::new(7, 9));
    }

    #[test]
    fn test_preferred_size_horizontal_no_spacing() {
        let layout = LinearLayout::horizontal().with_spacing(0);
        let children = kids(&[(4, 2), (7, 3)]);
        assert_eq!(layout.preferred_size(&children), Size::new(11, 3));
        assert_eq!(layout.preferred_size(&[]), Size::ZERO);
    }

    #[test]
    fn test_fits_without_adjustment() {
        let layout = LinearLayout::vertical();
        let children = kids(&[(3, 1), (5, 2)]);
        let rects = layout.place(Size::new(10, 10), &children);
        assert_eq!(
            rects,
            vec![Rect::from_parts(0, 0, 3, 1), Rect::from_parts(0, 2, 5, 2)]
        );
    }

    #[test]
    fn test_shrinks_largest_round_robin_to_exact_fit() {
        let layout = LinearLayout::vertical().with_spacing(1);
        let children = kids(&[(1, 2), (1, 3), (1, 2)]);
        let rects = layout.place(Size::new(1, 5), &children);

        let heights: Vec<u16> = rects.iter().map(|r| r.size.rows).collect();
        assert_eq!(heights, vec![1, 1, 1]);
        // 1 + 1 + 1 + 1 + 1 spacing rows = 5
        assert_eq!(rects.last().map(|r| r.bottom()), Some(5));
    }

    #[test]
    fn test_grows_only_growable_children() {
        let layout = LinearLayout::horizontal().with_spacing(0);
        let grow = LayoutData::Linear(LinearLayoutData::growing(Alignment::Beginning));
        let children = vec![
            LayoutChild::new(Size::new(2, 1)),
            LayoutChild::new(Size::new(2, 1)).with_data(&grow),
        ];
        let rects = layout.place(Size::new(10, 1), &children);
        assert_eq!(rects[0], Rect::from_parts(0, 0, 2, 1));
        assert_eq!(rects[1], Rect::from_parts(2, 0, 8, 1));
    }

    #[test]
    fn test_cross_axis_alignment() {
        let layout = LinearLayout::vertical();
        let center = LayoutData::Linear(LinearLayoutData::new(Alignment::Center));
        let end = LayoutData::Linear(LinearLayoutData::new(Alignment::End));
        let fill = LayoutData::Linear(LinearLayoutData::new(Alignment::Fill));
        let children = vec![
            LayoutChild::new(Size::new(4, 1)).with_data(&center),
            LayoutChild::new(Size::new(4, 1)).with_data(&end),
            LayoutChild::new(Size::new(4, 1)).with_data(&fill),
        ];
        let rects = layout.place(Size::new(10, 5), &children);
        assert_eq!(rects[0], Rect::from_parts(3, 0, 4, 1));
        assert_eq!(rects[1], Rect::from_parts(6, 2, 4, 1));
        assert_eq!(rects[2], Rect::from_parts(0, 4, 10, 1));
    }

    #[test]
    fn test_spacing_overflow_leaves_trailing_children_empty() {
        let layout = LinearLayout::vertical().with_spacing(3);
        let children = kids(&[(1, 1), (1, 1), (1, 1)]);
        let rects = layout.place(Size::new(1, 4), &children);
        for rect in &rects {
            assert!(rect.bottom() <= 4);
        }
        assert_eq!(rects[2], Rect::EMPTY);
    }

    #[test]
    fn test_deterministic() {
        let layout = LinearLayout::vertical();
        let children = kids(&[(3, 4), (2, 4), (5, 1)]);
        let first = layout.place(Size::new(4, 6), &children);
        let second = layout.place(Size::new(4, 6), &children);
        assert_eq!(first, second);
    }
}
