//! Absolute layout - children keep the rects the application gave them.

use crate::types::{Rect, Size};

use super::types::{LayoutChild, LayoutManager};

/// Leaves every child where it is, clipped to the container's area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AbsoluteLayout;

impl AbsoluteLayout {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutManager for AbsoluteLayout {
    /// Bounding box of all children's current rects.
    fn preferred_size(&self, children: &[LayoutChild<'_>]) -> Size {
        children.iter().fold(Size::ZERO, |size, child| {
            size.max(Size::new(child.current.right(), child.current.bottom()))
        })
    }

    fn place(&self, area: Size, children: &[LayoutChild<'_>]) -> Vec<Rect> {
        let bounds = Rect::new(Default::default(), area);
        children
            .iter()
            .map(|child| {
                child
                    .current
                    .intersect(&bounds)
                    .unwrap_or(Rect::new(child.current.position, Size::ZERO))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_current_rects() {
        let children = vec![
            LayoutChild::new(Size::new(1, 1)).with_current(Rect::from_parts(2, 1, 3, 2)),
            LayoutChild::new(Size::new(1, 1)).with_current(Rect::from_parts(8, 8, 4, 4)),
        ];
        let rects = AbsoluteLayout.place(Size::new(10, 10), &children);
        assert_eq!(rects[0], Rect::from_parts(2, 1, 3, 2));
        assert_eq!(rects[1], Rect::from_parts(8, 8, 2, 2));
    }

    #[test]
    fn test_outside_area_collapses() {
        let children =
            vec![LayoutChild::new(Size::new(1, 1)).with_current(Rect::from_parts(12, 0, 3, 1))];
        let rects = AbsoluteLayout.place(Size::new(10, 10), &children);
        assert!(rects[0].size.is_empty());
    }

    #[test]
    fn test_preferred_size_is_bounding_box() {
        let children = vec![
            LayoutChild::new(Size::ZERO).with_current(Rect::from_parts(2, 1, 3, 2)),
            LayoutChild::new(Size::ZERO).with_current(Rect::from_parts(0, 5, 1, 1)),
        ];
        assert_eq!(AbsoluteLayout.preferred_size(&children), Size::new(5, 6));
    }
}
