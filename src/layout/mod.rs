//! Layout Module - place children inside a container's area.
//!
//! Every container owns exactly one [`LayoutManager`]. The engine asks it for
//! a preferred size while measuring and for one rect per visible child while
//! laying out. Managers share no state, so a container can swap its manager
//! at any time.
//!
//! - [`LinearLayout`] - vertical or horizontal stack, round-robin shrink/grow
//! - [`GridLayout`] - fixed columns, spans, per-track shrink/grow
//! - [`BorderLayout`] - Center/Top/Bottom/Left/Right slots
//! - [`AbsoluteLayout`] - children keep application-set rects
//!
//! # Example
//!
//! ```
//! use spark_panes::layout::{LayoutChild, LayoutManager, LinearLayout};
//! use spark_panes::Size;
//!
//! let children = [LayoutChild::new(Size::new(4, 2)), LayoutChild::new(Size::new(6, 1))];
//! let rects = LinearLayout::vertical().place(Size::new(10, 10), &children);
//! assert_eq!(rects[1].position.row, 3);
//! ```

mod absolute;
mod border;
mod fit;
mod grid;
mod linear;
mod types;

pub use absolute::AbsoluteLayout;
pub use border::{BorderLayout, BorderLocation};
pub use grid::GridLayout;
pub use linear::LinearLayout;
pub use types::*;
