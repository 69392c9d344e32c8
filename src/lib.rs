//! # spark-panes
//!
//! Layout, focus and input routing for terminal UIs.
//!
//! Components form a tree of leaves (widgets), containers (children placed by
//! a layout manager) and composites (one child, optionally decorated). A
//! [`RootPane`] owns the tree, lays it out over a drawing surface, tracks
//! which leaf has focus and routes keyboard and mouse input to it.
//!
//! ## Architecture
//!
//! ```text
//! InputSource → EventLoop → RootPane ─┬─ focused leaf → InputResult → FocusChain
//!                                     └─ draw: layout → widgets → SpatialLookupMap
//! ```
//!
//! Focus is held in a spark-signals `Signal`, so anything reactive can follow
//! it without subscribing to listeners.
//!
//! ## Modules
//!
//! - [`types`] - Positions, sizes, rects, alignment
//! - [`engine`] - Node registry, widget traits, the component tree
//! - [`layout`] - Linear, grid, border and absolute layout managers
//! - [`state`] - Focus chain, spatial lookup, input events, listeners
//! - [`pipeline`] - Root pane router, GUI thread, event loop
//! - [`renderer`] - The surface widgets draw on
//!
//! ## Example
//!
//! ```
//! use spark_panes::engine::{InputResult, Widget};
//! use spark_panes::layout::LinearLayout;
//! use spark_panes::renderer::CellBuffer;
//! use spark_panes::state::{InputEvent, Key};
//! use spark_panes::{PaneConfig, RootPane, Size};
//!
//! struct Button;
//!
//! impl Widget for Button {
//!     fn preferred_size(&self) -> Size {
//!         Size::new(6, 1)
//!     }
//!
//!     fn handle_input(&mut self, event: &InputEvent) -> InputResult {
//!         event.as_key().map_or(InputResult::Unhandled, |k| k.default_focus_result())
//!     }
//! }
//!
//! let mut pane = RootPane::new(PaneConfig::default());
//! let (column, ok, cancel) = pane.edit(|tree| {
//!     let column = tree.create_container(LinearLayout::vertical());
//!     let ok = tree.create_leaf(Button);
//!     let cancel = tree.create_leaf(Button);
//!     tree.add_component(column, ok).unwrap();
//!     tree.add_component(column, cancel).unwrap();
//!     (column, ok, cancel)
//! });
//! pane.set_component(column).unwrap();
//! pane.draw(&mut CellBuffer::new(Size::new(20, 5))).unwrap();
//!
//! pane.set_focus(ok);
//! pane.handle_input(&InputEvent::key(Key::Tab));
//! assert_eq!(pane.focused(), Some(cancel));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{PaneConfig, ThemeId};
pub use error::{Error, Result};

pub use engine::{ComponentTree, FocusChangeDirection, InputResult, NodeId, Widget};

pub use pipeline::{EventLoop, GuiThread, RootPane};
