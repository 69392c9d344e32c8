//! Component engine - node registry, node kinds and the component tree.
//!
//! The engine manages the core data structures:
//! - Registry: generation-checked slot allocation with index reuse
//! - Node: leaf / container / composite plus the widget capabilities
//! - ComponentTree: structure, invalidation, layout, focus order, draw walk
//!
//! # Architecture
//!
//! Nodes are NOT linked objects. They live in one arena and refer to each
//! other by [`NodeId`]:
//!
//! ```text
//! #0 Composite (parent=-,  child=#1)
//! #1 Container (parent=#0, children=[#2, #3], layout=Linear)
//! #2 Leaf      (parent=#1, widget=Button)
//! #3 Leaf      (parent=#1, widget=Label)
//! ```
//!
//! Parent links are plain ids, so a child never keeps its parent alive.

mod node;
mod registry;
mod tree;

pub use node::{
    Decorator, DrawContext, FocusChangeDirection, InputFilter, InputResult, Plain, Widget,
};
pub use registry::NodeId;
pub use tree::ComponentTree;
