//! Error type for tree, routing and loop operations.
//!
//! Only precondition violations and fatal backend conditions are errors.
//! A focus move that finds no candidate is not an error; it reports `false`.

use thiserror::Error;

use crate::engine::NodeId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("node {child} is not a child of container {container}")]
    NotAChild { container: NodeId, child: NodeId },

    #[error("child index {index} out of range for {node} with {len} children")]
    ChildIndexOutOfRange { node: NodeId, index: usize, len: usize },

    #[error("node {0} cannot hold children")]
    NotAContainer(NodeId),

    #[error("node {0} is not a composite")]
    NotAComposite(NodeId),

    #[error("node {0} no longer exists")]
    StaleNode(NodeId),

    #[error("attaching {child} under {parent} would create a cycle")]
    CycleRejected { parent: NodeId, child: NodeId },

    #[error("input source closed")]
    InputClosed,

    #[error("GUI thread is no longer running")]
    GuiThreadStopped,

    #[error("task panicked on the GUI thread")]
    TaskPanicked,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
