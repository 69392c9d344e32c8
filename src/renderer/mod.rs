//! Renderer collaborator contract.
//!
//! Concrete widget rendering and terminal output live outside this crate;
//! this module only defines the [`Surface`] they draw on.

mod buffer;

pub use buffer::{CellBuffer, SubSurface, Surface};
