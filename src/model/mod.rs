//! Provenance-tracking configuration data model
//!
//! A resolved configuration is a [`Node`] tree whose leaves are [`State`]s:
//! scalars that remember every `(value, source)` pair that ever set them.

pub mod node;
pub mod scalar;
pub mod state;

pub use node::{Node, NodeKind, Provenance};
pub use scalar::Scalar;
pub use state::State;
