//! Merge engine
//!
//! Source outputs are turned into provenance trees ([`make_stateful`]) and
//! combined pairwise ([`merge`]). [`fold_layers`] applies a [`MergePolicy`]
//! across an ordered list of sources:
//! - Scalars: right's history is appended, so right's value becomes current
//! - Lists: concatenated, left then right
//! - Mappings: union by key, recursing on shared keys

mod engine;
mod fold;
mod stateful;

pub use engine::merge;
pub use fold::{fold_layers, Layer, MergePolicy};
pub use stateful::{make_stateful, make_stateful_map};
