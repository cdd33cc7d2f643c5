//! Policy-driven folding of source outputs

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::{make_stateful_map, merge};
use crate::error::{ElectiveError, Result};
use crate::model::Node;

/// How source outputs are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Fold in declared order; later sources win scalar conflicts.
    Left,
    /// Fold in reverse declared order; the first declared source wins.
    Right,
    /// No merge: the last declared source that produced anything is used
    /// verbatim.
    #[default]
    None,
}

impl MergePolicy {
    /// Parse the schema's `combine` value. An absent value means [`MergePolicy::None`].
    pub fn from_setting(value: Option<&str>) -> Result<Self> {
        match value {
            None => Ok(MergePolicy::None),
            Some(v) => v.parse(),
        }
    }
}

impl FromStr for MergePolicy {
    type Err = ElectiveError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(MergePolicy::Left),
            "right" => Ok(MergePolicy::Right),
            "none" => Ok(MergePolicy::None),
            other => Err(ElectiveError::InvalidPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MergePolicy::Left => "left",
            MergePolicy::Right => "right",
            MergePolicy::None => "none",
        };
        f.write_str(name)
    }
}

/// One source's output, in combination order.
#[derive(Debug, Clone)]
pub struct Layer {
    pub source: String,
    pub values: Map<String, Value>,
}

impl Layer {
    pub fn new(source: impl Into<String>, values: Map<String, Value>) -> Self {
        Self { source: source.into(), values }
    }
}

/// Combine `layers` (given in declared order) according to `policy`.
pub fn fold_layers(policy: MergePolicy, layers: &[Layer]) -> Result<Node> {
    match policy {
        MergePolicy::Left => fold(layers.iter()),
        MergePolicy::Right => fold(layers.iter().rev()),
        MergePolicy::None => match layers.iter().rev().find(|layer| !layer.values.is_empty()) {
            Some(layer) => {
                tracing::debug!(source = %layer.source, "using single source without merging");
                make_stateful_map(&layer.values, &layer.source)
            }
            None => Ok(Node::empty()),
        },
    }
}

fn fold<'a>(layers: impl Iterator<Item = &'a Layer>) -> Result<Node> {
    layers.into_iter().try_fold(Node::empty(), |acc, layer| {
        tracing::debug!(source = %layer.source, keys = layer.values.len(), "merging source");
        let tree = make_stateful_map(&layer.values, &layer.source)?;
        merge(&acc, &tree)
    })
}
