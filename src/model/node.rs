//! Configuration trees

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::{Scalar, State};

/// A node of a resolved configuration: a leaf [`State`], a list, or a
/// mapping with unique string keys.
///
/// Mappings are ordered by key so rendering and comparison are
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(State),
    List(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

/// Shape of a node, used in merge diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    List,
    Mapping,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Scalar => "scalar",
            NodeKind::List => "list",
            NodeKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::empty()
    }
}

impl Node {
    /// The empty mapping: "nothing merged yet".
    pub fn empty() -> Self {
        Node::Map(BTreeMap::new())
    }

    pub fn is_empty_map(&self) -> bool {
        matches!(self, Node::Map(map) if map.is_empty())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Value(_) => NodeKind::Scalar,
            Node::List(_) => NodeKind::List,
            Node::Map(_) => NodeKind::Mapping,
        }
    }

    pub fn as_state(&self) -> Option<&State> {
        match self {
            Node::Value(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Child of a mapping node.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map()?.get(key)
    }

    /// Walk a dot-separated path. Numeric segments index into lists.
    pub fn get_path(&self, path: &str) -> Option<&Node> {
        let mut current = self;
        for part in path.split('.') {
            current = match current {
                Node::Map(map) => map.get(part)?,
                Node::List(items) => items.get(part.parse::<usize>().ok()?)?,
                Node::Value(_) => return None,
            };
        }
        Some(current)
    }

    /// Current value of the leaf at `path`.
    pub fn current(&self, path: &str) -> Option<&Scalar> {
        self.get_path(path)?.as_state()?.current()
    }

    /// The tree with every leaf replaced by its current value.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Value(state) => state.current().map(Scalar::to_json).unwrap_or(Value::Null),
            Node::List(items) => Value::Array(items.iter().map(Node::to_value).collect()),
            Node::Map(map) => {
                Value::Object(map.iter().map(|(k, v)| (k.clone(), v.to_value())).collect::<Map<_, _>>())
            }
        }
    }

    /// The tree with every leaf expanded to its current value, current source,
    /// and full history.
    pub fn to_provenance(&self) -> Value {
        match self {
            Node::Value(state) => {
                let history: Vec<Value> = state
                    .history()
                    .map(|(value, source)| json!({ "value": value.to_json(), "source": source }))
                    .collect();
                json!({
                    "value": state.current().map(Scalar::to_json).unwrap_or(Value::Null),
                    "source": state.source(),
                    "history": history,
                })
            }
            Node::List(items) => Value::Array(items.iter().map(Node::to_provenance).collect()),
            Node::Map(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_provenance())).collect::<Map<_, _>>(),
            ),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Value(state) => state.serialize(serializer),
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

/// Serializes a tree with full per-leaf history instead of current values.
pub struct Provenance<'a>(pub &'a Node);

impl Serialize for Provenance<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.to_provenance().serialize(serializer)
    }
}
