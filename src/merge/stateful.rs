//! Plain values to provenance trees

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::error::{ElectiveError, Result};
use crate::model::{Node, Scalar, State};

/// Convert a plain value from `source` into a [`Node`], tagging every leaf
/// with `source`.
///
/// The result shares nothing with `raw`. Fails with
/// [`ElectiveError::UnsupportedType`] for values that have no [`Scalar`]
/// form (unsigned integers beyond the signed 64-bit range).
pub fn make_stateful(raw: &Value, source: &str) -> Result<Node> {
    match raw {
        Value::Null => Ok(leaf(Scalar::Null, source)),
        Value::Bool(b) => Ok(leaf(Scalar::Bool(*b), source)),
        Value::Number(n) => Ok(leaf(number_to_scalar(n, source)?, source)),
        Value::String(s) => Ok(leaf(Scalar::Str(s.clone()), source)),
        Value::Array(items) => {
            let items = items.iter().map(|item| make_stateful(item, source)).collect::<Result<_>>()?;
            Ok(Node::List(items))
        }
        Value::Object(map) => make_stateful_map(map, source),
    }
}

/// [`make_stateful`] for a whole source mapping.
pub fn make_stateful_map(raw: &Map<String, Value>, source: &str) -> Result<Node> {
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        out.insert(key.clone(), make_stateful(value, source)?);
    }
    Ok(Node::Map(out))
}

fn leaf(value: Scalar, source: &str) -> Node {
    Node::Value(State::single(value, source))
}

fn number_to_scalar(n: &Number, source: &str) -> Result<Scalar> {
    if let Some(i) = n.as_i64() {
        return Ok(Scalar::Int(i));
    }
    if n.is_u64() {
        return Err(ElectiveError::UnsupportedType {
            found: format!("unsigned integer {} (exceeds i64)", n),
            origin: source.to_string(),
        });
    }
    match n.as_f64() {
        Some(f) => Ok(Scalar::Float(f)),
        None => Err(ElectiveError::UnsupportedType {
            found: format!("number {}", n),
            origin: source.to_string(),
        }),
    }
}
