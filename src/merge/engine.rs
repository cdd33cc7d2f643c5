//! Pairwise tree merge

use std::collections::BTreeMap;

use crate::error::{ElectiveError, Result};
use crate::model::Node;

/// Merge `right` into `left`, returning a new tree.
///
/// Merge semantics:
/// - `left` is the empty mapping: the result is a copy of `right`
/// - Scalars: `left`'s history followed by `right`'s; right's value is current
/// - Lists: `left`'s items followed by `right`'s
/// - Mappings: union by key, shared keys merged recursively
/// - Any other pairing fails with [`ElectiveError::MergeTypeMismatch`]
///
/// Neither input is modified. Precedence is decided entirely by argument
/// order: for scalar conflicts the right-hand value always wins.
pub fn merge(left: &Node, right: &Node) -> Result<Node> {
    let mut path = Vec::new();
    merge_at(left, right, &mut path)
}

fn merge_at(left: &Node, right: &Node, path: &mut Vec<String>) -> Result<Node> {
    if left.is_empty_map() {
        return Ok(right.clone());
    }

    match (left, right) {
        (Node::Value(l), Node::Value(r)) => {
            let mut state = l.clone();
            state.append(r);
            Ok(Node::Value(state))
        }

        // Lists from different sources are independent collections
        (Node::List(l), Node::List(r)) => Ok(Node::List(l.iter().chain(r.iter()).cloned().collect())),

        (Node::Map(l), Node::Map(r)) => {
            let mut out: BTreeMap<String, Node> = l.clone();
            for (key, right_value) in r {
                let merged = match l.get(key) {
                    Some(left_value) => {
                        path.push(key.clone());
                        let merged = merge_at(left_value, right_value, path)?;
                        path.pop();
                        merged
                    }
                    None => right_value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Ok(Node::Map(out))
        }

        (l, r) => Err(ElectiveError::MergeTypeMismatch {
            path: if path.is_empty() { "<root>".to_string() } else { path.join(".") },
            left: l.kind(),
            right: r.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, Scalar, State};

    fn value(v: impl Into<Scalar>, source: &str) -> Node {
        Node::Value(State::single(v, source))
    }

    fn map<const N: usize>(entries: [(&str, Node); N]) -> Node {
        Node::Map(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn scalar_into_empty() {
        let right = map([("option", value("one", "default"))]);
        assert_eq!(merge(&Node::empty(), &right).unwrap(), right);
        assert_eq!(merge(&right, &Node::empty()).unwrap(), right);
    }

    #[test]
    fn bare_leaf_into_empty() {
        let right = value(1, "env");
        assert_eq!(merge(&Node::empty(), &right).unwrap(), right);
    }

    #[test]
    fn different_scalars_union() {
        let left = map([("one", value(1, "left"))]);
        let right = map([("two", value(2, "right"))]);
        let expected = map([("one", value(1, "left")), ("two", value(2, "right"))]);

        assert_eq!(merge(&left, &right).unwrap(), expected);
        assert_eq!(merge(&right, &left).unwrap(), expected);
    }

    #[test]
    fn same_scalar_right_wins_and_history_is_kept() {
        let left = map([("k", value(1, "left"))]);
        let right = map([("k", value(2, "right"))]);

        let merged = merge(&left, &right).unwrap();
        let state = merged.get("k").and_then(Node::as_state).expect("leaf");
        assert_eq!(state.current(), Some(&Scalar::Int(2)));
        assert_eq!(state.history().collect::<Vec<_>>(), vec![(&Scalar::Int(1), "left"), (&Scalar::Int(2), "right")]);

        let reversed = merge(&right, &left).unwrap();
        assert_eq!(reversed.current("k"), Some(&Scalar::Int(1)));
        assert_eq!(reversed.get("k").and_then(Node::as_state).map(State::len), Some(2));
    }

    #[test]
    fn explicit_null_is_appended() {
        let left = map([("k", value(1, "toml"))]);
        let right = map([("k", value(Scalar::Null, "cli"))]);
        let merged = merge(&left, &right).unwrap();
        assert_eq!(merged.current("k"), Some(&Scalar::Null));
    }

    #[test]
    fn lists_concatenate_in_order() {
        let left = map([("k", Node::List(vec![value("a", "left"), value("b", "left")]))]);
        let right = map([("k", Node::List(vec![value("c", "right"), value("d", "right")]))]);

        let merged = merge(&left, &right).unwrap();
        let items = merged.get("k").and_then(Node::as_list).expect("list");
        let currents: Vec<_> = items.iter().filter_map(Node::as_state).filter_map(State::current).collect();
        assert_eq!(currents, vec![&Scalar::from("a"), &Scalar::from("b"), &Scalar::from("c"), &Scalar::from("d")]);

        let reversed = merge(&right, &left).unwrap();
        assert_eq!(reversed.current("k.0"), Some(&Scalar::from("c")));
    }

    #[test]
    fn lists_with_nested_containers_are_not_merged_elementwise() {
        let left = Node::List(vec![map([("one", value(1, "left"))]), value(1, "left")]);
        let right = Node::List(vec![map([("one", value("one", "right"))]), value("one", "right")]);

        let merged = merge(&left, &right).unwrap();
        assert_eq!(merged.as_list().map(<[Node]>::len), Some(4));
        assert_eq!(merged.current("0.one"), Some(&Scalar::Int(1)));
        assert_eq!(merged.current("2.one"), Some(&Scalar::from("one")));
    }

    #[test]
    fn mappings_merge_recursively() {
        let left = map([("a", map([("x", value(1, "left"))]))]);
        let right = map([("a", map([("y", value(2, "right"))]))]);
        let merged = merge(&left, &right).unwrap();
        assert_eq!(merged, map([("a", map([("x", value(1, "left")), ("y", value(2, "right"))]))]));

        let right = map([("a", map([("x", value(2, "right"))]))]);
        let merged = merge(&left, &right).unwrap();
        let inner = merge(&value(1, "left"), &value(2, "right")).unwrap();
        assert_eq!(merged, map([("a", map([("x", inner)]))]));
        assert_eq!(merged.get_path("a.x").and_then(Node::as_state).map(State::len), Some(2));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let left = map([("k", value(1, "left")), ("l", Node::List(vec![value(1, "left")]))]);
        let right = map([("k", value(2, "right")), ("l", Node::List(vec![value(2, "right")]))]);
        let (left_before, right_before) = (left.clone(), right.clone());

        let _ = merge(&left, &right).unwrap();

        assert_eq!(left, left_before);
        assert_eq!(left.get("k").and_then(Node::as_state).map(State::len), Some(1));
        assert_eq!(left.get("l").and_then(Node::as_list).map(<[Node]>::len), Some(1));
        assert_eq!(right, right_before);
    }

    #[test]
    fn scalar_against_container_is_a_mismatch() {
        let scalar = map([("one", value(1, "left"))]);
        let list = map([("one", Node::List(vec![value(1, "right")]))]);
        let mapping = map([("one", map([("one", value(1, "right"))]))]);

        for (left, right) in [(&scalar, &list), (&list, &scalar), (&scalar, &mapping), (&mapping, &scalar)] {
            let err = merge(left, right).unwrap_err();
            assert!(matches!(err, ElectiveError::MergeTypeMismatch { ref path, .. } if path == "one"));
        }
    }

    #[test]
    fn list_against_mapping_is_a_mismatch() {
        let list = map([("k", Node::List(vec![value(1, "left")]))]);
        let mapping = map([("k", map([("x", value(1, "right"))]))]);

        match merge(&list, &mapping).unwrap_err() {
            ElectiveError::MergeTypeMismatch { left, right, .. } => {
                assert_eq!(left, NodeKind::List);
                assert_eq!(right, NodeKind::Mapping);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(merge(&mapping, &list).is_err());
    }

    #[test]
    fn mismatch_reports_nested_path() {
        let left = map([("server", map([("ports", Node::List(vec![value(80, "toml")]))]))]);
        let right = map([("server", map([("ports", value(443, "env"))]))]);

        let err = merge(&left, &right).unwrap_err();
        assert_eq!(err.to_string(), "cannot merge a scalar into a list at `server.ports`");
    }

    #[test]
    fn root_scalar_against_mapping_is_a_mismatch() {
        let left = value(1, "left");
        let right = map([("k", value(1, "right"))]);
        let err = merge(&left, &right).unwrap_err();
        assert!(matches!(err, ElectiveError::MergeTypeMismatch { ref path, .. } if path == "<root>"));
    }
}
