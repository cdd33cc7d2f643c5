use elective::{fold_layers, make_stateful_map, merge, Layer, MergePolicy, Node, RawMap};
use proptest::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;

fn scalars() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-f]", any::<i64>(), 0..6)
}

fn lists() -> impl Strategy<Value = BTreeMap<String, Vec<i64>>> {
    prop::collection::btree_map("[a-f]", prop::collection::vec(any::<i64>(), 0..4), 0..6)
}

fn raw<V: Into<Value>>(map: BTreeMap<String, V>) -> RawMap {
    map.into_iter().map(|(k, v)| (k, v.into())).collect()
}

proptest! {
    /// Property: the empty mapping is an identity on either side
    #[test]
    fn prop_empty_is_identity(values in scalars()) {
        let tree = make_stateful_map(&raw(values), "toml").expect("stateful");
        prop_assert_eq!(merge(&Node::empty(), &tree).expect("merge"), tree.clone());
        prop_assert_eq!(merge(&tree, &Node::empty()).expect("merge"), tree.clone());
    }

    /// Property: on shared keys the right-hand value is current, and every
    /// key from either side survives
    #[test]
    fn prop_right_wins(left in scalars(), right in scalars()) {
        let l = make_stateful_map(&raw(left.clone()), "left").expect("stateful");
        let r = make_stateful_map(&raw(right.clone()), "right").expect("stateful");
        let merged = merge(&l, &r).expect("merge");

        let mut expected = left.clone();
        expected.extend(right.clone());
        prop_assert_eq!(merged.to_value(), Value::Object(raw(expected.clone())));

        for key in expected.keys() {
            let state = merged.get(key).and_then(Node::as_state).expect("state");
            let sources: Vec<&str> = state.sources().iter().map(String::as_str).collect();
            let want: Vec<&str> = [left.contains_key(key).then_some("left"), right.contains_key(key).then_some("right")]
                .into_iter()
                .flatten()
                .collect();
            prop_assert_eq!(sources, want);
        }
    }

    /// Property: merged lists hold the left items followed by the right items
    #[test]
    fn prop_lists_concatenate(left in lists(), right in lists()) {
        let l = make_stateful_map(&raw(left.clone()), "left").expect("stateful");
        let r = make_stateful_map(&raw(right.clone()), "right").expect("stateful");
        let merged = merge(&l, &r).expect("merge");

        for (key, items) in &right {
            let before = left.get(key).map(Vec::len).unwrap_or(0);
            let list = merged.get(key).and_then(Node::as_list).expect("list");
            prop_assert_eq!(list.len(), before + items.len());
        }
    }

    /// Property: left and right policies are mirror images
    #[test]
    fn prop_policies_mirror(a in scalars(), b in scalars()) {
        let forward = [Layer::new("a", raw(a.clone())), Layer::new("b", raw(b.clone()))];
        let backward = [Layer::new("b", raw(b)), Layer::new("a", raw(a))];
        let left = fold_layers(MergePolicy::Left, &forward).expect("fold");
        let right = fold_layers(MergePolicy::Right, &backward).expect("fold");
        prop_assert_eq!(left, right);
    }
}
