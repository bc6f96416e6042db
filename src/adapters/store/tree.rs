//! JSON tree operations shared by the store backends
//!
//! The realtime store has no notion of empty containers or explicit nulls:
//! writing `null` deletes a node, and a node whose last child disappears
//! disappears with it. These helpers keep a `serde_json::Value` tree in that
//! normalized shape.

use serde_json::{Map, Value};

/// Value at `path`, or `Value::Null` if nothing is stored there
pub fn value_at(root: &Value, path: &[String]) -> Value {
    let mut node = root;
    for segment in path {
        match node.get(segment) {
            Some(child) => node = child,
            None => return Value::Null,
        }
    }
    node.clone()
}

/// Replace the value at `path`, creating intermediate nodes and pruning
/// nodes left empty. Writing `Value::Null` removes the node.
pub fn write_at(root: &mut Value, path: &[String], value: Value) {
    write_normalized(root, path, normalize(value));
}

fn write_normalized(node: &mut Value, path: &[String], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        *node = value;
        return;
    };

    if !node.is_object() {
        // Deleting below a leaf or an absent node changes nothing
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }

    if let Value::Object(map) = node {
        let child = map.entry(head.clone()).or_insert(Value::Null);
        write_normalized(child, rest, value);
        if child.is_null() {
            map.remove(head);
        }
    }

    if matches!(node, Value::Object(map) if map.is_empty()) {
        *node = Value::Null;
    }
}

/// Drop nulls and empty objects recursively. Arrays are stored as objects
/// keyed by index, the way the store keeps them.
pub fn normalize(value: Value) -> Value {
    let map = match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        other => return other,
    };

    let normalized: Map<String, Value> = map
        .into_iter()
        .map(|(k, v)| (k, normalize(v)))
        .filter(|(_, v)| !v.is_null())
        .collect();

    if normalized.is_empty() {
        Value::Null
    } else {
        Value::Object(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> Vec<String> {
        p.split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_value_at_missing_is_null() {
        let root = json!({"hospitals": {"2024": {"x": {"name": "A"}}}});
        assert_eq!(value_at(&root, &path("hospitals/2024/x/name")), json!("A"));
        assert_eq!(value_at(&root, &path("hospitals/2023")), Value::Null);
        assert_eq!(value_at(&root, &path("hospitals/2024/x/name/deeper")), Value::Null);
        assert_eq!(value_at(&root, &[]), root);
    }

    #[test]
    fn test_write_creates_intermediate_nodes() {
        let mut root = Value::Null;
        write_at(&mut root, &path("hospitals/2024/x"), json!({"name": "A"}));
        assert_eq!(root, json!({"hospitals": {"2024": {"x": {"name": "A"}}}}));
    }

    #[test]
    fn test_write_replaces_wholesale() {
        let mut root = json!({"hospitals": {"2024": {"x": {"name": "A", "beds": 3}}}});
        write_at(&mut root, &path("hospitals/2024/x"), json!({"name": "B"}));
        assert_eq!(root, json!({"hospitals": {"2024": {"x": {"name": "B"}}}}));
    }

    #[test]
    fn test_remove_prunes_empty_parents() {
        let mut root = json!({"hospitals": {"2024": {"x": {"name": "A"}}}, "meta": 1});
        write_at(&mut root, &path("hospitals/2024/x"), Value::Null);
        assert_eq!(root, json!({"meta": 1}));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut root = json!({"hospitals": "leaf"});
        write_at(&mut root, &path("hospitals/2024/x"), Value::Null);
        assert_eq!(root, json!({"hospitals": "leaf"}));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(json!({})), Value::Null);
        assert_eq!(normalize(json!({"a": null, "b": {"c": {}}})), Value::Null);
        assert_eq!(normalize(json!(["x", null, "z"])), json!({"0": "x", "2": "z"}));
        assert_eq!(normalize(json!({"a": 1})), json!({"a": 1}));
    }
}
