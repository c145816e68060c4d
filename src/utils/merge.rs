//! Mapping merges

use serde_json::{Map, Value};

/// Shallow merge; later mappings override earlier ones
pub fn merge_dicts<'m>(
    dicts: impl IntoIterator<Item = &'m Map<String, Value>>,
) -> Map<String, Value> {
    let mut merged = Map::new();
    for dict in dicts {
        for (key, value) in dict {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Recursive merge of `update` into a copy of `base`.
///
/// Keys already in `base` are never overwritten, except that two nested
/// mappings under the same key are merged the same way.
pub fn dict_update(base: &Map<String, Value>, update: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in update {
        if !merged.contains_key(key) {
            merged.insert(key.clone(), value.clone());
            continue;
        }
        if let (Some(Value::Object(existing)), Value::Object(nested)) =
            (merged.get_mut(key), value)
        {
            *existing = dict_update(existing, nested);
        }
    }
    merged
}

/// Copy of `dict` without null entries
pub fn remove_none_values(dict: &Map<String, Value>) -> Map<String, Value> {
    dict.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_merge_dicts() {
        let a = object(json!({"a": 1, "b": 2}));
        let b = object(json!({"b": 3, "c": 4}));
        assert_eq!(
            Value::Object(merge_dicts([&a, &b])),
            json!({"a": 1, "b": 3, "c": 4})
        );
    }

    #[test]
    fn test_dict_update_keeps_existing() {
        let base = object(json!({"a": 1, "nested": {"x": 1}, "flat": 2}));
        let update = object(json!({
            "a": 9,
            "nested": {"x": 9, "y": 2},
            "flat": {"z": 1},
            "new": 3
        }));

        let merged = dict_update(&base, &update);
        assert_eq!(
            Value::Object(merged),
            json!({"a": 1, "nested": {"x": 1, "y": 2}, "flat": 2, "new": 3})
        );
        // the input is untouched
        assert_eq!(base["nested"], json!({"x": 1}));
    }

    #[test]
    fn test_remove_none_values() {
        let dict = object(json!({"a": null, "b": 0, "c": {"d": null}}));
        assert_eq!(
            Value::Object(remove_none_values(&dict)),
            json!({"b": 0, "c": {"d": null}})
        );
    }
}
