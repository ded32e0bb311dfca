//! Field-by-field merging of configuration layers.
//!
//! Later layers win. Objects merge recursively, everything else is replaced.

use serde_json::Value;

/// Merge `overlay` onto `base`.
///
/// A null in the overlay means "not specified" and keeps the base value.
///
/// ```
/// use serde_json::json;
/// use task_list_server::config::deep_merge;
///
/// let base = json!({"server": {"host": "0.0.0.0", "port": 3000}});
/// let overlay = json!({"server": {"port": 8080}});
/// assert_eq!(
///     deep_merge(base, overlay),
///     json!({"server": {"host": "0.0.0.0", "port": 8080}})
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Fold a sequence of layers, lowest precedence first.
pub fn deep_merge_all(layers: impl IntoIterator<Item = Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_layer_overrides_single_field() {
        let defaults = json!({
            "server": {"host": "0.0.0.0", "port": 3000},
            "database": {"path": "tasks.db", "pool_size": 10}
        });
        let file = json!({"database": {"pool_size": 4}});

        assert_eq!(
            deep_merge(defaults, file),
            json!({
                "server": {"host": "0.0.0.0", "port": 3000},
                "database": {"path": "tasks.db", "pool_size": 4}
            })
        );
    }

    #[test]
    fn null_keeps_lower_layer() {
        let base = json!({"server": {"port": 3000}});
        let overlay = json!({"server": {"port": null}});
        assert_eq!(deep_merge(base, overlay), json!({"server": {"port": 3000}}));
    }

    #[test]
    fn merge_all_applies_layers_in_order() {
        let layers = vec![
            json!({"server": {"port": 3000, "cors": false}}),
            json!({"server": {"port": 4000}}),
            json!({"server": {"port": 5000}}),
        ];
        assert_eq!(
            deep_merge_all(layers),
            json!({"server": {"port": 5000, "cors": false}})
        );
    }
}
