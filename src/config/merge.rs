//! Field-by-field merging of configuration tiers.

use serde_json::Value;

/// Merge `overlay` on top of `base`.
///
/// Objects merge key by key. Any other overlay value replaces the base,
/// except `null`, which leaves the base untouched.
///
/// ```
/// use serde_json::json;
/// use todo_server::config::deep_merge;
///
/// let defaults = json!({ "server": { "host": "127.0.0.1", "port": 3000 } });
/// let project = json!({ "server": { "port": 8080 } });
///
/// assert_eq!(
///     deep_merge(defaults, project),
///     json!({ "server": { "host": "127.0.0.1", "port": 8080 } })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let next = match merged.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                merged.insert(key, next);
            }
            Value::Object(merged)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge tiers lowest-priority first.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}
