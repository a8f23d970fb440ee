//! Helpers over authored instances.
//!
//! Instances are plain `serde_json::Value` objects so they round-trip
//! through serialization unchanged; these functions give the editors a
//! shared vocabulary for the reserved fields without wrapping the data in
//! a new type.

use serde_json::Value;

use crate::config::RegistryConfig;
use crate::editor::EditorError;

/// The instance's unique id, if present.
pub fn instance_id<'a>(instance: &'a Value, config: &RegistryConfig) -> Option<&'a str> {
    instance.get(&config.id_field).and_then(Value::as_str)
}

/// The instance's explicit type tag, if present.
pub fn type_tag<'a>(instance: &'a Value, config: &RegistryConfig) -> Option<&'a str> {
    instance.get(&config.type_tag_field).and_then(Value::as_str)
}

/// The instance's children array, if it has one.
pub fn children<'a>(instance: &'a Value, config: &RegistryConfig) -> Option<&'a Vec<Value>> {
    instance.get(&config.children_field).and_then(Value::as_array)
}

pub fn children_mut<'a>(
    instance: &'a mut Value,
    config: &RegistryConfig,
) -> Option<&'a mut Vec<Value>> {
    instance
        .get_mut(&config.children_field)
        .and_then(Value::as_array_mut)
}

/// Moves one item from `from` to `to`, leaving every other item's relative
/// order unchanged. Bounds-checked; a same-index move is a no-op.
pub fn move_item(items: &mut Vec<Value>, from: usize, to: usize) -> Result<(), EditorError> {
    let len = items.len();
    if from >= len {
        return Err(EditorError::IndexOutOfBounds { index: from, len });
    }
    if to >= len {
        return Err(EditorError::IndexOutOfBounds { index: to, len });
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

/// Whether a value counts as empty for the purposes of the removal
/// confirmation check: null, an empty string, array, or object.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(object) => object.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reserved_field_accessors() {
        let config = RegistryConfig::default();
        let instance = json!({
            "id": "abc",
            "@type": "Task",
            "children": [{"id": "def"}],
        });
        assert_eq!(instance_id(&instance, &config), Some("abc"));
        assert_eq!(type_tag(&instance, &config), Some("Task"));
        assert_eq!(children(&instance, &config).map(Vec::len), Some(1));
    }

    #[test]
    fn test_move_item_is_a_permutation() {
        let mut items = vec![json!("a"), json!("b"), json!("c"), json!("d")];
        move_item(&mut items, 3, 1).unwrap();
        assert_eq!(items, vec![json!("a"), json!("d"), json!("b"), json!("c")]);
        move_item(&mut items, 0, 3).unwrap();
        assert_eq!(items, vec![json!("d"), json!("b"), json!("c"), json!("a")]);
        assert_eq!(items.len(), 4);
    }

    #[test]
    fn test_move_item_rejects_out_of_bounds() {
        let mut items = vec![json!("a")];
        assert!(move_item(&mut items, 1, 0).is_err());
        assert!(move_item(&mut items, 0, 5).is_err());
        assert_eq!(items, vec![json!("a")]);
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));
        assert!(!is_empty_value(&json!("x")));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
    }
}
