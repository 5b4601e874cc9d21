//! Dotted key-path lookup shared by the resolver and the expander

use serde_json::Value;

/// Walk `path` (`a.b.c`) through nested mappings starting at `root`.
///
/// Returns `None` as soon as a segment is missing or the current value is
/// not a mapping. Sequences are not indexed.
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

/// String form of a context value as it appears in rendered output.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // Mappings and sequences use their JSON representation
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested() {
        let ctx = json!({"header": {"client": {"name": "Acme"}}});
        assert_eq!(
            lookup_path(&ctx, "header.client.name"),
            Some(&json!("Acme"))
        );
        assert_eq!(lookup_path(&ctx, "header.missing"), None);
    }

    #[test]
    fn test_lookup_stops_at_scalar() {
        let ctx = json!({"total": 10});
        assert_eq!(lookup_path(&ctx, "total.amount"), None);
    }

    #[test]
    fn test_lookup_does_not_index_sequences() {
        let ctx = json!({"items": [{"name": "A"}]});
        assert_eq!(lookup_path(&ctx, "items.0.name"), None);
    }

    #[test]
    fn test_lookup_empty_segment() {
        let ctx = json!({"a": {"b": 1}});
        assert_eq!(lookup_path(&ctx, "a..b"), None);
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("text")), "text");
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(render_value(&json!(1.5)), "1.5");
        assert_eq!(render_value(&json!(-24)), "-24");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&json!(null)), "");
        assert_eq!(render_value(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(render_value(&json!([1, 2])), "[1,2]");
    }
}
