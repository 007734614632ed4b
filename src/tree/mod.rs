//! Dynamic tree handling for parsed YAML documents.
//!
//! A parsed document is a [`serde_yaml::Value`]: a tree of mappings,
//! sequences, and scalars. Mappings preserve the key order of the source
//! text, which is what makes flattening deterministic. This module holds the
//! traversal primitives shared by the resolver, the flattener, and the
//! template functions:
//!
//! - textual normalization of scalars and mapping keys
//! - order-preserving lookup by textual key
//! - conversion of a YAML tree into a [`serde_json::Value`] for the
//!   template engine's variable context
//!
//! Tagged values (`!tag ...`) are transparent everywhere: traversal always
//! looks through the tag to the inner value.

pub mod flatten;
pub mod resolve;

use serde_yaml::{Mapping, Value};

/// Look through YAML tags to the underlying value.
pub fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Textual form of a scalar node, or `None` for an explicit null.
///
/// Non-scalar nodes (mappings and sequences) have no scalar text and also
/// yield `None`; callers that can encounter them must check the node kind
/// first if the distinction matters.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(_) | Value::Mapping(_) => None,
        Value::Tagged(tagged) => scalar_text(&tagged.value),
    }
}

/// Textual form of a mapping key, used as a path segment.
///
/// String keys pass through unchanged; other scalar keys are normalized to
/// their textual representation. Composite keys (rare, but YAML allows them)
/// fall back to their serialized form.
pub fn key_text(key: &Value) -> String {
    match key {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(_) | Value::Mapping(_) => serde_yaml::to_string(key)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
        Value::Tagged(tagged) => key_text(&tagged.value),
    }
}

/// Look up a mapping entry by the textual form of its key.
///
/// Keys are compared by their textual representation, so `port: 1` and a
/// lookup for `"1"` match. Insertion order is respected: the first matching
/// entry wins.
pub fn get_entry<'a>(map: &'a Mapping, name: &str) -> Option<&'a Value> {
    map.iter().find(|(key, _)| key_text(key) == name).map(|(_, value)| value)
}

/// Convert a YAML tree into a JSON value for the template engine context.
///
/// Mapping keys are normalized to their textual form; tagged values are
/// unwrapped. Non-finite floats, which JSON cannot represent, become null.
pub fn to_template_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::from(u)
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            } else {
                serde_json::Value::Null
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(seq) => {
            serde_json::Value::Array(seq.iter().map(to_template_value).collect())
        }
        Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (key, entry) in map {
                object.insert(key_text(key), to_template_value(entry));
            }
            serde_json::Value::Object(object)
        }
        Value::Tagged(tagged) => to_template_value(&tagged.value),
    }
}
