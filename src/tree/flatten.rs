//! Flattening of a parsed document into ordered key/value entries.
//!
//! The configuration sink consumes flat `parent:child` keys, not nested
//! structures. [`flatten`] walks a document's root mapping and emits one
//! [`FlatEntry`] per scalar leaf, in the exact order the parser saw them.
//! Sequences contribute 0-based indices as path segments:
//!
//! ```text
//! a:               a:b:0 = "1"
//!   b:             a:b:1 = "2"
//!     - 1          a:b:2:c = "x"
//!     - 2
//!     - c: x
//! ```

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::{key_text, scalar_text};
use crate::constants::KEY_SEPARATOR;

/// One flattened configuration entry.
///
/// `value` is `None` for an explicit null scalar, which the sink stores as a
/// null marker rather than an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatEntry {
    /// Key path segments joined with [`KEY_SEPARATOR`].
    pub key: String,
    /// Scalar text, or `None` for null.
    pub value: Option<String>,
}

impl FlatEntry {
    /// Construct an entry from a key and an optional scalar text.
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Flatten a document's root mapping into ordered entries.
///
/// Produces exactly one entry per scalar leaf (empty mappings and sequences
/// contribute nothing), preserving mapping iteration order from the parse.
/// Flattening the same tree twice yields identical output.
pub fn flatten(root: &Mapping) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    for (key, value) in root {
        flatten_into(value, &key_text(key), &mut entries);
    }
    entries
}

/// Recursive worker: emit entries for `node` under `prefix`.
fn flatten_into(node: &Value, prefix: &str, entries: &mut Vec<FlatEntry>) {
    match node {
        Value::Mapping(map) => {
            for (key, value) in map {
                let child = format!("{prefix}{KEY_SEPARATOR}{}", key_text(key));
                flatten_into(value, &child, entries);
            }
        }
        Value::Sequence(seq) => {
            for (index, item) in seq.iter().enumerate() {
                let child = format!("{prefix}{KEY_SEPARATOR}{index}");
                flatten_into(item, &child, entries);
            }
        }
        Value::Null => entries.push(FlatEntry::new(prefix, None)),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            entries.push(FlatEntry::new(prefix, scalar_text(node)));
        }
        Value::Tagged(tagged) => flatten_into(&tagged.value, prefix, entries),
    }
}
