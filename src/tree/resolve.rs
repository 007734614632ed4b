//! Dotted-path lookup over a parsed YAML tree.

use serde_yaml::Value;

use super::{get_entry, untag};

/// Resolve a dotted path against a tree, returning the node it names.
///
/// Each segment must name an entry of a mapping; keys are compared by their
/// textual representation. Resolution short-circuits to `None` as soon as a
/// segment is absent or the current node is not a mapping. Empty or
/// whitespace-only paths never resolve. Sequence traversal is not supported:
/// there is no wildcard or index syntax in path segments.
///
/// # Examples
///
/// ```
/// use yamlet::tree::resolve::resolve;
///
/// let tree: serde_yaml::Value =
///     serde_yaml::from_str("global:\n  database:\n    host: pg.local").unwrap();
/// let host = resolve(&tree, "global.database.host").unwrap();
/// assert_eq!(host.as_str(), Some("pg.local"));
/// assert!(resolve(&tree, "global.missing").is_none());
/// ```
pub fn resolve<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    if path.trim().is_empty() {
        return None;
    }

    let mut current = untag(tree);
    for segment in path.split('.') {
        let Value::Mapping(map) = current else {
            return None;
        };
        current = untag(get_entry(map, segment)?);
    }
    Some(current)
}
