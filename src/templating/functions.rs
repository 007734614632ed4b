//! Custom Tera functions for YAML templates.
//!
//! The one registered function, `connection_string`, is typed extraction
//! over the untyped values tree: it resolves a dotted path to a database
//! node, requires a `host` field, defaults the port, and assembles a
//! connection string literal:
//!
//! ```yaml
//! connectionStrings:
//!   db1: '{{ connection_string(database="app", path="global.databases.db1") }}'
//! ```
//!
//! The function closes over the values tree of the current render pass and
//! is rebuilt per render, so a reload always sees the file's latest content.

use std::collections::HashMap;
use std::sync::Arc;

use serde_yaml::Value;

use crate::constants::{DEFAULT_CONNECTION_PATH, DEFAULT_POSTGRES_PORT};
use crate::error::YamletError;
use crate::tree::resolve::resolve;
use crate::tree::{get_entry, scalar_text, untag};

/// Textual form of a function argument, or `None` when absent or unusable.
fn argument_text(value: Option<&tera::Value>) -> Option<String> {
    match value? {
        tera::Value::String(s) => Some(s.clone()),
        tera::Value::Number(n) => Some(n.to_string()),
        tera::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Build a connection string from the values tree.
///
/// Resolves `path` to a mapping that must contain `host`; `port` defaults to
/// [`DEFAULT_POSTGRES_PORT`] when absent. The result has the form
/// `Server=<host>;Port=<port>;Database=<database>`.
///
/// # Errors
///
/// - [`YamletError::PathNotFound`] when `path` does not resolve
/// - [`YamletError::MissingField`] when the resolved node is not a mapping
///   with a `host` field
pub fn build_connection_string(
    values: &Value,
    database: &str,
    path: &str,
) -> Result<String, YamletError> {
    let node = resolve(values, path).ok_or_else(|| YamletError::PathNotFound {
        path: path.to_string(),
    })?;

    let Value::Mapping(map) = untag(node) else {
        return Err(YamletError::MissingField {
            field: "host".to_string(),
            path: path.to_string(),
        });
    };

    let host = get_entry(map, "host").and_then(scalar_text).ok_or_else(|| {
        YamletError::MissingField {
            field: "host".to_string(),
            path: path.to_string(),
        }
    })?;

    let port = get_entry(map, "port")
        .and_then(scalar_text)
        .unwrap_or_else(|| DEFAULT_POSTGRES_PORT.to_string());

    Ok(format!("Server={host};Port={port};Database={database}"))
}

/// Create the `connection_string` template function, closed over `values`.
///
/// Named arguments: `database` (required) and `path` (optional, defaulting
/// to [`DEFAULT_CONNECTION_PATH`]).
pub fn create_connection_string_function(values: Arc<Value>) -> impl tera::Function + 'static {
    move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let database = argument_text(args.get("database")).ok_or_else(|| {
            tera::Error::msg(
                YamletError::MissingArgument {
                    name: "database".to_string(),
                }
                .to_string(),
            )
        })?;

        let path = argument_text(args.get("path"))
            .unwrap_or_else(|| DEFAULT_CONNECTION_PATH.to_string());

        build_connection_string(&values, &database, &path)
            .map(tera::Value::String)
            .map_err(|e| tera::Error::msg(e.to_string()))
    }
}
