//! Custom Tera filters for YAML templates.
//!
//! Two filters are registered on every render:
//!
//! - `to_yaml` serializes any value back into literal YAML text, so a
//!   template can re-emit a sub-tree of the values file inline
//! - `indent` prefixes every line with spaces, which is how a `to_yaml`
//!   block is re-aligned to its insertion point in the surrounding document
//!
//! ```yaml
//! app:
//! {{ global.databases | to_yaml | indent(width=2) }}
//! ```

use std::collections::HashMap;

/// Create the `to_yaml` filter.
///
/// Delegates to the YAML serializer on the filter input. The output ends
/// with a newline, as the serializer produces a complete document.
pub fn create_to_yaml_filter() -> impl tera::Filter + 'static {
    |value: &tera::Value, _args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let text = serde_yaml::to_string(value)
            .map_err(|e| tera::Error::msg(format!("to_yaml filter error: {e}")))?;
        Ok(tera::Value::String(text))
    }
}

/// Create the `indent` filter.
///
/// Prepends `width` spaces to every line of the input. Lines are split on
/// both CRLF and LF endings and rejoined with `\n`, so the output is stable
/// across platforms.
pub fn create_indent_filter() -> impl tera::Filter + 'static {
    |value: &tera::Value, args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let text = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("indent filter requires a string input"))?;

        let width = args
            .get("width")
            .and_then(tera::Value::as_u64)
            .ok_or_else(|| tera::Error::msg("indent filter requires a 'width' argument"))?;

        let pad = " ".repeat(width as usize);
        let indented: Vec<String> = text
            .split("\r\n")
            .flat_map(|chunk| chunk.split('\n'))
            .map(|line| format!("{pad}{line}"))
            .collect();

        Ok(tera::Value::String(indented.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Filter;

    #[test]
    fn to_yaml_serializes_nested_values() {
        let filter = create_to_yaml_filter();
        let value = serde_json::json!({"host": "pg.local", "port": "6432"});
        let result = filter.filter(&value, &HashMap::new()).unwrap();
        let text = result.as_str().unwrap();
        assert!(text.contains("host: pg.local"));
        assert!(text.contains("port: '6432'"));
    }

    #[test]
    fn to_yaml_serializes_scalars() {
        let filter = create_to_yaml_filter();
        let result = filter.filter(&serde_json::json!(42), &HashMap::new()).unwrap();
        assert_eq!(result.as_str().unwrap().trim_end(), "42");
    }

    #[test]
    fn indent_prefixes_every_line() {
        let filter = create_indent_filter();
        let mut args = HashMap::new();
        args.insert("width".to_string(), tera::Value::from(2));
        let input = tera::Value::String("a\nb".to_string());
        let result = filter.filter(&input, &args).unwrap();
        assert_eq!(result.as_str().unwrap(), "  a\n  b");
    }

    #[test]
    fn indent_normalizes_crlf_endings() {
        let filter = create_indent_filter();
        let mut args = HashMap::new();
        args.insert("width".to_string(), tera::Value::from(4));
        let input = tera::Value::String("a\r\nb\nc".to_string());
        let result = filter.filter(&input, &args).unwrap();
        assert_eq!(result.as_str().unwrap(), "    a\n    b\n    c");
    }

    #[test]
    fn indent_requires_width() {
        let filter = create_indent_filter();
        let input = tera::Value::String("a".to_string());
        assert!(filter.filter(&input, &HashMap::new()).is_err());
    }

    #[test]
    fn indent_rejects_non_string_input() {
        let filter = create_indent_filter();
        let mut args = HashMap::new();
        args.insert("width".to_string(), tera::Value::from(2));
        assert!(filter.filter(&serde_json::json!([1]), &args).is_err());
    }
}
