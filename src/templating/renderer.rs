//! Template rendering engine with Tera.

use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;
use tera::{Context as TeraContext, Tera};

use super::{filters, functions};
use crate::error::YamletError;
use crate::tree::{key_text, to_template_value, untag};

/// Renderer for one pass over a template, bound to a values tree.
///
/// A fresh Tera instance is created per render (cheap, just empty maps), and
/// the filters and functions are re-registered against the current values
/// tree. Nothing is cached across renders: under reload the values file can
/// change between passes, and every pass must see only the current on-disk
/// content.
pub struct TemplateRenderer {
    /// Parsed values tree for this render pass.
    values: Arc<Value>,
}

impl TemplateRenderer {
    /// Create a renderer bound to a values tree.
    pub fn new(values: Arc<Value>) -> Self {
        Self {
            values,
        }
    }

    /// Render a template against the values tree.
    ///
    /// The context contains the values tree's top-level entries as variables
    /// plus the registered helpers. `template_path` is used only for
    /// diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`YamletError::Template`] on any engine failure: syntax
    /// errors, filter or function failures, and references to variables the
    /// values tree does not define.
    pub fn render(&self, template_text: &str, template_path: &Path) -> Result<String, YamletError> {
        let context = self.build_context();

        let mut tera = Tera::default();
        tera.register_filter("to_yaml", filters::create_to_yaml_filter());
        tera.register_filter("indent", filters::create_indent_filter());
        tera.register_function(
            "connection_string",
            functions::create_connection_string_function(Arc::clone(&self.values)),
        );

        tracing::debug!(template = %template_path.display(), "rendering template");

        tera.render_str(template_text, &context).map_err(|e| YamletError::Template {
            path: template_path.to_path_buf(),
            message: Self::format_tera_error(&e),
        })
    }

    /// Build the variable context from the values tree's top-level mapping.
    fn build_context(&self) -> TeraContext {
        let mut context = TeraContext::new();
        if let Value::Mapping(top) = untag(&self.values) {
            for (key, value) in top {
                context.insert(key_text(key), &to_template_value(value));
            }
        }
        context
    }

    /// Format a Tera error chain into a single diagnostic line.
    ///
    /// Tera wraps the root cause in messages that mention its internal
    /// one-off template name; those are scrubbed before the message is
    /// surfaced to the user.
    pub(crate) fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut messages = Vec::new();
        let mut all_messages = vec![error.to_string()];
        let mut current: Option<&dyn Error> = error.source();
        while let Some(err) = current {
            all_messages.push(err.to_string());
            current = err.source();
        }

        for msg in all_messages {
            let cleaned = msg
                .replace("while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "template rendering failed")
                .replace("Failed to parse '__tera_one_off'", "template syntax error")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string();

            if !cleaned.is_empty()
                && cleaned != "template rendering failed"
                && cleaned != "template syntax error"
            {
                messages.push(cleaned);
            }
        }

        if messages.is_empty() {
            "template syntax error".to_string()
        } else {
            messages.join(": ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn renderer(values_text: &str) -> TemplateRenderer {
        let values: Value = serde_yaml::from_str(values_text).unwrap();
        TemplateRenderer::new(Arc::new(values))
    }

    fn template_path() -> PathBuf {
        PathBuf::from("app.yaml.tmpl")
    }

    #[test]
    fn renders_values_as_variables() {
        let renderer = renderer("name: svc\nreplicas: 3");
        let rendered = renderer
            .render("app: {{ name }}\ncount: {{ replicas }}", &template_path())
            .unwrap();
        assert_eq!(rendered, "app: svc\ncount: 3");
    }

    #[test]
    fn renders_nested_lookups() {
        let renderer = renderer("global:\n  region: eu-1");
        let rendered = renderer.render("region: {{ global.region }}", &template_path()).unwrap();
        assert_eq!(rendered, "region: eu-1");
    }

    #[test]
    fn missing_variable_fails_the_render() {
        let renderer = renderer("name: svc");
        let err = renderer.render("x: {{ absent_key }}", &template_path()).unwrap_err();
        let YamletError::Template {
            message, ..
        } = err
        else {
            panic!("expected template error");
        };
        assert!(message.contains("absent_key"), "diagnostic was: {message}");
        assert!(!message.contains("__tera_one_off"), "diagnostic was: {message}");
    }

    #[test]
    fn filters_are_registered() {
        let renderer = renderer("block:\n  a: 1");
        let rendered = renderer
            .render("out:\n{{ block | to_yaml | indent(width=2) }}", &template_path())
            .unwrap();
        assert!(rendered.contains("  a: 1"));
    }

    #[test]
    fn connection_string_is_registered() {
        let renderer = renderer("global:\n  db:\n    host: h");
        let rendered = renderer
            .render(
                r#"c: '{{ connection_string(database="d", path="global.db") }}'"#,
                &template_path(),
            )
            .unwrap();
        assert_eq!(rendered, "c: 'Server=h;Port=5432;Database=d'");
    }

    #[test]
    fn syntax_errors_are_reported() {
        let renderer = renderer("name: svc");
        let err = renderer.render("x: {% if %}", &template_path()).unwrap_err();
        assert!(matches!(err, YamletError::Template { .. }));
    }

    #[test]
    fn context_is_rebuilt_per_renderer() {
        let first = renderer("name: one");
        let second = renderer("name: two");
        assert_eq!(first.render("{{ name }}", &template_path()).unwrap(), "one");
        assert_eq!(second.render("{{ name }}", &template_path()).unwrap(), "two");
    }
}
