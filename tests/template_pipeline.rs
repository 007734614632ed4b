//! End-to-end tests for the template pipeline.
//!
//! These tests drive the public builder surface against real files in
//! temporary directories: rendering, flattening, optionality, persistence,
//! and reload-on-change.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use yamlet::{Binding, ConfigBuilder, ConfigSink, MemorySink, YamletError};

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }
}

fn load_template(binding: Binding) -> Result<Arc<MemorySink>, YamletError> {
    let sink = Arc::new(MemorySink::new());
    ConfigBuilder::new()
        .add_template(binding)
        .load(sink.clone() as Arc<dyn ConfigSink>)?;
    Ok(sink)
}

#[test]
fn connection_string_scenario() {
    let fixture = Fixture::new();
    let values = fixture.write(
        "values.yaml",
        r#"
global:
  databases:
    db1:
      host: pg.local
      port: "6432"
"#,
    );
    let template = fixture.write(
        "app.yaml.tmpl",
        r#"
connectionStrings:
  db1: '{{ connection_string(database="dbname1", path="global.databases.db1") }}'
"#,
    );

    let binding = Binding::new(&template).with_values_path(&values).persist(false);
    let sink = load_template(binding).unwrap();

    assert_eq!(
        sink.get("connectionStrings:db1"),
        Some(Some("Server=pg.local;Port=6432;Database=dbname1".to_string()))
    );
}

#[test]
fn sequences_flatten_with_indices() {
    let fixture = Fixture::new();
    let values = fixture.write("values.yaml", "unused: 1");
    let template = fixture.write(
        "app.yaml.tmpl",
        r#"
a:
  b:
    - 1
    - 2
    - c: x
"#,
    );

    let binding = Binding::new(&template).with_values_path(&values).persist(false);
    let sink = load_template(binding).unwrap();

    assert_eq!(sink.get("a:b:0"), Some(Some("1".to_string())));
    assert_eq!(sink.get("a:b:1"), Some(Some("2".to_string())));
    assert_eq!(sink.get("a:b:2:c"), Some(Some("x".to_string())));
    assert_eq!(sink.len(), 3);
}

#[test]
fn values_are_visible_as_variables() {
    let fixture = Fixture::new();
    let values = fixture.write("values.yaml", "service:\n  name: orders\n  replicas: 2");
    let template = fixture.write(
        "app.yaml.tmpl",
        "name: {{ service.name }}\nreplicas: {{ service.replicas }}",
    );

    let binding = Binding::new(&template).with_values_path(&values).persist(false);
    let sink = load_template(binding).unwrap();

    assert_eq!(sink.get("name"), Some(Some("orders".to_string())));
    assert_eq!(sink.get("replicas"), Some(Some("2".to_string())));
}

#[test]
fn to_yaml_and_indent_reemit_subtrees() {
    let fixture = Fixture::new();
    let values = fixture.write(
        "values.yaml",
        "logging:\n  level: info\n  format: json",
    );
    let template = fixture.write(
        "app.yaml.tmpl",
        "app:\n{{ logging | to_yaml | indent(width=2) }}",
    );

    let binding = Binding::new(&template).with_values_path(&values).persist(false);
    let sink = load_template(binding).unwrap();

    assert_eq!(sink.get("app:level"), Some(Some("info".to_string())));
    assert_eq!(sink.get("app:format"), Some(Some("json".to_string())));
}

#[test]
fn missing_values_key_fails_the_render() {
    let fixture = Fixture::new();
    let values = fixture.write("values.yaml", "present: 1");
    let template = fixture.write("app.yaml.tmpl", "x: {{ absent }}");

    let binding = Binding::new(&template).with_values_path(&values).persist(false);
    let err = load_template(binding).unwrap_err();

    let YamletError::Template {
        message, ..
    } = err
    else {
        panic!("expected template error");
    };
    assert!(message.contains("absent"), "diagnostic was: {message}");
}

#[test]
fn optional_binding_contributes_zero_entries() {
    let fixture = Fixture::new();
    let binding = Binding::new(fixture.path("missing.yaml.tmpl"))
        .with_values_path(fixture.path("missing-values.yaml"))
        .optional(true);

    let sink = load_template(binding).unwrap();
    assert!(sink.is_empty());
}

#[test]
fn required_binding_names_the_missing_file() {
    let fixture = Fixture::new();
    let template = fixture.write("app.yaml.tmpl", "a: 1");
    let binding =
        Binding::new(&template).with_values_path(fixture.path("missing-values.yaml"));

    let err = load_template(binding).unwrap_err();
    let YamletError::FileNotFound {
        path,
    } = err
    else {
        panic!("expected FileNotFound");
    };
    assert!(path.ends_with("missing-values.yaml"));
}

#[test]
fn rendered_output_is_persisted_as_hidden_file() {
    let fixture = Fixture::new();
    let values = fixture.write("values.yaml", "name: svc");
    let template = fixture.write("app.yaml.tmpl", "name: {{ name }}");

    let binding = Binding::new(&template).with_values_path(&values);
    load_template(binding).unwrap();

    let persisted = fs::read_to_string(fixture.path(".app.yaml")).unwrap();
    assert_eq!(persisted, "name: svc");
}

#[test]
fn null_scalars_deliver_null_entries() {
    let fixture = Fixture::new();
    let values = fixture.write("values.yaml", "unused: 1");
    let template = fixture.write("app.yaml.tmpl", "feature:\n  flag: ~");

    let binding = Binding::new(&template).with_values_path(&values).persist(false);
    let sink = load_template(binding).unwrap();

    assert_eq!(sink.get("feature:flag"), Some(None));
}

#[tokio::test(flavor = "multi_thread")]
async fn reload_reflects_only_new_values() {
    let fixture = Fixture::new();
    let values = fixture.write("values.yaml", "name: before\nold-only: here");
    let template = fixture.write("app.yaml.tmpl", "name: {{ name }}");

    let binding = Binding::new(&template)
        .with_values_path(&values)
        .persist(false)
        .reload_on_change(true);

    let sink = Arc::new(MemorySink::new());
    let handles = ConfigBuilder::new()
        .add_template(binding)
        .load(sink.clone() as Arc<dyn ConfigSink>)
        .unwrap();
    assert_eq!(sink.get("name"), Some(Some("before".to_string())));

    fs::write(&values, "name: after").unwrap();

    let mut reloaded = false;
    for _ in 0..100 {
        if sink.get("name") == Some(Some("after".to_string())) {
            reloaded = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(reloaded, "reload did not pick up the new values content");

    for handle in handles {
        handle.stop();
    }
}
