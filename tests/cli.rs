//! Smoke tests for the `yamlet` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn yamlet() -> Command {
    Command::cargo_bin("yamlet").unwrap()
}

#[test]
fn render_prints_flat_entries() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("app.yaml.tmpl");
    let values = temp.path().join("values.yaml");
    fs::write(&template, "name: {{ name }}\nport: 8080").unwrap();
    fs::write(&values, "name: svc").unwrap();

    yamlet()
        .arg("render")
        .arg(&template)
        .arg("--values")
        .arg(&values)
        .arg("--no-persist")
        .assert()
        .success()
        .stdout(predicate::str::contains("name=svc"))
        .stdout(predicate::str::contains("port=8080"));
}

#[test]
fn render_fails_on_missing_required_values() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("app.yaml.tmpl");
    fs::write(&template, "a: 1").unwrap();

    yamlet()
        .arg("render")
        .arg(&template)
        .arg("--values")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.yaml"));
}

#[test]
fn render_optional_missing_is_silent_success() {
    let temp = TempDir::new().unwrap();

    yamlet()
        .arg("render")
        .arg(temp.path().join("absent.yaml.tmpl"))
        .arg("--values")
        .arg(temp.path().join("absent-values.yaml"))
        .arg("--optional")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn flatten_handles_plain_files() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("settings.yaml");
    fs::write(&file, "log:\n  level: info\nnil: ~").unwrap();

    yamlet()
        .arg("flatten")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("log:level=info"))
        .stdout(predicate::str::contains("nil="));
}

#[test]
fn flatten_handles_directories() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.yaml"), "first: 1").unwrap();
    fs::write(temp.path().join("b.yml"), "second: 2").unwrap();

    yamlet()
        .arg("flatten")
        .arg(temp.path())
        .arg("--dir")
        .assert()
        .success()
        .stdout(predicate::str::contains("first=1"))
        .stdout(predicate::str::contains("second=2"));
}
