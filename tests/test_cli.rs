//! Command line tests for the edgeward binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn api_def(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn edgeward() -> Command {
    Command::cargo_bin("edgeward").unwrap()
}

const ENABLED: &str = "apiId: petstore
name: Pet Store
upstreamAuth:
  enabled: true
  basicAuth:
    enabled: true
    username: alice
    password: wonderland
";

#[test]
fn test_inspect_enabled_api() {
    let dir = TempDir::new().unwrap();
    let path = api_def(&dir, "api.yaml", ENABLED);

    edgeward()
        .arg("inspect")
        .arg(&path)
        .args(["--path", "/pets", "-H", "X-Trace: 42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API: Pet Store (petstore)"))
        .stdout(predicate::str::contains("Middleware: UpstreamBasicAuth"))
        .stdout(predicate::str::contains("GET /pets"))
        .stdout(predicate::str::contains("x-trace: 42"))
        .stdout(predicate::str::contains("authorization: <redacted>"))
        .stdout(predicate::str::contains("wonderland").not())
        .stdout(predicate::str::contains("YWxpY2U6d29uZGVybGFuZA==").not());
}

#[test]
fn test_inspect_disabled_api() {
    let dir = TempDir::new().unwrap();
    let path = api_def(&dir, "api.json", r#"{"apiId": "petstore", "upstreamAuth": {"enabled": false}}"#);

    edgeward()
        .arg("inspect")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Middleware: (none)"))
        .stdout(predicate::str::contains("authorization").not());
}

#[test]
fn test_inspect_missing_definition() {
    edgeward()
        .args(["inspect", "/nonexistent/api.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("edgeward: error:"));
}

#[test]
fn test_analytics_plugin_load_failure() {
    let dir = TempDir::new().unwrap();
    let path = api_def(
        &dir,
        "api.yaml",
        "apiId: petstore\nanalyticsPlugin:\n  enabled: true\n  pluginPath: /nonexistent/libmask.so\n  funcName: MaskAnalyticsData\n",
    );

    edgeward()
        .arg("analytics")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to open plugin /nonexistent/libmask.so"));
}

#[test]
fn test_analytics_without_plugin() {
    let dir = TempDir::new().unwrap();
    let path = api_def(&dir, "api.yaml", "apiId: petstore\nname: Pet Store\n");

    edgeward()
        .arg("analytics")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"api_id\": \"petstore\""))
        .stdout(predicate::str::contains("\"method\": \"GET\""));
}

#[test]
fn test_usage_error() {
    edgeward().arg("frobnicate").assert().code(2);
}
