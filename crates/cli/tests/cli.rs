// Integration tests for the `lokal` binary.
// Run with: cargo test -p lokal-cli --test cli

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use httpmock::prelude::*;
use tempfile::TempDir;

fn lokal(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lokal"));
    cmd.current_dir(dir);
    // Keep real credentials and user config out of the tests
    cmd.env_remove("LOKAL_CSRF");
    cmd.env_remove("LOKAL_SESSION");
    cmd.env_remove("LOKAL_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd.env("HOME", dir);
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("lokal.toml");
    fs::write(&path, body).unwrap();
    path
}

fn run(dir: &Path, config: &Path, args: &[&str]) -> Output {
    lokal(dir)
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run lokal")
}

fn assert_code(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "expected exit {}, got {:?}\nstderr: {}",
        code,
        output.status.code(),
        String::from_utf8_lossy(&output.stderr),
    );
}

fn mock_category(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/localisation")
            .query_param("category", "ludos");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!([
                {"key": "a", "locale": "fi", "value": "Hei"},
                {"key": "a", "locale": "sv", "value": ""},
                {"key": "b", "locale": "fi", "value": "Moi"},
                {"key": "b", "locale": "sv", "value": "Hej"}
            ]));
    });
}

#[test]
fn export_writes_missing_swedish_sheet() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_category(&server);
    let config = write_config(
        dir.path(),
        &format!("service_base_url = \"{}\"\n", server.url("/rest/v1")),
    );

    let output = run(dir.path(), &config, &["export", "--output", "out.csv"]);

    assert_code(&output, 0);
    let written = fs::read_to_string(dir.path().join("out.csv")).unwrap();
    assert_eq!(written.lines().collect::<Vec<_>>(), vec!["key,fi,sv", "a,Hei,"]);
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 written"));
}

#[test]
fn export_all_includes_translated_keys() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_category(&server);
    let config = write_config(
        dir.path(),
        &format!("service_base_url = \"{}\"\n", server.url("/rest/v1")),
    );

    let output = run(dir.path(), &config, &["export", "--all", "--output", "out.xlsx"]);

    assert_code(&output, 0);
    assert!(dir.path().join("out.xlsx").is_file());
}

#[test]
fn import_is_dry_run_by_default() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let update = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/localisation/update");
        then.status(200);
    });
    fs::write(dir.path().join("kaannokset.csv"), "key,fi,sv\nx,Terve,Hej\n").unwrap();
    let config = write_config(
        dir.path(),
        &format!(
            "service_base_url = \"{}\"\ninput_file = \"kaannokset.csv\"\n",
            server.url("/rest/v1")
        ),
    );

    let output = run(dir.path(), &config, &["import"]);

    assert_code(&output, 0);
    update.assert_calls(0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let items: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(
        items,
        serde_json::json!([
            {"category": "ludos", "key": "x", "locale": "fi", "value": "Terve"},
            {"category": "ludos", "key": "x", "locale": "sv", "value": "Hej"}
        ])
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("dry_run = false"));
}

#[test]
fn live_import_without_credentials_exits_11() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("k.csv"), "key,fi,sv\nx,Terve,Hej\n").unwrap();
    let config = write_config(
        dir.path(),
        "service_base_url = \"http://127.0.0.1:9/rest/v1\"\ndry_run = false\n",
    );

    let output = run(dir.path(), &config, &["import", "--input", "k.csv"]);

    assert_code(&output, 11);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing credentials"), "stderr: {}", stderr);
    assert!(stderr.contains("LOKAL_CSRF"), "stderr: {}", stderr);
}

#[test]
fn live_import_sends_with_env_credentials() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let update = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/localisation/update")
            .header("cookie", "JSESSIONID=s3ss10n; CSRF=t0ken");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({"ok": true}));
    });
    fs::write(dir.path().join("k.csv"), "key,fi,sv\nx,Terve,Hej\n").unwrap();
    let config = write_config(
        dir.path(),
        &format!("service_base_url = \"{}\"\ndry_run = false\n", server.url("/rest/v1")),
    );

    let output = lokal(dir.path())
        .env("LOKAL_CSRF", "t0ken")
        .env("LOKAL_SESSION", "s3ss10n")
        .arg("--config")
        .arg(&config)
        .args(["import", "--input", "k.csv"])
        .output()
        .expect("failed to run lokal");

    assert_code(&output, 0);
    update.assert();
}

#[test]
fn unknown_config_key_exits_10() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "dryrun = false\n");

    let output = run(dir.path(), &config, &["doctor"]);

    assert_code(&output, 10);
    assert!(String::from_utf8_lossy(&output.stderr).contains("config parse error"));
}

#[test]
fn unreachable_service_exits_20() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "service_base_url = \"http://127.0.0.1:9/rest/v1\"\ntimeout_secs = 2\n",
    );

    let output = run(dir.path(), &config, &["export", "--output", "out.csv"]);

    assert_code(&output, 20);
}

#[test]
fn unsupported_output_extension_exits_2() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");

    let output = run(dir.path(), &config, &["export", "--output", "out.docx"]);

    assert_code(&output, 2);
}

#[test]
fn doctor_json_never_prints_secrets() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[auth]\ncsrf = \"do-not-print\"\n");

    let output = lokal(dir.path())
        .env("LOKAL_SESSION", "also-secret")
        .arg("--config")
        .arg(&config)
        .args(["doctor", "--json"])
        .output()
        .expect("failed to run lokal");

    assert_code(&output, 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("do-not-print"));
    assert!(!stdout.contains("also-secret"));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["secrets"]["csrf"]["source"], "config");
    assert_eq!(value["secrets"]["session"]["source"], "environment");
}

#[test]
fn list_spreadsheet_prints_stats() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("k.csv"), "key,fi,sv\nb,Moi,\na,Hei,Hej\n").unwrap();
    let config = write_config(dir.path(), "");

    let output = run(dir.path(), &config, &["list", "--input", "k.csv"]);

    assert_code(&output, 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("a:\n"), "stdout: {}", stdout);
    assert!(stdout.contains("2 keys, 2 fi, 1 sv, 1 missing sv"));
}

#[test]
fn category_override_is_sent() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/localisation")
            .query_param("category", "koodisto");
        then.status(200)
            .header("content-type", "application/json")
            .body("[]");
    });
    let config = write_config(
        dir.path(),
        &format!("service_base_url = \"{}\"\n", server.url("/rest/v1")),
    );

    let output = run(dir.path(), &config, &["--category", "koodisto", "export", "-o", "out.csv"]);

    assert_code(&output, 0);
    mock.assert();
    let written = fs::read_to_string(dir.path().join("out.csv")).unwrap();
    assert_eq!(written.trim(), "key,fi,sv");
}

#[test]
fn diff_exits_1_when_sheet_differs() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_category(&server);
    fs::write(dir.path().join("k.csv"), "key,fi,sv\na,Hei,Hej\nb,Moi,Hej\n").unwrap();
    let config = write_config(
        dir.path(),
        &format!("service_base_url = \"{}\"\n", server.url("/rest/v1")),
    );

    let output = run(dir.path(), &config, &["diff", "--input", "k.csv"]);

    assert_code(&output, 1);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("a:\n  sv: \"Hej\" => \"\"\n"), "stdout: {}", stdout);
    assert!(stdout.contains("2 keys: 1 changed, 0 only in from, 0 only in to, 3 unchanged"));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn diff_exits_0_when_sheet_matches() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_category(&server);
    fs::write(dir.path().join("k.csv"), "key,fi,sv\na,Hei,\nb,Moi,Hej\n").unwrap();
    let config = write_config(
        dir.path(),
        &format!("service_base_url = \"{}\"\n", server.url("/rest/v1")),
    );

    let output = run(dir.path(), &config, &["diff", "--input", "k.csv", "--json"]);

    assert_code(&output, 0);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["stats"]["unchanged"], 4);
}

#[test]
fn live_import_with_expired_session_exits_21() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/v1/localisation/update");
        then.status(302).header("location", "/cas/login");
    });
    let login = server.mock(|when, then| {
        when.method(GET).path("/cas/login");
        then.status(200).body("<html>CAS login</html>");
    });
    fs::write(dir.path().join("k.csv"), "key,fi,sv\nx,Terve,Hej\n").unwrap();
    let config = write_config(
        dir.path(),
        &format!("service_base_url = \"{}\"\ndry_run = false\n", server.url("/rest/v1")),
    );

    let output = lokal(dir.path())
        .env("LOKAL_CSRF", "t0ken")
        .env("LOKAL_SESSION", "s3ss10n")
        .arg("--config")
        .arg(&config)
        .args(["import", "--input", "k.csv"])
        .output()
        .expect("failed to run lokal");

    assert_code(&output, 21);
    login.assert_calls(0);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("HTTP 302: /cas/login"), "stderr: {}", stderr);
    assert!(stderr.contains("expired"), "stderr: {}", stderr);
}
