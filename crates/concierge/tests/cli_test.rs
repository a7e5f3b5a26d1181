//! Integration tests for the `concierge` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without a server. Guest flows run against a wiremock concierge.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `concierge` binary with env isolation.
///
/// Clears all `CONCIERGE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn concierge_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("concierge");
    cmd.env("HOME", "/tmp/concierge-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/concierge-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/concierge-cli-test-nonexistent")
        .env_remove("CONCIERGE_PROFILE")
        .env_remove("CONCIERGE_SERVER")
        .env_remove("CONCIERGE_PROPERTY")
        .env_remove("CONCIERGE_LOCALE")
        .env_remove("CONCIERGE_IDENTITY")
        .env_remove("CONCIERGE_COOKIE_FILE")
        .env_remove("CONCIERGE_OUTPUT")
        .env_remove("CONCIERGE_INSECURE")
        .env_remove("CONCIERGE_TIMEOUT");
    cmd
}

/// A command pointed at `server` with its own cookie jar.
fn guest_cmd(server: &MockServer, jar: &Path) -> assert_cmd::Command {
    let mut cmd = concierge_cmd();
    cmd.arg("--server")
        .arg(server.uri())
        .arg("--cookie-file")
        .arg(jar);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_match_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/match-guest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "row_index": 4,
            "data": {
                "guest_first_name": "Giulia",
                "guest_last_name": "Rossi",
                "checkin_date": "2025-12-10",
                "checkout_date": "2025-12-13"
            }
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = concierge_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    concierge_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("concierge")
            .and(predicate::str::contains("chat"))
            .and(predicate::str::contains("login"))
            .and(predicate::str::contains("ask")),
    );
}

#[test]
fn test_version_flag() {
    concierge_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("concierge"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    concierge_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    concierge_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_output_format() {
    let output = concierge_cmd()
        .args(["--output", "xml", "config", "show"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("xml"), "Expected the bad value in:\n{text}");
}

#[test]
fn test_ask_without_server() {
    let output = concierge_cmd().args(["ask", "wifi?"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No concierge server configured"),
        "Expected no-config error:\n{text}"
    );
}

#[test]
fn test_unknown_profile() {
    let output = concierge_cmd()
        .args(["--profile", "staging", "health"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("staging"), "Expected profile name in:\n{text}");
}

#[test]
fn test_ask_requires_a_message() {
    let output = concierge_cmd().arg("ask").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    concierge_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults() {
    concierge_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]").and(predicate::str::contains("timeout = 30")));
}

// ── Server commands ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_health_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "area": "booking"})),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    guest_cmd(&server, &dir.path().join("jar"))
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok (booking)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_before_login_is_not_identified() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let output = guest_cmd(&server, &dir.path().join("jar"))
        .args(["ask", "wifi?"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("concierge login"), "Expected login hint:\n{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_ask() {
    let server = MockServer::start().await;
    mock_match_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"text": "La password è ospite123", "used_ai": false})),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("jar");

    let output = guest_cmd(&server, &jar)
        .args(["-o", "json", "login", "--arrival", "2025-12-10", "--departure", "2025-12-13"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let guest: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(guest["propertyId"], "CT-01");
    assert_eq!(guest["first_name"], "Giulia");
    assert_eq!(guest["departure_date"], "2025-12-13");

    let stored = std::fs::read_to_string(&jar).unwrap();
    assert!(stored.contains("concierge_guest"), "cookie jar:\n{stored}");

    guest_cmd(&server, &jar)
        .args(["ask", "qual", "è", "la", "password", "del", "wifi?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ospite123"));

    let chat = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url.path() == "/api/chat")
        .unwrap();
    let body: Value = serde_json::from_slice(&chat.body).unwrap();
    assert_eq!(body["message"], "qual è la password del wifi?");
    assert_eq!(body["arrival_date"], "2025-12-10");
    assert_eq!(body["last_name"], "Rossi");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/match-guest"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "not_found",
            "message": "Nessuna prenotazione per queste date."
        })))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let output = guest_cmd(&server, &dir.path().join("jar"))
        .args(["login", "--arrival", "2025-12-10", "--departure", "2025-12-13"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(
        text.contains("Nessuna prenotazione per queste date."),
        "Expected server message:\n{text}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_missing_field_is_usage_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let output = guest_cmd(&server, &dir.path().join("jar"))
        .args(["login", "--arrival", "2025-12-10"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("departure-date"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_session_show_and_forget() {
    let server = MockServer::start().await;
    mock_match_ok(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("jar");

    let output = guest_cmd(&server, &jar)
        .args(["-o", "json", "session", "show"])
        .output()
        .unwrap();
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["mode"], "login");

    guest_cmd(&server, &jar)
        .args(["-q", "login", "--arrival", "2025-12-10", "--departure", "2025-12-13"])
        .assert()
        .success();

    let output = guest_cmd(&server, &jar)
        .args(["--property", "LAGO-02", "-o", "json", "session", "show"])
        .output()
        .unwrap();
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["mode"], "chat");
    assert_eq!(summary["guest"]["propertyId"], "LAGO-02");

    guest_cmd(&server, &jar)
        .args(["session", "forget"])
        .assert()
        .success();

    guest_cmd(&server, &jar)
        .args(["-o", "plain", "session", "show"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_sends_property_and_locale() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/guest/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "action": "created",
            "data": {}
        })))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    guest_cmd(&server, &dir.path().join("jar"))
        .args([
            "--locale", "en", "-o", "plain", "register", "--arrival", "2025-12-10",
            "--last-name", "Rossi", "--first-name", "Giulia",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["property_id"], "CT-01");
    assert_eq!(body["locale"], "en");
    assert_eq!(body["last_name"], "Rossi");
    assert!(body.get("guest_email").is_none());
}
