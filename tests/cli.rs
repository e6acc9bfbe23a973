mod support;

use serde_json::Value;
use std::path::Path;
use std::process::Output;
use support::spawn_mock;
use tokio::process::Command;

async fn run(api_url: &str, session_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shortlink"))
        .args(args)
        .env("SHORTLINK_API_URL", api_url)
        .env("SHORTLINK_SESSION_PATH", session_path)
        .env("SHORTLINK_DOMAIN", "https://s.example")
        .env("RUST_LOG", "info")
        .output()
        .await
        .expect("failed to run shortlink")
}

#[tokio::test(flavor = "multi_thread")]
async fn stats_json_reports_window_summary() {
    let server = spawn_mock().await;
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");

    let output = run(
        &server.base_url,
        &session,
        &["stats", "abc", "--range", "all", "--json"],
    )
    .await;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["window"], "all");
    assert_eq!(summary["range_total"], 15);
    assert_eq!(summary["average_per_day"], 5);
    assert_eq!(summary["filtered"].as_array().unwrap().len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn stats_for_unknown_url_fails() {
    let server = spawn_mock().await;
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");

    let output = run(&server.base_url, &session, &["stats", "nope"]).await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("URL 'nope' tidak ditemukan"));
}

#[tokio::test(flavor = "multi_thread")]
async fn login_session_survives_between_runs() {
    let server = spawn_mock().await;
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");

    let login = run(
        &server.base_url,
        &session,
        &["login", "alice", "--password", "secret"],
    )
    .await;
    assert!(login.status.success(), "stderr: {}", String::from_utf8_lossy(&login.stderr));
    assert!(session.exists());

    let whoami = run(&server.base_url, &session, &["whoami"]).await;
    assert!(whoami.status.success());
    assert_eq!(String::from_utf8_lossy(&whoami.stdout).trim(), "alice (id 1)");

    let shorten = run(
        &server.base_url,
        &session,
        &["shorten", "https://rust-lang.org", "--code", "rust"],
    )
    .await;
    assert!(shorten.status.success());
    assert_eq!(
        String::from_utf8_lossy(&shorten.stdout).trim(),
        "https://s.example/rust"
    );

    let logout = run(&server.base_url, &session, &["logout"]).await;
    assert!(logout.status.success());

    let whoami = run(&server.base_url, &session, &["whoami"]).await;
    assert!(!whoami.status.success());
}
