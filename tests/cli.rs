//! Integration tests for the `moments-gal` binary.

use std::path::PathBuf;
use std::process::{Command, Output};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

/// Run the binary from a scratch directory so no stray `moments.toml` or
/// `.env` is picked up.
fn run(args: &[&str], content_url: Option<&str>) -> Output {
    let cwd = tempfile::TempDir::new().unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_moments-gal"));
    cmd.args(args)
        .current_dir(cwd.path())
        .env_remove("MOMENTS_CONTENT_URL");
    if let Some(url) = content_url {
        cmd.env("MOMENTS_CONTENT_URL", url);
    }
    cmd.output().expect("failed to run moments-gal")
}

#[test]
fn gen_config_prints_stock_config() {
    let output = run(&["gen-config"], None);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("content_url = \"http://127.0.0.1:1337\""));
    assert!(stdout.contains("[images]"));
    let _: toml::Value = toml::from_str(&stdout).expect("stock config must be valid TOML");
}

#[test]
fn help_lists_subcommands() {
    let output = run(&["--help"], None);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for sub in ["serve", "check", "gen-config"] {
        assert!(stdout.contains(sub), "help is missing {sub}");
    }
}

#[test]
fn missing_config_file_fails() {
    let output = run(&["--config", "does-not-exist.toml", "check"], None);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("config file not found"));
}

#[test]
fn invalid_content_url_fails() {
    let output = run(&["check"], Some("not a url"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("content_url"));
}

#[test]
fn check_reports_unreachable_source() {
    let output = run(&["check"], Some("http://127.0.0.1:9"));
    assert!(!output.status.success());
}

#[tokio::test]
async fn check_prints_inventory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/moments"))
        .and(query_param("populate", "image"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("moments.json")))
        .mount(&server)
        .await;

    let output = run(&["check"], Some(&server.uri()));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("001 First snow (2 photos)"));
    assert!(stdout.contains(&format!("{}/uploads/snow_street_3f2a.jpg", server.uri())));
    assert!(stdout.contains("Warning: https://pub-moments.r2.dev is not an allowed image origin"));
    assert!(stdout.contains("002 Draft: spring (0 photos)"));
    assert!(stdout.contains("Listed 2 of 3 moments, 3 images"));
}

#[tokio::test]
async fn check_reports_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = run(&["check"], Some(&server.uri()));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("500"));
}
