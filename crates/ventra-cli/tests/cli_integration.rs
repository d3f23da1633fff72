//! CLI integration tests — run the actual ventra binary.
//! Marked `#[ignore]` to skip in normal `cargo test`; they need a
//! reachable Supabase project and processing API.

use std::process::Command;

fn ventra() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ventra"))
}

#[test]
#[ignore]
fn test_cli_whoami_signed_out() {
    let output = ventra().arg("whoami").output().expect("failed to execute");
    // Without a saved session this must fail with a sign-in hint
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ventra login"), "unexpected stderr: {stderr}");
}

#[test]
#[ignore]
fn test_cli_startups_list_json() {
    let output = ventra()
        .args(["startups", "list", "--json"])
        .output()
        .expect("failed to execute");
    assert!(
        output.status.success(),
        "startups list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Should be a valid JSON array
    let _: Vec<serde_json::Value> =
        serde_json::from_str(stdout.trim()).expect("invalid JSON output");
}

#[test]
#[ignore]
fn test_cli_emails_json() {
    let output = ventra()
        .args(["emails", "--limit", "5", "--json"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let _: Vec<serde_json::Value> =
        serde_json::from_str(stdout.trim()).expect("invalid JSON output");
}

#[test]
#[ignore]
fn test_cli_send_requires_selection() {
    let output = ventra().arg("send").output().expect("failed to execute");
    assert!(!output.status.success(), "send without --all or --id should fail");
}

#[test]
#[ignore]
fn test_cli_send_rejects_unknown_kind() {
    let output = ventra()
        .args(["send", "--kind", "newsletter", "--all"])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown email kind"), "unexpected stderr: {stderr}");
}

#[test]
#[ignore]
fn test_cli_upload_rejects_non_csv() {
    let tmp = std::env::temp_dir().join(format!("ventra-upload-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("leads.xlsx");
    std::fs::write(&path, b"not a csv").unwrap();

    let output = ventra()
        .args(["upload", path.to_str().unwrap()])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Please select a valid CSV file."),
        "unexpected stderr: {stderr}"
    );

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
#[ignore]
fn test_cli_authorize_prints_url() {
    let output = ventra()
        .args(["authorize", "google"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("/auth/v1/authorize"), "unexpected stdout: {stdout}");
}
