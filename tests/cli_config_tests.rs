//! End-to-end tests for `interiorrec config` commands.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Path to the interiorrec binary
fn interiorrec_bin() -> String {
    std::env::var("CARGO_BIN_EXE_interiorrec")
        .unwrap_or_else(|_| "target/release/interiorrec".to_string())
}

/// Creates a Command with an isolated config directory.
fn isolated_config_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(interiorrec_bin());
    cmd.env("INTERIORREC_CONFIG_DIR", config_dir);
    cmd.args(args);
    cmd
}

// ============================================================================
// Show Command Tests
// ============================================================================

#[test]
fn test_config_show_defaults_without_file() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_config_command(&["config", "show"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Show config should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("http://127.0.0.1:5000"));
    assert!(stdout.contains("minimal, mid-century, modern"));
}

#[test]
fn test_config_show_json_format() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_config_command(&["config", "show", "--json"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");

    assert!(result["backend"].is_object(), "Should have backend object");
    assert_eq!(result["backend"]["search_k"], 10);
    assert_eq!(result["server"]["port"], 3001);
    assert_eq!(result["design"]["room_type"], "living room");
}

#[test]
fn test_config_show_rejects_invalid_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("config.toml"),
        "[backend]\nbase_url = \"ftp://nowhere\"\n",
    )
    .unwrap();

    let output = isolated_config_command(&["config", "show"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("base_url"));
}

// ============================================================================
// Init and Path Command Tests
// ============================================================================

#[test]
fn test_config_init_writes_file_once() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_config_command(&["config", "init"], temp_dir.path())
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));
    assert!(temp_dir.path().join("config.toml").exists());

    // A second init refuses to overwrite
    let output = isolated_config_command(&["config", "init"], temp_dir.path())
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(1));

    let output = isolated_config_command(&["config", "init", "--force"], temp_dir.path())
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_config_path_respects_override() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_config_command(&["config", "path"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        temp_dir.path().join("config.toml").display().to_string()
    );
}
