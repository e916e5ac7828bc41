#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Command-line renderer tests.

use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn trovato_nav() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_trovato-nav"));
    command.env("RUST_LOG", "off");
    command
}

#[test]
fn test_renders_document_to_stdout() {
    let output = trovato_nav()
        .arg(fixture("site.json"))
        .args(["--current-path", "/pages/add?step=2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("<a href=\"/pages/add\">Add Page</a>"));
}

#[test]
fn test_role_flags_extend_document_roles() {
    let output = trovato_nav()
        .arg(fixture("site.toml"))
        .args(["--role", "editor"])
        .output()
        .unwrap();

    // Strict mode still applies: the reader role cannot add pages.
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("/home/pages"));
    assert!(!stdout.contains("/home/pages/add"));
}

#[test]
fn test_missing_document_fails() {
    let output = trovato_nav().arg(fixture("missing.json")).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to load"));
}
