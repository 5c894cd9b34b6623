#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Path of a CSV fixture under tests/fixtures.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// CLI command isolated from the developer's own config files: HOME and the
/// working directory both point at `tmp`.
#[allow(deprecated)]
pub fn cli(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("survey-analyzer").unwrap();
    cmd.env("HOME", tmp.path());
    cmd.current_dir(tmp.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run `analyze --format json` and parse stdout.
pub fn analyze_json(tmp: &TempDir, file: &str, extra: &[&str]) -> serde_json::Value {
    let path = fixture(file);
    let mut args = vec!["analyze", path.to_str().unwrap(), "--format", "json"];
    args.extend_from_slice(extra);

    let output = cli(tmp)
        .args(&args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).unwrap()
}

/// Find a descriptive summary by column name in analyze JSON.
pub fn summary<'a>(json: &'a serde_json::Value, column: &str) -> &'a serde_json::Value {
    json["itemSummaries"]
        .as_array()
        .unwrap()
        .iter()
        .chain(json["compositeSummaries"].as_array().unwrap())
        .find(|s| s["column"] == column)
        .unwrap_or_else(|| panic!("no summary for {column}"))
}
