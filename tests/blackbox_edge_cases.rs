/// Input errors exit non-zero; data-shape problems finish with a message.
mod helpers;

use helpers::{analyze_json, cli, fixture};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    cli(&tmp)
        .args(["analyze", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn unknown_column_fails() {
    let tmp = TempDir::new().unwrap();
    cli(&tmp)
        .args(["analyze", fixture("scenario1.csv").to_str().unwrap()])
        .args(["--x", "X1,Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nope"));
}

#[test]
fn bins_out_of_range_fail() {
    let tmp = TempDir::new().unwrap();
    for bins in ["1", "7"] {
        cli(&tmp)
            .args(["analyze", fixture("scenario3.csv").to_str().unwrap()])
            .args(["--chi-square", "--bins", bins])
            .assert()
            .failure()
            .stderr(predicate::str::contains("bins must be between 2 and 6"));
    }
}

#[test]
fn invalid_policy_fails() {
    let tmp = TempDir::new().unwrap();
    cli(&tmp)
        .args(["analyze", fixture("scenario1.csv").to_str().unwrap()])
        .args(["--missing", "guess"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid missing policy"));
}

#[test]
fn chi_square_flag_conflicts_with_method() {
    let tmp = TempDir::new().unwrap();
    cli(&tmp)
        .args(["analyze", fixture("scenario1.csv").to_str().unwrap()])
        .args(["--chi-square", "--method", "pearson"])
        .assert()
        .failure();
}

#[test]
fn text_only_dataset_has_no_composites() {
    let tmp = TempDir::new().unwrap();
    let json = analyze_json(&tmp, "text_only.csv", &[]);
    assert_eq!(json["itemSummaries"].as_array().unwrap().len(), 0);
    assert_eq!(json["association"]["kind"], "missing_composites");
    assert!(json["association"]["message"]
        .as_str()
        .unwrap()
        .contains("X_total and Y_total"));
}

#[test]
fn header_only_dataset_is_valid() {
    let tmp = TempDir::new().unwrap();
    let json = analyze_json(&tmp, "header_only.csv", &[]);
    assert_eq!(json["rowCount"], 0);
}

#[test]
fn all_missing_item_leaves_composite_empty() {
    let tmp = TempDir::new().unwrap();
    let json = analyze_json(
        &tmp,
        "all_missing.csv",
        &["--x", "X1,X2", "--y", "Y1,Y2", "--missing", "fill-mean"],
    );
    assert_eq!(json["resolution"]["unfilledColumns"][0], "X2");
    assert_eq!(json["association"]["kind"], "insufficient_data");
    assert_eq!(json["association"]["pairs"], 0);
}

#[test]
fn disabling_composites_skips_association() {
    let tmp = TempDir::new().unwrap();
    let json = analyze_json(
        &tmp,
        "scenario1.csv",
        &["--x", "X1,X2", "--y", "Y1,Y2", "--no-composites"],
    );
    assert_eq!(json["composites"]["x_total"], false);
    assert_eq!(json["association"]["kind"], "missing_composites");
}

#[test]
fn preexisting_total_columns_are_ignored_without_composites() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("totals.csv");
    std::fs::write(&path, "X_total,Y_total,Q1\n1,2,1\n2,1,2\n3,4,2\n4,3,3\n").unwrap();

    let output = cli(&tmp)
        .args(["analyze", path.to_str().unwrap(), "--format", "json"])
        .arg("--no-composites")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["composites"]["x_total"], false);
    assert_eq!(json["composites"]["y_total"], false);
    assert_eq!(json["association"]["kind"], "missing_composites");
}

#[test]
fn tsv_extension_switches_delimiter() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data.tsv");
    std::fs::write(&path, "X1\tY1\n1\t2\n2\t4\n3\t5\n4\t4\n").unwrap();

    let output = cli(&tmp)
        .args(["analyze", path.to_str().unwrap(), "--format", "json"])
        .args(["--x", "X1", "--y", "Y1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["rowCount"], 4);
    assert_eq!(json["association"]["pairs"], 4);
}
