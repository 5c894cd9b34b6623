mod helpers;

use helpers::{cli, fixture};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn report_writes_pdf_to_output_path() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out.pdf");

    cli(&tmp)
        .args(["report", fixture("likert.csv").to_str().unwrap()])
        .args(["--x", "Q1,Q2,Q3,Q4", "--y", "Q5,Q6,Q7,Q8"])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("out.pdf"));

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn default_output_lands_in_working_directory() {
    let tmp = TempDir::new().unwrap();
    cli(&tmp)
        .args(["report", fixture("scenario1.csv").to_str().unwrap()])
        .assert()
        .success();
    assert!(tmp.path().join("survey_report.pdf").exists());
}

#[test]
fn inline_prints_data_uri() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("inline.pdf");
    cli(&tmp)
        .args(["report", fixture("scenario3.csv").to_str().unwrap()])
        .args(["--x", "X", "--y", "Y", "--chi-square"])
        .args(["--output", out.to_str().unwrap(), "--inline"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("data:application/pdf;base64,JVBERi"));
}

#[test]
fn report_without_composites_still_succeeds() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("text.pdf");
    cli(&tmp)
        .args(["report", fixture("text_only.csv").to_str().unwrap()])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn unwritable_output_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("missing-dir").join("r.pdf");
    cli(&tmp)
        .args(["report", fixture("scenario1.csv").to_str().unwrap()])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to write report"));
}
