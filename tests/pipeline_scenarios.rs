/// Library-level end-to-end scenarios through `run_pipeline`.
mod helpers;

use helpers::fixture;

use survey_analyzer::analyzers::association::ChiSquareResult;
use survey_analyzer::analyzers::AssociationOutcome;
use survey_analyzer::config::{AnalysisConfig, MethodOverride, MissingPolicy};
use survey_analyzer::parsers::load_dataset;
use survey_analyzer::report::summary::fmt_decimal;
use survey_analyzer::report::{build_report, parse_summary_line};
use survey_analyzer::run_pipeline;
use survey_analyzer::types::{Cell, Column, Dataset};

fn items(x: &[&str], y: &[&str]) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.columns.x_items = Some(x.iter().map(|s| s.to_string()).collect());
    config.columns.y_items = Some(y.iter().map(|s| s.to_string()).collect());
    config
}

#[test]
fn scenario_one_drop_rows_excludes_incomplete_row() {
    let dataset = load_dataset(&fixture("scenario1.csv")).unwrap();
    let outcome = run_pipeline(&dataset, &items(&["X1", "X2"], &["Y1", "Y2"])).unwrap();

    let x_total = outcome
        .composite_summaries
        .iter()
        .find(|s| s.column == "X_total")
        .unwrap();
    assert_eq!(x_total.count, 4);
    assert_eq!(x_total.total_rows, 5);

    let AssociationOutcome::Correlation(report) = &outcome.association else {
        panic!("expected correlation");
    };
    assert_eq!(report.pairs, 4);
    assert!(!report.points.iter().any(|(x, _)| x.is_nan()));
}

#[test]
fn input_dataset_is_left_untouched() {
    let dataset = load_dataset(&fixture("scenario1.csv")).unwrap();
    let before = dataset.clone();
    let mut config = items(&["X1", "X2"], &["Y1", "Y2"]);
    config.missing_policy = MissingPolicy::FillZero;

    run_pipeline(&dataset, &config).unwrap();
    assert_eq!(dataset, before);
    assert!(dataset.column("X_total").is_none());
    assert_eq!(dataset.column("X1").unwrap().cells[2], Cell::Missing);
}

#[test]
fn scenario_two_constant_total_is_undefined_not_an_error() {
    let dataset = load_dataset(&fixture("constant_y.csv")).unwrap();
    for method in [MethodOverride::Auto, MethodOverride::Pearson, MethodOverride::Spearman] {
        let mut config = items(&["X1", "X2"], &["Y1", "Y2"]);
        config.association.method = method;
        let outcome = run_pipeline(&dataset, &config).unwrap();

        let AssociationOutcome::Correlation(report) = outcome.association else {
            panic!("expected correlation");
        };
        assert!(report.coefficient.is_none(), "{method:?}");
        assert!(report.strength.is_none());
    }
}

#[test]
fn scenario_three_chi_square_table_matches_bin_counts() {
    let dataset = load_dataset(&fixture("scenario3.csv")).unwrap();
    let mut config = items(&["X"], &["Y"]);
    config.association.method = MethodOverride::ChiSquare;
    let outcome = run_pipeline(&dataset, &config).unwrap();

    let AssociationOutcome::ChiSquare(report) = outcome.association else {
        panic!("expected chi-square");
    };
    assert_eq!(report.table.row_totals(), vec![4, 3, 3]);
    assert_eq!(report.table.column_totals(), vec![4, 3, 3]);
    assert_eq!(report.table.total(), 10);

    let ChiSquareResult::Tested(stat) = report.result else {
        panic!("expected a tested table");
    };
    // [[2,1,1],[1,1,1],[1,1,1]]: chi2 = 0.2778 on 4 dof
    assert!((stat.statistic - 0.277_777_777_8).abs() < 1e-6);
    assert!((stat.p_value - 0.9912).abs() < 1e-3);
}

#[test]
fn report_summary_lines_reparse_to_computed_values() {
    let dataset = load_dataset(&fixture("likert.csv")).unwrap();
    let config = items(&["Q1", "Q2", "Q3", "Q4"], &["Q5", "Q6", "Q7", "Q8"]);
    let outcome = run_pipeline(&dataset, &config).unwrap();
    let doc = build_report(&outcome, &config.report, "2026-10-15 09:00");

    let mut checked = 0;
    for summary in outcome.all_summaries() {
        let prefix = format!("{} - ", summary.column);
        let line = doc.text_lines().find(|l| l.starts_with(&prefix)).unwrap();
        let parsed = parse_summary_line(line).unwrap();

        assert_eq!(parsed.count, summary.count);
        assert_eq!(fmt_decimal(parsed.mean, 3), fmt_decimal(summary.mean(), 3));
        assert_eq!(fmt_decimal(parsed.median, 3), fmt_decimal(summary.median(), 3));
        assert_eq!(fmt_decimal(parsed.std_dev, 3), fmt_decimal(summary.std_dev(), 3));
        checked += 1;
    }
    assert_eq!(checked, 10);
}

fn numbers(values: &[Option<f64>]) -> Vec<Cell> {
    values
        .iter()
        .map(|v| v.map_or(Cell::Missing, Cell::Numeric))
        .collect()
}

#[test]
fn input_columns_named_like_composites_are_not_used_when_disabled() {
    let dataset = Dataset::new(vec![
        Column::new("X_total", numbers(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)])),
        Column::new("Y_total", numbers(&[Some(2.0), Some(1.0), Some(4.0), Some(3.0)])),
        Column::new("Q1", numbers(&[Some(1.0), Some(2.0), Some(2.0), Some(3.0)])),
    ]);
    let mut config = items(&[], &[]);
    config.composites = Some(false);

    let outcome = run_pipeline(&dataset, &config).unwrap();
    assert!(!outcome.composites.x_total && !outcome.composites.y_total);
    assert!(outcome.composite_summaries.is_empty());
    assert!(matches!(
        outcome.association,
        AssociationOutcome::MissingComposites { .. }
    ));
}

#[test]
fn fill_policy_leaves_demographic_columns_as_loaded() {
    let dataset = Dataset::new(vec![
        Column::new("Age", numbers(&[Some(20.0), None, Some(30.0)])),
        Column::new("X1", numbers(&[Some(1.0), None, Some(3.0)])),
        Column::new("Y1", numbers(&[Some(2.0), Some(4.0), Some(5.0)])),
    ]);
    let mut config = items(&["X1"], &["Y1"]);
    config.columns.demographics = Some(vec!["Age".to_string()]);
    config.missing_policy = MissingPolicy::FillMean;

    let outcome = run_pipeline(&dataset, &config).unwrap();
    assert_eq!(outcome.resolution.filled_cells, 1);

    let age = &outcome.demographics[0];
    assert_eq!(age.column, "Age");
    assert!(!age.frequencies.iter().any(|f| f.value == Cell::Numeric(25.0)));
    assert!(age.frequencies.iter().any(|f| f.value == Cell::Missing));
}
