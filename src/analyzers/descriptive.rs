use serde::Serialize;

use super::{mean, median};
use crate::types::{Cell, Column};

/// Per-column summary. `stats` is `None` when the column has no numeric data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveSummary {
    pub column: String,
    pub count: usize,
    pub total_rows: usize,
    pub stats: Option<SummaryStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    /// Every value tied for the highest frequency, ascending
    pub modes: Vec<f64>,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (n-1); undefined below two observations
    pub std_dev: Option<f64>,
    pub frequencies: Vec<FrequencyRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub value: Cell,
    pub count: usize,
    pub percent: f64,
}

impl DescriptiveSummary {
    pub fn has_data(&self) -> bool {
        self.stats.is_some()
    }

    pub fn mean(&self) -> Option<f64> {
        self.stats.as_ref().map(|s| s.mean)
    }

    pub fn median(&self) -> Option<f64> {
        self.stats.as_ref().map(|s| s.median)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.stats.as_ref().and_then(|s| s.std_dev)
    }
}

/// Summarize one column. Non-numeric cells are ignored for the numeric
/// statistics but still appear in the frequency table.
pub fn describe_column(column: &Column) -> DescriptiveSummary {
    let values = column.numeric_values();
    let count = values.len();
    let total_rows = column.len();

    let stats = (count > 0).then(|| {
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let mean = mean(&values).unwrap_or(f64::NAN);
        SummaryStats {
            mean,
            median: median(&values).unwrap_or(f64::NAN),
            modes: modes(&values),
            min,
            max,
            std_dev: sample_std_dev(&values, mean),
            frequencies: frequency_table(&column.cells),
        }
    });

    DescriptiveSummary {
        column: column.name.clone(),
        count,
        total_rows,
        stats,
    }
}

pub fn sample_std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

fn modes(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut best = 0usize;
    let mut out: Vec<f64> = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let run = sorted[i..].iter().take_while(|v| **v == sorted[i]).count();
        if run > best {
            best = run;
            out.clear();
        }
        if run == best {
            out.push(sorted[i]);
        }
        i += run;
    }
    out
}

/// Count each distinct cell value, missing included. Percent is relative to
/// all rows of the column.
pub fn frequency_table(cells: &[Cell]) -> Vec<FrequencyRow> {
    let total = cells.len();
    let mut sorted: Vec<&Cell> = cells.iter().collect();
    sorted.sort_by(|a, b| a.sort_cmp(b));

    let mut rows: Vec<FrequencyRow> = Vec::new();
    for cell in sorted {
        match rows.last_mut() {
            Some(last) if last.value.sort_cmp(cell).is_eq() => last.count += 1,
            _ => rows.push(FrequencyRow {
                value: cell.clone(),
                count: 1,
                percent: 0.0,
            }),
        }
    }
    for row in &mut rows {
        row.percent = 100.0 * row.count as f64 / total as f64;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(cells: Vec<Cell>) -> Column {
        Column::new("Q", cells)
    }

    #[test]
    fn summary_of_simple_column() {
        let col = column(vec![
            Cell::Numeric(1.0),
            Cell::Numeric(2.0),
            Cell::Numeric(2.0),
            Cell::Numeric(3.0),
            Cell::Numeric(7.0),
        ]);
        let s = describe_column(&col);
        let stats = s.stats.unwrap();
        assert_eq!(s.count, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.modes, vec![2.0]);
        assert_eq!((stats.min, stats.max), (1.0, 7.0));
        // ss = 4 + 1 + 1 + 0 + 16 = 22; 22 / 4 = 5.5
        assert!((stats.std_dev.unwrap() - 5.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn all_tied_values_are_modes() {
        let col = column(vec![
            Cell::Numeric(4.0),
            Cell::Numeric(1.0),
            Cell::Numeric(4.0),
            Cell::Numeric(1.0),
            Cell::Numeric(2.0),
        ]);
        assert_eq!(describe_column(&col).stats.unwrap().modes, vec![1.0, 4.0]);
    }

    #[test]
    fn no_numeric_values_is_degenerate() {
        let col = column(vec![Cell::Raw("yes".into()), Cell::Missing]);
        let s = describe_column(&col);
        assert_eq!(s.count, 0);
        assert!(!s.has_data());
        assert_eq!(s.mean(), None);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let s = describe_column(&column(vec![Cell::Numeric(5.0), Cell::Missing]));
        assert_eq!(s.count, 1);
        assert_eq!(s.std_dev(), None);
    }

    #[test]
    fn count_matches_coercible_values() {
        let col = column(vec![
            Cell::Numeric(1.0),
            Cell::Raw("2".into()),
            Cell::Raw("two".into()),
            Cell::Missing,
        ]);
        let s = describe_column(&col);
        assert_eq!(s.count, 2);
        assert!(s.count <= s.total_rows);
    }

    #[test]
    fn frequency_table_counts_missing_and_sums_to_100() {
        let cells = vec![
            Cell::Numeric(2.0),
            Cell::Missing,
            Cell::Numeric(1.0),
            Cell::Numeric(2.0),
            Cell::Raw("n/a-ish".into()),
            Cell::Missing,
        ];
        let table = frequency_table(&cells);
        let values: Vec<Cell> = table.iter().map(|r| r.value.clone()).collect();
        assert_eq!(
            values,
            vec![
                Cell::Numeric(1.0),
                Cell::Numeric(2.0),
                Cell::Raw("n/a-ish".into()),
                Cell::Missing,
            ]
        );
        assert_eq!(table[1].count, 2);
        assert_eq!(table[3].count, 2);
        let total: f64 = table.iter().map(|r| r.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }
}
