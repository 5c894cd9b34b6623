use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::binning::Binned;
use super::{StatError, StatResult};

/// Significance level separating "dependent" from "independent".
pub const ALPHA: f64 = 0.05;

/// Cross-tabulation of two categorical variables over observed categories only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContingencyTable {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl ContingencyTable {
    pub fn from_binned(rows: &Binned, cols: &Binned) -> Self {
        let row_index = observed_index(rows);
        let col_index = observed_index(cols);

        let row_labels = labels_for(rows, &row_index);
        let column_labels = labels_for(cols, &col_index);
        let mut counts = vec![vec![0u64; column_labels.len()]; row_labels.len()];
        for (&r, &c) in rows.assignments.iter().zip(&cols.assignments) {
            if let (Some(ri), Some(ci)) = (row_index[r], col_index[c]) {
                counts[ri][ci] += 1;
            }
        }

        Self {
            row_labels,
            column_labels,
            counts,
        }
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.column_labels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.row_totals().iter().sum()
    }

    pub fn is_degenerate(&self) -> bool {
        self.row_labels.len() < 2 || self.column_labels.len() < 2
    }
}

/// Map category index → compacted index, skipping empty categories.
fn observed_index(binned: &Binned) -> Vec<Option<usize>> {
    let mut next = 0;
    binned
        .observed()
        .into_iter()
        .map(|s| {
            s.then(|| {
                next += 1;
                next - 1
            })
        })
        .collect()
}

fn labels_for(binned: &Binned, index: &[Option<usize>]) -> Vec<String> {
    binned
        .labels
        .iter()
        .zip(index)
        .filter(|(_, i)| i.is_some())
        .map(|(l, _)| l.clone())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Independence {
    /// p < 0.05: reject independence
    Dependent,
    /// p >= 0.05: fail to reject
    Independent,
}

impl Independence {
    pub fn from_p_value(p: f64) -> Self {
        if p < ALPHA {
            Independence::Dependent
        } else {
            Independence::Independent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Independence::Dependent => "Dependent (reject H0)",
            Independence::Independent => "Independent (fail to reject H0)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChiSquareStat {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
    pub interpretation: Independence,
}

/// Pearson chi-square test of independence. Applies Yates' continuity
/// correction when there is exactly one degree of freedom.
pub fn chi_square_test(table: &ContingencyTable) -> StatResult<ChiSquareStat> {
    if table.is_degenerate() {
        return Err(StatError::TooFewObservations {
            needed: 2,
            got: table.row_labels.len().min(table.column_labels.len()),
        });
    }
    let rows = table.row_totals();
    let cols = table.column_totals();
    let n = table.total() as f64;
    let dof = (rows.len() - 1) * (cols.len() - 1);

    let mut statistic = 0.0;
    for (i, row) in table.counts.iter().enumerate() {
        for (j, &observed) in row.iter().enumerate() {
            let expected = rows[i] as f64 * cols[j] as f64 / n;
            if expected <= 0.0 {
                return Err(StatError::NonFinite("zero expected frequency"));
            }
            let mut diff = observed as f64 - expected;
            if dof == 1 {
                diff = diff.signum() * (diff.abs() - 0.5).max(0.0);
            }
            statistic += diff * diff / expected;
        }
    }

    let dist =
        ChiSquared::new(dof as f64).map_err(|e| StatError::Distribution(e.to_string()))?;
    let p_value = (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0);
    Ok(ChiSquareStat {
        statistic,
        p_value,
        dof,
        interpretation: Independence::from_p_value(p_value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(counts: Vec<Vec<u64>>) -> ContingencyTable {
        ContingencyTable {
            row_labels: (0..counts.len()).map(|i| format!("r{i}")).collect(),
            column_labels: (0..counts[0].len()).map(|j| format!("c{j}")).collect(),
            counts,
        }
    }

    #[test]
    fn strongly_associated_table_is_dependent() {
        let t = table(vec![vec![4, 0, 0], vec![0, 3, 0], vec![0, 0, 3]]);
        let r = chi_square_test(&t).unwrap();
        assert!((r.statistic - 20.0).abs() < 1e-9);
        assert_eq!(r.dof, 4);
        assert!(r.p_value < 0.05);
        assert_eq!(r.interpretation, Independence::Dependent);
    }

    #[test]
    fn balanced_table_is_independent() {
        let t = table(vec![vec![2, 1, 1], vec![1, 1, 1], vec![1, 1, 1]]);
        let r = chi_square_test(&t).unwrap();
        assert!(r.p_value >= 0.05);
        assert_eq!(r.interpretation, Independence::Independent);
    }

    #[test]
    fn yates_correction_on_two_by_two() {
        // expected 5 everywhere; |o - e| = 5 -> 4.5 after correction
        let t = table(vec![vec![10, 0], vec![0, 10]]);
        let r = chi_square_test(&t).unwrap();
        assert_eq!(r.dof, 1);
        assert!((r.statistic - 16.2).abs() < 1e-9);

        let flat = table(vec![vec![5, 5], vec![5, 5]]);
        let r = chi_square_test(&flat).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!((r.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_row_is_degenerate() {
        let t = table(vec![vec![3, 4]]);
        assert!(t.is_degenerate());
        assert!(chi_square_test(&t).is_err());
    }

    #[test]
    fn empty_categories_are_dropped() {
        let rows = Binned {
            edges: vec![],
            labels: vec!["a".into(), "b".into(), "c".into()],
            assignments: vec![0, 0, 2, 2],
        };
        let cols = Binned {
            edges: vec![],
            labels: vec!["x".into(), "y".into()],
            assignments: vec![0, 1, 0, 1],
        };
        let t = ContingencyTable::from_binned(&rows, &cols);
        assert_eq!(t.row_labels, vec!["a", "c"]);
        assert_eq!(t.counts, vec![vec![1, 1], vec![1, 1]]);
        assert_eq!(t.row_totals(), vec![2, 2]);
        assert_eq!(t.column_totals(), vec![2, 2]);
    }
}
