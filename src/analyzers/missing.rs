use serde::Serialize;
use tracing::{debug, warn};

use super::{mean, median};
use crate::config::MissingPolicy;
use crate::types::{Cell, Dataset};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionSummary {
    pub policy: MissingPolicy,
    pub filled_cells: usize,
    /// Numeric columns with no valid value to derive a fill from
    pub unfilled_columns: Vec<String>,
}

/// Apply `policy` to every numeric column of the working table except
/// `keep`, which are left as loaded (demographic columns, so their frequency
/// tables never show an invented category).
///
/// `DropRows` leaves the table untouched: consumers drop incomplete rows
/// themselves. Under `FillMean`/`FillMedian` a column without any valid value
/// stays missing and is listed in `unfilled_columns`.
pub fn resolve_missing(
    table: &mut Dataset,
    policy: MissingPolicy,
    keep: &[String],
) -> ResolutionSummary {
    let mut summary = ResolutionSummary {
        policy,
        filled_cells: 0,
        unfilled_columns: Vec::new(),
    };
    if policy == MissingPolicy::DropRows {
        return summary;
    }

    for column in table
        .columns_mut()
        .iter_mut()
        .filter(|c| c.is_numeric() && !keep.contains(&c.name))
    {
        let missing = column.cells.iter().filter(|c| c.as_number().is_none()).count();
        if missing == 0 {
            continue;
        }

        let values = column.numeric_values();
        let fill = match policy {
            MissingPolicy::FillZero => Some(0.0),
            MissingPolicy::FillMean => mean(&values),
            MissingPolicy::FillMedian => median(&values),
            MissingPolicy::DropRows => unreachable!("handled above"),
        };

        match fill {
            Some(value) => {
                for cell in column.cells.iter_mut().filter(|c| c.as_number().is_none()) {
                    *cell = Cell::Numeric(value);
                }
                debug!("{}: filled {missing} cells with {value}", column.name);
                summary.filled_cells += missing;
            }
            None => {
                warn!(
                    "{}: no valid values, cannot apply {policy}; leaving missing",
                    column.name
                );
                summary.unfilled_columns.push(column.name.clone());
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn table() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "q",
                vec![
                    Cell::Numeric(1.0),
                    Cell::Missing,
                    Cell::Numeric(2.0),
                    Cell::Numeric(6.0),
                ],
            ),
            Column::new("empty", vec![Cell::Missing; 4]),
            Column::new(
                "text",
                vec![
                    Cell::Raw("a".into()),
                    Cell::Missing,
                    Cell::Raw("b".into()),
                    Cell::Missing,
                ],
            ),
        ])
    }

    fn q(ds: &Dataset) -> Vec<Cell> {
        ds.column("q").unwrap().cells.clone()
    }

    #[test]
    fn drop_rows_leaves_table_untouched() {
        let mut ds = table();
        let summary = resolve_missing(&mut ds, MissingPolicy::DropRows, &[]);
        assert_eq!(ds, table());
        assert_eq!(summary.filled_cells, 0);
    }

    #[test]
    fn fill_zero() {
        let mut ds = table();
        resolve_missing(&mut ds, MissingPolicy::FillZero, &[]);
        assert_eq!(q(&ds)[1], Cell::Numeric(0.0));
        assert_eq!(ds.column("empty").unwrap().cells, vec![Cell::Numeric(0.0); 4]);
    }

    #[test]
    fn fill_mean_and_median() {
        let mut ds = table();
        resolve_missing(&mut ds, MissingPolicy::FillMean, &[]);
        assert_eq!(q(&ds)[1], Cell::Numeric(3.0));

        let mut ds = table();
        resolve_missing(&mut ds, MissingPolicy::FillMedian, &[]);
        assert_eq!(q(&ds)[1], Cell::Numeric(2.0));
    }

    #[test]
    fn all_missing_column_is_left_missing_and_reported() {
        let mut ds = table();
        let summary = resolve_missing(&mut ds, MissingPolicy::FillMean, &[]);
        assert_eq!(summary.unfilled_columns, vec!["empty"]);
        assert_eq!(summary.filled_cells, 1);
        assert!(ds.column("empty").unwrap().cells.iter().all(Cell::is_missing));
    }

    #[test]
    fn text_columns_are_never_filled() {
        let mut ds = table();
        resolve_missing(&mut ds, MissingPolicy::FillZero, &[]);
        assert_eq!(ds.column("text").unwrap().cells[1], Cell::Missing);
    }

    #[test]
    fn kept_columns_are_not_filled() {
        let mut ds = table();
        let summary = resolve_missing(&mut ds, MissingPolicy::FillMean, &["q".to_string()]);
        assert_eq!(q(&ds)[1], Cell::Missing);
        assert_eq!(summary.filled_cells, 0);
        assert_eq!(summary.unfilled_columns, vec!["empty"]);
    }
}
