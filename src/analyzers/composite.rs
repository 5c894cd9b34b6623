use serde::Serialize;

use super::classifier::ItemSelection;
use crate::types::{Cell, Column, Dataset};

pub const X_TOTAL: &str = "X_total";
pub const Y_TOTAL: &str = "Y_total";

/// Which composite columns were written to the working table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CompositeColumns {
    pub x_total: bool,
    pub y_total: bool,
}

impl CompositeColumns {
    pub fn both(&self) -> bool {
        self.x_total && self.y_total
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.x_total {
            names.push(X_TOTAL);
        }
        if self.y_total {
            names.push(Y_TOTAL);
        }
        names
    }
}

/// Write `X_total`/`Y_total` as strict row sums of the item columns.
/// Always rebuilt from the items; stale composites are removed by replacement.
pub fn compute_composites(
    table: &mut Dataset,
    selection: &ItemSelection,
    enabled: bool,
) -> CompositeColumns {
    let mut written = CompositeColumns::default();
    if !enabled {
        return written;
    }

    if !selection.x_items.is_empty() {
        let column = strict_row_sum(table, &selection.x_items, X_TOTAL);
        table.upsert_column(column);
        written.x_total = true;
    }
    if !selection.y_items.is_empty() {
        let column = strict_row_sum(table, &selection.y_items, Y_TOTAL);
        table.upsert_column(column);
        written.y_total = true;
    }
    written
}

/// Row-wise sum; any missing contributor makes the row's total missing.
pub fn strict_row_sum(table: &Dataset, items: &[String], name: &str) -> Column {
    let sources: Vec<&Column> = items.iter().filter_map(|i| table.column(i)).collect();
    let cells = (0..table.row_count())
        .map(|row| {
            sources
                .iter()
                .map(|col| col.cells[row].as_number())
                .sum::<Option<f64>>()
                .map_or(Cell::Missing, Cell::Numeric)
        })
        .collect();
    Column::new(name, cells)
}
