use std::cmp::Ordering;

use serde::Serialize;

/// A single cell as read from the input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Numeric(f64),
    Missing,
    Raw(String),
}

impl Cell {
    /// Numeric view of the cell. Text that parses as a finite number counts;
    /// anything else (including NaN/inf) is treated as missing.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Numeric(v) if v.is_finite() => Some(*v),
            Cell::Numeric(_) | Cell::Missing => None,
            Cell::Raw(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Coerce to `Numeric` or `Missing`.
    pub fn to_numeric(&self) -> Cell {
        match self.as_number() {
            Some(v) => Cell::Numeric(v),
            None => Cell::Missing,
        }
    }

    /// Ordering used for frequency tables: numbers, then text, then missing.
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        fn rank(c: &Cell) -> u8 {
            match c {
                Cell::Numeric(_) => 0,
                Cell::Raw(_) => 1,
                Cell::Missing => 2,
            }
        }
        match (self, other) {
            (Cell::Numeric(a), Cell::Numeric(b)) => a.total_cmp(b),
            (Cell::Raw(a), Cell::Raw(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Numeric(v) => format_number(*v),
            Cell::Missing => "NA".to_string(),
            Cell::Raw(s) => s.clone(),
        }
    }
}

/// Integral values print without a fractional part.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// A column is numeric when none of its cells is unparsed text.
    pub fn is_numeric(&self) -> bool {
        !self.cells.iter().any(|c| matches!(c, Cell::Raw(_)))
    }

    pub fn coerce_numeric(&mut self) {
        for cell in &mut self.cells {
            *cell = cell.to_numeric();
        }
    }

    /// Valid numeric values, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Cell::as_number).collect()
    }
}

/// In-memory table: ordered, named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Append a column, replacing any existing column with the same name.
    pub fn upsert_column(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }
}
