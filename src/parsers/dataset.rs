use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use tracing::{info, warn};

use crate::types::{Cell, Column, Dataset};

/// Tokens read as missing, in addition to the empty string.
const NA_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "-", "#N/A",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited(u8),
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => InputFormat::Spreadsheet,
            "tsv" | "tab" => InputFormat::Delimited(b'\t'),
            _ => InputFormat::Delimited(b','),
        }
    }
}

/// Load a tabular file into a `Dataset`. The first row is the header.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let (header, rows) = match InputFormat::from_path(path) {
        InputFormat::Delimited(delimiter) => read_delimited(path, delimiter)?,
        InputFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    let dataset = build_dataset(header, rows);
    info!(
        "loaded {} rows x {} columns from {}",
        dataset.row_count(),
        dataset.columns().len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse delimited text already held in memory.
pub fn parse_delimited(content: &str, delimiter: u8) -> Result<Dataset> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());
    let (header, rows) = collect_records(reader)?;
    Ok(build_dataset(header, rows))
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<(Vec<String>, Vec<Vec<Cell>>)> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    collect_records(reader).with_context(|| format!("Malformed input file: {}", path.display()))
}

fn collect_records<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<(Vec<String>, Vec<Vec<Cell>>)> {
    let header: Vec<String> = reader
        .headers()
        .context("failed to read header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (line_num, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to parse row {}", line_num + 2))?;
        rows.push(record.iter().map(parse_text_cell).collect());
    }
    Ok((header, rows))
}

fn read_spreadsheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<Cell>>)> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Spreadsheet has no worksheets: {}", path.display()))?
        .with_context(|| format!("Failed to read first worksheet: {}", path.display()))?;

    let mut iter = range.rows();
    let header: Vec<String> = match iter.next() {
        Some(row) => row.iter().map(|c| spreadsheet_cell(c).display()).collect(),
        None => Vec::new(),
    };
    let rows = iter
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();
    Ok((header, rows))
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Int(v) => Cell::Numeric(*v as f64),
        Data::Float(v) if v.is_finite() => Cell::Numeric(*v),
        Data::Float(_) | Data::Empty | Data::Error(_) => Cell::Missing,
        Data::String(s) => parse_text_cell(s),
        other => Cell::Raw(other.to_string()),
    }
}

/// Type a raw text cell: NA tokens → Missing, finite numbers → Numeric.
pub fn parse_text_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
        return Cell::Missing;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Numeric(v),
        _ => Cell::Raw(trimmed.to_string()),
    }
}

fn build_dataset(header: Vec<String>, rows: Vec<Vec<Cell>>) -> Dataset {
    let names = unique_names(&header);
    let width = names.len();
    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
        .collect();

    let mut truncated = 0usize;
    for mut row in rows {
        if row.len() > width {
            truncated += 1;
            row.truncate(width);
        }
        row.resize(width, Cell::Missing);
        for (column, cell) in columns.iter_mut().zip(row) {
            column.cells.push(cell);
        }
    }
    if truncated > 0 {
        warn!("{truncated} rows had more fields than the header; extra fields dropped");
    }

    Dataset::new(columns)
}

/// Blank headers become `column_<n>`; repeats get `.1`, `.2`, ...
fn unique_names(header: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.is_empty() {
                format!("column_{}", i + 1)
            } else {
                h.clone()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}
