use std::path::Path;

use anyhow::Result;

use survey_analyzer::analyzers::classify_columns;
use survey_analyzer::config::ColumnsConfig;
use survey_analyzer::parsers::load_dataset;

pub fn run(file: &Path, rows: usize) -> Result<()> {
    let dataset = load_dataset(file)?;
    let names = dataset.column_names();

    println!("File: {}", file.display());
    println!(
        "Rows: {} | Columns: {}",
        dataset.row_count(),
        names.len()
    );
    println!(
        "Numeric columns: [{}]",
        dataset.numeric_column_names().join(", ")
    );

    let defaults = classify_columns(&dataset, &ColumnsConfig::default())?;
    println!("Default X items: [{}]", defaults.x_items.join(", "));
    println!("Default Y items: [{}]", defaults.y_items.join(", "));
    println!("Suggested demographics: [{}]", defaults.demographics.join(", "));

    let shown = rows.min(dataset.row_count());
    println!("\nFirst {shown} rows:");
    println!("{}", names.join("\t"));
    for row in 0..shown {
        let cells: Vec<String> = dataset
            .columns()
            .iter()
            .map(|col| col.cells[row].display())
            .collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}
