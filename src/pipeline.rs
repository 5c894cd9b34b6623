use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::analyzers::{
    analyze_association, classify_columns, compute_composites, describe_column, frequency_table,
    resolve_missing, AssociationOutcome, CompositeColumns, DescriptiveSummary, FrequencyRow,
    ItemSelection, ResolutionSummary,
};
use crate::config::AnalysisConfig;
use crate::types::Dataset;

/// Frequency table of one demographic column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyProfile {
    pub column: String,
    pub total_rows: usize,
    pub frequencies: Vec<FrequencyRow>,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub row_count: usize,
    pub selection: ItemSelection,
    pub resolution: ResolutionSummary,
    pub composites: CompositeColumns,
    pub item_summaries: Vec<DescriptiveSummary>,
    pub composite_summaries: Vec<DescriptiveSummary>,
    pub demographics: Vec<FrequencyProfile>,
    pub association: AssociationOutcome,
}

impl AnalysisOutcome {
    /// Item summaries followed by composite summaries.
    pub fn all_summaries(&self) -> impl Iterator<Item = &DescriptiveSummary> {
        self.item_summaries.iter().chain(&self.composite_summaries)
    }
}

/// Classify → coerce → resolve missing → score → describe + associate.
/// The input dataset is never modified; all work happens on a copy.
pub fn run_pipeline(dataset: &Dataset, config: &AnalysisConfig) -> Result<AnalysisOutcome> {
    let selection = classify_columns(dataset, &config.columns)?;
    info!(
        "X items: [{}] | Y items: [{}]",
        selection.x_items.join(", "),
        selection.y_items.join(", ")
    );

    let mut working = dataset.clone();
    for name in selection.x_items.iter().chain(&selection.y_items) {
        if let Some(column) = working.column_mut(name) {
            column.coerce_numeric();
        }
    }

    let resolution =
        resolve_missing(&mut working, config.missing_policy, &selection.demographics);
    let enabled = config.composites.unwrap_or_else(|| selection.has_both_sets());
    let composites = compute_composites(&mut working, &selection, enabled);

    let described: Vec<String> = if selection.x_items.is_empty() && selection.y_items.is_empty() {
        working.numeric_column_names()
    } else {
        selection.described_items()
    };
    let item_summaries = described
        .iter()
        .filter_map(|name| working.column(name))
        .map(describe_column)
        .collect();
    let composite_summaries = composites
        .names()
        .into_iter()
        .filter_map(|name| working.column(name))
        .map(describe_column)
        .collect();

    let demographics = selection
        .demographics
        .iter()
        .filter_map(|name| working.column(name))
        .map(|column| FrequencyProfile {
            column: column.name.clone(),
            total_rows: column.len(),
            frequencies: frequency_table(&column.cells),
        })
        .collect();

    let association = analyze_association(&working, composites, &config.association);

    Ok(AnalysisOutcome {
        row_count: dataset.row_count(),
        selection,
        resolution,
        composites,
        item_summaries,
        composite_summaries,
        demographics,
        association,
    })
}
