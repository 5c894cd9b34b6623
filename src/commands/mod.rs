pub mod analyze;
pub mod config;
pub mod inspect;
pub mod report;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use survey_analyzer::config::{loader, AnalysisConfig, CliOverrides, MethodOverride};
use survey_analyzer::parsers::load_dataset;
use survey_analyzer::pipeline::{run_pipeline, AnalysisOutcome};

/// Options shared by every command that runs the pipeline.
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Survey data file (.csv, .tsv, .xlsx)
    pub file: PathBuf,

    /// Explicit YAML config, layered over ~/ and ./.survey-analyzer.yaml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Missing values: drop-rows, fill-zero, fill-mean, or fill-median
    #[arg(long)]
    pub missing: Option<String>,

    /// X item columns, comma separated
    #[arg(long, value_delimiter = ',')]
    pub x: Option<Vec<String>>,

    /// Y item columns, comma separated
    #[arg(long, value_delimiter = ',')]
    pub y: Option<Vec<String>>,

    /// Demographic columns, comma separated
    #[arg(long, value_delimiter = ',')]
    pub demographics: Option<Vec<String>>,

    /// Force composite computation on
    #[arg(long, conflicts_with = "no_composites")]
    pub composites: bool,

    /// Force composite computation off
    #[arg(long)]
    pub no_composites: bool,

    /// Association method: auto, pearson, spearman, or chi-square
    #[arg(long)]
    pub method: Option<String>,

    /// Shorthand for --method chi-square
    #[arg(long, conflicts_with = "method")]
    pub chi_square: bool,

    /// Binning for chi-square: quantiles or equal-width
    #[arg(long)]
    pub binning: Option<String>,

    /// Number of bins per composite (2-6)
    #[arg(long)]
    pub bins: Option<usize>,
}

fn parse_opt<T: FromStr<Err = String>>(value: &Option<String>) -> Result<Option<T>> {
    value
        .as_deref()
        .map(|s| s.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()
}

impl PipelineArgs {
    pub fn overrides(&self) -> Result<CliOverrides> {
        let method = if self.chi_square {
            Some(MethodOverride::ChiSquare)
        } else {
            parse_opt(&self.method)?
        };
        let composites = match (self.composites, self.no_composites) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Ok(CliOverrides {
            missing_policy: parse_opt(&self.missing)?,
            x_items: self.x.clone(),
            y_items: self.y.clone(),
            demographics: self.demographics.clone(),
            composites,
            method,
            binning: parse_opt(&self.binning)?,
            bins: self.bins,
        })
    }

    /// Merged file config with these flags applied, validated.
    pub fn resolve_config(&self) -> Result<AnalysisConfig> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let mut config = loader::load_merged(self.config.as_deref(), Some(&cwd))?;
        config.apply_overrides(self.overrides()?);
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Load the dataset and run the full pipeline.
    pub fn execute(&self) -> Result<(AnalysisConfig, AnalysisOutcome)> {
        let config = self.resolve_config()?;
        let dataset = load_dataset(&self.file)?;
        let outcome = run_pipeline(&dataset, &config)?;
        info!(
            "analysis finished: {} summaries, {} demographic profiles",
            outcome.item_summaries.len() + outcome.composite_summaries.len(),
            outcome.demographics.len()
        );
        Ok((config, outcome))
    }
}
