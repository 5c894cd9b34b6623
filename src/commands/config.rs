use std::path::Path;

use anyhow::{Context, Result};

use survey_analyzer::config::{loader, AnalysisConfig};

/// Print the configuration the pipeline would run with (before CLI flags).
pub fn show(explicit: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let config = loader::load_merged(explicit, Some(&cwd))?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    print!("{}", loader::to_yaml(&config)?);
    Ok(())
}

pub fn defaults() -> Result<()> {
    print!("{}", loader::to_yaml(&AnalysisConfig::default())?);
    Ok(())
}
