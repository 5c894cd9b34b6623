use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use survey_analyzer::report::{encode_inline, export_pdf};

use super::PipelineArgs;

pub fn run(args: &PipelineArgs, output: &Path, inline: bool) -> Result<()> {
    let (config, outcome) = args.execute()?;
    let pdf = export_pdf(&outcome, &config.report)?;

    std::fs::write(output, &pdf)
        .with_context(|| format!("failed to write report to {}", output.display()))?;
    info!("report written to {} ({} bytes)", output.display(), pdf.len());

    if inline {
        println!("{}", encode_inline(&pdf));
    } else {
        println!("{}", output.display());
    }
    Ok(())
}
