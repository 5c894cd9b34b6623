use anyhow::Result;

use survey_analyzer::pipeline::AnalysisOutcome;
use survey_analyzer::report::{association_lines, profile_lines, summary_line};
use survey_analyzer::types::format_number;

use super::PipelineArgs;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("invalid format '{}': expected text or json", s)),
        }
    }
}

pub fn run(args: &PipelineArgs, format: OutputFormat) -> Result<()> {
    let (_, outcome) = args.execute()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => print_text(&outcome),
    }
    Ok(())
}

fn print_text(outcome: &AnalysisOutcome) {
    let sel = &outcome.selection;
    let res = &outcome.resolution;

    println!("=== Survey Analysis ===");
    println!(
        "Rows: {} | Missing policy: {} | Filled cells: {}",
        outcome.row_count, res.policy, res.filled_cells
    );
    if !res.unfilled_columns.is_empty() {
        println!(
            "Unfilled columns (no valid values): {}",
            res.unfilled_columns.join(", ")
        );
    }
    println!("X items: [{}]", sel.x_items.join(", "));
    println!("Y items: [{}]", sel.y_items.join(", "));
    println!("Demographics: [{}]", sel.demographics.join(", "));

    println!("\n--- Descriptive Statistics ---\n");
    if outcome.item_summaries.is_empty() && outcome.composite_summaries.is_empty() {
        println!("No numeric columns to summarize.");
    }
    for summary in outcome.all_summaries() {
        println!("{}", summary_line(summary));
        if let Some(stats) = &summary.stats {
            let modes: Vec<String> = stats.modes.iter().map(|m| format_number(*m)).collect();
            println!(
                "    min: {}, max: {}, mode: {}",
                format_number(stats.min),
                format_number(stats.max),
                modes.join(" / ")
            );
        }
    }

    if !outcome.demographics.is_empty() {
        println!("\n--- Demographic Profile ---\n");
        for profile in &outcome.demographics {
            for (i, line) in profile_lines(profile).iter().enumerate() {
                if i == 0 {
                    println!("{line}");
                } else {
                    println!("  {line}");
                }
            }
        }
    }

    println!("\n--- Association ---\n");
    for line in association_lines(&outcome.association) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("TEXT".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
