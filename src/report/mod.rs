pub mod layout;
pub mod pdf;
pub mod summary;

pub use layout::{association_lines, build_report, profile_lines, Page, ReportDocument};
pub use pdf::{encode_inline, render_pdf};
pub use summary::{parse_summary_line, summary_line, ParsedSummary};

use anyhow::Result;
use tracing::info;

use crate::config::ReportConfig;
use crate::pipeline::AnalysisOutcome;

/// Lay out and render the report, stamped with the current local time.
pub fn export_pdf(outcome: &AnalysisOutcome, config: &ReportConfig) -> Result<Vec<u8>> {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let doc = build_report(outcome, config, &generated_at);
    info!("rendering report with {} pages", doc.pages.len());
    render_pdf(&doc)
}
