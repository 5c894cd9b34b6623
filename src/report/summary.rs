use regex::Regex;
use std::sync::OnceLock;

use crate::analyzers::DescriptiveSummary;

pub const UNDEFINED: &str = "n/a";
pub const NO_SUMMARY: &str = "(could not compute numeric summary)";

/// One-line summary as printed in the report, three decimals.
///
/// `Q1 - mean: 3.200, median: 3.000, std: 1.304, n: 5`
pub fn summary_line(summary: &DescriptiveSummary) -> String {
    if !summary.has_data() {
        return format!("{} - {}", summary.column, NO_SUMMARY);
    }
    format!(
        "{} - mean: {}, median: {}, std: {}, n: {}",
        summary.column,
        fmt_decimal(summary.mean(), 3),
        fmt_decimal(summary.median(), 3),
        fmt_decimal(summary.std_dev(), 3),
        summary.count
    )
}

pub fn fmt_decimal(value: Option<f64>, places: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", places, v),
        _ => UNDEFINED.to_string(),
    }
}

/// Values read back from a summary line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSummary {
    pub column: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub count: usize,
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<column>.+) - mean: (?P<mean>\S+), median: (?P<median>\S+), std: (?P<std>\S+), n: (?P<n>\d+)$",
        )
        .expect("summary line pattern is valid")
    })
}

/// Parse a line produced by [`summary_line`]. Placeholder lines yield `None`.
pub fn parse_summary_line(line: &str) -> Option<ParsedSummary> {
    let caps = line_pattern().captures(line.trim())?;
    let field = |name: &str| -> Option<f64> {
        let raw = caps.name(name)?.as_str();
        if raw == UNDEFINED {
            None
        } else {
            raw.parse().ok()
        }
    };
    Some(ParsedSummary {
        column: caps["column"].to_string(),
        mean: field("mean"),
        median: field("median"),
        std_dev: field("std"),
        count: caps["n"].parse().ok()?,
    })
}
