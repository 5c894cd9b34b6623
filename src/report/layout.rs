//! Page model of the report. Positions are fractions of the page, origin at
//! the bottom-left, so the renderer only has to scale them.

use crate::analyzers::association::{ChiSquareReport, ChiSquareResult, CorrelationReport};
use crate::analyzers::correlation::Regression;
use crate::analyzers::{AssociationOutcome, X_TOTAL, Y_TOTAL};
use crate::config::ReportConfig;
use crate::pipeline::{AnalysisOutcome, FrequencyProfile};
use crate::types::format_number;

use super::summary::{fmt_decimal, summary_line};

/// A4 in inches.
pub const PAGE_WIDTH_IN: f32 = 8.27;
pub const PAGE_HEIGHT_IN: f32 = 11.69;

pub const TOP: f32 = 0.95;
pub const LINE_STEP: f32 = 0.03;
pub const BOTTOM: f32 = 0.05;
pub const LEFT_MARGIN: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: FontStyle,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    pub regression: Option<Regression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Text(Vec<TextLine>),
    Scatter(ScatterPlot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    /// All text lines in page order.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| match page {
            Page::Text(lines) => lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
            Page::Scatter(_) => Vec::new(),
        })
    }
}

/// Flows left-aligned lines down the page, starting a new page once the
/// cursor drops below the bottom margin.
struct PageWriter {
    pages: Vec<Page>,
    current: Vec<TextLine>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: TOP,
        }
    }

    fn heading(&mut self, text: impl Into<String>) {
        self.push(text, 12.0, FontStyle::Bold, LEFT_MARGIN);
    }

    fn line(&mut self, text: impl Into<String>) {
        self.push(text, 10.0, FontStyle::Regular, LEFT_MARGIN);
    }

    fn indented(&mut self, text: impl Into<String>) {
        self.push(text, 10.0, FontStyle::Regular, LEFT_MARGIN + 0.03);
    }

    fn push(&mut self, text: impl Into<String>, size: f32, style: FontStyle, x: f32) {
        if self.y < BOTTOM {
            self.break_page();
        }
        self.current.push(TextLine {
            text: text.into(),
            x,
            y: self.y,
            size,
            style,
            align: Align::Left,
        });
        self.y -= LINE_STEP;
    }

    fn break_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(Page::Text(std::mem::take(&mut self.current)));
        }
        self.y = TOP;
    }

    fn finish(mut self) -> Vec<Page> {
        self.break_page();
        self.pages
    }
}

/// Lay out the full report. `generated_at` is printed on the title page.
pub fn build_report(
    outcome: &AnalysisOutcome,
    config: &ReportConfig,
    generated_at: &str,
) -> ReportDocument {
    let mut pages = vec![title_page(config, generated_at)];

    let mut summaries = PageWriter::new();
    summaries.heading("Descriptive statistics summary:");
    for summary in outcome.all_summaries() {
        summaries.line(summary_line(summary));
    }
    if outcome.item_summaries.is_empty() && outcome.composite_summaries.is_empty() {
        summaries.line("No numeric columns to summarize.");
    }
    pages.extend(summaries.finish());

    if !outcome.demographics.is_empty() {
        let mut demo = PageWriter::new();
        demo.heading("Demographic profile:");
        for profile in &outcome.demographics {
            for (i, line) in profile_lines(profile).into_iter().enumerate() {
                if i == 0 {
                    demo.push(line, 11.0, FontStyle::Bold, LEFT_MARGIN);
                } else {
                    demo.indented(line);
                }
            }
        }
        pages.extend(demo.finish());
    }

    let mut assoc = PageWriter::new();
    assoc.heading("Association Analysis");
    for line in association_lines(&outcome.association) {
        assoc.line(line);
    }
    pages.extend(assoc.finish());

    if let AssociationOutcome::Correlation(report) = &outcome.association {
        pages.push(Page::Scatter(scatter_plot(report)));
    }

    ReportDocument {
        title: config.title.clone(),
        pages,
    }
}

fn title_page(config: &ReportConfig, generated_at: &str) -> Page {
    let centered = |text: &str, y: f32, size: f32, style: FontStyle| TextLine {
        text: text.to_string(),
        x: 0.5,
        y,
        size,
        style,
        align: Align::Center,
    };
    let mut lines = vec![
        centered(&config.title, 0.85, 18.0, FontStyle::Bold),
        centered(&config.subtitle, 0.80, 12.0, FontStyle::Regular),
    ];

    let mut y = 0.72;
    if !config.contributors.is_empty() {
        lines.push(TextLine {
            text: "Contributors:".into(),
            x: LEFT_MARGIN,
            y,
            size: 11.0,
            style: FontStyle::Bold,
            align: Align::Left,
        });
        for name in &config.contributors {
            y -= LINE_STEP;
            if y < BOTTOM + LINE_STEP {
                break;
            }
            lines.push(TextLine {
                text: name.clone(),
                x: LEFT_MARGIN + 0.03,
                y,
                size: 10.0,
                style: FontStyle::Regular,
                align: Align::Left,
            });
        }
    }

    lines.push(TextLine {
        text: format!("Generated: {generated_at}"),
        x: LEFT_MARGIN,
        y: BOTTOM + LINE_STEP,
        size: 9.0,
        style: FontStyle::Regular,
        align: Align::Left,
    });
    Page::Text(lines)
}

/// Column name, then one `value: count (pct%)` line per category.
pub fn profile_lines(profile: &FrequencyProfile) -> Vec<String> {
    let mut lines = vec![format!("{} (n = {})", profile.column, profile.total_rows)];
    lines.extend(profile.frequencies.iter().map(|row| {
        format!(
            "{}: {} ({:.1}%)",
            row.value.display(),
            row.count,
            row.percent
        )
    }));
    lines
}

/// Human-readable description of the association outcome. Shared by the
/// report page and `analyze --format text`.
pub fn association_lines(outcome: &AssociationOutcome) -> Vec<String> {
    match outcome {
        AssociationOutcome::MissingComposites { message } => vec![message.clone()],
        AssociationOutcome::InsufficientData { pairs } => vec![format!(
            "Not enough complete {X_TOTAL}/{Y_TOTAL} pairs (need at least 3, have {pairs})."
        )],
        AssociationOutcome::Correlation(report) => correlation_lines(report),
        AssociationOutcome::ChiSquare(report) => chi_square_lines(report),
    }
}

fn normality_line(p_x: Option<f64>, p_y: Option<f64>) -> String {
    format!(
        "Shapiro-Wilk p-values ({X_TOTAL}, {Y_TOTAL}): {}, {}",
        fmt_decimal(p_x, 4),
        fmt_decimal(p_y, 4)
    )
}

fn correlation_lines(report: &CorrelationReport) -> Vec<String> {
    let mut lines = vec![
        format!("Valid pairs: {}", report.pairs),
        normality_line(report.normality.p_x, report.normality.p_y),
        format!("Automatic method: {}", report.auto_method),
    ];
    if report.method != report.auto_method {
        lines.push(format!("Method used (override): {}", report.method));
    }

    match (report.coefficient, report.p_value) {
        (Some(r), Some(p)) => lines.push(format!(
            "{} = {:.4}, p = {:.4}",
            report.method.label(),
            r,
            p
        )),
        _ => lines.push(format!(
            "{} could not be computed: {}",
            report.method.label(),
            report.error.as_deref().unwrap_or("undefined")
        )),
    }

    let strength = report.strength.map_or("n/a", |s| s.label());
    let direction = report.direction.map_or("n/a", |d| d.label());
    lines.push(format!(
        "Interpretation: strength {strength}, direction {direction}"
    ));

    if let Some(reg) = report.regression {
        lines.push(format!(
            "Regression line: {Y_TOTAL} = {:.3} + {:.3} * {X_TOTAL}",
            reg.intercept, reg.slope
        ));
    }
    lines
}

fn chi_square_lines(report: &ChiSquareReport) -> Vec<String> {
    let mut lines = vec![
        "Chi-square test performed on categorized totals.".to_string(),
        format!("Valid pairs: {}", report.pairs),
        normality_line(report.normality.p_x, report.normality.p_y),
        format!("Automatic method would be: {}", report.auto_method),
        format!("Binning: {}, {} bins", report.binning, report.bins),
        format!(
            "Contingency table ({X_TOTAL} rows x {Y_TOTAL} columns):"
        ),
    ];

    let table = &report.table;
    lines.push(format!("  | {}", table.column_labels.join(" | ")));
    for (label, row) in table.row_labels.iter().zip(&table.counts) {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        lines.push(format!("  {label} | {}", cells.join(" | ")));
    }

    match &report.result {
        ChiSquareResult::Tested(stat) => {
            lines.push(format!(
                "Chi2 = {:.4}, p = {:.4}, dof = {}",
                stat.statistic, stat.p_value, stat.dof
            ));
            lines.push(format!("Interpretation: {}", stat.interpretation.label()));
        }
        ChiSquareResult::Degenerate { reason } => {
            lines.push(format!("Chi-square not computed: {reason}"));
        }
    }
    lines
}

fn scatter_plot(report: &CorrelationReport) -> ScatterPlot {
    let title = match report.coefficient {
        Some(r) => format!(
            "Scatter: {X_TOTAL} vs {Y_TOTAL} ({} = {})",
            report.method.label(),
            format_number((r * 1000.0).round() / 1000.0)
        ),
        None => format!("Scatter: {X_TOTAL} vs {Y_TOTAL}"),
    };
    ScatterPlot {
        title,
        x_label: X_TOTAL.to_string(),
        y_label: Y_TOTAL.to_string(),
        points: report.points.clone(),
        regression: report.regression,
    }
}
