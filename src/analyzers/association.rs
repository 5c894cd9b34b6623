//! X/Y association: normality-gated choice between Pearson and Spearman,
//! or a chi-square test of independence on binned composites.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::binning::{bin, Binned};
use super::chi_square::{chi_square_test, ChiSquareStat, ContingencyTable};
use super::composite::{CompositeColumns, X_TOTAL, Y_TOTAL};
use super::correlation::{
    correlate, linear_regression, CorrelationMethod, Direction, Regression, Strength,
};
use super::normality::shapiro_wilk;
use crate::config::{AssociationConfig, BinningStrategy, MethodOverride};
use crate::types::Dataset;

/// Minimum number of complete (X_total, Y_total) pairs.
pub const MIN_PAIRS: usize = 3;
/// Normality is not rejected above this p-value.
pub const NORMALITY_ALPHA: f64 = 0.05;

pub const GUIDANCE_MISSING_COMPOSITES: &str = "Composite totals X_total and Y_total missing. \
Select X and Y items and enable composite computation.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssociationOutcome {
    /// Composites absent; nothing computed.
    MissingComposites { message: String },
    InsufficientData { pairs: usize },
    Correlation(CorrelationReport),
    ChiSquare(ChiSquareReport),
}

/// Shapiro-Wilk p-values; both `None` when either test could not run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalityCheck {
    pub p_x: Option<f64>,
    pub p_y: Option<f64>,
}

impl NormalityCheck {
    pub fn run(x: &[f64], y: &[f64]) -> Self {
        match (shapiro_wilk(x), shapiro_wilk(y)) {
            (Ok(sx), Ok(sy)) => Self {
                p_x: Some(sx.p_value),
                p_y: Some(sy.p_value),
            },
            (rx, ry) => {
                let reason = rx.err().or(ry.err());
                warn!(
                    "normality test not computable ({}); p-values indeterminate",
                    reason.map(|e| e.to_string()).unwrap_or_default()
                );
                Self { p_x: None, p_y: None }
            }
        }
    }

    /// Pearson iff both p-values are defined and exceed 0.05; otherwise
    /// Spearman. A two-branch rule, not a general recommendation.
    pub fn auto_method(&self) -> CorrelationMethod {
        match (self.p_x, self.p_y) {
            (Some(px), Some(py)) if px > NORMALITY_ALPHA && py > NORMALITY_ALPHA => {
                CorrelationMethod::Pearson
            }
            _ => CorrelationMethod::Spearman,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationReport {
    pub method: CorrelationMethod,
    pub auto_method: CorrelationMethod,
    pub normality: NormalityCheck,
    pub pairs: usize,
    pub coefficient: Option<f64>,
    pub p_value: Option<f64>,
    pub strength: Option<Strength>,
    pub direction: Option<Direction>,
    pub regression: Option<Regression>,
    /// Set when the statistic could not be computed
    pub error: Option<String>,
    #[serde(skip)]
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChiSquareReport {
    pub auto_method: CorrelationMethod,
    pub normality: NormalityCheck,
    pub pairs: usize,
    pub binning: BinningStrategy,
    pub bins: usize,
    pub table: ContingencyTable,
    pub result: ChiSquareResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChiSquareResult {
    Tested(ChiSquareStat),
    /// Binning left fewer than two categories on an axis.
    Degenerate { reason: String },
}

/// Run the association state machine over the working table's composites.
///
/// Only composites this run wrote count: an input column that merely happens
/// to be named `X_total` is ignored unless `written` says it was rebuilt.
pub fn analyze_association(
    table: &Dataset,
    written: CompositeColumns,
    config: &AssociationConfig,
) -> AssociationOutcome {
    let columns = if written.both() {
        table.column(X_TOTAL).zip(table.column(Y_TOTAL))
    } else {
        None
    };
    let Some((x_col, y_col)) = columns else {
        info!("composites absent; association skipped");
        return AssociationOutcome::MissingComposites {
            message: GUIDANCE_MISSING_COMPOSITES.to_string(),
        };
    };

    let (xs, ys): (Vec<f64>, Vec<f64>) = x_col
        .cells
        .iter()
        .zip(&y_col.cells)
        .filter_map(|(x, y)| Some((x.as_number()?, y.as_number()?)))
        .unzip();
    let pairs = xs.len();
    info!("association over {pairs} complete pairs");
    if pairs < MIN_PAIRS {
        return AssociationOutcome::InsufficientData { pairs };
    }

    let normality = NormalityCheck::run(&xs, &ys);
    let auto_method = normality.auto_method();
    debug!("normality {:?} -> auto method {auto_method}", normality);

    let method = match config.method {
        MethodOverride::Auto => Some(auto_method),
        MethodOverride::Pearson => Some(CorrelationMethod::Pearson),
        MethodOverride::Spearman => Some(CorrelationMethod::Spearman),
        MethodOverride::ChiSquare => None,
    };

    match method {
        Some(method) => AssociationOutcome::Correlation(correlation_path(
            method,
            auto_method,
            normality,
            &xs,
            &ys,
        )),
        None => AssociationOutcome::ChiSquare(chi_square_path(
            config,
            auto_method,
            normality,
            &xs,
            &ys,
        )),
    }
}

fn correlation_path(
    method: CorrelationMethod,
    auto_method: CorrelationMethod,
    normality: NormalityCheck,
    xs: &[f64],
    ys: &[f64],
) -> CorrelationReport {
    let (coefficient, p_value, error) = match correlate(method, xs, ys) {
        Ok(stat) => (Some(stat.coefficient), Some(stat.p_value), None),
        Err(e) => {
            warn!("{method} correlation undefined: {e}");
            (None, None, Some(e.to_string()))
        }
    };

    CorrelationReport {
        method,
        auto_method,
        normality,
        pairs: xs.len(),
        coefficient,
        p_value,
        strength: coefficient.and_then(Strength::classify),
        direction: coefficient.and_then(Direction::classify),
        regression: linear_regression(xs, ys),
        error,
        points: xs.iter().copied().zip(ys.iter().copied()).collect(),
    }
}

fn chi_square_path(
    config: &AssociationConfig,
    auto_method: CorrelationMethod,
    normality: NormalityCheck,
    xs: &[f64],
    ys: &[f64],
) -> ChiSquareReport {
    let x_bins: Binned = bin(xs, config.bins, config.binning);
    let y_bins: Binned = bin(ys, config.bins, config.binning);
    let table = ContingencyTable::from_binned(&x_bins, &y_bins);

    let result = if table.is_degenerate() {
        let reason = format!(
            "binning produced {} X and {} Y categories; at least 2 each are required",
            table.row_labels.len(),
            table.column_labels.len()
        );
        warn!("chi-square skipped: {reason}");
        ChiSquareResult::Degenerate { reason }
    } else {
        match chi_square_test(&table) {
            Ok(stat) => ChiSquareResult::Tested(stat),
            Err(e) => {
                warn!("chi-square failed: {e}");
                ChiSquareResult::Degenerate {
                    reason: e.to_string(),
                }
            }
        }
    };

    ChiSquareReport {
        auto_method,
        normality,
        pairs: xs.len(),
        binning: config.binning,
        bins: config.bins,
        table,
        result,
    }
}
