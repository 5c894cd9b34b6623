pub mod association;
pub mod binning;
pub mod chi_square;
pub mod classifier;
pub mod composite;
pub mod correlation;
pub mod descriptive;
pub mod missing;
pub mod normality;

pub use association::{analyze_association, AssociationOutcome};
pub use classifier::{classify_columns, ItemSelection};
pub use composite::{compute_composites, CompositeColumns, X_TOTAL, Y_TOTAL};
pub use descriptive::{describe_column, frequency_table, DescriptiveSummary, FrequencyRow};
pub use missing::{resolve_missing, ResolutionSummary};

use thiserror::Error;

/// Numerical failure inside a statistics routine. Never escapes the
/// association boundary; callers turn it into an undefined result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatError {
    #[error("need at least {needed} observations, got {got}")]
    TooFewObservations { needed: usize, got: usize },
    #[error("input is constant (zero variance)")]
    ConstantInput,
    #[error("samples have different lengths ({0} vs {1})")]
    LengthMismatch(usize, usize),
    #[error("non-finite result: {0}")]
    NonFinite(&'static str),
    #[error("distribution error: {0}")]
    Distribution(String),
}

pub type StatResult<T> = Result<T, StatError>;

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Median of unsorted values.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
