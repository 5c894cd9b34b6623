use serde::{Deserialize, Serialize};

/// Full schema of `.survey-analyzer.yaml`.
/// Global (~/) and local files are deep-merged, then CLI flags are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub missing_policy: MissingPolicy,
    pub columns: ColumnsConfig,
    /// None = enabled iff both X and Y item sets are non-empty
    pub composites: Option<bool>,
    pub association: AssociationConfig,
    pub report: ReportConfig,
}

/// Explicit column selection. `None` falls back to the heuristic defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ColumnsConfig {
    pub x_items: Option<Vec<String>>,
    pub y_items: Option<Vec<String>>,
    pub demographics: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    pub method: MethodOverride,
    pub binning: BinningStrategy,
    pub bins: usize,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            method: MethodOverride::Auto,
            binning: BinningStrategy::Quantiles,
            bins: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub subtitle: String,
    pub contributors: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Survey Analysis Report".into(),
            subtitle: "Descriptive statistics and X/Y association".into(),
            contributors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MissingPolicy {
    /// No global fill; each analysis drops rows missing what it needs.
    #[default]
    DropRows,
    FillZero,
    FillMean,
    FillMedian,
}

impl std::str::FromStr for MissingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop-rows" | "drop" => Ok(MissingPolicy::DropRows),
            "fill-zero" | "zero" => Ok(MissingPolicy::FillZero),
            "fill-mean" | "mean" => Ok(MissingPolicy::FillMean),
            "fill-median" | "median" => Ok(MissingPolicy::FillMedian),
            _ => Err(format!(
                "invalid missing policy '{}': expected drop-rows, fill-zero, fill-mean, or fill-median",
                s
            )),
        }
    }
}

impl std::fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MissingPolicy::DropRows => "drop-rows",
            MissingPolicy::FillZero => "fill-zero",
            MissingPolicy::FillMean => "fill-mean",
            MissingPolicy::FillMedian => "fill-median",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MethodOverride {
    #[default]
    Auto,
    Pearson,
    Spearman,
    ChiSquare,
}

impl std::str::FromStr for MethodOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(MethodOverride::Auto),
            "pearson" => Ok(MethodOverride::Pearson),
            "spearman" => Ok(MethodOverride::Spearman),
            "chi-square" | "chi2" | "chisquare" => Ok(MethodOverride::ChiSquare),
            _ => Err(format!(
                "invalid method '{}': expected auto, pearson, spearman, or chi-square",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BinningStrategy {
    /// Equal-count bins from sample quantiles
    #[default]
    Quantiles,
    /// Equal-width bins over [min, max]
    EqualWidth,
}

impl std::str::FromStr for BinningStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quantiles" | "quantile" => Ok(BinningStrategy::Quantiles),
            "equal-width" | "width" => Ok(BinningStrategy::EqualWidth),
            _ => Err(format!(
                "invalid binning '{}': expected quantiles or equal-width",
                s
            )),
        }
    }
}

impl std::fmt::Display for BinningStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinningStrategy::Quantiles => f.write_str("quantiles"),
            BinningStrategy::EqualWidth => f.write_str("equal-width"),
        }
    }
}

pub const MIN_BINS: usize = 2;
pub const MAX_BINS: usize = 6;

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), String> {
        let bins = self.association.bins;
        if !(MIN_BINS..=MAX_BINS).contains(&bins) {
            return Err(format!(
                "bins must be between {} and {}, got {}",
                MIN_BINS, MAX_BINS, bins
            ));
        }
        Ok(())
    }
}
