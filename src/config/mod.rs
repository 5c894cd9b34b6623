pub mod loader;
pub mod models;

pub use models::{
    AnalysisConfig, AssociationConfig, BinningStrategy, ColumnsConfig, MethodOverride,
    MissingPolicy, ReportConfig,
};

/// Per-invocation CLI flags layered on top of the merged file config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub missing_policy: Option<MissingPolicy>,
    pub x_items: Option<Vec<String>>,
    pub y_items: Option<Vec<String>>,
    pub demographics: Option<Vec<String>>,
    pub composites: Option<bool>,
    pub method: Option<MethodOverride>,
    pub binning: Option<BinningStrategy>,
    pub bins: Option<usize>,
}

impl AnalysisConfig {
    pub fn apply_overrides(&mut self, o: CliOverrides) {
        if let Some(v) = o.missing_policy {
            self.missing_policy = v;
        }
        if let Some(v) = o.x_items {
            self.columns.x_items = Some(v);
        }
        if let Some(v) = o.y_items {
            self.columns.y_items = Some(v);
        }
        if let Some(v) = o.demographics {
            self.columns.demographics = Some(v);
        }
        if let Some(v) = o.composites {
            self.composites = Some(v);
        }
        if let Some(v) = o.method {
            self.association.method = v;
        }
        if let Some(v) = o.binning {
            self.association.binning = v;
        }
        if let Some(v) = o.bins {
            self.association.bins = v;
        }
    }
}
