pub mod analyzers;
pub mod config;
pub mod parsers;
pub mod pipeline;
pub mod report;
pub mod types;

pub use pipeline::{run_pipeline, AnalysisOutcome};
