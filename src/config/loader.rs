use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::models::AnalysisConfig;

pub const CONFIG_FILENAME: &str = ".survey-analyzer.yaml";

/// Merge global (~/), local (`dir`) and explicit YAML layers over the defaults.
/// Global and local files are optional and silently skipped when unreadable;
/// an explicit file must exist and parse.
pub fn load_merged(explicit: Option<&Path>, dir: Option<&Path>) -> Result<AnalysisConfig> {
    let mut layers: Vec<serde_json::Value> = Vec::new();

    if let Some(value) = global_config_path().and_then(|p| load_layer(&p)) {
        layers.push(value);
    }
    if let Some(value) = dir.and_then(|d| load_layer(&d.join(CONFIG_FILENAME))) {
        layers.push(value);
    }
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let value: serde_json::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config YAML '{}'", path.display()))?;
        layers.push(value);
    }

    let base = serde_json::to_value(AnalysisConfig::default())?;
    let merged = layers.into_iter().fold(base, deep_merge);
    serde_json::from_value(merged).context("config layers do not form a valid configuration")
}

/// Read one optional YAML layer as a JSON value.
fn load_layer(path: &Path) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_yaml::from_str(&content) {
        Ok(value) => {
            debug!("loaded config layer {}", path.display());
            Some(value)
        }
        Err(e) => {
            tracing::warn!("ignoring unparsable config {}: {e}", path.display());
            None
        }
    }
}

/// JSON Value deep merge: non-null values from `over` replace `base`.
fn deep_merge(base: serde_json::Value, over: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match (base, over) {
        (Value::Object(mut b), Value::Object(o)) => {
            for (key, over_val) in o {
                let base_val = b.remove(&key).unwrap_or(Value::Null);
                b.insert(key, deep_merge(base_val, over_val));
            }
            Value::Object(b)
        }
        (base, Value::Null) => base,
        (_, over) => over,
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(Path::new(&home).join(CONFIG_FILENAME))
}

pub fn to_yaml(config: &AnalysisConfig) -> Result<String> {
    Ok(serde_yaml::to_string(config)?)
}
