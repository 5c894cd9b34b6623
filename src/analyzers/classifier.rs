use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use crate::config::ColumnsConfig;
use crate::types::Dataset;

/// Name fragments that mark a column as demographic by default.
const DEMOGRAPHIC_KEYWORDS: &[&str] = &[
    "age",
    "gender",
    "major",
    "department",
    "education",
    "phone",
    "usage",
];

/// Default number of numeric columns taken for each item set.
const DEFAULT_ITEMS_PER_SET: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSelection {
    pub x_items: Vec<String>,
    pub y_items: Vec<String>,
    pub demographics: Vec<String>,
}

impl ItemSelection {
    /// X then Y items, deduplicated, in selection order.
    pub fn described_items(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in self.x_items.iter().chain(&self.y_items) {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        out
    }

    pub fn has_both_sets(&self) -> bool {
        !self.x_items.is_empty() && !self.y_items.is_empty()
    }
}

/// Heuristic defaults: first four numeric columns are X, next four are Y,
/// demographics are matched by name. Explicit selections win and must name
/// existing columns.
pub fn classify_columns(dataset: &Dataset, selected: &ColumnsConfig) -> Result<ItemSelection> {
    let numeric = dataset.numeric_column_names();
    let default_x: Vec<String> = numeric.iter().take(DEFAULT_ITEMS_PER_SET).cloned().collect();
    let default_y: Vec<String> = numeric
        .iter()
        .skip(DEFAULT_ITEMS_PER_SET)
        .take(DEFAULT_ITEMS_PER_SET)
        .cloned()
        .collect();

    let x_items = match &selected.x_items {
        Some(items) => checked(dataset, items, "X item")?,
        None => default_x,
    };
    let y_items = match &selected.y_items {
        Some(items) => checked(dataset, items, "Y item")?,
        None => default_y,
    };
    let demographics = match &selected.demographics {
        Some(items) => checked(dataset, items, "demographic column")?,
        None => suggest_demographics(&dataset.column_names()),
    };

    for (label, items) in [("X", &x_items), ("Y", &y_items)] {
        if !items.is_empty() && items.len() < DEFAULT_ITEMS_PER_SET {
            warn!(
                "{label} item set has {} columns; at least {DEFAULT_ITEMS_PER_SET} are recommended",
                items.len()
            );
        }
    }

    Ok(ItemSelection {
        x_items,
        y_items,
        demographics,
    })
}

pub fn suggest_demographics(names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            DEMOGRAPHIC_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .cloned()
        .collect()
}

fn checked(dataset: &Dataset, items: &[String], kind: &str) -> Result<Vec<String>> {
    let unknown: Vec<&str> = items
        .iter()
        .filter(|name| dataset.column(name).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        anyhow::bail!(
            "unknown {} column(s): {} (available: {})",
            kind,
            unknown.join(", "),
            dataset.column_names().join(", ")
        );
    }
    Ok(items.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_delimited;

    fn survey() -> Dataset {
        parse_delimited(
            "Age,Gender,Q1,Q2,Q3,Q4,Q5,Q6,Q7,Q8,Q9\n\
             20,F,1,2,3,4,5,1,2,3,4\n\
             31,M,2,3,4,5,1,2,3,4,5\n",
            b',',
        )
        .unwrap()
    }

    #[test]
    fn defaults_split_numeric_columns() {
        let sel = classify_columns(&survey(), &ColumnsConfig::default()).unwrap();
        assert_eq!(sel.x_items, vec!["Age", "Q1", "Q2", "Q3"]);
        assert_eq!(sel.y_items, vec!["Q4", "Q5", "Q6", "Q7"]);
        assert_eq!(sel.demographics, vec!["Age", "Gender"]);
    }

    #[test]
    fn explicit_selection_wins() {
        let cfg = ColumnsConfig {
            x_items: Some(vec!["Q1".into(), "Q2".into()]),
            y_items: Some(vec!["Q2".into(), "Q9".into()]),
            demographics: Some(vec![]),
        };
        let sel = classify_columns(&survey(), &cfg).unwrap();
        assert_eq!(sel.x_items, vec!["Q1", "Q2"]);
        assert!(sel.demographics.is_empty());
        assert_eq!(sel.described_items(), vec!["Q1", "Q2", "Q9"]);
    }

    #[test]
    fn unknown_column_is_an_input_error() {
        let cfg = ColumnsConfig {
            x_items: Some(vec!["Nope".into()]),
            ..Default::default()
        };
        let err = classify_columns(&survey(), &cfg).unwrap_err();
        assert!(err.to_string().contains("Nope"));
    }
}
