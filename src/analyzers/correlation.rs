use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::{StatError, StatResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
}

impl CorrelationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "Pearson r",
            CorrelationMethod::Spearman => "Spearman rho",
        }
    }
}

impl std::fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationMethod::Pearson => f.write_str("Pearson"),
            CorrelationMethod::Spearman => f.write_str("Spearman"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationStat {
    pub coefficient: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strength {
    Negligible,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl Strength {
    /// Band of |r|: [0,.1) [.1,.3) [.3,.5) [.5,.7) [.7,1]
    pub fn classify(coefficient: f64) -> Option<Strength> {
        if !coefficient.is_finite() {
            return None;
        }
        let r = coefficient.abs();
        Some(if r < 0.1 {
            Strength::Negligible
        } else if r < 0.3 {
            Strength::Weak
        } else if r < 0.5 {
            Strength::Moderate
        } else if r < 0.7 {
            Strength::Strong
        } else {
            Strength::VeryStrong
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strength::Negligible => "negligible",
            Strength::Weak => "weak",
            Strength::Moderate => "moderate",
            Strength::Strong => "strong",
            Strength::VeryStrong => "very strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
    /// Exactly zero coefficient
    None,
}

impl Direction {
    pub fn classify(coefficient: f64) -> Option<Direction> {
        if !coefficient.is_finite() {
            None
        } else if coefficient > 0.0 {
            Some(Direction::Positive)
        } else if coefficient < 0.0 {
            Some(Direction::Negative)
        } else {
            Some(Direction::None)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Positive => "positive",
            Direction::Negative => "negative",
            Direction::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

impl Regression {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

pub fn correlate(method: CorrelationMethod, x: &[f64], y: &[f64]) -> StatResult<CorrelationStat> {
    match method {
        CorrelationMethod::Pearson => pearson(x, y),
        CorrelationMethod::Spearman => spearman(x, y),
    }
}

/// Pearson r with a two-sided p-value from Student's t on n-2 dof.
pub fn pearson(x: &[f64], y: &[f64]) -> StatResult<CorrelationStat> {
    check_pair(x, y)?;
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let sxx: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let syy: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();

    if sxx == 0.0 || syy == 0.0 {
        return Err(StatError::ConstantInput);
    }
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    if !r.is_finite() {
        return Err(StatError::NonFinite("correlation coefficient"));
    }

    Ok(CorrelationStat {
        coefficient: r,
        p_value: two_sided_p(r, x.len())?,
    })
}

/// Spearman rho: Pearson on average ranks, same t approximation for p.
pub fn spearman(x: &[f64], y: &[f64]) -> StatResult<CorrelationStat> {
    check_pair(x, y)?;
    pearson(&average_ranks(x), &average_ranks(y))
}

fn check_pair(x: &[f64], y: &[f64]) -> StatResult<()> {
    if x.len() != y.len() {
        return Err(StatError::LengthMismatch(x.len(), y.len()));
    }
    if x.len() < 3 {
        return Err(StatError::TooFewObservations {
            needed: 3,
            got: x.len(),
        });
    }
    Ok(())
}

fn two_sided_p(r: f64, n: usize) -> StatResult<f64> {
    let df = (n - 2) as f64;
    if r.abs() >= 1.0 {
        return Ok(0.0);
    }
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatError::Distribution(e.to_string()))?;
    Ok((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// 1-based ranks; ties share the mean of the ranks they span.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

/// Least-squares line, used for the scatter plot only.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<Regression> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let sxx: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let slope = sxy / sxx;
    Some(Regression {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
