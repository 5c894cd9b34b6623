use serde::Serialize;

use crate::config::BinningStrategy;

/// Category assignment of a sample. `assignments[i]` indexes `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binned {
    pub edges: Vec<f64>,
    pub labels: Vec<String>,
    pub assignments: Vec<usize>,
}

impl Binned {
    /// `observed()[k]` is true when category `k` received at least one value.
    pub fn observed(&self) -> Vec<bool> {
        let mut seen = vec![false; self.labels.len()];
        for &a in &self.assignments {
            seen[a] = true;
        }
        seen
    }
}

pub fn bin(values: &[f64], bins: usize, strategy: BinningStrategy) -> Binned {
    let edges = match strategy {
        BinningStrategy::Quantiles => quantile_edges(values, bins),
        BinningStrategy::EqualWidth => equal_width_edges(values, bins),
    };
    let first_closed = strategy == BinningStrategy::Quantiles;
    assign(values, edges, first_closed)
}

/// Linear-interpolated sample quantiles at k/bins, duplicates dropped.
fn quantile_edges(values: &[f64], bins: usize) -> Vec<f64> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let last = (sorted.len() - 1) as f64;

    let mut edges: Vec<f64> = (0..=bins)
        .map(|k| {
            let pos = last * k as f64 / bins as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        })
        .collect();
    edges.dedup();
    edges
}

/// `bins` equal intervals over [min, max]. The lowest edge is pushed down by
/// 0.1% of the range so the minimum falls inside the first right-closed bin;
/// a constant sample is widened by 0.1% on each side.
fn equal_width_edges(values: &[f64], bins: usize) -> Vec<f64> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let constant = lo == hi;
    if constant {
        lo -= if lo != 0.0 { 0.001 * lo.abs() } else { 0.001 };
        hi += if hi != 0.0 { 0.001 * hi.abs() } else { 0.001 };
    }
    let step = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|k| lo + step * k as f64).collect();
    edges[bins] = hi;
    if !constant {
        edges[0] -= (hi - lo) * 0.001;
    }
    edges.dedup();
    edges
}

/// Right-closed intervals `(e[i], e[i+1]]`; with `first_closed` the lowest
/// edge itself belongs to bin 0.
fn assign(values: &[f64], edges: Vec<f64>, first_closed: bool) -> Binned {
    if edges.len() < 2 {
        // all values collapse to one category
        let label = edges
            .first()
            .map(|e| format!("[{e:.3}, {e:.3}]"))
            .unwrap_or_else(|| "(empty)".to_string());
        return Binned {
            edges,
            labels: vec![label],
            assignments: vec![0; values.len()],
        };
    }

    let intervals = edges.len() - 1;
    let labels = (0..intervals)
        .map(|i| {
            let open = if i == 0 && first_closed { '[' } else { '(' };
            format!("{open}{:.3}, {:.3}]", edges[i], edges[i + 1])
        })
        .collect();
    let assignments = values
        .iter()
        .map(|&v| {
            edges[1..]
                .iter()
                .position(|&upper| v <= upper)
                .unwrap_or(intervals - 1)
        })
        .collect();

    Binned {
        edges,
        labels,
        assignments,
    }
}
