//! Shapiro-Wilk normality test.
//!
//! Royston (1995) approximation, algorithm AS R94: coefficients from normal
//! order statistics with polynomial corrections for the two most extreme
//! weights, and a normalizing transform of `W` for the p-value. Valid for
//! 3 <= n; accuracy degrades above n = 5000.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use super::{StatError, StatResult};

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

const SMALL: f64 = 1e-19;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapiroWilk {
    pub w: f64,
    pub p_value: f64,
}

/// `c[0] + c[1]*x + c[2]*x^2 + ...`
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &k| acc * x + k)
}

fn standard_normal() -> StatResult<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| StatError::Distribution(e.to_string()))
}

pub fn shapiro_wilk(sample: &[f64]) -> StatResult<ShapiroWilk> {
    let n = sample.len();
    if n < 3 {
        return Err(StatError::TooFewObservations { needed: 3, got: n });
    }
    if sample.iter().any(|v| !v.is_finite()) {
        return Err(StatError::NonFinite("sample value"));
    }

    let mut x = sample.to_vec();
    x.sort_by(f64::total_cmp);
    let range = x[n - 1] - x[0];
    if range < SMALL {
        return Err(StatError::ConstantInput);
    }

    let a = coefficients(n)?;
    let w = statistic(&x, &a);
    let p_value = p_value(w, n)?;
    Ok(ShapiroWilk { w, p_value })
}

/// Antisymmetric weights `a[0..n/2]` for the lowest order statistics
/// (stored positive; the mirrored upper half uses the same magnitudes).
fn coefficients(n: usize) -> StatResult<Vec<f64>> {
    let nn2 = n / 2;
    if n == 3 {
        return Ok(vec![std::f64::consts::FRAC_1_SQRT_2]);
    }

    let normal = standard_normal()?;
    let an = n as f64;
    let m: Vec<f64> = (1..=nn2)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let mut a = vec![0.0; nn2];
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    a[0] = a1;

    let (first_plain, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        (1, fac)
    };
    if !fac.is_finite() || fac == 0.0 {
        return Err(StatError::NonFinite("coefficient normalizer"));
    }
    for i in first_plain..nn2 {
        a[i] = -m[i] / fac;
    }
    Ok(a)
}

fn statistic(sorted: &[f64], a: &[f64]) -> f64 {
    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let ssq: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
    let b: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (sorted[n - 1 - i] - sorted[i]))
        .sum();
    (b * b / ssq).min(1.0)
}

fn p_value(w: f64, n: usize) -> StatResult<f64> {
    if n == 3 {
        // exact distribution for n = 3
        let pi6 = 6.0 / std::f64::consts::PI;
        let stqr = std::f64::consts::FRAC_PI_3;
        return Ok((pi6 * (w.sqrt().asin() - stqr)).clamp(0.0, 1.0));
    }

    let an = n as f64;
    let mut y = (1.0 - w).ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return Ok(1e-99);
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };
    if !y.is_finite() {
        // W == 1: a perfect fit
        return Ok(1.0);
    }
    let z = (y - m) / s;
    Ok(1.0 - standard_normal()?.cdf(z))
}
