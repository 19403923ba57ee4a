//! Rolling Pearson correlation between the two price legs.
//!
//! Follows the same windowing rule as the z-score: positions before the
//! window fills are undefined, never defaulted to zero.

use crate::analytics::align::AlignedPairFrame;

/// Pearson correlation over a full slice.
///
/// Returns `None` when either side has zero variance or the result is not
/// finite.
fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }

    let correlation = covariance / (var_a.sqrt() * var_b.sqrt());
    correlation.is_finite().then_some(correlation)
}

/// Rolling Pearson correlation of `price_a` against `price_b`.
///
/// Output is index-aligned with the frame; the first `window - 1`
/// positions are `None`.
pub fn compute_rolling_correlation(frame: &AlignedPairFrame, window: usize) -> Vec<Option<f64>> {
    let len = frame.len();
    let mut correlations = vec![None; len];
    if window < 2 || len < window {
        return correlations;
    }

    for i in (window - 1)..len {
        let start = i + 1 - window;
        correlations[i] = pearson(&frame.price_a[start..=i], &frame.price_b[start..=i]);
    }

    correlations
}
