//! Spread construction and rolling z-score.
//!
//! The spread is the pointwise linear combination `price_a - beta * price_b`
//! over the aligned frame. The z-score measures how far the current spread
//! sits from its trailing-window mean, in units of the trailing-window
//! sample standard deviation.

use crate::analytics::align::AlignedPairFrame;

/// Compute the spread series `price_a - beta * price_b`.
///
/// Pure pointwise arithmetic; NaN inputs propagate.
pub fn compute_spread(frame: &AlignedPairFrame, beta: f64) -> Vec<f64> {
    frame
        .price_a
        .iter()
        .zip(frame.price_b.iter())
        .map(|(a, b)| a - beta * b)
        .collect()
}

/// Rolling z-score of the spread over a trailing window.
///
/// Output is index-aligned with the input: the first `window - 1` positions
/// are `None` (not enough history), as is any position where the trailing
/// standard deviation is zero. Uses the sample (n-1) standard deviation.
pub fn compute_zscore(spread: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut zscores = vec![None; spread.len()];
    if window < 2 || spread.len() < window {
        return zscores;
    }

    for i in (window - 1)..spread.len() {
        let slice = &spread[i + 1 - window..=i];
        let n = window as f64;
        let mean = slice.iter().sum::<f64>() / n;
        let variance = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = variance.sqrt();

        if std_dev > 0.0 && std_dev.is_finite() {
            let z = (spread[i] - mean) / std_dev;
            if z.is_finite() {
                zscores[i] = Some(z);
            }
        }
    }

    zscores
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn frame_from(price_a: Vec<f64>, price_b: Vec<f64>) -> AlignedPairFrame {
        let timestamps = (0..price_a.len() as i64)
            .map(|i| Utc.timestamp_opt(i * 60, 0).unwrap())
            .collect();
        AlignedPairFrame {
            timestamps,
            price_a,
            price_b,
        }
    }

    #[test]
    fn test_spread_is_pointwise() {
        let frame = frame_from(vec![10.0, 12.0, 14.0], vec![4.0, 5.0, 6.0]);
        let spread = compute_spread(&frame, 2.0);
        assert_eq!(spread, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_spread_zero_for_exact_relationship() {
        let price_b = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let price_a: Vec<f64> = price_b.iter().map(|p| 2.0 * p).collect();
        let spread = compute_spread(&frame_from(price_a, price_b), 2.0);
        assert!(spread.iter().all(|s| s.abs() < 1e-12));
    }

    #[test]
    fn test_zscore_warmup_region_is_none() {
        let spread: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let z = compute_zscore(&spread, 5);
        assert_eq!(z.len(), spread.len());
        assert!(z[..4].iter().all(|v| v.is_none()));
        assert!(z[4..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_zscore_matches_direct_computation() {
        // Fixed 10-element series, window of 4; verify one position by hand
        let spread = vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 8.0, 7.0, 9.0, 10.0];
        let window = 4;
        let z = compute_zscore(&spread, window);

        // Position 5: window covers [2.0, 5.0, 4.0, 6.0]
        let slice = &spread[2..6];
        let mean: f64 = slice.iter().sum::<f64>() / 4.0;
        let var: f64 = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 3.0;
        let expected = (spread[5] - mean) / var.sqrt();

        let got = z[5].unwrap();
        assert!((got - expected).abs() < 1e-12, "{} vs {}", got, expected);
    }

    #[test]
    fn test_zscore_zero_std_is_none() {
        let spread = vec![5.0, 5.0, 5.0, 5.0, 5.0, 6.0];
        let z = compute_zscore(&spread, 5);
        // Window over the five constant values has zero deviation
        assert_eq!(z[4], None);
        // Final window contains the jump, so the z-score is defined
        assert!(z[5].is_some());
    }

    #[test]
    fn test_zscore_series_shorter_than_window() {
        let spread = vec![1.0, 2.0, 3.0];
        let z = compute_zscore(&spread, 10);
        assert_eq!(z.len(), 3);
        assert!(z.iter().all(|v| v.is_none()));
    }
}
