//! Mean-reversion half-life estimation.
//!
//! Treats the spread as a discretized Ornstein-Uhlenbeck process and
//! regresses spread changes on the lagged level:
//!
//! ```text
//! Δs[t] = alpha + beta * s[t-1] + e[t]
//! ```
//!
//! A negative slope is the mean-reversion speed; the half-life of a
//! deviation is then `-ln(2) / beta` in bar units. A non-negative slope
//! means the spread shows no pull back toward its mean (random-walk-like
//! or explosive), which is an expected outcome, not a failure.

use crate::analytics::error::AnalyticsError;
use crate::analytics::regression::ols;

/// Estimate the half-life of spread deviations in bar units.
///
/// Returns `Ok(None)` when the lag-regression slope is non-negative
/// (no mean reversion to measure). The returned half-life is rounded to
/// 2 decimal places.
///
/// # Errors
/// `DegenerateInput` when the series is too short for the lag regression
/// or the lagged level has zero variance.
pub fn compute_half_life(spread: &[f64]) -> Result<Option<f64>, AnalyticsError> {
    let series: Vec<f64> = spread.iter().copied().filter(|v| v.is_finite()).collect();

    if series.len() < 3 {
        return Err(AnalyticsError::DegenerateInput(format!(
            "half-life estimation needs at least 3 points, got {}",
            series.len()
        )));
    }

    let n = series.len() - 1;
    let mut delta = Vec::with_capacity(n);
    let mut lagged = Vec::with_capacity(n);
    for i in 1..series.len() {
        delta.push(series[i] - series[i - 1]);
        lagged.push(series[i - 1]);
    }

    let fit = ols(&delta, &lagged)?;

    if fit.slope >= 0.0 {
        return Ok(None);
    }

    let half_life = -std::f64::consts::LN_2 / fit.slope;
    Ok(Some((half_life * 100.0).round() / 100.0))
}
