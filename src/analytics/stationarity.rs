//! Dickey-Fuller unit-root test for spread stationarity.
//!
//! Tests whether the spread is mean-reverting by regressing first
//! differences on the lagged level with a constant term:
//!
//! ```text
//! Δy[t] = alpha + gamma * y[t-1] + e[t]
//! ```
//!
//! Under the unit-root null the spread is a random walk (gamma = 0); a
//! significantly negative t-statistic on gamma is evidence of mean
//! reversion. The t-statistic does not follow a Student distribution under
//! the null, so the p-value comes from MacKinnon's (1994) approximate
//! asymptotic regression surface and the critical values from the
//! MacKinnon (2010) finite-sample response surface, both for the
//! constant-only case.

use crate::analytics::error::AnalyticsError;
use crate::analytics::regression::ols;
use statrs::distribution::{ContinuousCDF, Normal};

/// Minimum series length: the difference regression needs at least one
/// residual degree of freedom.
const MIN_SAMPLES: usize = 4;

/// Distribution bounds for the MacKinnon (1994) p-value surface,
/// constant-only regression.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;

/// Polynomial in tau mapped through the standard normal CDF, left branch
/// (tau <= TAU_STAR).
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];

/// Right branch (tau > TAU_STAR).
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// MacKinnon (2010) response-surface coefficients for the 1%, 5% and 10%
/// critical values: crit = b0 + b1/n + b2/n^2 + b3/n^3.
const CRIT_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Test-statistic thresholds at the standard significance levels,
/// adjusted for sample size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
    pub one_percent: f64,
    pub five_percent: f64,
    pub ten_percent: f64,
}

/// Outcome of the unit-root test.
///
/// A p-value below 0.05 is conventionally read as evidence of
/// stationarity; that interpretation belongs to the caller, not to this
/// component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    /// The t-statistic on the lagged level (more negative = more
    /// stationary).
    pub statistic: f64,
    /// Approximate asymptotic p-value under the unit-root null.
    pub p_value: f64,
    /// Critical values at the 1%, 5% and 10% levels.
    pub critical_values: CriticalValues,
}

fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * x + c)
}

/// MacKinnon (1994) approximate p-value for the constant-only
/// Dickey-Fuller distribution.
fn mackinnon_p_value(tau: f64) -> f64 {
    if tau > TAU_MAX {
        return 1.0;
    }
    if tau < TAU_MIN {
        return 0.0;
    }

    let fitted = if tau <= TAU_STAR {
        polyval(&TAU_SMALL_P, tau)
    } else {
        polyval(&TAU_LARGE_P, tau)
    };

    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.cdf(fitted),
        // Unreachable with unit parameters
        Err(_) => f64::NAN,
    }
}

fn critical_value(surface: &[f64; 4], n: f64) -> f64 {
    surface[0] + surface[1] / n + surface[2] / (n * n) + surface[3] / (n * n * n)
}

/// Run the Dickey-Fuller test on a spread series.
///
/// Non-finite entries are dropped before testing. Fails with
/// `DegenerateInput` when the remaining series is too short or has zero
/// variance in the lagged level.
pub fn adf_test(spread: &[f64]) -> Result<AdfResult, AnalyticsError> {
    let series: Vec<f64> = spread.iter().copied().filter(|v| v.is_finite()).collect();

    if series.len() < MIN_SAMPLES {
        return Err(AnalyticsError::DegenerateInput(format!(
            "stationarity test needs at least {} points, got {}",
            MIN_SAMPLES,
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

    if fit.se_slope.abs() < f64::EPSILON || !fit.se_slope.is_finite() {
        return Err(AnalyticsError::DegenerateInput(
            "test regression has zero residual variance".to_string(),
        ));
    }

    let statistic = fit.slope / fit.se_slope;
    let n_f = n as f64;

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        critical_values: CriticalValues {
            one_percent: critical_value(&CRIT_1PCT, n_f),
            five_percent: critical_value(&CRIT_5PCT, n_f),
            ten_percent: critical_value(&CRIT_10PCT, n_f),
        },
    })
}
