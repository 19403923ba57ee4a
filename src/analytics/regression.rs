//! Hedge ratio estimation via ordinary least squares.
//!
//! Fits `price_a = alpha + beta * price_b` over the full aligned frame.
//! The fit is a point estimate recomputed from scratch on every call, not
//! an incremental or rolling estimate. The OLS helper is shared with the
//! stationarity and half-life stages, which run the same regression on
//! differenced spread data.

use crate::analytics::align::AlignedPairFrame;
use crate::analytics::error::AnalyticsError;

/// Slope and intercept of the pair relationship.
///
/// `beta` scales the second leg so that `price_a - beta * price_b` is a
/// candidate stationary spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HedgeRatio {
    pub beta: f64,
    pub alpha: f64,
}

/// Full result of a simple linear regression `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OlsFit {
    pub slope: f64,
    pub intercept: f64,
    /// Standard error of the slope; NaN when there are no residual
    /// degrees of freedom (n == 2).
    pub se_slope: f64,
}

/// Ordinary least squares of `y` on `[1, x]`.
///
/// Computed on centered sums for numerical stability. Fails with
/// `DegenerateInput` when fewer than 2 points are supplied or when `x`
/// has zero variance (singular design matrix).
pub(crate) fn ols(y: &[f64], x: &[f64]) -> Result<OlsFit, AnalyticsError> {
    debug_assert_eq!(y.len(), x.len());

    let n = y.len();
    if n < 2 {
        return Err(AnalyticsError::DegenerateInput(format!(
            "regression needs at least 2 points, got {}",
            n
        )));
    }

    let n_f = n as f64;
    let mean_x = x.iter().sum::<f64>() / n_f;
    let mean_y = y.iter().sum::<f64>() / n_f;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }

    if sxx.abs() < f64::EPSILON {
        return Err(AnalyticsError::DegenerateInput(
            "regressor has zero variance".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    // Residual variance with n - 2 degrees of freedom (slope + intercept)
    let se_slope = if n > 2 {
        let sse: f64 = x
            .iter()
            .zip(y.iter())
            .map(|(xi, yi)| {
                let residual = yi - (intercept + slope * xi);
                residual * residual
            })
            .sum();
        (sse / (n_f - 2.0) / sxx).sqrt()
    } else {
        f64::NAN
    };

    Ok(OlsFit {
        slope,
        intercept,
        se_slope,
    })
}

/// Estimate the hedge ratio by regressing `price_a` on `price_b`.
///
/// # Errors
/// `DegenerateInput` when the frame has fewer than 2 rows or `price_b`
/// has zero variance.
pub fn compute_hedge_ratio(frame: &AlignedPairFrame) -> Result<HedgeRatio, AnalyticsError> {
    let fit = ols(&frame.price_a, &frame.price_b)?;
    Ok(HedgeRatio {
        beta: fit.slope,
        alpha: fit.intercept,
    })
}
