//! Error types for the analytics pipeline.

use thiserror::Error;

/// Errors raised by the statistical pipeline.
///
/// Structural and configuration problems are hard errors; numerical edge
/// cases (short windows, non-mean-reverting spreads) are modeled as absent
/// or partial values instead and never appear here.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Unsupported parameter value (e.g. unknown resample interval,
    /// exit threshold >= entry threshold)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input that makes a computation degenerate (zero-variance regressor,
    /// aligned frame with fewer than 2 rows)
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Fewer data points than the computation requires
    #[error("Insufficient data: expected at least {expected} data points, got {actual}")]
    InsufficientData { expected: usize, actual: usize },
}
