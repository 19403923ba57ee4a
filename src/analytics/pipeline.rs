//! End-to-end analytics pipeline.
//!
//! Wires the stages together over a point-in-time snapshot of bar data:
//! align, hedge-ratio fit, spread, rolling statistics, stationarity test,
//! half-life estimate and threshold backtest. Every invocation recomputes
//! from scratch; the pipeline performs no I/O and holds no state, so
//! callers are free to memoize results externally.

use crate::analytics::align::{align_pairs, AlignedPairFrame};
use crate::analytics::backtest::{run_backtest, BacktestReport};
use crate::analytics::correlation::compute_rolling_correlation;
use crate::analytics::error::AnalyticsError;
use crate::analytics::halflife::compute_half_life;
use crate::analytics::regression::{compute_hedge_ratio, HedgeRatio};
use crate::analytics::spread::{compute_spread, compute_zscore};
use crate::analytics::stationarity::{adf_test, AdfResult};
use crate::types::Bar;
use tracing::debug;

/// Caller-supplied knobs for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineParams {
    /// Rolling window for the z-score and correlation, in bars.
    pub window: usize,
    /// Z-score magnitude that opens a position.
    pub entry_threshold: f64,
    /// Z-score magnitude that closes a position (must be < entry).
    pub exit_threshold: f64,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub frame: AlignedPairFrame,
    pub hedge_ratio: HedgeRatio,
    pub spread: Vec<f64>,
    pub zscore: Vec<Option<f64>>,
    pub correlation: Vec<Option<f64>>,
    pub stationarity: AdfResult,
    /// Mean-reversion half-life in bar units; `None` when the spread shows
    /// no mean reversion.
    pub half_life: Option<f64>,
    pub backtest: BacktestReport,
}

/// Run the full statistical pipeline over two bar series.
///
/// Configuration problems (`window < 2`, `exit >= entry`) surface before
/// any computation; a degenerate aligned frame (fewer than 2 shared
/// timestamps, zero-variance leg) fails in the stage that detects it.
/// Short data relative to the window is soft: rolling outputs simply
/// carry undefined leading entries.
pub fn run_pipeline(
    bars_a: &[Bar],
    bars_b: &[Bar],
    params: &PipelineParams,
) -> Result<PipelineOutput, AnalyticsError> {
    if params.window < 2 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "rolling window must be at least 2, got {}",
            params.window
        )));
    }
    if !(params.entry_threshold > params.exit_threshold && params.exit_threshold >= 0.0) {
        return Err(AnalyticsError::InvalidParameter(format!(
            "thresholds must satisfy entry > exit >= 0, got entry={}, exit={}",
            params.entry_threshold, params.exit_threshold
        )));
    }

    let frame = align_pairs(bars_a, bars_b);
    if frame.len() < 2 {
        return Err(AnalyticsError::DegenerateInput(format!(
            "aligned frame has {} shared timestamps, need at least 2",
            frame.len()
        )));
    }

    debug!(
        bars_a = bars_a.len(),
        bars_b = bars_b.len(),
        aligned = frame.len(),
        "Aligned pair frame"
    );

    let hedge_ratio = compute_hedge_ratio(&frame)?;
    let spread = compute_spread(&frame, hedge_ratio.beta);
    let zscore = compute_zscore(&spread, params.window);
    let correlation = compute_rolling_correlation(&frame, params.window);
    let stationarity = adf_test(&spread)?;
    let half_life = compute_half_life(&spread)?;
    let backtest = run_backtest(
        &spread,
        &zscore,
        params.entry_threshold,
        params.exit_threshold,
    )?;

    debug!(
        beta = hedge_ratio.beta,
        adf = stationarity.statistic,
        half_life = ?half_life,
        "Pipeline complete"
    );

    Ok(PipelineOutput {
        frame,
        hedge_ratio,
        spread,
        zscore,
        correlation,
        stationarity,
        half_life,
        backtest,
    })
}
