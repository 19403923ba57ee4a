//! Statistical-arbitrage analytics pipeline.
//!
//! Pure, synchronous functions over immutable input series: resampling,
//! pair alignment, hedge-ratio regression, spread and rolling statistics,
//! a unit-root stationarity test, half-life estimation and a threshold
//! backtest. No stage performs I/O or mutates another stage's output; the
//! surrounding binary owns storage, ingestion and caching.

pub mod align;
pub mod backtest;
pub mod correlation;
pub mod error;
pub mod export;
pub mod halflife;
pub mod pipeline;
pub mod regression;
pub mod resample;
pub mod spread;
pub mod stationarity;

pub use align::{align_pairs, AlignedPairFrame};
pub use backtest::{run_backtest, BacktestReport, BacktestRow, Position};
pub use correlation::compute_rolling_correlation;
pub use error::AnalyticsError;
pub use export::AnalyticsTable;
pub use halflife::compute_half_life;
pub use pipeline::{run_pipeline, PipelineOutput, PipelineParams};
pub use regression::{compute_hedge_ratio, HedgeRatio};
pub use resample::{resample, Interval};
pub use spread::{compute_spread, compute_zscore};
pub use stationarity::{adf_test, AdfResult, CriticalValues};
