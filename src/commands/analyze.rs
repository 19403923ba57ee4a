//! Pair analytics command handler.
//!
//! Fetches a snapshot of stored ticks for both legs, resamples, runs the
//! statistical pipeline and prints the metrics and interpretation. In
//! watch mode the command re-runs on a timer, memoizing pipeline output
//! per (snapshot, parameters) with a short TTL so unchanged data is not
//! recomputed.

use crate::analytics::{
    resample, run_pipeline, AnalyticsError, AnalyticsTable, Interval, PipelineOutput,
    PipelineParams,
};
use crate::cache::TtlCache;
use crate::storage::{StoreError, TickStore};
use crate::types::Bar;
use std::time::Duration;
use tracing::{info, warn};

/// TTL for memoized pipeline runs in watch mode, matching the refresh
/// cadence of a live dashboard.
const CACHE_TTL: Duration = Duration::from_secs(5);

/// Validated configuration for the analyze command.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub instrument_a: String,
    pub instrument_b: String,
    pub interval: Interval,
    pub window: usize,
    pub entry_threshold: f64,
    pub exit_threshold: f64,
    pub data_dir: String,
    /// Optional CSV export path for the analytics table.
    pub export_path: Option<String>,
    /// Re-run every N seconds instead of once.
    pub watch_secs: Option<u64>,
}

impl AnalyzeConfig {
    /// Enforce the recognized parameter ranges before any computation.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !(10..=200).contains(&self.window) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "rolling window must be in [10, 200], got {}",
                self.window
            )));
        }
        if !(1.0..=3.0).contains(&self.entry_threshold) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "entry threshold must be in [1.0, 3.0], got {}",
                self.entry_threshold
            )));
        }
        if !(self.exit_threshold >= 0.0 && self.exit_threshold < self.entry_threshold) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "exit threshold must satisfy 0 <= exit < entry, got {}",
                self.exit_threshold
            )));
        }
        Ok(())
    }

    fn params(&self) -> PipelineParams {
        PipelineParams {
            window: self.window,
            entry_threshold: self.entry_threshold,
            exit_threshold: self.exit_threshold,
        }
    }
}

/// Identity of one fetched snapshot plus the parameters that shape the
/// pipeline output. Equal keys mean the cached output is still valid.
type SnapshotKey = (usize, i64, usize, i64, usize);

/// Run the analyze command.
pub async fn run_analyze(config: AnalyzeConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let store = TickStore::open(&config.data_dir)?;

    let mut cache: TtlCache<SnapshotKey, Result<PipelineOutput, String>> =
        TtlCache::new(CACHE_TTL);

    match config.watch_secs {
        None => analyze_once(&store, &config, &mut cache)?,
        Some(secs) => {
            let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
            loop {
                ticker.tick().await;
                analyze_once(&store, &config, &mut cache)?;
            }
        }
    }

    Ok(())
}

fn analyze_once(
    store: &TickStore,
    config: &AnalyzeConfig,
    cache: &mut TtlCache<SnapshotKey, Result<PipelineOutput, String>>,
) -> Result<(), Box<dyn std::error::Error>> {
    // An instrument with no file yet is the same situation as too few
    // ticks: ingestion has not caught up, so report and try again later
    let ticks_a = match store.fetch(&config.instrument_a, None, None) {
        Ok(ticks) => ticks,
        Err(StoreError::UnknownInstrument(instrument)) => {
            warn!(instrument = %instrument, "No ticks recorded yet");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let ticks_b = match store.fetch(&config.instrument_b, None, None) {
        Ok(ticks) => ticks,
        Err(StoreError::UnknownInstrument(instrument)) => {
            warn!(instrument = %instrument, "No ticks recorded yet");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // Not enough raw data yet for the rolling window: report and bail out
    // before the pipeline rather than producing all-undefined statistics
    if ticks_a.len() < config.window || ticks_b.len() < config.window {
        warn!(
            ticks_a = ticks_a.len(),
            ticks_b = ticks_b.len(),
            window = config.window,
            "Collecting data, not enough ticks for the rolling window yet"
        );
        return Ok(());
    }

    let bars_a = resample(&ticks_a, config.interval);
    let bars_b = resample(&ticks_b, config.interval);

    let key: SnapshotKey = (
        bars_a.len(),
        bars_a.last().map(|b| b.timestamp.timestamp()).unwrap_or(0),
        bars_b.len(),
        bars_b.last().map(|b| b.timestamp.timestamp()).unwrap_or(0),
        config.window,
    );

    let output = cache.get_or_insert_with(key, || {
        run_pipeline(&bars_a, &bars_b, &config.params()).map_err(|e| e.to_string())
    });

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "Pipeline failed on current snapshot");
            return Ok(());
        }
    };

    print_report(config, &bars_a, &bars_b, &output);

    if let Some(path) = &config.export_path {
        let table = AnalyticsTable::from_output(&output);
        std::fs::write(path, table.to_csv())?;
        info!(path = path, rows = table.timestamps.len(), "Analytics table exported");
    }

    Ok(())
}

fn print_report(config: &AnalyzeConfig, bars_a: &[Bar], bars_b: &[Bar], output: &PipelineOutput) {
    let latest_z = output.zscore.last().copied().flatten();
    let latest_corr = output.correlation.last().copied().flatten();

    println!(
        "\n--- Pair Analytics: {} / {} ({} bars) ---",
        config.instrument_a, config.instrument_b, config.interval
    );
    println!(
        "Bars: {} / {}  Aligned: {}",
        bars_a.len(),
        bars_b.len(),
        output.frame.len()
    );
    println!(
        "Hedge Ratio (beta): {:.4}  (alpha: {:.4})",
        output.hedge_ratio.beta, output.hedge_ratio.alpha
    );
    match latest_z {
        Some(z) => println!("Latest Z-Score:     {:.2}", z),
        None => println!("Latest Z-Score:     n/a"),
    }
    match latest_corr {
        Some(c) => println!("Latest Correlation: {:.2}", c),
        None => println!("Latest Correlation: n/a"),
    }

    println!("\nInterpretation:");
    match latest_z {
        Some(z) if z.abs() >= config.entry_threshold => println!(
            "  - Spread deviation is statistically significant (|Z| >= {})",
            config.entry_threshold
        ),
        _ => println!("  - Spread deviation is within normal range"),
    }
    match latest_corr {
        Some(c) if c < 0.5 => {
            println!("  - Correlation is weak, hedge reliability may be reduced")
        }
        Some(_) => println!("  - Correlation remains strong, pair relationship intact"),
        None => println!("  - Correlation unavailable for the current window"),
    }
    let adf = &output.stationarity;
    if adf.p_value < 0.05 {
        println!(
            "  - Spread appears stationary (ADF statistic {:.2}, p-value {:.4})",
            adf.statistic, adf.p_value
        );
    } else {
        println!(
            "  - No strong evidence of stationarity (ADF p-value {:.4})",
            adf.p_value
        );
    }
    match output.half_life {
        Some(hl) => println!("  - Deviations decay with a half-life of {:.2} bars", hl),
        None => println!("  - Spread is not mean-reverting, no half-life estimate"),
    }

    println!(
        "\nBacktest (entry {}, exit {}): net PnL {:.4} over {} bars",
        config.entry_threshold,
        config.exit_threshold,
        output.backtest.net_pnl(),
        output.backtest.rows.len()
    );

    if let Some(z) = latest_z {
        if z.abs() >= config.entry_threshold {
            println!(
                "\nALERT: Z-Score crossed +/-{} (current {:.2})",
                config.entry_threshold, z
            );
        }
    }
}
