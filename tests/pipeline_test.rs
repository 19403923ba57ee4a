//! End-to-end tests: tick store -> resampling -> analytics pipeline ->
//! export.

use chrono::{TimeZone, Utc};
use pairscope::analytics::{
    resample, run_backtest, run_pipeline, AnalyticsError, AnalyticsTable, Interval,
    PipelineParams, Position,
};
use pairscope::storage::TickStore;
use pairscope::types::Observation;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn observation(secs: i64, price: f64, quantity: f64) -> Observation {
    Observation {
        timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        price,
        quantity,
    }
}

/// Deterministic pseudo-random step in [-0.5, 0.5).
fn noise(i: usize, salt: usize) -> f64 {
    (((i * 2654435761) ^ (salt * 40503)) % 1000) as f64 / 1000.0 - 0.5
}

fn params(window: usize) -> PipelineParams {
    PipelineParams {
        window,
        entry_threshold: 2.0,
        exit_threshold: 0.5,
    }
}

#[test]
fn store_to_pipeline_round_trip() {
    let dir = tempdir().unwrap();
    let store = TickStore::open(dir.path()).unwrap();

    // Cointegrated pair sampled every 20 seconds over ~100 minutes
    let mut level: f64 = 2000.0;
    for i in 0..300usize {
        let ts = i as i64 * 20;
        level += noise(i, 1);
        let spread_noise = 0.5 * noise(i, 2);
        store
            .append("ethusdt", &observation(ts, level, 0.1))
            .unwrap();
        store
            .append("btcusdt", &observation(ts, 20.0 * level + 100.0 + spread_noise, 0.1))
            .unwrap();
    }

    let ticks_a = store.fetch("btcusdt", None, None).unwrap();
    let ticks_b = store.fetch("ethusdt", None, None).unwrap();
    assert_eq!(ticks_a.len(), 300);

    let bars_a = resample(&ticks_a, Interval::OneMinute);
    let bars_b = resample(&ticks_b, Interval::OneMinute);
    assert_eq!(bars_a.len(), 100); // 3 ticks per minute, no gaps

    let output = run_pipeline(&bars_a, &bars_b, &params(10)).unwrap();

    assert_eq!(output.frame.len(), 100);
    assert!(
        (output.hedge_ratio.beta - 20.0).abs() < 0.5,
        "beta = {}",
        output.hedge_ratio.beta
    );
    // Mean-reverting spread noise: stationarity should be detected
    assert!(output.stationarity.p_value < 0.05);
    assert!(output.half_life.is_some());

    // Export one row per aligned timestamp plus a header
    let table = AnalyticsTable::from_output(&output);
    let csv = table.to_csv();
    assert_eq!(csv.lines().count(), 101);
    assert!(csv.starts_with("timestamp,spread,zscore,correlation\n"));
}

#[test]
fn insufficient_ticks_detected_before_rolling_statistics() {
    let dir = tempdir().unwrap();
    let store = TickStore::open(dir.path()).unwrap();

    for i in 0..5i64 {
        store
            .append("btcusdt", &observation(i * 60, 100.0 + i as f64, 1.0))
            .unwrap();
    }

    // Caller-side guard: fewer rows than the window
    let window = 30;
    let ticks = store.fetch("btcusdt", None, None).unwrap();
    assert!(ticks.len() < window);

    let err = AnalyticsError::InsufficientData {
        expected: window,
        actual: ticks.len(),
    };
    assert!(err.to_string().contains("expected at least 30"));
}

#[test]
fn backtest_concrete_scenario() {
    // spread never moves, zscore crosses entry then decays into the exit
    // band: positions short, short, flat and zero PnL throughout
    let spread = vec![0.0, 0.0, 0.0, 0.0];
    let zscore = vec![Some(0.0), Some(2.5), Some(2.5), Some(0.3)];

    let report = run_backtest(&spread, &zscore, 2.0, 0.5).unwrap();
    let positions: Vec<Position> = report.rows.iter().map(|r| r.position).collect();
    assert_eq!(
        positions,
        vec![Position::Short, Position::Short, Position::Flat]
    );
    assert_eq!(report.cumulative_pnl, vec![0.0, 0.0, 0.0]);
}

#[test]
fn pipeline_rejects_unknown_interval_before_compute() {
    let err = "2h".parse::<Interval>().unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
}

#[test]
fn aligned_frame_skips_missing_bars() {
    let dir = tempdir().unwrap();
    let store = TickStore::open(dir.path()).unwrap();

    // Leg a trades every minute; leg b misses minutes 3..6
    for i in 0..10i64 {
        store
            .append("aaa", &observation(i * 60, 10.0 + i as f64, 1.0))
            .unwrap();
        if !(3..6).contains(&i) {
            store
                .append("bbb", &observation(i * 60, 20.0 + i as f64, 1.0))
                .unwrap();
        }
    }

    let bars_a = resample(&store.fetch("aaa", None, None).unwrap(), Interval::OneMinute);
    let bars_b = resample(&store.fetch("bbb", None, None).unwrap(), Interval::OneMinute);
    assert_eq!(bars_a.len(), 10);
    assert_eq!(bars_b.len(), 7);

    let frame = pairscope::analytics::align_pairs(&bars_a, &bars_b);
    assert_eq!(frame.len(), 7);
    assert!(frame.len() <= bars_a.len().min(bars_b.len()));
}
