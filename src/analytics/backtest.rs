//! Threshold mean-reversion backtest.
//!
//! Replays the spread and z-score series through a simple entry/exit
//! state machine and accrues mark-to-market PnL in spread units. No
//! position sizing, leverage or transaction costs are modeled.

use crate::analytics::error::AnalyticsError;

/// Direction of the spread position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Flat,
    /// Long the spread (entered when the z-score was below -entry).
    Long,
    /// Short the spread (entered when the z-score was above +entry).
    Short,
}

impl Position {
    /// Sign used to scale spread changes into PnL.
    pub fn sign(&self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
            Position::Short => -1.0,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Flat => write!(f, "flat"),
            Position::Long => write!(f, "long"),
            Position::Short => write!(f, "short"),
        }
    }
}

/// One simulated bar of the backtest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestRow {
    pub spread: f64,
    pub zscore: Option<f64>,
    pub position: Position,
    pub pnl: f64,
}

/// Full backtest output: one row per bar from the second aligned bar
/// onward (the first bar has no prior spread to mark against), plus the
/// running PnL sum.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub rows: Vec<BacktestRow>,
    /// Running sum of per-bar PnL, index-aligned with `rows`.
    pub cumulative_pnl: Vec<f64>,
}

impl BacktestReport {
    /// Total PnL over the simulation.
    pub fn net_pnl(&self) -> f64 {
        self.cumulative_pnl.last().copied().unwrap_or(0.0)
    }
}

/// Simulate the threshold strategy over paired (spread, z-score) series.
///
/// State transitions, evaluated once per bar:
/// - flat: `z > entry` opens a short, `z < -entry` opens a long
/// - positioned: `|z| < exit` closes to flat; no flips, no re-entry
///   while positioned
///
/// Undefined z-scores (warm-up region, zero-deviation windows) trigger no
/// transition. PnL for a bar uses the position after evaluating that
/// bar's z-score, so an entry bar is marked on its own spread move; this
/// mirrors the behavior of the original research model and is a
/// deliberate modeling choice rather than a conservative fill assumption.
///
/// # Errors
/// `InvalidParameter` unless `entry > exit >= 0` and the two series have
/// equal length.
pub fn run_backtest(
    spread: &[f64],
    zscore: &[Option<f64>],
    entry: f64,
    exit: f64,
) -> Result<BacktestReport, AnalyticsError> {
    if !(entry > exit && exit >= 0.0) {
        return Err(AnalyticsError::InvalidParameter(format!(
            "thresholds must satisfy entry > exit >= 0, got entry={}, exit={}",
            entry, exit
        )));
    }
    if spread.len() != zscore.len() {
        return Err(AnalyticsError::InvalidParameter(format!(
            "spread and zscore series differ in length: {} vs {}",
            spread.len(),
            zscore.len()
        )));
    }

    let mut position = Position::Flat;
    let mut rows = Vec::with_capacity(spread.len().saturating_sub(1));
    let mut cumulative_pnl = Vec::with_capacity(spread.len().saturating_sub(1));
    let mut running = 0.0;

    for i in 1..spread.len() {
        if let Some(z) = zscore[i] {
            position = match position {
                Position::Flat if z > entry => Position::Short,
                Position::Flat if z < -entry => Position::Long,
                Position::Flat => Position::Flat,
                current if z.abs() < exit => {
                    debug_assert!(current != Position::Flat);
                    Position::Flat
                }
                current => current,
            };
        }

        let pnl = position.sign() * (spread[i] - spread[i - 1]);
        running += pnl;

        rows.push(BacktestRow {
            spread: spread[i],
            zscore: zscore[i],
            position,
            pnl,
        });
        cumulative_pnl.push(running);
    }

    Ok(BacktestReport {
        rows,
        cumulative_pnl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|&v| Some(v)).collect()
    }

    #[test]
    fn test_short_entry_and_exit_sequence() {
        // zscore crosses +entry, holds, then decays inside the exit band
        let spread = vec![0.0, 0.0, 0.0, 0.0];
        let zscore = z(&[0.0, 2.5, 2.5, 0.3]);

        let report = run_backtest(&spread, &zscore, 2.0, 0.5).unwrap();
        let positions: Vec<Position> = report.rows.iter().map(|r| r.position).collect();
        assert_eq!(
            positions,
            vec![Position::Short, Position::Short, Position::Flat]
        );
        // Spread never moves, so no PnL anywhere
        assert!(report.rows.iter().all(|r| r.pnl == 0.0));
        assert_eq!(report.net_pnl(), 0.0);
    }

    #[test]
    fn test_long_entry_on_negative_deviation() {
        let spread = vec![10.0, 9.0, 9.5, 10.0];
        let zscore = z(&[0.0, -2.5, -1.0, 0.1]);

        let report = run_backtest(&spread, &zscore, 2.0, 0.5).unwrap();
        assert_eq!(report.rows[0].position, Position::Long);
        // Entry bar is marked on its own move: 1 * (9.0 - 10.0)
        assert_eq!(report.rows[0].pnl, -1.0);
        assert_eq!(report.rows[1].position, Position::Long);
        assert_eq!(report.rows[1].pnl, 0.5);
        // |0.1| < 0.5 closes the position; flat bars earn nothing
        assert_eq!(report.rows[2].position, Position::Flat);
        assert_eq!(report.rows[2].pnl, 0.0);
        assert!((report.net_pnl() - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_no_flip_while_positioned() {
        // z-score swings from +3 to -3 without entering the exit band:
        // the short must be held, never flipped to long
        let spread = vec![0.0; 5];
        let zscore = z(&[0.0, 3.0, -3.0, -3.0, 0.2]);

        let report = run_backtest(&spread, &zscore, 2.0, 0.5).unwrap();
        let positions: Vec<Position> = report.rows.iter().map(|r| r.position).collect();
        assert_eq!(
            positions,
            vec![
                Position::Short,
                Position::Short,
                Position::Short,
                Position::Flat
            ]
        );
    }

    #[test]
    fn test_undefined_zscore_holds_state() {
        let spread = vec![1.0, 2.0, 3.0, 4.0];
        let zscore = vec![None, Some(2.5), None, None];

        let report = run_backtest(&spread, &zscore, 2.0, 0.5).unwrap();
        // Short entered at bar 1 is held through the undefined region
        assert!(report.rows.iter().all(|r| r.position == Position::Short));
        assert_eq!(report.rows[1].pnl, -1.0);
        assert_eq!(report.net_pnl(), -3.0);
    }

    #[test]
    fn test_row_count_is_len_minus_one() {
        let spread = vec![0.0; 10];
        let zscore = vec![None; 10];
        let report = run_backtest(&spread, &zscore, 2.0, 0.5).unwrap();
        assert_eq!(report.rows.len(), 9);
        assert_eq!(report.cumulative_pnl.len(), 9);
    }

    #[test]
    fn test_deterministic() {
        let spread: Vec<f64> = (0..50).map(|i| ((i * 7) % 13) as f64 - 6.0).collect();
        let zscore: Vec<Option<f64>> = (0..50)
            .map(|i| Some(((i * 11) % 9) as f64 - 4.0))
            .collect();

        let first = run_backtest(&spread, &zscore, 2.0, 0.5).unwrap();
        let second = run_backtest(&spread, &zscore, 2.0, 0.5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_thresholds() {
        let spread = vec![0.0; 4];
        let zscore = vec![None; 4];
        assert!(run_backtest(&spread, &zscore, 0.5, 2.0).is_err());
        assert!(run_backtest(&spread, &zscore, 2.0, 2.0).is_err());
        assert!(run_backtest(&spread, &zscore, 2.0, -0.1).is_err());
    }

    #[test]
    fn test_empty_series() {
        let report = run_backtest(&[], &[], 2.0, 0.5).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.net_pnl(), 0.0);
    }
}
