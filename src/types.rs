//! Common Types Module
//!
//! Shared types used across the codebase to avoid circular dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single raw trade observation for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Event time of the trade.
    pub timestamp: DateTime<Utc>,
    /// Traded price.
    pub price: f64,
    /// Traded quantity.
    pub quantity: f64,
}

/// A fixed-interval bar aggregated from raw observations.
///
/// `price` is the last observed price inside the interval, `quantity`
/// the sum of traded quantities. Intervals with no observations produce
/// no bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Start of the interval the bar covers (exact interval boundary).
    pub timestamp: DateTime<Utc>,
    /// Last trade price within the interval.
    pub price: f64,
    /// Total traded quantity within the interval.
    pub quantity: f64,
}
