//! Tick resampling into fixed-interval bars.
//!
//! Buckets raw trade observations into non-overlapping, left-closed
//! intervals aligned to the interval period. Within each non-empty bucket
//! the bar price is the last trade and the bar quantity is the sum of
//! traded quantities. Empty buckets produce no bar; there is no synthetic
//! fill or interpolation.

use crate::analytics::error::AnalyticsError;
use crate::types::{Bar, Observation};
use chrono::{DateTime, TimeZone, Utc};
use std::str::FromStr;

/// The closed set of supported resample intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    OneSecond,
    OneMinute,
    FiveMinutes,
}

impl Interval {
    /// Interval period in seconds.
    pub fn as_secs(&self) -> i64 {
        match self {
            Interval::OneSecond => 1,
            Interval::OneMinute => 60,
            Interval::FiveMinutes => 300,
        }
    }

    /// Floor a timestamp to the start of its bucket.
    fn bucket_start(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let secs = self.as_secs();
        let floored = ts.timestamp().div_euclid(secs) * secs;
        // div_euclid keeps the result on an exact boundary for pre-epoch
        // timestamps as well
        Utc.timestamp_opt(floored, 0).unwrap()
    }
}

impl FromStr for Interval {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1s" => Ok(Interval::OneSecond),
            "1m" => Ok(Interval::OneMinute),
            "5m" => Ok(Interval::FiveMinutes),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "unsupported interval '{}', expected one of: 1s, 1m, 5m",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::OneSecond => write!(f, "1s"),
            Interval::OneMinute => write!(f, "1m"),
            Interval::FiveMinutes => write!(f, "5m"),
        }
    }
}

/// Resample raw observations into fixed-interval bars.
///
/// The input may arrive unsorted or with duplicate timestamps; it is
/// normalized with a stable sort so that "last price in bucket" is
/// well-defined. Output bars are ascending by timestamp and every bar
/// timestamp falls on an exact interval boundary.
pub fn resample(observations: &[Observation], interval: Interval) -> Vec<Bar> {
    if observations.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<Observation> = observations.to_vec();
    sorted.sort_by_key(|o| o.timestamp);

    let mut bars: Vec<Bar> = Vec::new();
    let mut current: Option<Bar> = None;

    for obs in &sorted {
        let bucket = interval.bucket_start(obs.timestamp);

        match current.as_mut() {
            Some(bar) if bar.timestamp == bucket => {
                bar.price = obs.price;
                bar.quantity += obs.quantity;
            }
            _ => {
                if let Some(done) = current.take() {
                    bars.push(done);
                }
                current = Some(Bar {
                    timestamp: bucket,
                    price: obs.price,
                    quantity: obs.quantity,
                });
            }
        }
    }

    if let Some(done) = current {
        bars.push(done);
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn obs(secs: i64, price: f64, qty: f64) -> Observation {
        Observation {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            price,
            quantity: qty,
        }
    }

    #[test]
    fn test_interval_parsing() {
        assert_eq!("1s".parse::<Interval>().unwrap(), Interval::OneSecond);
        assert_eq!("1m".parse::<Interval>().unwrap(), Interval::OneMinute);
        assert_eq!("5m".parse::<Interval>().unwrap(), Interval::FiveMinutes);
        assert!("15m".parse::<Interval>().is_err());
        assert!("".parse::<Interval>().is_err());
    }

    #[test]
    fn test_resample_last_price_sum_quantity() {
        // Two observations in the same minute, one in the next
        let observations = vec![
            obs(60, 100.0, 1.0),
            obs(90, 101.0, 2.0),
            obs(120, 102.0, 3.0),
        ];

        let bars = resample(&observations, Interval::OneMinute);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.timestamp(), 60);
        assert_eq!(bars[0].price, 101.0); // last trade wins
        assert_eq!(bars[0].quantity, 3.0); // quantities summed
        assert_eq!(bars[1].timestamp.timestamp(), 120);
        assert_eq!(bars[1].price, 102.0);
    }

    #[test]
    fn test_resample_empty_buckets_omitted() {
        // Gap between minute 1 and minute 5: no synthetic bars in between
        let observations = vec![obs(60, 100.0, 1.0), obs(300, 105.0, 1.0)];
        let bars = resample(&observations, Interval::OneMinute);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.timestamp(), 60);
        assert_eq!(bars[1].timestamp.timestamp(), 300);
    }

    #[test]
    fn test_resample_unsorted_input() {
        let observations = vec![
            obs(90, 101.0, 2.0),
            obs(60, 100.0, 1.0),
            obs(75, 99.5, 1.0),
        ];
        let bars = resample(&observations, Interval::OneMinute);
        assert_eq!(bars.len(), 1);
        // Last price by timestamp order, not input order
        assert_eq!(bars[0].price, 101.0);
        assert_eq!(bars[0].quantity, 4.0);
    }

    #[test]
    fn test_resample_boundaries_are_exact() {
        let observations: Vec<Observation> =
            (0..50).map(|i| obs(7 + i * 13, 100.0 + i as f64, 1.0)).collect();

        for interval in [Interval::OneSecond, Interval::OneMinute, Interval::FiveMinutes] {
            let bars = resample(&observations, interval);
            let secs = interval.as_secs();
            for pair in bars.windows(2) {
                assert!(pair[0].timestamp < pair[1].timestamp, "bars must ascend");
            }
            for bar in &bars {
                assert_eq!(bar.timestamp.timestamp() % secs, 0);
            }
        }
    }

    #[test]
    fn test_resample_empty_input() {
        let bars = resample(&[], Interval::OneSecond);
        assert!(bars.is_empty());
    }
}
