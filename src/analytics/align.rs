//! Timestamp alignment of two bar series.
//!
//! Downstream statistics assume pointwise arithmetic over two series that
//! share a timestamp axis. That assumption is made explicit here: the two
//! legs are inner-joined on exact timestamps once, and every later stage
//! works on the resulting frame with plain positional indexing.

use crate::types::Bar;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Two price series inner-joined on exact bar timestamps.
///
/// Rows ascend by timestamp and the three columns are index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedPairFrame {
    pub timestamps: Vec<DateTime<Utc>>,
    pub price_a: Vec<f64>,
    pub price_b: Vec<f64>,
}

impl AlignedPairFrame {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Inner-join two bar series on matching timestamps.
///
/// Exact match only: no tolerance window, no forward or backward fill.
/// An empty intersection yields an empty frame, not an error; callers
/// must check the length before downstream use.
pub fn align_pairs(bars_a: &[Bar], bars_b: &[Bar]) -> AlignedPairFrame {
    let prices_b: HashMap<DateTime<Utc>, f64> =
        bars_b.iter().map(|b| (b.timestamp, b.price)).collect();

    let mut frame = AlignedPairFrame::default();
    for bar in bars_a {
        if let Some(&price_b) = prices_b.get(&bar.timestamp) {
            frame.timestamps.push(bar.timestamp);
            frame.price_a.push(bar.price);
            frame.price_b.push(price_b);
        }
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(secs: i64, price: f64) -> Bar {
        Bar {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            price,
            quantity: 1.0,
        }
    }

    #[test]
    fn test_align_intersection_only() {
        let a = vec![bar(0, 1.0), bar(60, 2.0), bar(120, 3.0)];
        let b = vec![bar(60, 20.0), bar(120, 30.0), bar(180, 40.0)];

        let frame = align_pairs(&a, &b);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.price_a, vec![2.0, 3.0]);
        assert_eq!(frame.price_b, vec![20.0, 30.0]);
        assert_eq!(frame.timestamps[0].timestamp(), 60);
    }

    #[test]
    fn test_align_no_overlap_returns_empty_frame() {
        let a = vec![bar(0, 1.0)];
        let b = vec![bar(60, 2.0)];
        let frame = align_pairs(&a, &b);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_align_length_bound() {
        let a: Vec<Bar> = (0..10).map(|i| bar(i * 60, i as f64)).collect();
        let b: Vec<Bar> = (5..20).map(|i| bar(i * 60, i as f64)).collect();
        let frame = align_pairs(&a, &b);
        assert!(frame.len() <= a.len().min(b.len()));
        assert_eq!(frame.len(), 5); // timestamps 300..540 shared
    }
}
