//! CSV export of the analytics table.
//!
//! One row per aligned timestamp with the spread, z-score and rolling
//! correlation columns. Undefined values serialize as empty cells, floats
//! use a decimal point, output is UTF-8 with a header row.

use crate::analytics::pipeline::PipelineOutput;
use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamp-keyed view of the per-bar analytics series.
#[derive(Debug, Clone)]
pub struct AnalyticsTable {
    pub timestamps: Vec<DateTime<Utc>>,
    pub spread: Vec<f64>,
    pub zscore: Vec<Option<f64>>,
    pub correlation: Vec<Option<f64>>,
}

impl AnalyticsTable {
    /// Build the export table from a pipeline run.
    pub fn from_output(output: &PipelineOutput) -> Self {
        Self {
            timestamps: output.frame.timestamps.clone(),
            spread: output.spread.clone(),
            zscore: output.zscore.clone(),
            correlation: output.correlation.clone(),
        }
    }

    pub fn csv_header() -> &'static str {
        "timestamp,spread,zscore,correlation"
    }

    /// Render the table as CSV, header row included.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(self.timestamps.len() * 64);
        out.push_str(Self::csv_header());
        out.push('\n');

        for i in 0..self.timestamps.len() {
            out.push_str(&self.timestamps[i].to_rfc3339_opts(SecondsFormat::Secs, true));
            out.push(',');
            out.push_str(&self.spread[i].to_string());
            out.push(',');
            if let Some(z) = self.zscore[i] {
                out.push_str(&z.to_string());
            }
            out.push(',');
            if let Some(c) = self.correlation[i] {
                out.push_str(&c.to_string());
            }
            out.push('\n');
        }

        out
    }
}
