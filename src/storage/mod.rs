//! Persistent tick storage.
//!
//! Append-only CSV store with one file per instrument. Plays the role of
//! the durable tick database: the ingestion task appends observations as
//! they arrive, the analytics command reads a point-in-time snapshot back
//! out. Malformed rows are skipped with a warning and never fail a fetch.

use crate::types::Observation;
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

const CSV_HEADER: &str = "timestamp,price,quantity";

/// Errors from the tick store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No data recorded for instrument '{0}'")]
    UnknownInstrument(String),
}

/// File-backed tick store, one CSV file per instrument.
#[derive(Debug, Clone)]
pub struct TickStore {
    data_dir: PathBuf,
}

impl TickStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn instrument_path(&self, instrument: &str) -> PathBuf {
        // Instrument names come from user input and websocket payloads;
        // keep only filename-safe characters
        let safe: String = instrument
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        self.data_dir.join(format!("{}.csv", safe))
    }

    /// Append one observation to an instrument's file.
    pub fn append(&self, instrument: &str, observation: &Observation) -> Result<(), StoreError> {
        let path = self.instrument_path(instrument);
        let needs_header = !path.exists()
            || fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if needs_header {
            writeln!(file, "{}", CSV_HEADER)?;
        }
        writeln!(
            file,
            "{},{},{}",
            observation.timestamp.to_rfc3339(),
            observation.price,
            observation.quantity
        )?;
        Ok(())
    }

    /// Fetch observations for an instrument, ascending by timestamp.
    ///
    /// Range bounds are inclusive. Rows with an unparseable timestamp,
    /// price or quantity are dropped with a warning; a corrupt row never
    /// fails the batch.
    pub fn fetch(
        &self,
        instrument: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Observation>, StoreError> {
        let path = self.instrument_path(instrument);
        if !path.exists() {
            return Err(StoreError::UnknownInstrument(instrument.to_string()));
        }

        let contents = fs::read_to_string(&path)?;
        let mut observations = Vec::new();
        let mut dropped = 0usize;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line == CSV_HEADER {
                continue;
            }
            match parse_row(line) {
                Some(obs) => {
                    if start.is_some_and(|s| obs.timestamp < s) {
                        continue;
                    }
                    if end.is_some_and(|e| obs.timestamp > e) {
                        continue;
                    }
                    observations.push(obs);
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(
                instrument = instrument,
                dropped = dropped,
                path = %path.display(),
                "Skipped malformed tick rows"
            );
        }

        observations.sort_by_key(|o| o.timestamp);
        Ok(observations)
    }

    /// Number of stored observations for an instrument; 0 if none recorded.
    pub fn count(&self, instrument: &str) -> Result<usize, StoreError> {
        match self.fetch(instrument, None, None) {
            Ok(rows) => Ok(rows.len()),
            Err(StoreError::UnknownInstrument(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Directory this store writes to.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn parse_row(line: &str) -> Option<Observation> {
    let mut fields = line.split(',');
    let timestamp = fields.next()?;
    let price = fields.next()?;
    let quantity = fields.next()?;

    let timestamp = DateTime::parse_from_rfc3339(timestamp.trim())
        .ok()?
        .with_timezone(&Utc);
    let price: f64 = price.trim().parse().ok()?;
    let quantity: f64 = quantity.trim().parse().ok()?;

    if !price.is_finite() || !quantity.is_finite() {
        return None;
    }

    Some(Observation {
        timestamp,
        price,
        quantity,
    })
}
