//! Live trade-feed ingestion.
//!
//! Subscribes to the Binance futures trade stream, one websocket task per
//! instrument, and forwards parsed observations to a single writer task
//! that appends them to the tick store. Malformed or non-trade payloads
//! are ignored; a dropped connection is retried with a fixed backoff.

use crate::storage::{StoreError, TickStore};
use crate::types::Observation;
use chrono::{TimeZone, Utc};
use futures_util::StreamExt;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, error, info, warn};

const BINANCE_WS_BASE: &str = "wss://fstream.binance.com/ws";
const RECONNECT_DELAY: Duration = Duration::from_secs(5);
const CHANNEL_CAPACITY: usize = 1024;

/// Errors from the ingestion layer.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Writer task failed: {0}")]
    Writer(#[from] tokio::task::JoinError),
}

/// Binance futures `@trade` stream payload.
#[derive(Debug, Deserialize)]
struct TradeEvent {
    #[serde(rename = "e")]
    event_type: String,
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "q")]
    quantity: String,
    /// Trade time in epoch milliseconds
    #[serde(rename = "T")]
    trade_time_ms: i64,
}

impl TradeEvent {
    fn to_observation(&self) -> Option<(String, Observation)> {
        let timestamp = Utc.timestamp_millis_opt(self.trade_time_ms).single()?;
        let price: f64 = self.price.parse().ok()?;
        let quantity: f64 = self.quantity.parse().ok()?;
        if !price.is_finite() || !quantity.is_finite() {
            return None;
        }
        Some((
            self.symbol.to_lowercase(),
            Observation {
                timestamp,
                price,
                quantity,
            },
        ))
    }
}

/// Runs trade-stream ingestion for a set of instruments until cancelled.
pub struct BinanceIngestor {
    store: TickStore,
}

impl BinanceIngestor {
    pub fn new(store: TickStore) -> Self {
        Self { store }
    }

    /// Subscribe to all instruments and persist every trade.
    ///
    /// Returns only when every stream task has stopped (normally never;
    /// streams reconnect on failure) or the writer task panics.
    pub async fn run(&self, instruments: Vec<String>) -> Result<(), IngestError> {
        let (tx, mut rx) = mpsc::channel::<(String, Observation)>(CHANNEL_CAPACITY);

        for instrument in instruments {
            let tx = tx.clone();
            tokio::spawn(async move {
                stream_instrument(instrument, tx).await;
            });
        }
        // Writer owns the only remaining receiver; dropping our sender lets
        // it terminate once all stream tasks are gone
        drop(tx);

        let store = self.store.clone();
        let writer = tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut written = 0u64;
            while let Some((instrument, observation)) = rx.blocking_recv() {
                store.append(&instrument, &observation)?;
                written += 1;
                if written % 1000 == 0 {
                    debug!(written = written, "Ingestion progress");
                }
            }
            info!(written = written, "Ingestion writer stopped");
            Ok(())
        });

        writer.await??;
        Ok(())
    }
}

/// Stream one instrument's trades forever, reconnecting on failure.
async fn stream_instrument(instrument: String, tx: mpsc::Sender<(String, Observation)>) {
    let url = format!("{}/{}@trade", BINANCE_WS_BASE, instrument.to_lowercase());

    loop {
        let ws_stream = match connect_async(&url).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                warn!(instrument = %instrument, error = %e, "WebSocket connect failed, retrying");
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };

        info!(instrument = %instrument, "Connected to trade stream");
        let (_, mut read) = ws_stream.split();

        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let Ok(event) = serde_json::from_str::<TradeEvent>(&text) else {
                        continue;
                    };
                    if event.event_type != "trade" {
                        continue;
                    }
                    if let Some(update) = event.to_observation() {
                        if tx.send(update).await.is_err() {
                            // Receiver dropped: ingestion is shutting down
                            return;
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    info!(instrument = %instrument, "Stream closed by server");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!(instrument = %instrument, error = %e, "WebSocket error");
                    break;
                }
            }
        }

        warn!(instrument = %instrument, "Stream ended, reconnecting");
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}
