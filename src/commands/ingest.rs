//! Trade-feed ingestion command handler.

use crate::ingestion::BinanceIngestor;
use crate::storage::TickStore;
use tracing::info;

/// Start live ingestion for the given instruments and run until killed.
pub async fn run_ingest(
    instruments: Vec<String>,
    data_dir: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = TickStore::open(data_dir)?;

    info!(
        instruments = ?instruments,
        data_dir = data_dir,
        "Starting trade-feed ingestion"
    );

    let ingestor = BinanceIngestor::new(store);
    ingestor.run(instruments).await?;
    Ok(())
}
