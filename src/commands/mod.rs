//! CLI command handlers.
//!
//! One handler per subcommand, bridging parsed CLI arguments to the
//! storage, ingestion and analytics layers.

mod analyze;
mod ingest;

pub use analyze::{run_analyze, AnalyzeConfig};
pub use ingest::run_ingest;
