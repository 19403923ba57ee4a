pub mod analytics;
pub mod cache;
pub mod commands;
pub mod ingestion;
pub mod storage;
pub mod types;
