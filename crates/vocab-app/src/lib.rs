//! Application layer for the vocabulary tool.
//!
//! This crate provides the word service, its storage seam, CSV export and
//! configuration shared by the command-line front end.

pub mod config;
pub mod error;
pub mod export;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use config::{AppConfig, ExportConfig, StorageConfig};
pub use error::WordError;
pub use service::{ExportSummary, WordService};
pub use store::WordStore;
