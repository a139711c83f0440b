//! # Search Sync Pipeline
//!
//! This crate synchronizes a site's content corpus into the remote search
//! index.
//!
//! ## Architecture
//!
//! A run is a fixed sequence of steps, each gating the next:
//!
//! 1. **Source**: Loads published articles and allow-listed pages
//! 2. **Processor**: Transforms records into search documents with stable keys
//! 3. **Schema**: Creates the index and applies analysis settings and mappings
//! 4. **Loader**: Upserts documents in bounded bulk batches
//! 5. **Orchestrator**: Sequences the steps and aggregates the run summary

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod schema;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::SyncError;
pub use orchestrator::{SyncOptions, SyncOrchestrator, SyncRunSummary};
