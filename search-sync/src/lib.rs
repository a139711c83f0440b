//! # Search Sync
//!
//! Entry point and configuration for synchronizing a site's content into its
//! search index.
//!
//! Settings are resolved from the environment and the site config file, then
//! wired into a [`search_sync_pipeline::SyncOrchestrator`] by
//! [`Dependencies`].

pub mod config;

pub use config::{Dependencies, Settings};

use thiserror::Error;

/// Errors that can occur during startup or a run.
#[derive(Error, Debug)]
pub enum SearchSyncError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Run aborted.
    #[error("Sync error: {0}")]
    SyncError(#[from] search_sync_pipeline::SyncError),

    /// Search client error.
    #[error("Search error: {0}")]
    SearchError(#[from] search_sync_repository::SearchIndexError),
}

impl SearchSyncError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
