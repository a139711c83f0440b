//! Error types for the synchronization pipeline.

use thiserror::Error;

use crate::source::SourceError;
use search_sync_repository::SearchIndexError;

/// Fatal conditions that abort a synchronization run.
///
/// Per-document bulk failures are not errors; they are reported in the run
/// summary.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Missing or invalid configuration, detected before any network call.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The search service did not answer the health probe.
    #[error("Search service at {url} is unreachable: {cause}")]
    ConnectivityError { url: String, cause: String },

    /// The index could not be created or configured.
    #[error("Schema error on index {index} during {operation}: {cause}")]
    SchemaError {
        operation: String,
        index: String,
        cause: String,
    },

    /// A content record could not be transformed.
    #[error("Malformed record {permalink}: {reason}")]
    MalformedRecordError { permalink: String, reason: String },

    /// A bulk request never reached the search service.
    #[error("Bulk transport error on index {index} in batch {batch}: {cause}")]
    BulkTransportError {
        index: String,
        batch: usize,
        cause: String,
    },

    /// The content source could not produce the corpus.
    #[error("Content source error: {0}")]
    ContentSourceError(#[from] SourceError),
}

impl SyncError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a connectivity error.
    pub fn connectivity(url: impl Into<String>, cause: &SearchIndexError) -> Self {
        Self::ConnectivityError {
            url: url.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a schema error for a failed index operation.
    pub fn schema(operation: impl Into<String>, index: impl Into<String>, cause: &SearchIndexError) -> Self {
        Self::SchemaError {
            operation: operation.into(),
            index: index.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a malformed record error.
    pub fn malformed(permalink: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecordError {
            permalink: permalink.into(),
            reason: reason.into(),
        }
    }

    /// Create a bulk transport error.
    pub fn bulk_transport(index: impl Into<String>, batch: usize, cause: &SearchIndexError) -> Self {
        Self::BulkTransportError {
            index: index.into(),
            batch,
            cause: cause.to_string(),
        }
    }
}
