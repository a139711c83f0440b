//! Source module for the synchronization pipeline.
//!
//! Provides the content records eligible for indexing.

mod json_corpus;

pub use json_corpus::JsonCorpusSource;

use async_trait::async_trait;
use thiserror::Error;

use search_sync_shared::ContentRecord;

/// Layout kind of the pages indexed by default.
pub const DEFAULT_PAGE_LAYOUT: &str = "page";

/// Errors raised by a content source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The corpus could not be read.
    #[error("Failed to read corpus {origin}: {message}")]
    ReadError { origin: String, message: String },

    /// The corpus was read but is not valid.
    #[error("Failed to parse corpus {origin}: {message}")]
    ParseError { origin: String, message: String },
}

impl SourceError {
    /// Create a read error.
    pub fn read(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadError {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

/// Read access to the site's content store.
///
/// Both collections are unordered; the orchestrator concatenates articles
/// and pages before transforming them.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All published articles.
    async fn published_articles(&self) -> Result<Vec<ContentRecord>, SourceError>;

    /// All pages whose layout is one of `layouts`.
    async fn pages(&self, layouts: &[String]) -> Result<Vec<ContentRecord>, SourceError>;
}
