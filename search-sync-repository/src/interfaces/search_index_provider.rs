//! Search index provider trait definition.
//!
//! This module defines the wire-level operations the synchronizer needs from
//! a search service, allowing for different backend implementations
//! (OpenSearch, Elasticsearch, in-memory mocks).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{BulkResponse, ClusterHealth};

/// Abstracts the underlying search service.
///
/// Implementations are injected into `SearchIndexClient`, which adds request
/// validation and bulk payload handling on top. Every method maps to exactly
/// one HTTP call and performs no retries.
///
/// # Errors
///
/// Implementations must report a missing index as
/// `SearchIndexError::IndexNotFound` and a request that never got a response
/// as `SearchIndexError::TransportError`; callers rely on both distinctions.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// `GET /_cluster/health`.
    async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError>;

    /// `GET /<index>/_mapping`.
    ///
    /// Used as the existence probe for an index.
    async fn get_mapping(&self, index: &str) -> Result<Value, SearchIndexError>;

    /// `PUT /<index>` with no body.
    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// `DELETE /<index>`.
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// `POST /<index>/_close`.
    async fn close_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// `POST /<index>/_open`.
    async fn open_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// `PUT /<index>/_settings`.
    async fn put_settings(&self, index: &str, settings: &Value) -> Result<(), SearchIndexError>;

    /// `PUT /<index>/_mapping`.
    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<(), SearchIndexError>;

    /// `POST /_bulk` with one JSON value per NDJSON line.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkResponse)` - The service processed the request; individual
    ///   items may still have failed
    /// * `Err(SearchIndexError)` - The request failed as a whole
    async fn bulk(&self, operations: Vec<Value>) -> Result<BulkResponse, SearchIndexError>;
}
