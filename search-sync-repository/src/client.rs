//! Search index client implementation.
//!
//! This module provides the client the synchronizer uses to manage the remote
//! index: health probes, index lifecycle, schema updates, and bulk upserts.
//! Wire access is delegated to an injected `SearchIndexProvider`.

use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{
    BatchOperationSummary, BulkItemError, BulkOperationResult, BulkResponse, ClusterHealth,
};
use search_sync_shared::SearchDocument;

/// The main client for managing the remote search index.
pub struct SearchIndexClient {
    provider: Box<dyn SearchIndexProvider>,
    config: SearchIndexConfig,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient with default configuration.
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexConfig::default(),
        }
    }

    /// Create a new SearchIndexClient with custom configuration.
    pub fn with_config(provider: Box<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &SearchIndexConfig {
        &self.config
    }

    fn validate_index_name(index: &str) -> Result<(), SearchIndexError> {
        if index.trim().is_empty() {
            return Err(SearchIndexError::validation("index name is required"));
        }
        Ok(())
    }

    /// Probe the cluster health endpoint.
    pub async fn health(&self) -> Result<ClusterHealth, SearchIndexError> {
        self.provider.cluster_health().await
    }

    /// Check whether the index exists by fetching its mapping.
    ///
    /// A not-found answer is `Ok(false)`; any other failure is returned so the
    /// caller can decide how much it trusts the answer.
    pub async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        Self::validate_index_name(index)?;
        match self.provider.get_mapping(index).await {
            Ok(_) => Ok(true),
            Err(SearchIndexError::IndexNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn create_index(&self, index: &str) -> Result<(), SearchIndexError> {
        Self::validate_index_name(index)?;
        self.provider.create_index(index).await
    }

    pub async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        Self::validate_index_name(index)?;
        self.provider.delete_index(index).await
    }

    pub async fn close_index(&self, index: &str) -> Result<(), SearchIndexError> {
        Self::validate_index_name(index)?;
        self.provider.close_index(index).await
    }

    pub async fn open_index(&self, index: &str) -> Result<(), SearchIndexError> {
        Self::validate_index_name(index)?;
        self.provider.open_index(index).await
    }

    pub async fn put_settings(&self, index: &str, settings: &Value) -> Result<(), SearchIndexError> {
        Self::validate_index_name(index)?;
        self.provider.put_settings(index, settings).await
    }

    pub async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<(), SearchIndexError> {
        Self::validate_index_name(index)?;
        self.provider.put_mapping(index, mapping).await
    }

    /// Upsert documents by key in a single bulk request.
    /// Input: index name, documents with their `document_key` set
    /// Output: Result<BatchOperationSummary, SearchIndexError>
    ///
    /// Every document is written with an `index` action and `_id` equal to its
    /// key, so re-sending an unchanged document overwrites it. Item-level
    /// failures are reported in the summary; `Err` means the request as a
    /// whole failed.
    ///
    /// The batch size is limited by the configured max_batch_size (default: 1000).
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn bulk_upsert(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BatchOperationSummary::empty());
        }

        Self::validate_index_name(index)?;
        self.config.check_batch_size(documents.len())?;

        let operations = build_bulk_operations(index, documents)?;
        let response = self.provider.bulk(operations).await?;

        debug!(took_ms = response.took, errors = response.errors, "Bulk request processed");
        Ok(summarize_bulk_response(documents, &response))
    }
}

/// Build the alternating action/document lines of a bulk upsert.
pub fn build_bulk_operations(
    index: &str,
    documents: &[SearchDocument],
) -> Result<Vec<Value>, SearchIndexError> {
    let mut operations = Vec::with_capacity(documents.len() * 2);

    for document in documents {
        if document.document_key.is_empty() {
            return Err(SearchIndexError::validation(format!(
                "document for {} has no key",
                document.url
            )));
        }
        operations.push(json!({
            "index": { "_index": index, "_id": document.document_key }
        }));
        operations.push(
            serde_json::to_value(document)
                .map_err(|e| SearchIndexError::serialization(e.to_string()))?,
        );
    }

    Ok(operations)
}

/// Match bulk response items to the documents that were sent.
///
/// Items are matched by position. Documents the service did not report on
/// are counted as failed.
fn summarize_bulk_response(
    documents: &[SearchDocument],
    response: &BulkResponse,
) -> BatchOperationSummary {
    if response.items.len() != documents.len() {
        warn!(
            sent = documents.len(),
            reported = response.items.len(),
            "Bulk response item count does not match request"
        );
    }

    let results = documents
        .iter()
        .enumerate()
        .map(|(position, document)| match response.items.get(position) {
            Some(item) if item.outcome.succeeded() => {
                BulkOperationResult::success(&document.document_key, item.outcome.status)
            }
            Some(item) => {
                let error = item
                    .outcome
                    .error
                    .as_ref()
                    .map(BulkItemError::from_value)
                    .unwrap_or_else(|| {
                        BulkItemError::new("error", format!("status {}", item.outcome.status))
                    });
                BulkOperationResult::failure(
                    &document.document_key,
                    Some(item.outcome.status),
                    error,
                )
            }
            None => BulkOperationResult::failure(
                &document.document_key,
                None,
                BulkItemError::new("missing_item", "no result reported by the bulk response"),
            ),
        })
        .collect();

    BatchOperationSummary::from_results(results)
}
