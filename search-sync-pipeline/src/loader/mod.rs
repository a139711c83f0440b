//! Loader module for the synchronization pipeline.
//!
//! Uploads search documents to the index in bounded bulk batches.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, instrument};

use crate::errors::SyncError;
use search_sync_repository::{
    BatchOperationSummary, BulkItemError, BulkOperationResult, SearchIndexClient,
    SearchIndexError,
};
use search_sync_shared::SearchDocument;

/// Default number of documents per bulk request.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Configuration for the batch uploader.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Maximum number of documents per bulk request.
    pub chunk_size: usize,
    /// Number of bulk requests allowed in flight at once.
    pub max_concurrent_batches: usize,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_concurrent_batches: 1,
        }
    }
}

/// Outcome of uploading a document set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Number of bulk requests issued.
    pub batches: usize,
    /// Per-document results across all batches, in document order.
    pub summary: BatchOperationSummary,
}

/// Uploader that writes documents into the search index.
///
/// The uploader is responsible for:
/// - Splitting documents into ordered chunks of at most `chunk_size`
/// - Issuing one bulk upsert per chunk
/// - Isolating chunk and item failures from the rest of the upload
///
/// Nothing is retried. A bulk request that never reaches the service aborts
/// the upload; a request the service rejects fails only its own chunk.
pub struct BatchUploader {
    client: Arc<SearchIndexClient>,
    config: UploaderConfig,
}

impl BatchUploader {
    /// Create a new uploader with the given client.
    pub fn new(client: Arc<SearchIndexClient>) -> Self {
        Self {
            client,
            config: UploaderConfig::default(),
        }
    }

    /// Create a new uploader with custom configuration.
    pub fn with_config(client: Arc<SearchIndexClient>, config: UploaderConfig) -> Self {
        Self { client, config }
    }

    /// Upsert all documents into `index`.
    ///
    /// Up to `max_concurrent_batches` requests run at once; results are
    /// consumed in chunk order so the report does not depend on completion
    /// order. On a transport failure no further chunks are dispatched and
    /// results still pending are discarded.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn upload(
        &self,
        documents: &[SearchDocument],
        index: &str,
    ) -> Result<UploadReport, SyncError> {
        let chunk_size = self.config.chunk_size.max(1);
        let client = &self.client;

        let mut outcomes = stream::iter(documents.chunks(chunk_size).enumerate())
            .map(|(batch, chunk)| async move {
                debug!(batch = batch, size = chunk.len(), "Sending bulk request");
                (batch, chunk, client.bulk_upsert(index, chunk).await)
            })
            .buffered(self.config.max_concurrent_batches.max(1));

        let mut batches = 0;
        let mut results = Vec::with_capacity(documents.len());

        while let Some((batch, chunk, outcome)) = outcomes.next().await {
            batches += 1;
            match outcome {
                Ok(summary) => {
                    for failure in summary.failures() {
                        error!(
                            batch = batch,
                            document_key = %failure.document_key,
                            status = ?failure.status_code,
                            error = ?failure.error_detail,
                            "Document failed to index"
                        );
                    }
                    debug!(
                        batch = batch,
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "Bulk request completed"
                    );
                    results.extend(summary.results);
                }
                Err(e) if e.is_transport() => {
                    error!(batch = batch, error = %e, "Bulk request failed, aborting upload");
                    return Err(SyncError::bulk_transport(index, batch, &e));
                }
                Err(e) => {
                    error!(batch = batch, size = chunk.len(), error = %e, "Bulk request rejected");
                    results.extend(rejected_chunk(chunk, &e));
                }
            }
        }

        let summary = BatchOperationSummary::from_results(results);
        info!(
            batches = batches,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Upload finished"
        );

        Ok(UploadReport { batches, summary })
    }
}

/// Mark every document of a rejected bulk request as failed.
fn rejected_chunk(chunk: &[SearchDocument], err: &SearchIndexError) -> Vec<BulkOperationResult> {
    let status = match err {
        SearchIndexError::RequestError { status, .. } => Some(*status),
        _ => None,
    };
    chunk
        .iter()
        .map(|document| {
            BulkOperationResult::failure(
                &document.document_key,
                status,
                BulkItemError::new("batch_rejected", err.to_string()),
            )
        })
        .collect()
}
