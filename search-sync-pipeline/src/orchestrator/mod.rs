//! Orchestrator module for the synchronization pipeline.
//!
//! Sequences one synchronization run: validate, probe, reset, schema, load,
//! transform, upload.

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::errors::SyncError;
use crate::loader::{BatchUploader, UploaderConfig, DEFAULT_CHUNK_SIZE};
use crate::processor::DocumentTransformer;
use crate::schema::IndexSchemaManager;
use crate::source::{ContentSource, DEFAULT_PAGE_LAYOUT};
use search_sync_repository::{BulkOperationResult, SearchIndexClient};
use search_sync_shared::{ContentRecord, IndexConfig};

/// Options for a single run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Transform the corpus but write no documents.
    pub dry_run: bool,
    /// Delete the index before rebuilding it.
    pub reset_index: bool,
    /// Documents per bulk request.
    pub chunk_size: usize,
    /// Bulk requests allowed in flight at once.
    pub max_concurrent_batches: usize,
    /// Page layouts eligible for indexing.
    pub page_layouts: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            reset_index: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_concurrent_batches: 1,
            page_layouts: vec![DEFAULT_PAGE_LAYOUT.to_string()],
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncRunSummary {
    /// Documents produced from the eligible corpus.
    pub total_candidates: usize,
    pub total_indexed: usize,
    pub total_failed: usize,
    pub index_was_reset: bool,
    pub dry_run: bool,
    /// Bulk requests issued.
    pub batches: usize,
    /// Every document that was not written, with the reason.
    pub failures: Vec<BulkOperationResult>,
}

impl SyncRunSummary {
    pub fn has_failures(&self) -> bool {
        self.total_failed > 0
    }
}

/// Named steps of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    ValidateConfig,
    ProbeConnectivity,
    ResetIndex,
    EnsureSchema,
    LoadCorpus,
    Transform,
    Upload,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ValidateConfig => "validate_config",
            Self::ProbeConnectivity => "probe_connectivity",
            Self::ResetIndex => "reset_index",
            Self::EnsureSchema => "ensure_schema",
            Self::LoadCorpus => "load_corpus",
            Self::Transform => "transform",
            Self::Upload => "upload",
        };
        f.write_str(name)
    }
}

/// Orchestrator that runs the synchronization steps in order.
///
/// Each step must succeed before the next starts. There is no retry loop; a
/// caller that wants one re-invokes `run`.
pub struct SyncOrchestrator {
    client: Arc<SearchIndexClient>,
    source: Arc<dyn ContentSource>,
}

impl SyncOrchestrator {
    /// Create a new orchestrator over the given client and content source.
    pub fn new(client: Arc<SearchIndexClient>, source: Arc<dyn ContentSource>) -> Self {
        Self { client, source }
    }

    /// Run one synchronization.
    ///
    /// # Returns
    ///
    /// * `Ok(SyncRunSummary)` - The run completed; item-level failures are
    ///   counted in the summary
    /// * `Err(SyncError)` - The run was aborted
    #[instrument(skip_all, fields(index = %config.index_name, dry_run = options.dry_run))]
    pub async fn run(
        &self,
        config: &IndexConfig,
        options: &SyncOptions,
    ) -> Result<SyncRunSummary, SyncError> {
        let index = config.index_name.as_str();
        let mut summary = SyncRunSummary {
            dry_run: options.dry_run,
            ..Default::default()
        };

        step(SyncStep::ValidateConfig);
        self.validate_config(config, options)?;

        step(SyncStep::ProbeConnectivity);
        self.probe_connectivity(config).await?;

        let schema = IndexSchemaManager::new(self.client.clone());
        if options.reset_index {
            step(SyncStep::ResetIndex);
            summary.index_was_reset = schema.ensure_absent(index).await.is_absent();
        }

        step(SyncStep::EnsureSchema);
        schema.ensure_schema(index).await?;

        step(SyncStep::LoadCorpus);
        let records = self.load_corpus(&options.page_layouts).await?;
        info!(count = records.len(), "Pages and posts to index");
        if records.is_empty() {
            return Ok(summary);
        }

        step(SyncStep::Transform);
        let documents = DocumentTransformer::new(config.default_author.clone())
            .transform_batch(&records)?;
        summary.total_candidates = documents.len();

        if options.dry_run {
            warn!(candidates = documents.len(), "Skipping indexing due to dry run");
            return Ok(summary);
        }

        step(SyncStep::Upload);
        let uploader = BatchUploader::with_config(
            self.client.clone(),
            UploaderConfig {
                chunk_size: options.chunk_size,
                max_concurrent_batches: options.max_concurrent_batches,
            },
        );
        let report = uploader.upload(&documents, index).await?;

        summary.batches = report.batches;
        summary.total_indexed = report.summary.succeeded;
        summary.total_failed = report.summary.failed;
        summary.failures = report.summary.failures().cloned().collect();

        info!(
            indexed = summary.total_indexed,
            failed = summary.total_failed,
            "Indexing done"
        );
        Ok(summary)
    }

    /// Check credentials, index name and batch limits before any network call.
    pub fn validate_config(&self, config: &IndexConfig, options: &SyncOptions) -> Result<(), SyncError> {
        if !config.credentials.is_complete() {
            return Err(SyncError::config(
                "search service username and password are required",
            ));
        }
        if config.index_name.trim().is_empty() {
            return Err(SyncError::config("an index name is required"));
        }
        if options.chunk_size == 0 {
            return Err(SyncError::config("chunk size must be at least 1"));
        }
        if let Some(max) = self.client.config().max_batch_size {
            if options.chunk_size > max {
                return Err(SyncError::config(format!(
                    "chunk size {} exceeds the bulk limit of {}",
                    options.chunk_size, max
                )));
            }
        }
        Ok(())
    }

    /// Probe the cluster health endpoint.
    pub async fn probe_connectivity(&self, config: &IndexConfig) -> Result<(), SyncError> {
        info!(url = %config.url(), "Testing search service access");
        let health = self.client.health().await.map_err(|e| {
            warn!(error = %e, "Search service might be unavailable");
            SyncError::connectivity(config.url(), &e)
        })?;

        if health.is_red() {
            warn!(nodes = health.number_of_nodes, "Cluster health is red");
        } else {
            info!(
                status = %health.status,
                nodes = health.number_of_nodes,
                "Search service reachable"
            );
        }
        Ok(())
    }

    /// Published articles followed by allow-listed pages.
    pub async fn load_corpus(&self, layouts: &[String]) -> Result<Vec<ContentRecord>, SyncError> {
        let mut records = self.source.published_articles().await?;
        records.extend(self.source.pages(layouts).await?);
        Ok(records)
    }
}

fn step(step: SyncStep) {
    tracing::debug!(step = %step, "Starting step");
}
