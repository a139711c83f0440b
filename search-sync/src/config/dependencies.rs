//! Dependency initialization and wiring for the search sync binary.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::SearchSyncError;
use search_sync_pipeline::source::JsonCorpusSource;
use search_sync_pipeline::SyncOrchestrator;
use search_sync_repository::{OpenSearchClient, SearchIndexClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: SyncOrchestrator,
}

impl Dependencies {
    /// Build the search client and content source for the resolved settings.
    ///
    /// Nothing is read or sent here. The orchestrator validates the
    /// configuration, probes the service and only then reads the corpus.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(SearchSyncError)` - If the client cannot be set up
    pub fn new(settings: &Settings, corpus_path: &Path) -> Result<Self, SearchSyncError> {
        info!(
            url = %settings.index.url(),
            index = %settings.index.index_name,
            corpus = %corpus_path.display(),
            "Initializing dependencies"
        );

        let provider = OpenSearchClient::new(&settings.index)?;
        let client = Arc::new(SearchIndexClient::new(Box::new(provider)));

        let source = JsonCorpusSource::at(corpus_path);

        let orchestrator = SyncOrchestrator::new(client, Arc::new(source));

        Ok(Self { orchestrator })
    }
}
