//! Schema module for the synchronization pipeline.
//!
//! Brings the remote index into the state documents can be written to:
//! present, with the autocomplete analysis settings and the field mappings
//! applied.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::errors::SyncError;
use search_sync_repository::opensearch::{index_mappings, index_settings};
use search_sync_repository::{SearchIndexClient, SearchIndexError};

/// Progress of the index through schema setup within one run.
///
/// `Absent -> Created -> Closed -> Open -> Ready`. Settings are applied while
/// `Closed`, mappings while `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Absent,
    Created,
    Closed,
    Open,
    Ready,
}

impl fmt::Display for SchemaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absent => "absent",
            Self::Created => "created",
            Self::Closed => "closed",
            Self::Open => "open",
            Self::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// What a reset did to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Deleted,
    AlreadyAbsent,
    /// The index could not be checked or deleted; the run continues.
    Failed,
}

impl ResetOutcome {
    /// The index is known not to exist after the reset.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Deleted | Self::AlreadyAbsent)
    }
}

/// Manages the lifecycle and schema of the content index.
pub struct IndexSchemaManager {
    client: Arc<SearchIndexClient>,
}

impl IndexSchemaManager {
    /// Create a new schema manager with the given client.
    pub fn new(client: Arc<SearchIndexClient>) -> Self {
        Self { client }
    }

    /// Delete the index if it exists.
    ///
    /// Best-effort: failures are logged and reported as
    /// `ResetOutcome::Failed`, never as an error.
    #[instrument(skip(self))]
    pub async fn ensure_absent(&self, index: &str) -> ResetOutcome {
        match self.client.index_exists(index).await {
            Ok(false) => {
                info!(index = index, "Index does not exist, nothing to delete");
                return ResetOutcome::AlreadyAbsent;
            }
            Ok(true) => {}
            Err(e) => {
                error!(index = index, error = %e, "Failed to check index before deletion");
                return ResetOutcome::Failed;
            }
        }

        warn!(index = index, "Deleting index");
        match self.client.delete_index(index).await {
            Ok(()) => ResetOutcome::Deleted,
            Err(SearchIndexError::IndexNotFound(_)) => ResetOutcome::AlreadyAbsent,
            Err(e) => {
                error!(index = index, error = %e, "Failed to delete index");
                ResetOutcome::Failed
            }
        }
    }

    /// Create the index if needed and apply settings and mappings.
    ///
    /// Safe to call on an index that already has this schema. A failed
    /// existence probe is treated as "absent"; every later failure aborts with
    /// `SyncError::SchemaError`.
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self, index: &str) -> Result<SchemaState, SyncError> {
        let mut state = match self.client.index_exists(index).await {
            Ok(true) => SchemaState::Created,
            Ok(false) => SchemaState::Absent,
            Err(e) => {
                warn!(index = index, error = %e, "Could not check index, assuming it is absent");
                SchemaState::Absent
            }
        };

        if state == SchemaState::Absent {
            info!(index = index, "Creating index");
            match self.client.create_index(index).await {
                Ok(()) => {}
                Err(SearchIndexError::IndexAlreadyExists(_)) => {
                    debug!(index = index, "Index appeared before creation");
                }
                Err(e) => return Err(SyncError::schema("create_index", index, &e)),
            }
            advance(index, &mut state, SchemaState::Created);
        }

        info!(index = index, "Updating index");

        self.client
            .close_index(index)
            .await
            .map_err(|e| SyncError::schema("close_index", index, &e))?;
        advance(index, &mut state, SchemaState::Closed);

        if let Err(e) = self.client.put_settings(index, &index_settings()).await {
            error!(index = index, error = %e, "Unable to configure index settings");
            self.reopen_after_failure(index).await;
            return Err(SyncError::schema("put_settings", index, &e));
        }

        self.client
            .open_index(index)
            .await
            .map_err(|e| SyncError::schema("open_index", index, &e))?;
        advance(index, &mut state, SchemaState::Open);

        if let Err(e) = self.client.put_mapping(index, &index_mappings()).await {
            error!(index = index, error = %e, "Unable to configure index mappings");
            return Err(SyncError::schema("put_mapping", index, &e));
        }
        advance(index, &mut state, SchemaState::Ready);

        Ok(state)
    }

    /// Leave the index searchable after a failed settings update.
    async fn reopen_after_failure(&self, index: &str) {
        if let Err(e) = self.client.open_index(index).await {
            warn!(index = index, error = %e, "Failed to reopen index after settings failure");
        }
    }
}

fn advance(index: &str, state: &mut SchemaState, next: SchemaState) {
    debug!(index = index, from = %state, to = %next, "Index schema transition");
    *state = next;
}
