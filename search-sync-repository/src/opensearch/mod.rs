//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using the OpenSearch client, and the schema the synchronizer applies.

mod client;
mod index_config;

pub use client::OpenSearchClient;
pub use index_config::{index_mappings, index_settings, AUTOCOMPLETE_ANALYZER};
