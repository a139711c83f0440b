//! # Search Sync Repository
//!
//! This crate provides the client used to manage the remote search index:
//! cluster health, index lifecycle, schema updates and bulk writes. It
//! includes definitions for errors, the provider interface, and a concrete
//! implementation for OpenSearch (wire compatible with Elasticsearch).

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::SearchIndexClient;
pub use config::SearchIndexConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchClient;
pub use types::{
    BatchOperationSummary, BulkItemError, BulkOperationResult, BulkResponse, ClusterHealth,
};
