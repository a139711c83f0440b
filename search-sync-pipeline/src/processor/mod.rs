//! Processor module for the synchronization pipeline.
//!
//! Transforms content records into search documents.

mod document_transformer;

pub use document_transformer::{extract_tag_refs, iso_timestamp, transform, DocumentTransformer};
