//! # Search Sync Shared
//!
//! Plain data shared by the synchronizer crates: the content records read
//! from the site corpus, the documents written to the search index, and the
//! resolved index connection settings.

pub mod config;
pub mod document;
pub mod record;

pub use config::{Credentials, IndexConfig};
pub use document::{document_key, SearchDocument};
pub use record::{ContentRecord, TagRef};
