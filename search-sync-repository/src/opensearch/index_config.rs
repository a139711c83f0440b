//! Index analysis settings and field mappings.
//!
//! This module defines the schema applied to the content index before any
//! document is written.

use serde_json::{json, Value};

/// Name of the custom analyzer used for title autocomplete.
pub const AUTOCOMPLETE_ANALYZER: &str = "autocomplete";

/// Name of the edge n-gram token filter feeding the autocomplete analyzer.
pub const AUTOCOMPLETE_FILTER: &str = "autocomplete_filter";

/// Shortest prefix emitted for autocomplete.
pub const AUTOCOMPLETE_MIN_GRAM: u32 = 3;

/// Longest prefix emitted for autocomplete.
pub const AUTOCOMPLETE_MAX_GRAM: u32 = 15;

/// Body of `PUT /<index>/_settings`.
///
/// Analysis settings can only be changed on a closed index.
///
/// The configuration includes:
/// - **autocomplete_filter**: edge n-grams of length 3 to 15
/// - **autocomplete**: standard tokenizer, lowercase, then the edge n-gram filter
pub fn index_settings() -> Value {
    json!({
        "settings": {
            "analysis": {
                "filter": {
                    "autocomplete_filter": {
                        "type": "edge_ngram",
                        "min_gram": AUTOCOMPLETE_MIN_GRAM,
                        "max_gram": AUTOCOMPLETE_MAX_GRAM
                    }
                },
                "analyzer": {
                    "autocomplete": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", AUTOCOMPLETE_FILTER]
                    }
                }
            }
        }
    })
}

/// Body of `PUT /<index>/_mapping`.
///
/// - **content**: english analyzer drops stop words; `docs` index options
///   skip term frequencies and positions
/// - **title**: autocomplete analyzer at index time, standard at search time
/// - **tags**, **categories**: exact-match keywords
pub fn index_mappings() -> Value {
    json!({
        "properties": {
            "content": {
                "type": "text",
                "analyzer": "english",
                "index_options": "docs"
            },
            "title": {
                "type": "text",
                "analyzer": AUTOCOMPLETE_ANALYZER,
                "search_analyzer": "standard"
            },
            "tags": { "type": "keyword" },
            "categories": { "type": "keyword" }
        }
    })
}
