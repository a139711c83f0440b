//! Search documents written to the remote index.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::record::TagRef;

/// Derive the stable document key for a URL.
///
/// The key is the lowercase hex SHA-1 of the UTF-8 URL. No other field
/// contributes, so re-indexing an unchanged record overwrites the same
/// remote document.
pub fn document_key(url: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// The document body indexed for one content record.
///
/// `document_key` is the bulk `_id` and is not part of the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    #[serde(skip)]
    pub document_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub content: String,
    pub url: String,
    /// ISO-8601 creation time.
    #[serde(rename = "created")]
    pub created_at: String,
    /// ISO-8601 update time.
    #[serde(rename = "updated")]
    pub updated_at: String,
    /// `None` when the record had no tag list; serialized as `null`.
    pub tags: Option<Vec<TagRef>>,
    pub categories: Option<Vec<TagRef>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SearchDocument {
        SearchDocument {
            document_key: document_key("https://example.com/a/"),
            title: Some("A".to_string()),
            excerpt: None,
            author: Some("Jo".to_string()),
            content: "body".to_string(),
            url: "https://example.com/a/".to_string(),
            created_at: "2024-03-01T10:00:00.000Z".to_string(),
            updated_at: "2024-03-02T10:00:00.000Z".to_string(),
            tags: Some(vec![TagRef::new("rust", "tags/rust/")]),
            categories: None,
        }
    }

    #[test]
    fn test_document_key_is_sha1_hex() {
        assert_eq!(
            document_key("abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_document_key_is_deterministic() {
        let url = "https://example.com/2024/03/01/hello/";
        assert_eq!(document_key(url), document_key(url));
        assert_ne!(document_key(url), document_key("https://example.com/about/"));
    }

    #[test]
    fn test_serialized_body_field_names() {
        let body = serde_json::to_value(sample()).unwrap();

        assert_eq!(
            body,
            json!({
                "title": "A",
                "author": "Jo",
                "content": "body",
                "url": "https://example.com/a/",
                "created": "2024-03-01T10:00:00.000Z",
                "updated": "2024-03-02T10:00:00.000Z",
                "tags": [{ "name": "rust", "path": "tags/rust/" }],
                "categories": null
            })
        );
    }
}
