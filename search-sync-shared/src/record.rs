//! Content records as exported by the site generator.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reduced representation of a tag or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl TagRef {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            path: Some(path.into()),
        }
    }
}

/// A single article or page of the site corpus.
///
/// Records are owned by the content store and are only read by the
/// synchronizer. `tags` and `categories` are kept as raw JSON because the
/// store does not guarantee they are lists; the transformer decides what a
/// non-list value means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Canonical URL of the rendered record.
    #[serde(default)]
    pub permalink: String,
    /// Site-relative source path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Unrendered body text.
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Creation timestamp, RFC 3339 as exported. Parsed by the transformer.
    #[serde(default)]
    pub date: Option<String>,
    /// Last update timestamp, RFC 3339 as exported.
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub tags: Value,
    #[serde(default)]
    pub categories: Value,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub layout: Option<String>,
}

fn default_published() -> bool {
    true
}

impl ContentRecord {
    /// Create a published record with the given permalink and no other content.
    pub fn new(permalink: impl Into<String>) -> Self {
        Self {
            permalink: permalink.into(),
            path: None,
            title: None,
            raw: String::new(),
            excerpt: None,
            author: None,
            date: None,
            updated: None,
            tags: Value::Null,
            categories: Value::Null,
            published: true,
            layout: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set both the creation and update timestamps.
    pub fn with_dates(mut self, date: DateTime<Utc>, updated: DateTime<Utc>) -> Self {
        self.date = Some(date.to_rfc3339_opts(SecondsFormat::Millis, true));
        self.updated = Some(updated.to_rfc3339_opts(SecondsFormat::Millis, true));
        self
    }

    pub fn with_tags(mut self, tags: Vec<TagRef>) -> Self {
        self.tags = tag_list(tags);
        self
    }

    pub fn with_categories(mut self, categories: Vec<TagRef>) -> Self {
        self.categories = tag_list(categories);
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }
}

fn tag_list(tags: Vec<TagRef>) -> Value {
    Value::Array(
        tags.into_iter()
            .map(|tag| serde_json::to_value(tag).unwrap_or(Value::Null))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_record() {
        let record: ContentRecord =
            serde_json::from_value(json!({ "permalink": "https://example.com/a/" })).unwrap();

        assert_eq!(record.permalink, "https://example.com/a/");
        assert!(record.published);
        assert!(record.date.is_none());
        assert!(record.tags.is_null());
        assert!(record.layout.is_none());
    }

    #[test]
    fn test_deserialize_full_record() {
        let record: ContentRecord = serde_json::from_value(json!({
            "permalink": "https://example.com/2024/03/01/hello/",
            "title": "Hello",
            "raw": "# Hello\n\nWorld",
            "excerpt": "World",
            "date": "2024-03-01T10:00:00Z",
            "updated": "2024-03-02T11:30:00Z",
            "tags": [{ "name": "rust", "path": "tags/rust/", "_id": "x" }],
            "categories": "misc",
            "published": false,
            "layout": "post"
        }))
        .unwrap();

        assert_eq!(record.title.as_deref(), Some("Hello"));
        assert!(!record.published);
        assert!(record.tags.is_array());
        assert!(record.categories.is_string());
        assert_eq!(record.layout.as_deref(), Some("post"));
        assert_eq!(record.date.as_deref(), Some("2024-03-01T10:00:00Z"));
        assert_eq!(record.updated.as_deref(), Some("2024-03-02T11:30:00Z"));
    }

    #[test]
    fn test_unparsable_date_still_deserializes() {
        let record: ContentRecord = serde_json::from_value(json!({
            "permalink": "https://example.com/a/",
            "date": "last tuesday"
        }))
        .unwrap();

        assert_eq!(record.date.as_deref(), Some("last tuesday"));
    }

    #[test]
    fn test_with_dates_renders_rfc3339() {
        use chrono::TimeZone;

        let record = ContentRecord::new("u").with_dates(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        );

        assert_eq!(record.date.as_deref(), Some("2024-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_with_tags_builds_list() {
        let record = ContentRecord::new("u").with_tags(vec![TagRef::new("rust", "tags/rust/")]);

        assert_eq!(record.tags, json!([{ "name": "rust", "path": "tags/rust/" }]));
    }
}
