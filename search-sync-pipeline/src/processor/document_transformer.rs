//! Document transformer implementation.
//!
//! Maps content records onto the documents written to the search index.
//! The field table is fixed:
//!
//! | record        | document     |
//! |---------------|--------------|
//! | `title`       | `title`      |
//! | `excerpt`     | `excerpt`    |
//! | `author`      | `author`, or the default author |
//! | `raw`         | `content`    |
//! | `permalink`   | `url`, and the document key |
//! | `date`        | `created`    |
//! | `updated`     | `updated`    |
//! | `tags`        | `tags`       |
//! | `categories`  | `categories` |

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::SyncError;
use search_sync_shared::{document_key, ContentRecord, SearchDocument, TagRef};

/// Render a timestamp as ISO-8601 UTC with millisecond precision.
pub fn iso_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reduce a tag or category collection to `{name, path}` pairs.
///
/// Returns `None` when the value is not a list: the document then carries an
/// explicit `null` instead of failing the record. Bare strings in the list
/// are taken as tag names.
pub fn extract_tag_refs(value: &Value) -> Option<Vec<TagRef>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::String(name) => TagRef {
                    name: Some(name.clone()),
                    path: None,
                },
                other => TagRef {
                    name: string_field(other, "name"),
                    path: string_field(other, "path"),
                },
            })
            .collect(),
    )
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Parse an exported RFC 3339 timestamp of the named record field.
fn parse_timestamp(
    record: &ContentRecord,
    field: &str,
    value: Option<&str>,
) -> Result<DateTime<Utc>, SyncError> {
    let raw = value.ok_or_else(|| {
        SyncError::malformed(&record.permalink, format!("missing {} timestamp", field))
    })?;
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| {
            SyncError::malformed(
                &record.permalink,
                format!("invalid {} timestamp {:?}: {}", field, raw, e),
            )
        })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Transform one record.
///
/// Pure: no I/O, and the only failure is a record missing its permalink or
/// carrying a missing or unparsable timestamp.
pub fn transform(
    record: &ContentRecord,
    default_author: Option<&str>,
) -> Result<SearchDocument, SyncError> {
    if record.permalink.trim().is_empty() {
        return Err(SyncError::malformed(
            record.path.as_deref().unwrap_or("<unknown>"),
            "missing permalink",
        ));
    }

    let created = parse_timestamp(record, "date", record.date.as_deref())?;
    let updated = parse_timestamp(record, "updated", record.updated.as_deref())?;

    Ok(SearchDocument {
        document_key: document_key(&record.permalink),
        title: record.title.clone(),
        excerpt: record.excerpt.clone(),
        author: non_empty(&record.author).or_else(|| default_author.map(str::to_string)),
        content: record.raw.clone(),
        url: record.permalink.clone(),
        created_at: iso_timestamp(&created),
        updated_at: iso_timestamp(&updated),
        tags: extract_tag_refs(&record.tags),
        categories: extract_tag_refs(&record.categories),
    })
}

/// Transformer bound to the corpus-wide default author.
#[derive(Debug, Clone, Default)]
pub struct DocumentTransformer {
    default_author: Option<String>,
}

impl DocumentTransformer {
    /// Create a new transformer.
    pub fn new(default_author: Option<String>) -> Self {
        Self { default_author }
    }

    pub fn transform(&self, record: &ContentRecord) -> Result<SearchDocument, SyncError> {
        transform(record, self.default_author.as_deref())
    }

    /// Transform every record, stopping at the first malformed one.
    ///
    /// # Returns
    ///
    /// Documents in record order, or the error for the first bad record.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub fn transform_batch(&self, records: &[ContentRecord]) -> Result<Vec<SearchDocument>, SyncError> {
        let documents = records
            .iter()
            .map(|record| self.transform(record))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(document_count = documents.len(), "Transformed record batch");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn dated(permalink: &str) -> ContentRecord {
        ContentRecord::new(permalink).with_dates(
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 2, 11, 30, 15).unwrap(),
        )
    }

    #[test]
    fn test_transform_maps_fields() {
        let record = dated("https://example.com/2024/03/01/hello/")
            .with_title("Hello")
            .with_raw("# Hello\n\nWorld")
            .with_excerpt("World")
            .with_author("Ana")
            .with_tags(vec![TagRef::new("rust", "tags/rust/")])
            .with_categories(vec![TagRef::new("notes", "categories/notes/")]);

        let doc = transform(&record, Some("Site Owner")).unwrap();

        assert_eq!(doc.document_key, document_key("https://example.com/2024/03/01/hello/"));
        assert_eq!(doc.title.as_deref(), Some("Hello"));
        assert_eq!(doc.content, "# Hello\n\nWorld");
        assert_eq!(doc.excerpt.as_deref(), Some("World"));
        assert_eq!(doc.author.as_deref(), Some("Ana"));
        assert_eq!(doc.url, "https://example.com/2024/03/01/hello/");
        assert_eq!(doc.created_at, "2024-03-01T10:00:00.000Z");
        assert_eq!(doc.updated_at, "2024-03-02T11:30:15.000Z");
        assert_eq!(doc.tags, Some(vec![TagRef::new("rust", "tags/rust/")]));
        assert_eq!(
            doc.categories,
            Some(vec![TagRef::new("notes", "categories/notes/")])
        );
    }

    #[test]
    fn test_author_falls_back_to_default() {
        let doc = transform(&dated("u"), Some("Site Owner")).unwrap();
        assert_eq!(doc.author.as_deref(), Some("Site Owner"));

        let doc = transform(&dated("u").with_author(""), Some("Site Owner")).unwrap();
        assert_eq!(doc.author.as_deref(), Some("Site Owner"));

        let doc = transform(&dated("u"), None).unwrap();
        assert!(doc.author.is_none());
    }

    #[test]
    fn test_key_depends_only_on_url() {
        let a = transform(&dated("https://example.com/a/").with_title("First"), None).unwrap();
        let b = transform(
            &dated("https://example.com/a/")
                .with_title("Second")
                .with_raw("changed"),
            Some("Other"),
        )
        .unwrap();
        let c = transform(&dated("https://example.com/c/").with_title("First"), None).unwrap();

        assert_eq!(a.document_key, b.document_key);
        assert_ne!(a.document_key, c.document_key);
    }

    #[test]
    fn test_missing_dates_are_malformed() {
        let record = ContentRecord::new("https://example.com/a/");

        let result = transform(&record, None);
        assert!(matches!(
            result,
            Err(SyncError::MalformedRecordError { ref permalink, .. }) if permalink == "https://example.com/a/"
        ));

        let mut record = dated("https://example.com/a/");
        record.updated = None;
        assert!(transform(&record, None).is_err());
    }

    #[test]
    fn test_unparsable_date_is_malformed() {
        let mut record = dated("https://example.com/a/");
        record.date = Some("last tuesday".to_string());

        let result = transform(&record, None);
        assert!(matches!(
            result,
            Err(SyncError::MalformedRecordError { ref permalink, ref reason })
                if permalink == "https://example.com/a/" && reason.contains("last tuesday")
        ));
    }

    #[test]
    fn test_offset_dates_normalized_to_utc() {
        let mut record = dated("u");
        record.date = Some("2024-03-01T12:00:00+02:00".to_string());

        let doc = transform(&record, None).unwrap();
        assert_eq!(doc.created_at, "2024-03-01T10:00:00.000Z");
    }

    #[test]
    fn test_missing_permalink_is_malformed() {
        let mut record = dated("");
        record.path = Some("_posts/hello.md".to_string());

        let result = transform(&record, None);
        assert!(matches!(
            result,
            Err(SyncError::MalformedRecordError { ref permalink, .. }) if permalink == "_posts/hello.md"
        ));
    }

    #[test]
    fn test_extract_tag_refs() {
        assert_eq!(extract_tag_refs(&Value::Null), None);
        assert_eq!(extract_tag_refs(&json!("rust")), None);
        assert_eq!(extract_tag_refs(&json!({ "name": "rust" })), None);
        assert_eq!(extract_tag_refs(&json!([])), Some(vec![]));

        let refs = extract_tag_refs(&json!([
            { "name": "rust", "path": "tags/rust/", "_id": "ck1", "length": 4 },
            "async",
            { "name": "no-path" }
        ]))
        .unwrap();

        assert_eq!(refs[0], TagRef::new("rust", "tags/rust/"));
        assert_eq!(refs[1].name.as_deref(), Some("async"));
        assert!(refs[1].path.is_none());
        assert!(refs[2].path.is_none());
    }

    #[test]
    fn test_non_list_tags_serialize_as_null() {
        let mut record = dated("u");
        record.tags = json!("not a list");

        let doc = transform(&record, None).unwrap();
        let body = serde_json::to_value(&doc).unwrap();

        assert!(body["tags"].is_null());
        assert!(body["categories"].is_null());
    }

    #[test]
    fn test_transform_batch_fails_fast() {
        let transformer = DocumentTransformer::new(Some("Site Owner".to_string()));
        let records = vec![
            dated("https://example.com/a/"),
            ContentRecord::new("https://example.com/broken/"),
            dated("https://example.com/c/"),
        ];

        let result = transformer.transform_batch(&records);
        assert!(matches!(
            result,
            Err(SyncError::MalformedRecordError { ref permalink, .. }) if permalink == "https://example.com/broken/"
        ));
    }

    #[test]
    fn test_transform_batch_preserves_order() {
        let transformer = DocumentTransformer::default();
        let records: Vec<ContentRecord> = (0..5)
            .map(|i| dated(&format!("https://example.com/{}/", i)))
            .collect();

        let docs = transformer.transform_batch(&records).unwrap();

        let urls: Vec<&str> = docs.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/0/",
                "https://example.com/1/",
                "https://example.com/2/",
                "https://example.com/3/",
                "https://example.com/4/"
            ]
        );
    }
}
