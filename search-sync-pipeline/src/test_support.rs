//! In-memory search service used by the pipeline tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use search_sync_repository::{
    BulkResponse, ClusterHealth, SearchIndexClient, SearchIndexError, SearchIndexProvider,
};
use search_sync_shared::ContentRecord;

/// A call received by the mock service.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Health,
    GetMapping(String),
    Create(String),
    Delete(String),
    Close(String),
    Open(String),
    PutSettings(String),
    PutMapping(String),
    Bulk(Vec<Value>),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    indices: HashSet<String>,
    /// Stored documents per index, keyed by `_id`.
    documents: HashMap<String, BTreeMap<String, Value>>,
    bulk_count: usize,
}

/// Mock search service recording every call.
///
/// Failures are injected per operation name (`"health"`, `"put_settings"`,
/// ...) or per bulk call number (0-based).
#[derive(Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<State>>,
    failing_operations: Arc<HashSet<&'static str>>,
    mapping_probe_error: bool,
    /// Bulk call number -> item positions reported as failed.
    bulk_item_failures: Arc<HashMap<usize, Vec<usize>>>,
    /// Bulk call numbers answered with HTTP 413.
    bulk_rejections: Arc<HashSet<usize>>,
    /// Bulk call numbers that fail without a response.
    bulk_transport_failures: Arc<HashSet<usize>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(self, index: &str) -> Self {
        if let Ok(mut state) = self.state.try_lock() {
            state.indices.insert(index.to_string());
        }
        self
    }

    pub fn failing(mut self, operation: &'static str) -> Self {
        let mut set = (*self.failing_operations).clone();
        set.insert(operation);
        self.failing_operations = Arc::new(set);
        self
    }

    /// Existence probes fail with a non-404 error.
    pub fn with_mapping_probe_error(mut self) -> Self {
        self.mapping_probe_error = true;
        self
    }

    pub fn with_bulk_item_failures(mut self, bulk_call: usize, positions: Vec<usize>) -> Self {
        let mut map = (*self.bulk_item_failures).clone();
        map.insert(bulk_call, positions);
        self.bulk_item_failures = Arc::new(map);
        self
    }

    pub fn with_bulk_rejection(mut self, bulk_call: usize) -> Self {
        let mut set = (*self.bulk_rejections).clone();
        set.insert(bulk_call);
        self.bulk_rejections = Arc::new(set);
        self
    }

    pub fn with_bulk_transport_failure(mut self, bulk_call: usize) -> Self {
        let mut set = (*self.bulk_transport_failures).clone();
        set.insert(bulk_call);
        self.bulk_transport_failures = Arc::new(set);
        self
    }

    /// Wrap a clone of this mock in a client; the mock keeps observing calls.
    pub fn client(&self) -> Arc<SearchIndexClient> {
        Arc::new(SearchIndexClient::new(Box::new(self.clone())))
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    /// Bulk payloads in the order they were received.
    pub async fn bulk_calls(&self) -> Vec<Vec<Value>> {
        self.calls()
            .await
            .into_iter()
            .filter_map(|call| match call {
                Call::Bulk(lines) => Some(lines),
                _ => None,
            })
            .collect()
    }

    pub async fn index_exists(&self, index: &str) -> bool {
        self.state.lock().await.indices.contains(index)
    }

    /// Document ids stored in the index.
    pub async fn stored_ids(&self, index: &str) -> Vec<String> {
        self.state
            .lock()
            .await
            .documents
            .get(index)
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default()
    }

    async fn record(&self, call: Call) {
        self.state.lock().await.calls.push(call);
    }

    fn check(&self, operation: &'static str) -> Result<(), SearchIndexError> {
        if self.failing_operations.contains(operation) {
            return Err(SearchIndexError::request(operation, 500, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchIndexProvider for MockProvider {
    async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError> {
        self.record(Call::Health).await;
        if self.failing_operations.contains("health") {
            return Err(SearchIndexError::transport("cluster_health", "connection refused"));
        }
        Ok(ClusterHealth {
            status: "green".to_string(),
            number_of_nodes: 1,
        })
    }

    async fn get_mapping(&self, index: &str) -> Result<Value, SearchIndexError> {
        self.record(Call::GetMapping(index.to_string())).await;
        if self.mapping_probe_error {
            return Err(SearchIndexError::request("get_mapping", 503, "unavailable"));
        }
        if self.state.lock().await.indices.contains(index) {
            Ok(json!({ "mappings": {} }))
        } else {
            Err(SearchIndexError::IndexNotFound(index.to_string()))
        }
    }

    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.record(Call::Create(index.to_string())).await;
        self.check("create_index")?;
        if !self.state.lock().await.indices.insert(index.to_string()) {
            return Err(SearchIndexError::IndexAlreadyExists(index.to_string()));
        }
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.record(Call::Delete(index.to_string())).await;
        self.check("delete_index")?;
        let mut state = self.state.lock().await;
        if !state.indices.remove(index) {
            return Err(SearchIndexError::IndexNotFound(index.to_string()));
        }
        state.documents.remove(index);
        Ok(())
    }

    async fn close_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.record(Call::Close(index.to_string())).await;
        self.check("close_index")
    }

    async fn open_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.record(Call::Open(index.to_string())).await;
        self.check("open_index")
    }

    async fn put_settings(&self, index: &str, _settings: &Value) -> Result<(), SearchIndexError> {
        self.record(Call::PutSettings(index.to_string())).await;
        self.check("put_settings")
    }

    async fn put_mapping(&self, index: &str, _mapping: &Value) -> Result<(), SearchIndexError> {
        self.record(Call::PutMapping(index.to_string())).await;
        self.check("put_mapping")
    }

    async fn bulk(&self, operations: Vec<Value>) -> Result<BulkResponse, SearchIndexError> {
        self.record(Call::Bulk(operations.clone())).await;

        let mut state = self.state.lock().await;
        let call_number = state.bulk_count;
        state.bulk_count += 1;

        if self.bulk_transport_failures.contains(&call_number) {
            return Err(SearchIndexError::transport("bulk", "connection reset"));
        }
        if self.bulk_rejections.contains(&call_number) {
            return Err(SearchIndexError::request("bulk", 413, "request entity too large"));
        }

        let failing = self
            .bulk_item_failures
            .get(&call_number)
            .cloned()
            .unwrap_or_default();

        let mut items = Vec::new();
        for (position, pair) in operations.chunks(2).enumerate() {
            let index = pair[0]["index"]["_index"].as_str().unwrap_or_default().to_string();
            let id = pair[0]["index"]["_id"].as_str().unwrap_or_default().to_string();

            if failing.contains(&position) {
                items.push(json!({ "index": {
                    "_index": index, "_id": id, "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "injected item failure" }
                }}));
                continue;
            }

            let docs = state.documents.entry(index.clone()).or_default();
            let status = if docs.insert(id.clone(), pair[1].clone()).is_some() {
                200
            } else {
                201
            };
            items.push(json!({ "index": { "_index": index, "_id": id, "status": status } }));
        }

        serde_json::from_value(json!({
            "took": 1,
            "errors": !failing.is_empty(),
            "items": items
        }))
        .map_err(|e| SearchIndexError::parse(e.to_string()))
    }
}

/// A publishable record with both timestamps set.
pub fn record(permalink: &str) -> ContentRecord {
    ContentRecord::new(permalink)
        .with_title(format!("Title {}", permalink))
        .with_raw("body text")
        .with_dates(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        )
}

/// `count` distinct records.
pub fn records(count: usize) -> Vec<ContentRecord> {
    (0..count)
        .map(|i| record(&format!("https://example.com/posts/{}/", i)))
        .collect()
}
