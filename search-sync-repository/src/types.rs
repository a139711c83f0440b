//! Request and response types for search index operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `GET /_cluster/health`, reduced to what the synchronizer reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterHealth {
    pub status: String,
    #[serde(default)]
    pub number_of_nodes: u64,
}

impl ClusterHealth {
    pub fn is_red(&self) -> bool {
        self.status == "red"
    }
}

/// Body of a `POST /_bulk` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    /// True when at least one item failed.
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BulkResponseItem>,
}

/// One entry of `items` in a bulk response, keyed by the action name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResponseItem {
    #[serde(rename = "index", alias = "create", alias = "update", alias = "delete")]
    pub outcome: BulkItemOutcome,
}

/// Outcome of a single bulk action as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItemOutcome {
    #[serde(rename = "_index", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl BulkItemOutcome {
    /// An item succeeded when it reports no error and a 2xx status.
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}

/// Why a single document was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemError {
    pub error_type: String,
    pub reason: String,
}

impl BulkItemError {
    pub fn new(error_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            reason: reason.into(),
        }
    }

    /// Read the `error` object of a bulk item. Some services report a bare
    /// string instead of `{type, reason}`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(reason) => Self::new("error", reason.clone()),
            other => Self::new(
                other
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("error"),
                other
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            ),
        }
    }
}

impl fmt::Display for BulkItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.reason)
    }
}

/// Result of a bulk write for a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOperationResult {
    pub document_key: String,
    pub succeeded: bool,
    /// HTTP status for the item, or for the whole request when it was rejected.
    /// `None` when the service never reported on the item.
    pub status_code: Option<u16>,
    pub error_detail: Option<BulkItemError>,
}

impl BulkOperationResult {
    pub fn success(document_key: impl Into<String>, status_code: u16) -> Self {
        Self {
            document_key: document_key.into(),
            succeeded: true,
            status_code: Some(status_code),
            error_detail: None,
        }
    }

    pub fn failure(
        document_key: impl Into<String>,
        status_code: Option<u16>,
        error: BulkItemError,
    ) -> Self {
        Self {
            document_key: document_key.into(),
            succeeded: false,
            status_code,
            error_detail: Some(error),
        }
    }
}

/// Summary of a bulk request containing aggregate statistics and individual results.
///
/// Callers get the success count even when some items failed, and can
/// inspect every failure without re-parsing the raw response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOperationSummary {
    /// Total number of documents in the request.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Individual results in request order.
    pub results: Vec<BulkOperationResult>,
}

impl BatchOperationSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the counters from a list of results.
    pub fn from_results(results: Vec<BulkOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.succeeded).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &BulkOperationResult> {
        self.results.iter().filter(|r| !r.succeeded)
    }
}
