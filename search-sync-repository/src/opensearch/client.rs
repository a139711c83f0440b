//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client. The same endpoints are served by
//! Elasticsearch, so the client works against either service.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cert::CertificateValidation,
    cluster::ClusterHealthParts,
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{
        IndicesCloseParts, IndicesCreateParts, IndicesDeleteParts, IndicesGetMappingParts,
        IndicesOpenParts, IndicesPutMappingParts, IndicesPutSettingsParts,
    },
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BulkResponse, ClusterHealth};
use search_sync_shared::IndexConfig;

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// use search_sync_shared::IndexConfig;
/// let config = IndexConfig::new("blog").with_credentials("elastic", "changeme");
/// let client = OpenSearchClient::new(&config)?;
/// let health = client.cluster_health().await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the service described by `config`.
    ///
    /// No request is sent; connectivity is checked by the first call.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL or transport setup is invalid
    pub fn new(config: &IndexConfig) -> Result<Self, SearchIndexError> {
        let base_url = config.url();
        let parsed_url = Url::parse(&base_url)
            .map_err(|e| SearchIndexError::connection(format!("{}: {}", base_url, e)))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();

        if config.credentials.is_complete() {
            builder = builder.auth(Credentials::Basic(
                config.credentials.username.clone(),
                config.credentials.password.clone(),
            ));
        }

        if !config.verify_certs {
            warn!(url = %base_url, "TLS certificate validation is disabled");
            builder = builder.cert_validation(CertificateValidation::None);
        }

        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(url = %base_url, "Created OpenSearch client");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Turn a non-success response into the matching error.
    async fn check_response(
        operation: &str,
        index: &str,
        response: Response,
    ) -> Result<Response, SearchIndexError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = status_error(operation, index, status.as_u16(), body);
        if !err.is_not_found() {
            error!(operation = operation, index = index, error = %err, "Request failed");
        }
        Err(err)
    }
}

/// Classify a failed response by status and error type.
fn status_error(operation: &str, index: &str, status: u16, body: String) -> SearchIndexError {
    match status {
        404 => SearchIndexError::IndexNotFound(index.to_string()),
        400 if body.contains("resource_already_exists_exception") => {
            SearchIndexError::IndexAlreadyExists(index.to_string())
        }
        _ => SearchIndexError::request(operation, status, body),
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    #[instrument(skip(self))]
    async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::transport("cluster_health", e.to_string()))?;

        let response = Self::check_response("cluster_health", "_cluster", response).await?;
        response
            .json::<ClusterHealth>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn get_mapping(&self, index: &str) -> Result<Value, SearchIndexError> {
        let response = self
            .client
            .indices()
            .get_mapping(IndicesGetMappingParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::transport("get_mapping", e.to_string()))?;

        let response = Self::check_response("get_mapping", index, response).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .send()
            .await
            .map_err(|e| SearchIndexError::transport("create_index", e.to_string()))?;

        Self::check_response("create_index", index, response).await?;
        debug!(index = index, "Index created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::transport("delete_index", e.to_string()))?;

        Self::check_response("delete_index", index, response).await?;
        debug!(index = index, "Index deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn close_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .close(IndicesCloseParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::transport("close_index", e.to_string()))?;

        Self::check_response("close_index", index, response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn open_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .open(IndicesOpenParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::transport("open_index", e.to_string()))?;

        Self::check_response("open_index", index, response).await?;
        Ok(())
    }

    #[instrument(skip(self, settings))]
    async fn put_settings(&self, index: &str, settings: &Value) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .put_settings(IndicesPutSettingsParts::Index(&[index]))
            .body(settings.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::transport("put_settings", e.to_string()))?;

        Self::check_response("put_settings", index, response).await?;
        Ok(())
    }

    #[instrument(skip(self, mapping))]
    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(mapping.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::transport("put_mapping", e.to_string()))?;

        Self::check_response("put_mapping", index, response).await?;
        Ok(())
    }

    #[instrument(skip(self, operations), fields(lines = operations.len()))]
    async fn bulk(&self, operations: Vec<Value>) -> Result<BulkResponse, SearchIndexError> {
        let body: Vec<JsonBody<Value>> = operations.into_iter().map(JsonBody::from).collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::transport("bulk", e.to_string()))?;

        let response = Self::check_response("bulk", "_bulk", response).await?;
        response
            .json::<BulkResponse>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }
}
