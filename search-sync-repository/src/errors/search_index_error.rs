//! Search index error types.
//!
//! This module defines the error types that can occur while talking to the
//! remote search index.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., missing index name).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The client could not be set up (bad URL, TLS configuration).
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request never produced an HTTP response.
    #[error("Transport error during {operation}: {message}")]
    TransportError { operation: String, message: String },

    /// The index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// The index already exists.
    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    /// The service answered with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    RequestError {
        operation: String,
        status: u16,
        body: String,
    },

    /// Failed to parse a response from the service.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a transport error for the given operation.
    pub fn transport(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::TransportError {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create a request error from a non-success response.
    pub fn request(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::RequestError {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }

    /// The service could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportError { .. } | Self::ConnectionError(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IndexNotFound(_))
    }
}
