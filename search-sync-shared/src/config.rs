//! Resolved connection settings for the remote search index.

use std::fmt;

/// Default protocol used to reach the search service.
pub const DEFAULT_PROTOCOL: &str = "https";

/// Default search service host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default search service port.
pub const DEFAULT_PORT: u16 = 9200;

/// HTTP basic auth credentials for the search service.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are present.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection and naming settings for one synchronization run.
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
    pub index_name: String,
    /// Author used for records that do not name one.
    pub default_author: Option<String>,
    /// Validate the service's TLS certificate.
    pub verify_certs: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            credentials: Credentials::default(),
            index_name: String::new(),
            default_author: None,
            verify_certs: true,
        }
    }
}

impl IndexConfig {
    /// Create a config for the given index with default connection settings.
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials::new(username, password);
        self
    }

    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = Some(author.into());
        self
    }

    /// Base URL of the search service, without credentials.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}
