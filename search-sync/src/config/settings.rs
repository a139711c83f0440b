//! Settings resolution from the environment and the site config file.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::SearchSyncError;
use search_sync_pipeline::source::DEFAULT_PAGE_LAYOUT;
use search_sync_shared::{Credentials, IndexConfig};

/// Site config read when no path is given.
pub const DEFAULT_SITE_CONFIG: &str = "_config.yml";

const ENV_PROTOCOL: &str = "SEARCH_SYNC_PROTOCOL";
const ENV_HOST: &str = "SEARCH_SYNC_HOST";
const ENV_PORT: &str = "SEARCH_SYNC_PORT";
const ENV_USER: &str = "SEARCH_SYNC_USER";
const ENV_PASS: &str = "SEARCH_SYNC_PASS";
const ENV_INDEX: &str = "SEARCH_SYNC_INDEX";
const ENV_VERIFY_CERTS: &str = "SEARCH_SYNC_VERIFY_CERTS";

const LEGACY_ENV_PROTOCOL: &str = "HEXO_ES_PROT";
const LEGACY_ENV_HOST: &str = "HEXO_ES_HOST";
const LEGACY_ENV_PORT: &str = "HEXO_ES_PORT";
const LEGACY_ENV_USER: &str = "HEXO_ES_USER";
const LEGACY_ENV_PASS: &str = "HEXO_ES_PASS";

/// Site config file; only the keys read here are declared.
#[derive(Debug, Default, Deserialize)]
struct SiteConfig {
    #[serde(default)]
    author: Option<serde_yaml::Value>,
    #[serde(default)]
    search_sync: Option<SearchSyncSection>,
    /// Section name used by older site configs.
    #[serde(default)]
    elasticsearch: Option<LegacySection>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacySection {
    index: Option<String>,
    author: Option<String>,
    #[serde(rename = "esProt")]
    protocol: Option<String>,
    #[serde(rename = "esHost")]
    host: Option<String>,
    /// Older configs quote the port.
    #[serde(rename = "esPort")]
    port: Option<serde_yaml::Value>,
    #[serde(rename = "esUser")]
    username: Option<String>,
    #[serde(rename = "esPass")]
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchSyncSection {
    index: Option<String>,
    author: Option<String>,
    protocol: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    verify_certs: Option<bool>,
    layouts: Option<Vec<String>>,
    chunk_size: Option<usize>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub index: IndexConfig,
    /// Page layouts eligible for indexing.
    pub page_layouts: Vec<String>,
    /// Chunk size from the site config, if set there.
    pub chunk_size: Option<usize>,
}

impl Settings {
    /// Load `.env`, read the site config at `path` and resolve.
    ///
    /// A missing site config is not an error.
    pub async fn load(path: &Path) -> Result<Self, SearchSyncError> {
        if let Ok(env_file) = dotenv::dotenv() {
            debug!(path = %env_file.display(), "Loaded environment file");
        }

        let yaml = match tokio::fs::read_to_string(path).await {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No site config found, using environment only");
                None
            }
            Err(e) => {
                return Err(SearchSyncError::config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Self::resolve(|key| std::env::var(key).ok(), yaml.as_deref())
    }

    /// Resolve settings from an environment lookup and optional YAML text.
    ///
    /// Precedence, lowest first: defaults, the legacy `HEXO_ES_*`
    /// variables, the `SEARCH_SYNC_*` variables, the legacy `elasticsearch`
    /// section, the `search_sync` section.
    pub fn resolve<F>(env: F, yaml: Option<&str>) -> Result<Self, SearchSyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let site = match yaml {
            Some(text) if !text.trim().is_empty() => serde_yaml::from_str::<SiteConfig>(text)
                .map_err(|e| SearchSyncError::config(format!("invalid site config: {}", e)))?,
            _ => SiteConfig::default(),
        };
        let section = site.search_sync.unwrap_or_default();
        let legacy = site.elasticsearch.unwrap_or_default();
        let env_or_legacy = |key: &str, legacy_key: &str| env(key).or_else(|| env(legacy_key));

        let mut index = IndexConfig::new(
            section
                .index
                .or(legacy.index)
                .or_else(|| env(ENV_INDEX))
                .unwrap_or_default(),
        );

        if let Some(protocol) = section
            .protocol
            .or(legacy.protocol)
            .or_else(|| env_or_legacy(ENV_PROTOCOL, LEGACY_ENV_PROTOCOL))
        {
            index.protocol = protocol;
        }
        if let Some(host) = section
            .host
            .or(legacy.host)
            .or_else(|| env_or_legacy(ENV_HOST, LEGACY_ENV_HOST))
        {
            index.host = host;
        }
        if let Some(port) = section.port {
            index.port = port;
        } else if let Some(value) = legacy.port {
            index.port = yaml_port(&value)?;
        } else if let Some(port) = env_or_legacy(ENV_PORT, LEGACY_ENV_PORT) {
            index.port = parse_port(&port)?;
        }
        match section.verify_certs {
            Some(verify) => index.verify_certs = verify,
            None => {
                if let Some(value) = env(ENV_VERIFY_CERTS) {
                    index.verify_certs = parse_flag(&value).ok_or_else(|| {
                        SearchSyncError::config(format!(
                            "{} must be true or false: {}",
                            ENV_VERIFY_CERTS, value
                        ))
                    })?;
                }
            }
        }

        index.credentials = Credentials::new(
            section
                .username
                .or(legacy.username)
                .or_else(|| env_or_legacy(ENV_USER, LEGACY_ENV_USER))
                .unwrap_or_default(),
            section
                .password
                .or(legacy.password)
                .or_else(|| env_or_legacy(ENV_PASS, LEGACY_ENV_PASS))
                .unwrap_or_default(),
        );

        let site_author = site
            .author
            .as_ref()
            .and_then(|value| value.as_str())
            .map(str::to_string);
        index.default_author = section
            .author
            .or(legacy.author)
            .or(site_author)
            .filter(|author| !author.trim().is_empty());

        let page_layouts = section
            .layouts
            .unwrap_or_else(|| vec![DEFAULT_PAGE_LAYOUT.to_string()]);

        Ok(Self {
            index,
            page_layouts,
            chunk_size: section.chunk_size,
        })
    }
}

fn parse_port(value: &str) -> Result<u16, SearchSyncError> {
    value
        .trim()
        .parse()
        .map_err(|_| SearchSyncError::config(format!("not a valid port: {}", value)))
}

fn yaml_port(value: &serde_yaml::Value) -> Result<u16, SearchSyncError> {
    match value {
        serde_yaml::Value::Number(n) => n
            .as_u64()
            .and_then(|port| u16::try_from(port).ok())
            .ok_or_else(|| SearchSyncError::config(format!("not a valid port: {}", n))),
        serde_yaml::Value::String(s) => parse_port(s),
        _ => Err(SearchSyncError::config("esPort must be a number")),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
