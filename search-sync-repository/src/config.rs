//! Limits applied by the SearchIndexClient before a request leaves the process.

use crate::errors::SearchIndexError;

/// Default cap on documents per bulk request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Client-side limits for the SearchIndexClient.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    /// Maximum number of documents allowed in a single bulk request.
    /// `None` disables the check.
    pub max_batch_size: Option<usize>,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(DEFAULT_MAX_BATCH_SIZE),
        }
    }
}

impl SearchIndexConfig {
    /// No bulk size limit.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
        }
    }

    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
        }
    }

    /// Reject bulk requests above the configured limit.
    pub fn check_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        match self.max_batch_size {
            Some(max) if size > max => Err(SearchIndexError::batch_size_exceeded(size, max)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_batch_size() {
        let config = SearchIndexConfig::with_max_batch_size(50);

        assert!(config.check_batch_size(50).is_ok());
        assert!(matches!(
            config.check_batch_size(51),
            Err(SearchIndexError::BatchSizeExceeded {
                provided: 51,
                max: 50
            })
        ));
        assert!(SearchIndexConfig::unlimited().check_batch_size(1_000_000).is_ok());
    }
}
