//! Gate endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds to wait for a remote decision before falling back to the cache.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 2;

/// Seconds a cached decision remains trustworthy while offline.
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 3600;

/// Maximum distinct credentials remembered by the cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("cache_capacity must be greater than zero")]
    ZeroCapacity,

    #[error("authorization_endpoint must not be empty")]
    EmptyEndpoint,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Maximum time to wait for a remote decision before falling back.
    pub request_timeout_secs: u64,

    /// How long a cached grant/deny remains trustworthy while offline.
    pub cache_max_age_secs: u64,

    /// Maximum distinct credentials remembered.
    pub cache_capacity: usize,

    /// Address of the remote authorization service.
    pub authorization_endpoint: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            authorization_endpoint: "http://127.0.0.1:8000/".to_string(),
        }
    }
}

impl GateConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.authorization_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        Ok(())
    }
}
