//! Configuration management for Floodgate.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FloodgateError, Result};

/// Configuration for a single rate limit policy.
///
/// Every field has a default, so a policy can be built from an empty
/// document or via [`Default`]. `limit` is presence-checked through
/// serde's per-field defaults: an explicit `limit: 0` is a legal
/// block-everything policy and is distinct from leaving the field
/// unset (which yields 60).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum number of requests a client may make per period.
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Length of the rate limit window in milliseconds.
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    /// Message returned to clients whose requests are rejected.
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            period_ms: default_period_ms(),
            message: default_message(),
        }
    }
}

fn default_limit() -> u64 {
    60
}

fn default_period_ms() -> u64 {
    60_000
}

fn default_message() -> String {
    "Connection limit exceeded. Please try again later.".to_string()
}

impl RateLimitConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self> {
        info!(path = %path, "Loading rate limit configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| FloodgateError::Config(format!("Failed to parse rate limit config: {}", e)))
    }
}
