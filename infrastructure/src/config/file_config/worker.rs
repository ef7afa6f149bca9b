//! Worker, storage and webhook settings (`[worker]`, `[storage]`, `[webhook]`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw worker configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkerConfig {
    /// Attempts per job before it is dead-lettered (default: 3)
    pub max_attempts: u32,
    /// Delay before a failed job is redelivered (default: 1000)
    pub retry_delay_ms: u64,
    /// How long status records are kept (default: 7 days)
    pub status_ttl_secs: u64,
    /// Base URL used to build `result_url` in webhook payloads
    pub public_base_url: Option<String>,
}

impl Default for FileWorkerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 1000,
            status_ttl_secs: 7 * 24 * 60 * 60,
            public_base_url: None,
        }
    }
}

impl FileWorkerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_secs)
    }
}

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory for the filesystem object store; in-memory when unset
    pub data_dir: Option<PathBuf>,
}

/// Raw webhook configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWebhookConfig {
    /// Request timeout for webhook deliveries (default: 10)
    pub timeout_secs: u64,
}

impl Default for FileWebhookConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl FileWebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
