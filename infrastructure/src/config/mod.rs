//! Configuration file loading for cxo-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `COUNCIL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/cxo-council/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    API_KEY_ENV_VARS, ConfigIssue, FileConfig, FileCouncilConfig, FileProviderConfig,
    FileStorageConfig, FileWebhookConfig, FileWorkerConfig, Severity,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
