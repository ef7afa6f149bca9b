//! Infrastructure layer for cxo-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod providers;
pub mod queue;
pub mod storage;
pub mod webhook;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileCouncilConfig, FileProviderConfig,
    FileStorageConfig, FileWebhookConfig, FileWorkerConfig, Severity,
};
pub use providers::OpenRouterGateway;
pub use queue::{DeadLetter, InMemoryJobQueue};
pub use storage::{DEFAULT_STATUS_TTL, FsObjectStore, InMemoryObjectStore, InMemoryStatusStore};
pub use webhook::HttpWebhookNotifier;
