//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod council;
mod provider;
mod worker;

pub use council::FileCouncilConfig;
pub use provider::{API_KEY_ENV_VARS, FileProviderConfig};
pub use worker::{FileStorageConfig, FileWebhookConfig, FileWorkerConfig};

use council_application::DispatchParams;
use council_domain::{ReviewConfig, StageTemperatures, is_valid_webhook_url};
use serde::{Deserialize, Serialize};

/// How serious a configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot be used for a review.
    Error,
    /// Usable, but probably not what was intended.
    Warning,
}

/// A problem found while validating the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending key, e.g. `worker.max_attempts`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(severity: Severity, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Council roster, models and instructions
    pub council: FileCouncilConfig,
    /// Per-stage sampling temperatures (uses domain type)
    pub temperatures: StageTemperatures,
    /// Dispatch and retry settings
    pub worker: FileWorkerConfig,
    /// Generation provider settings
    pub provider: FileProviderConfig,
    /// Object store settings
    pub storage: FileStorageConfig,
    /// Webhook delivery settings
    pub webhook: FileWebhookConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Model ids, role names and the council roster
    /// 2. Worker retry settings
    /// 3. Temperature ranges
    /// 4. The public base URL used for result links
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Council
        issues.extend(self.council.to_review_config().1);

        // 2. Worker
        if self.worker.max_attempts == 0 {
            issues.push(ConfigIssue::new(
                Severity::Error,
                "worker.max_attempts",
                "must be at least 1",
            ));
        }

        // 3. Temperatures
        let t = &self.temperatures;
        for (stage, value) in [(1, t.stage1), (2, t.stage2), (3, t.stage3), (4, t.stage4)] {
            if !(0.0..=2.0).contains(&value) {
                issues.push(ConfigIssue::new(
                    Severity::Warning,
                    format!("temperatures.stage{}", stage),
                    format!("{} is outside the usual 0.0-2.0 range", value),
                ));
            }
        }

        // 4. Result links
        if let Some(url) = &self.worker.public_base_url
            && !is_valid_webhook_url(url)
        {
            issues.push(ConfigIssue::new(
                Severity::Warning,
                "worker.public_base_url",
                format!("'{}' is not an absolute http(s) URL", url),
            ));
        }

        issues
    }

    /// Review configuration for submissions (issues are reported by [`Self::validate`])
    pub fn review_config(&self) -> ReviewConfig {
        self.council.to_review_config().0
    }

    pub fn dispatch_params(&self) -> DispatchParams {
        let mut params = DispatchParams::default()
            .with_max_attempts(self.worker.max_attempts)
            .with_temperatures(self.temperatures);
        if let Some(url) = &self.worker.public_base_url {
            params = params.with_public_base_url(url.clone());
        }
        params
    }
}
