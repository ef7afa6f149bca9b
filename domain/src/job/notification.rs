//! Webhook notification payload

use super::entities::{Job, JobStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Body POSTed to a job's webhook when it completes or fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
}

impl WebhookPayload {
    /// Build the payload for a job in a terminal state.
    ///
    /// Only the timestamp matching the status is included, and `result_url`
    /// is only attached to completed jobs.
    pub fn for_job(job: &Job, result_url: Option<String>) -> Self {
        let completed = job.status == JobStatus::Completed;
        Self {
            job_id: job.id.to_string(),
            status: job.status,
            completed_at: job.completed_at.filter(|_| completed),
            failed_at: job.failed_at.filter(|_| !completed),
            error: job.error.clone().filter(|_| !completed),
            result_url: result_url.filter(|_| completed),
        }
    }
}

/// Check that a webhook target is an absolute http(s) URL
pub fn is_valid_webhook_url(s: &str) -> bool {
    Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}
