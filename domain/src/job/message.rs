//! Blob addressing and queue messages

use super::entities::JobId;
use serde::{Deserialize, Serialize};

/// Kind of blob stored per job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobKind {
    Document,
    Config,
    Result,
}

impl BlobKind {
    pub const ALL: [BlobKind; 3] = [BlobKind::Document, BlobKind::Config, BlobKind::Result];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlobKind::Document => "document",
            BlobKind::Config => "config",
            BlobKind::Result => "result",
        }
    }
}

/// Address of one blob: `(kind, job id)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobKey {
    pub kind: BlobKind,
    pub job_id: JobId,
}

impl BlobKey {
    pub fn new(kind: BlobKind, job_id: JobId) -> Self {
        Self { kind, job_id }
    }

    pub fn document(job_id: &JobId) -> Self {
        Self::new(BlobKind::Document, job_id.clone())
    }

    pub fn config(job_id: &JobId) -> Self {
        Self::new(BlobKind::Config, job_id.clone())
    }

    pub fn result(job_id: &JobId) -> Self {
        Self::new(BlobKind::Result, job_id.clone())
    }
}

impl std::fmt::Display for BlobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind.as_str(), self.job_id)
    }
}

/// Message handed from ingress to the dispatcher through the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    pub job_id: JobId,
    pub document_ref: BlobKey,
    pub config_ref: BlobKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl QueueMessage {
    pub fn for_job(job_id: &JobId, webhook_url: Option<String>) -> Self {
        Self {
            job_id: job_id.clone(),
            document_ref: BlobKey::document(job_id),
            config_ref: BlobKey::config(job_id),
            webhook_url,
        }
    }
}
