//! Job entity and its status state machine

use crate::core::error::DomainError;
use crate::review::stage::StageProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque job identifier
///
/// Generated as a UUID v4 at submission. Parsing accepts any non-empty
/// `[A-Za-z0-9-]` string so identifiers are always safe as storage keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomainError::Validation(format!("malformed job id '{}'", s)));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        JobId::parse(&value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether a status record may move from `self` to `next`.
    ///
    /// Nothing ever returns to `queued` or `processing` once it has moved on,
    /// and `completed` accepts no further change. Same-status writes are
    /// allowed for `processing` (redelivery of an in-flight job) and `failed`
    /// (a retried attempt refreshing its error). A retried attempt that
    /// succeeds may promote `failed` to `completed`.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Queued, Processing)
                | (Processing, Processing)
                | (Processing, Completed)
                | (Processing, Failed)
                | (Failed, Failed)
                | (Failed, Completed)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A submitted council review (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<StageProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Dispatch attempts started so far
    #[serde(default)]
    pub attempts: u32,
}

impl Job {
    /// Create a freshly submitted job in `queued` status
    pub fn queued(id: JobId, webhook_url: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            created_at: now,
            started_at: None,
            completed_at: None,
            failed_at: None,
            error: None,
            progress: None,
            webhook_url,
            attempts: 0,
        }
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Record the start of a dispatch attempt.
    ///
    /// A job that already failed keeps its `failed` status while the attempt
    /// runs, since status never moves back to `processing`.
    pub fn begin_attempt(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.status {
            JobStatus::Failed => {}
            _ => self.transition(JobStatus::Processing)?,
        }
        self.attempts += 1;
        self.started_at = Some(now);
        Ok(())
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(JobStatus::Completed)?;
        self.completed_at = Some(now);
        self.error = None;
        Ok(())
    }

    pub fn fail(&mut self, now: DateTime<Utc>, error: impl Into<String>) -> Result<(), DomainError> {
        self.transition(JobStatus::Failed)?;
        self.failed_at = Some(now);
        self.error = Some(error.into());
        Ok(())
    }

    pub fn set_progress(&mut self, progress: StageProgress) {
        self.progress = Some(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::stage::Stage;

    fn job() -> Job {
        Job::queued(JobId::generate(), None, Utc::now())
    }

    #[test]
    fn test_happy_path() {
        let mut job = job();
        assert_eq!(job.status, JobStatus::Queued);

        job.begin_attempt(Utc::now()).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.attempts, 1);
        assert!(job.started_at.is_some());

        job.set_progress(StageProgress::new(Stage::Synthesis, "synthesis"));
        job.complete(Utc::now()).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut job = job();
        job.begin_attempt(Utc::now()).unwrap();
        job.complete(Utc::now()).unwrap();

        assert!(job.begin_attempt(Utc::now()).is_err());
        assert!(job.fail(Utc::now(), "late failure").is_err());
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.attempts, 1);
    }

    #[test]
    fn test_failed_never_returns_to_processing() {
        let mut job = job();
        job.begin_attempt(Utc::now()).unwrap();
        job.fail(Utc::now(), "provider down").unwrap();

        job.begin_attempt(Utc::now()).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.attempts, 2);

        job.fail(Utc::now(), "provider still down").unwrap();
        assert_eq!(job.error.as_deref(), Some("provider still down"));
    }

    #[test]
    fn test_no_transition_reaches_queued_or_leaves_completed_backwards() {
        use JobStatus::*;
        let all = [Queued, Processing, Completed, Failed];
        for from in all {
            assert!(!from.can_transition_to(Queued));
            for to in all {
                if from.is_terminal() && to == Processing {
                    assert!(!from.can_transition_to(to), "{} -> {}", from, to);
                }
                if from == Completed {
                    assert!(!from.can_transition_to(to), "{} -> {}", from, to);
                }
            }
        }
    }

    #[test]
    fn test_queued_cannot_skip_processing() {
        let mut job = job();
        assert!(job.complete(Utc::now()).is_err());
        assert!(job.fail(Utc::now(), "boom").is_err());
    }

    #[test]
    fn test_job_id_parse() {
        let id = JobId::generate();
        assert_eq!(JobId::parse(id.as_str()).unwrap(), id);
        assert!(JobId::parse("").is_err());
        assert!(JobId::parse("../etc/passwd").is_err());
        assert!(serde_json::from_str::<JobId>("\"a/b\"").is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&JobStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }
}
