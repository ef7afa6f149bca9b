//! Domain layer for cxo-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A council is a roster of reviewer roles (CPO, CTO, COO, CISO by default)
//! plus one synthesizer seat (CEO). A review runs four stages:
//!
//! 1. **Independent review**: every reviewer reads the document
//! 2. **Cross-domain questions**: reviewers question each other
//! 3. **Targeted responses**: only addressed reviewers answer
//! 4. **Synthesis**: the synthesizer writes the decision
//!
//! ## Jobs
//!
//! Reviews run asynchronously as jobs whose status only ever moves forward:
//! `queued → processing → completed | failed`.

pub mod core;
pub mod job;
pub mod prompt;
pub mod review;
pub mod routing;

// Re-export commonly used types
pub use core::{error::DomainError, model_id::ModelId, role::Role};
pub use job::{
    BlobKey, BlobKind, Job, JobId, JobStatus, QueueMessage, WebhookPayload, is_valid_webhook_url,
};
pub use prompt::{PromptContext, PromptTemplate};
pub use review::{
    NO_RESPONSES_REQUIRED, ReviewConfig, ReviewResult, Stage, StageProgress, StageRecord,
    StageTemperatures, format_responses, format_stage,
};
pub use routing::{NO_DIRECTED_QUESTIONS, addressed_roles, extract_for};
