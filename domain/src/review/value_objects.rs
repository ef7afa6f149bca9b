//! Review value objects - immutable outputs of a deliberation run.
//!
//! - [`StageRecord`] - one role's response within one stage
//! - [`ReviewResult`] - complete output of all four stages

use crate::core::role::Role;
use serde::{Deserialize, Serialize};

/// One role's response in a single stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub role: Role,
    pub response: String,
}

impl StageRecord {
    pub fn new(role: Role, response: impl Into<String>) -> Self {
        Self {
            role,
            response: response.into(),
        }
    }
}

/// Complete result of a council review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Stage 1: independent domain reviews, in roster order
    pub stage1: Vec<StageRecord>,
    /// Stage 2: cross-domain questions, in roster order
    pub stage2: Vec<StageRecord>,
    /// Stage 3: answers from addressed roles only (may be empty)
    pub stage3: Vec<StageRecord>,
    /// Stage 4: the synthesizer's decision document
    pub synthesis: String,
}

impl ReviewResult {
    /// Roles that answered directed questions in stage 3
    pub fn responding_roles(&self) -> impl Iterator<Item = &Role> {
        self.stage3.iter().map(|r| &r.role)
    }
}
