//! Deliberation stages

use serde::{Deserialize, Serialize};

/// One of the four sequential deliberation phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Stage 1 - every reviewer reviews the document independently
    IndependentReview,
    /// Stage 2 - reviewers raise cross-domain questions after reading stage 1
    CrossDomainQuestions,
    /// Stage 3 - addressed reviewers answer the questions directed at them
    TargetedResponses,
    /// Stage 4 - the synthesizer produces the final decision
    Synthesis,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::IndependentReview,
        Stage::CrossDomainQuestions,
        Stage::TargetedResponses,
        Stage::Synthesis,
    ];

    /// 1-based stage number, as reported in job progress
    pub fn number(&self) -> u8 {
        match self {
            Stage::IndependentReview => 1,
            Stage::CrossDomainQuestions => 2,
            Stage::TargetedResponses => 3,
            Stage::Synthesis => 4,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::IndependentReview => "Executive Domain Reviews",
            Stage::CrossDomainQuestions => "Cross-Domain Questions",
            Stage::TargetedResponses => "Responses to Questions",
            Stage::Synthesis => "Synthesis",
        }
    }

    /// Separator placed between per-role blocks when a stage is aggregated
    pub fn separator(&self) -> &'static str {
        match self {
            Stage::IndependentReview => "\n---\n",
            _ => "\n",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {}: {}", self.number(), self.display_name())
    }
}

/// Sampling temperature per stage
///
/// Defaults: 0.7 / 0.6 / 0.7 / 0.7. Stage 2 runs slightly cooler so the
/// questions stay on the stage 1 material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTemperatures {
    pub stage1: f32,
    pub stage2: f32,
    pub stage3: f32,
    pub stage4: f32,
}

impl Default for StageTemperatures {
    fn default() -> Self {
        Self {
            stage1: 0.7,
            stage2: 0.6,
            stage3: 0.7,
            stage4: 0.7,
        }
    }
}

impl StageTemperatures {
    pub fn for_stage(&self, stage: Stage) -> f32 {
        match stage {
            Stage::IndependentReview => self.stage1,
            Stage::CrossDomainQuestions => self.stage2,
            Stage::TargetedResponses => self.stage3,
            Stage::Synthesis => self.stage4,
        }
    }
}

/// Progress marker written to the job record before every generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    /// 1-based stage number
    pub stage: u8,
    /// Role being queried, or `"synthesis"` for stage 4
    pub step: String,
}

impl StageProgress {
    pub fn new(stage: Stage, step: impl Into<String>) -> Self {
        Self {
            stage: stage.number(),
            step: step.into(),
        }
    }
}
