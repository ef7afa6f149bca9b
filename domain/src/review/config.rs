//! Review configuration entity

use crate::core::error::DomainError;
use crate::core::model_id::ModelId;
use crate::core::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Configuration for one council review
///
/// Stored alongside the document when a job is submitted and never changed
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Model used for stages 1-3
    #[serde(default = "ModelId::default_executive")]
    pub executive_model: ModelId,
    /// Model used for the stage 4 synthesis
    #[serde(default = "ModelId::default_ceo")]
    pub ceo_model: ModelId,
    /// Free text describing the organisation, injected into every prompt
    #[serde(default)]
    pub operational_context: String,
    /// Per-role instructions; must cover every reviewer and the synthesizer
    #[serde(default, alias = "custom_role_instructions")]
    pub role_instructions: BTreeMap<Role, String>,
    /// Reviewer roster, in deliberation order
    #[serde(default = "Role::default_reviewers")]
    pub reviewers: Vec<Role>,
    /// Seat that writes the final synthesis
    #[serde(default = "Role::default_synthesizer")]
    pub synthesizer: Role,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            executive_model: ModelId::default_executive(),
            ceo_model: ModelId::default_ceo(),
            operational_context: String::new(),
            role_instructions: BTreeMap::new(),
            reviewers: Role::default_reviewers(),
            synthesizer: Role::default_synthesizer(),
        }
    }
}

impl ReviewConfig {
    pub fn with_instruction(mut self, role: Role, instruction: impl Into<String>) -> Self {
        self.role_instructions.insert(role, instruction.into());
        self
    }

    pub fn with_reviewers(mut self, reviewers: Vec<Role>) -> Self {
        self.reviewers = reviewers;
        self
    }

    pub fn with_operational_context(mut self, context: impl Into<String>) -> Self {
        self.operational_context = context.into();
        self
    }

    /// Instructions for a role, or an empty string when none are configured
    pub fn instructions_for(&self, role: &Role) -> &str {
        self.role_instructions
            .get(role)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Every seat on the council: reviewers followed by the synthesizer
    pub fn all_roles(&self) -> impl Iterator<Item = &Role> {
        self.reviewers.iter().chain(std::iter::once(&self.synthesizer))
    }

    /// Validate the roster invariants
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.reviewers.is_empty() {
            return Err(DomainError::Validation(
                "at least one reviewer role is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for role in &self.reviewers {
            if !seen.insert(role) {
                return Err(DomainError::Validation(format!(
                    "reviewer role {} is listed twice",
                    role
                )));
            }
        }

        if seen.contains(&self.synthesizer) {
            return Err(DomainError::Validation(format!(
                "synthesizer {} must not also be a reviewer",
                self.synthesizer
            )));
        }

        let missing: Vec<&str> = self
            .all_roles()
            .filter(|r| !self.role_instructions.contains_key(*r))
            .map(Role::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::Validation(format!(
                "role instructions missing for: {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(s: &str) -> Role {
        Role::parse(s).unwrap()
    }

    fn complete_config() -> ReviewConfig {
        let mut config = ReviewConfig::default();
        for r in Role::DEFAULT_REVIEWERS.iter().chain([Role::DEFAULT_SYNTHESIZER].iter()) {
            config = config.with_instruction(role(r), format!("You are the {}.", r));
        }
        config
    }

    #[test]
    fn test_complete_config_is_valid() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_missing_synthesizer_instructions() {
        let mut config = complete_config();
        config.role_instructions.remove(&role("CEO"));
        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation("role instructions missing for: CEO".to_string())
        );
    }

    #[test]
    fn test_synthesizer_cannot_review() {
        let mut config = complete_config();
        config.reviewers.push(role("CEO"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_and_empty_rosters() {
        let config = complete_config().with_reviewers(vec![role("CTO"), role("cto")]);
        assert!(config.validate().is_err());

        let config = complete_config().with_reviewers(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_legacy_keys() {
        let json = r#"{
            "executive_model": "openrouter:deepseek/deepseek-v3.2",
            "operational_context": "Series A fintech",
            "custom_role_instructions": {"cto": "Own the architecture"}
        }"#;
        let config: ReviewConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.instructions_for(&role("CTO")), "Own the architecture");
        assert_eq!(config.instructions_for(&role("CPO")), "");
        assert_eq!(config.ceo_model, ModelId::default_ceo());
        assert_eq!(config.reviewers.len(), 4);
    }

    #[test]
    fn test_deserialize_rejects_bad_model() {
        let json = r#"{"ceo_model": "sonnet"}"#;
        assert!(serde_json::from_str::<ReviewConfig>(json).is_err());
    }
}
