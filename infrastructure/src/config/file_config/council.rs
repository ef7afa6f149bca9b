//! Council roster configuration from TOML (`[council]` section)

use super::{ConfigIssue, Severity};
use council_domain::{ModelId, ReviewConfig, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw council configuration from TOML
///
/// # Example
///
/// ```toml
/// [council]
/// executive_model = "openrouter:deepseek/deepseek-v3.2"
/// ceo_model = "anthropic:claude-sonnet-4-5-20250929"
/// operational_context = "Series B fintech, 40 engineers, SOC 2 in progress."
/// reviewers = ["CPO", "CTO", "COO", "CISO"]
/// synthesizer = "CEO"
///
/// [council.role_instructions]
/// CTO = "You are the CTO. Focus on architecture, scalability and technical debt."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Model for stages 1-3
    pub executive_model: Option<String>,
    /// Model for the stage 4 synthesis
    pub ceo_model: Option<String>,
    /// Organisation description injected into every prompt
    pub operational_context: String,
    /// Reviewer roster (default: CPO, CTO, COO, CISO)
    pub reviewers: Option<Vec<String>>,
    /// Synthesizing seat (default: CEO)
    pub synthesizer: Option<String>,
    /// Instructions keyed by role name
    #[serde(alias = "custom_role_instructions")]
    pub role_instructions: BTreeMap<String, String>,
}

impl FileCouncilConfig {
    fn parse_model(
        field: &str,
        value: Option<&String>,
        default: fn() -> ModelId,
    ) -> (ModelId, Vec<ConfigIssue>) {
        let Some(raw) = value else {
            return (default(), Vec::new());
        };
        match ModelId::parse(raw) {
            Ok(model) => (model, Vec::new()),
            Err(e) => (
                default(),
                vec![ConfigIssue::new(
                    Severity::Error,
                    format!("council.{}", field),
                    e.to_string(),
                )],
            ),
        }
    }

    pub fn parse_executive_model(&self) -> (ModelId, Vec<ConfigIssue>) {
        Self::parse_model(
            "executive_model",
            self.executive_model.as_ref(),
            ModelId::default_executive,
        )
    }

    pub fn parse_ceo_model(&self) -> (ModelId, Vec<ConfigIssue>) {
        Self::parse_model("ceo_model", self.ceo_model.as_ref(), ModelId::default_ceo)
    }

    /// Parse the roster; invalid names are reported and skipped
    pub fn parse_reviewers(&self) -> (Vec<Role>, Vec<ConfigIssue>) {
        let Some(raw) = &self.reviewers else {
            return (Role::default_reviewers(), Vec::new());
        };
        let mut issues = Vec::new();
        let mut roles = Vec::new();
        for name in raw {
            match Role::parse(name) {
                Ok(role) => roles.push(role),
                Err(e) => issues.push(ConfigIssue::new(
                    Severity::Error,
                    "council.reviewers",
                    e.to_string(),
                )),
            }
        }
        (roles, issues)
    }

    pub fn parse_synthesizer(&self) -> (Role, Vec<ConfigIssue>) {
        let Some(raw) = &self.synthesizer else {
            return (Role::default_synthesizer(), Vec::new());
        };
        match Role::parse(raw) {
            Ok(role) => (role, Vec::new()),
            Err(e) => (
                Role::default_synthesizer(),
                vec![ConfigIssue::new(
                    Severity::Error,
                    "council.synthesizer",
                    e.to_string(),
                )],
            ),
        }
    }

    pub fn parse_role_instructions(&self) -> (BTreeMap<Role, String>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut instructions = BTreeMap::new();
        for (name, text) in &self.role_instructions {
            match Role::parse(name) {
                Ok(role) => {
                    instructions.insert(role, text.clone());
                }
                Err(e) => issues.push(ConfigIssue::new(
                    Severity::Warning,
                    format!("council.role_instructions.{}", name),
                    e.to_string(),
                )),
            }
        }
        (instructions, issues)
    }

    /// Build a [`ReviewConfig`], collecting every issue found on the way.
    ///
    /// The returned config is only usable for a submission when no
    /// [`Severity::Error`] issue was reported.
    pub fn to_review_config(&self) -> (ReviewConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (executive_model, i) = self.parse_executive_model();
        issues.extend(i);
        let (ceo_model, i) = self.parse_ceo_model();
        issues.extend(i);
        let (reviewers, i) = self.parse_reviewers();
        issues.extend(i);
        let (synthesizer, i) = self.parse_synthesizer();
        issues.extend(i);
        let (role_instructions, i) = self.parse_role_instructions();
        issues.extend(i);

        let config = ReviewConfig {
            executive_model,
            ceo_model,
            operational_context: self.operational_context.clone(),
            role_instructions,
            reviewers,
            synthesizer,
        };

        if let Err(e) = config.validate() {
            issues.push(ConfigIssue::new(Severity::Error, "council", e.to_string()));
        }

        (config, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_instructions(roles: &[&str]) -> FileCouncilConfig {
        FileCouncilConfig {
            role_instructions: roles
                .iter()
                .map(|r| (r.to_string(), format!("You are the {}.", r)))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_need_instructions() {
        let (config, issues) = FileCouncilConfig::default().to_review_config();
        assert_eq!(config.reviewers, Role::default_reviewers());
        assert_eq!(config.executive_model, ModelId::default_executive());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("CPO, CTO, COO, CISO, CEO"));
    }

    #[test]
    fn test_complete_council() {
        let (config, issues) =
            with_instructions(&["CPO", "CTO", "COO", "CISO", "CEO"]).to_review_config();
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(config.instructions_for(&Role::parse("cto").unwrap()), "You are the CTO.");
    }

    #[test]
    fn test_custom_roster() {
        let mut council = with_instructions(&["CFO", "CLO", "CHAIR"]);
        council.reviewers = Some(vec!["cfo".into(), "CLO".into()]);
        council.synthesizer = Some("chair".into());

        let (config, issues) = council.to_review_config();
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(config.reviewers.len(), 2);
        assert_eq!(config.synthesizer.as_str(), "CHAIR");
    }

    #[test]
    fn test_invalid_entries_are_reported() {
        let mut council = with_instructions(&["CPO", "CTO", "COO", "CISO", "CEO"]);
        council.executive_model = Some("no-provider".into());
        council.reviewers = Some(vec!["CTO".into(), "C T O".into()]);

        let (config, issues) = council.to_review_config();
        assert_eq!(config.executive_model, ModelId::default_executive());
        assert_eq!(config.reviewers, vec![Role::parse("CTO").unwrap()]);
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"council.executive_model"));
        assert!(fields.contains(&"council.reviewers"));
    }

    #[test]
    fn test_legacy_instructions_key() {
        let toml_str = r#"
custom_role_instructions = { CTO = "Own the architecture." }
"#;
        let council: FileCouncilConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(council.role_instructions["CTO"], "Own the architecture.");
    }
}
