//! Role value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A council seat (Value Object)
///
/// Roles are short uppercase identifiers such as `CTO` or `CISO`. They are
/// parsed case-insensitively and always stored uppercased, which lets the
/// question router compare them against free text with plain ASCII folding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role(String);

impl Role {
    /// Default reviewer roster, in deliberation order
    pub const DEFAULT_REVIEWERS: [&'static str; 4] = ["CPO", "CTO", "COO", "CISO"];

    /// Default synthesizer seat
    pub const DEFAULT_SYNTHESIZER: &'static str = "CEO";

    /// Parse a role identifier, returning an error for anything outside `[A-Za-z0-9_]+`
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || !trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(DomainError::InvalidRole(s.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn default_reviewers() -> Vec<Role> {
        Self::DEFAULT_REVIEWERS
            .iter()
            .map(|r| Role(r.to_string()))
            .collect()
    }

    pub fn default_synthesizer() -> Role {
        Role(Self::DEFAULT_SYNTHESIZER.to_string())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Role::parse(&s).map_err(serde::de::Error::custom)
    }
}
