//! Model identifier value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Namespaced model identifier of the form `provider:model-name` (Value Object)
///
/// The domain never interprets the identifier beyond checking its shape;
/// gateways receive it unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(String);

impl ModelId {
    pub const DEFAULT_EXECUTIVE: &'static str = "openrouter:deepseek/deepseek-v3.2";
    pub const DEFAULT_CEO: &'static str = "anthropic:claude-sonnet-4-5-20250929";

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.split_once(':') {
            Some((provider, name)) if !provider.trim().is_empty() && !name.trim().is_empty() => {
                Ok(Self(s.to_string()))
            }
            _ => Err(DomainError::InvalidModelId(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The provider namespace (text before the first `:`)
    pub fn provider(&self) -> &str {
        self.0.split_once(':').map(|(p, _)| p).unwrap_or_default()
    }

    /// The provider-local model name (text after the first `:`)
    pub fn name(&self) -> &str {
        self.0.split_once(':').map(|(_, n)| n).unwrap_or_default()
    }

    pub fn default_executive() -> Self {
        Self(Self::DEFAULT_EXECUTIVE.to_string())
    }

    pub fn default_ceo() -> Self {
        Self(Self::DEFAULT_CEO.to_string())
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::parse(s)
    }
}

impl Serialize for ModelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ModelId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_parts() {
        let id: ModelId = "openrouter:deepseek/deepseek-v3.2".parse().unwrap();
        assert_eq!(id.provider(), "openrouter");
        assert_eq!(id.name(), "deepseek/deepseek-v3.2");
        assert_eq!(id.to_string(), "openrouter:deepseek/deepseek-v3.2");
    }

    #[test]
    fn test_name_may_contain_colons() {
        let id = ModelId::parse("local:llama3:8b").unwrap();
        assert_eq!(id.provider(), "local");
        assert_eq!(id.name(), "llama3:8b");
    }

    #[test]
    fn test_rejects_unnamespaced() {
        assert!(ModelId::parse("gpt-5").is_err());
        assert!(ModelId::parse(":gpt-5").is_err());
        assert!(ModelId::parse("openai:").is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(ModelId::parse(ModelId::DEFAULT_EXECUTIVE).is_ok());
        assert!(ModelId::parse(ModelId::DEFAULT_CEO).is_ok());
    }
}
