//! Generation gateway port
//!
//! Defines the single operation the council needs from a text-generation
//! provider: `generate(prompt, model, temperature) -> text`.

use async_trait::async_trait;
use council_domain::ModelId;
use thiserror::Error;

/// Failure reported by a generation provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Provider error{}: {message}",
    .status_code.map(|c| format!(" (status {c})")).unwrap_or_default()
)]
pub struct ProviderError {
    /// HTTP status code, when the provider answered at all
    pub status_code: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
        }
    }

    pub fn with_status(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            message: message.into(),
        }
    }
}

/// Gateway for text generation
///
/// Implementations (adapters) live in the infrastructure layer. The model id
/// is passed through exactly as configured; adapters decide how to map it.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        model: &ModelId,
        temperature: f32,
    ) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        assert_eq!(
            ProviderError::with_status(429, "rate limited").to_string(),
            "Provider error (status 429): rate limited"
        );
        assert_eq!(
            ProviderError::new("connection reset").to_string(),
            "Provider error: connection reset"
        );
    }
}
