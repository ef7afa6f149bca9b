//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid model id '{0}': expected provider:model-name")]
    InvalidModelId(String),

    #[error("Invalid job status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl DomainError {
    /// Check if this error was raised while validating caller input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(_) | DomainError::InvalidRole(_) | DomainError::InvalidModelId(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let error = DomainError::InvalidTransition {
            from: "completed".to_string(),
            to: "processing".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid job status transition: completed -> processing"
        );
    }

    #[test]
    fn test_is_validation_check() {
        assert!(DomainError::Validation("empty".to_string()).is_validation());
        assert!(DomainError::InvalidRole("c t o".to_string()).is_validation());
        assert!(DomainError::InvalidModelId("gpt".to_string()).is_validation());
        assert!(
            !DomainError::InvalidTransition {
                from: "failed".to_string(),
                to: "queued".to_string(),
            }
            .is_validation()
        );
    }
}
