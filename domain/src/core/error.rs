//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid session transition: cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("No item left to decide on")]
    QueueEmpty,

    #[error("Member {0} is not part of the club")]
    NotAMember(String),
}

impl DomainError {
    /// Check if this error comes from calling an operation in the wrong phase
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}
