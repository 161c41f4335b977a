//! Errors shared by every store port

use thiserror::Error;

/// Errors returned by the shared document store and its collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Network or timeout failures that are worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout)
    }

    /// The benign outcome of a create race
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(StoreError::Timeout.is_transient());
        assert!(StoreError::Unavailable("offline".into()).is_transient());
        assert!(!StoreError::AlreadyExists("k".into()).is_transient());
        assert!(!StoreError::NotFound("club".into()).is_transient());

        assert!(StoreError::AlreadyExists("k".into()).is_already_exists());
        assert!(!StoreError::Timeout.is_already_exists());
    }
}
