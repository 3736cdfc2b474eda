//! Error types for workflow operations

use crate::identifiers::RecordId;
use thiserror::Error;

/// Errors that can occur in workflow operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Record not found in the store
    #[error("Record not found: {id}")]
    RecordNotFound {
        /// ID that was searched for
        id: RecordId,
    },

    /// Invalid stage transition
    #[error("Invalid stage transition from {from} to {to}")]
    InvalidTransition {
        /// Current stage
        from: String,
        /// Attempted target stage
        to: String,
    },

    /// Indent number string that does not match `IN-<seq><letter>`
    #[error("Malformed indent number: {0}")]
    MalformedIndentNumber(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        WorkflowError::Serialization(err.to_string())
    }
}

impl WorkflowError {
    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorkflowError::RecordNotFound { .. })
    }

    /// Check if this is a rejected transition
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, WorkflowError::InvalidTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offending_parts() {
        let id = RecordId::new();
        let err = WorkflowError::RecordNotFound { id };
        assert!(err.to_string().contains(&id.to_string()));
        assert!(err.is_not_found());

        let err = WorkflowError::InvalidTransition {
            from: "Completed".to_string(),
            to: "Completed".to_string(),
        };
        assert!(err.is_invalid_transition());
        assert!(!err.is_not_found());
    }

    #[test]
    fn serde_json_errors_convert() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json");
        let err: WorkflowError = bad.unwrap_err().into();
        assert!(matches!(err, WorkflowError::Serialization(_)));
    }
}
