// src/error/types.rs
use crate::domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected before any I/O took place
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Resource not found")]
    NotFound,

    /// A replace found a different version than the one it was computed from
    #[error("Document {document_id} changed concurrently (expected version {expected})")]
    ConcurrencyConflict { document_id: String, expected: u64 },

    #[error("Category hierarchy contains a cycle at category {category_id}")]
    CyclicHierarchy { category_id: i64 },

    #[error("Event cascade exceeded the maximum publish depth of {depth}")]
    CascadeDepthExceeded { depth: usize },

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput(message.into())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = AppError::invalid_input("category name cannot be empty");
        assert_eq!(err.to_string(), "Invalid input: category name cannot be empty");
    }

    #[test]
    fn test_domain_error_converts() {
        let err: AppError = DomainError::InvariantViolation("bad".to_string()).into();
        assert!(matches!(err, AppError::Domain(_)));
    }

    #[test]
    fn test_conflict_message_names_document() {
        let err = AppError::ConcurrencyConflict {
            document_id: "doc-1".to_string(),
            expected: 3,
        };
        assert!(err.to_string().contains("doc-1"));
        assert!(err.to_string().contains("3"));
    }
}
