use crate::domain::{errors::ValidationError, value_objects::ListingId};

/// Errors surfaced by listing operations.
///
/// `Persistence` is the only transient class; everything else is a
/// property of the request and will fail the same way on retry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ListingError {
    /// Payload failed the listing schema
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Identifier is not in the backing store's format
    #[error("Invalid listing id: {id}")]
    InvalidId { id: String },

    /// No listing with this identifier exists
    #[error("Listing not found: {id}")]
    NotFound { id: String },

    /// Backing store was unreachable or rejected the operation
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        cause: Option<String>, // stringified to keep the error Clone
    },
}

impl ListingError {
    pub fn not_found(id: &ListingId) -> Self {
        ListingError::NotFound {
            id: id.as_str().to_string(),
        }
    }

    pub fn persistence(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ListingError::Persistence {
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    /// Whether a caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ListingError::Persistence { .. })
    }

    /// Short machine-readable name used in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ListingError::Validation(_) => "ValidationError",
            ListingError::InvalidId { .. } => "InvalidIdError",
            ListingError::NotFound { .. } => "NotFoundError",
            ListingError::Persistence { .. } => "PersistenceError",
        }
    }
}

/// Result type for listing operations
pub type ListingResult<T> = Result<T, ListingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_persistence_is_retryable() {
        let validation: ListingError = ValidationError::MissingField { field: "price" }.into();
        assert!(!validation.is_retryable());
        assert!(!ListingError::NotFound { id: "1".into() }.is_retryable());
        assert!(ListingError::persistence("database is locked", "busy").is_retryable());
    }

    #[test]
    fn test_validation_display_keeps_field_message() {
        let err: ListingError = ValidationError::MissingField { field: "address" }.into();
        assert_eq!(err.to_string(), "Validation error: \"address\" is required");
        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn test_persistence_keeps_cause_out_of_display() {
        let err = ListingError::persistence("Database error listing rows", "pool closed");

        assert_eq!(err.to_string(), "Persistence error: Database error listing rows");
        assert!(std::error::Error::source(&err).is_none());
        match err {
            ListingError::Persistence { cause, .. } => {
                assert_eq!(cause.as_deref(), Some("pool closed"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
