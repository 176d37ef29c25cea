//! Error types for relq.

use thiserror::Error;

/// The main error type for relq operations.
#[derive(Debug, Error)]
pub enum RelqError {
    /// An operator token with no entry in the operator table.
    #[error("Invalid operation: '{0}'")]
    InvalidOperation(String),

    /// A where-tree leaf that is neither operator, path, nor parameter.
    #[error("Invalid token: '{0}'")]
    InvalidToken(String),

    /// A relation path that fails dot-path validation during join planning.
    #[error("Invalid relation path: '{0}'")]
    InvalidPath(String),

    /// `page` was supplied without `limit`.
    #[error("Pagination error: 'page' requires 'limit'")]
    PageWithoutLimit,

    /// The schema provider could not resolve the entity identifier.
    #[error("Unknown entity: '{0}'")]
    UnknownEntity(String),

    /// A `:name` reference in the generated query with no bound value.
    #[error("Unbound parameter: ':{0}'")]
    UnboundParameter(String),

    /// The descriptor payload could not be deserialized.
    #[error("Invalid descriptor: {0}")]
    Descriptor(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for relq operations.
pub type RelqResult<T> = Result<T, RelqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelqError::InvalidOperation("$regex".to_string());
        assert_eq!(err.to_string(), "Invalid operation: '$regex'");

        let err = RelqError::PageWithoutLimit;
        assert_eq!(err.to_string(), "Pagination error: 'page' requires 'limit'");
    }
}
