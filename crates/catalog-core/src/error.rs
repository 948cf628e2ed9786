//! # Catalog Error Types
//!
//! Typed error handling for the product catalog.
//! Every validation and repository operation returns `Result<T, CatalogError>`.

use thiserror::Error;

/// Core error type for all catalog operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Client payload or query parameter failed a stated constraint
    #[error("{0}")]
    Validation(String),

    /// Referenced product id does not exist
    #[error("Product not found: {id}")]
    NotFound { id: String },

    /// Access gate rejected the request
    #[error("{0}")]
    Unauthorized(String),

    /// Configuration errors (bad seed file, unknown route names)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    /// Shorthand for a missing product
    pub fn not_found(id: impl Into<String>) -> Self {
        CatalogError::NotFound { id: id.into() }
    }

    /// Returns true if the error is attributable to client input
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::Validation(_) => 400,
            CatalogError::NotFound { .. } => 404,
            CatalogError::Unauthorized(_) => 401,
            CatalogError::Configuration(_) => 500,
            CatalogError::Internal(_) => 500,
        }
    }
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
