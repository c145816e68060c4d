//! # Projection Errors
//!
//! Error types shared by the sanitizer, the result collection and the
//! query-construction helpers.

use thiserror::Error;

use crate::domain::DomainError;

/// Result type for projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Projection errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    // ==================
    // Client Errors
    // ==================
    /// Malformed client input (sort expression, embedding request, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Filter references a field outside the resource's allowed set
    #[error("filter on '{field}' not allowed")]
    FilterNotAllowed { field: String },

    /// Embedding requested on a field that is not an embeddable relation
    #[error("Field '{path}' of resource '{resource}' is not embeddable")]
    NotEmbeddable { resource: String, path: String },

    // ==================
    // Recovered per field
    // ==================
    /// Record lacks a requested attribute
    #[error("Attribute '{field}' not found on '{model}'")]
    MissingAttribute { model: String, field: String },

    // ==================
    // Server Errors
    // ==================
    /// Resource name not present in the domain
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// No resource is backed by this model
    #[error("No resource is backed by model '{0}'")]
    UnknownModel(String),

    /// Relational engine failure
    #[error("Query error: {0}")]
    Query(String),

    /// Domain configuration failure
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProjectionError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a missing attribute error
    pub fn missing_attribute(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingAttribute {
            model: model.into(),
            field: field.into(),
        }
    }

    /// Create a query engine error
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Returns true when the caller sent bad input, false for server faults
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::FilterNotAllowed { .. } | Self::NotEmbeddable { .. }
        )
    }

    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::FilterNotAllowed { .. } => "FILTER_NOT_ALLOWED",
            Self::NotEmbeddable { .. } => "NOT_EMBEDDABLE",
            Self::MissingAttribute { .. } => "MISSING_ATTRIBUTE",
            Self::UnknownResource(_) => "UNKNOWN_RESOURCE",
            Self::UnknownModel(_) => "UNKNOWN_MODEL",
            Self::Query(_) => "QUERY_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<DomainError> for ProjectionError {
    fn from(err: DomainError) -> Self {
        Self::Config(err.to_string())
    }
}
