//! Domain configuration errors

use thiserror::Error;

/// Result type for domain loading
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised while loading or registering resource descriptors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Domain file could not be read
    #[error("Failed to read domain file {path}: {message}")]
    Io { path: String, message: String },

    /// Domain document is not valid JSON or has the wrong shape
    #[error("Malformed domain definition: {0}")]
    Malformed(String),

    /// A resource name was registered twice
    #[error("Resource '{0}' is already registered")]
    DuplicateResource(String),

    /// A data relation points at a resource that does not exist
    #[error("Field '{field}' of resource '{resource}' relates to unknown resource '{target}'")]
    UnknownRelationTarget {
        resource: String,
        field: String,
        target: String,
    },
}
