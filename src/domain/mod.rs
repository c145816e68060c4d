//! Domain configuration for projections
//!
//! Resource descriptors are caller-owned metadata keyed by resource name:
//! allowed filter fields, field schemas with relation targets, identifier
//! field, default projection and default embeddings. The projection engine
//! reads them on demand and never caches them.

mod errors;
mod loader;
mod settings;
mod types;

pub use errors::{DomainError, DomainResult};
pub use loader::Domain;
pub use settings::Settings;
pub use types::{DataRelation, FieldSchema, ResourceDescriptor, ANY_FIELD};
