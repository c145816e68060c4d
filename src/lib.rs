//! projector - Relational records as paginated, embeddable documents
//!
//! Wraps a relational query in a [`ResultCollection`]: filtering, ordering,
//! counting and paging are applied once, then every row is projected into a
//! [`Document`], with related records reduced to identifiers or embedded as
//! nested documents.

pub mod collection;
pub mod document;
pub mod domain;
pub mod errors;
pub mod query;
pub mod record;
pub mod utils;

pub use collection::{CollectionOptions, ResultCollection};
pub use document::{
    Document, DocumentValue, EmbeddingResolver, FieldProjection, RequestEmbedding, Sanitizer,
};
pub use domain::{Domain, ResourceDescriptor, Settings};
pub use errors::{ProjectionError, ProjectionResult};
pub use query::{MemoryQuery, Predicate, Query, SortDirection, SortKey};
pub use record::{AttrValue, MemoryRecord, Record, RecordRef};
