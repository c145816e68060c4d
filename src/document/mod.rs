//! Documents
//!
//! Sanitized output values, field projections, embedding requests and the
//! sanitizer converting records into documents.

mod embedding;
mod projection;
mod sanitizer;
mod value;

pub use embedding::{EmbeddingResolver, NoEmbedding, RequestEmbedding};
pub use projection::FieldProjection;
pub use sanitizer::{SanitizeContext, Sanitizer};
pub use value::{Document, DocumentValue};
