//! Relational records
//!
//! A record is an opaque row object with named-attribute access, owned by the
//! relational layer. The projection engine only reads it.

mod memory;
mod value;

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use memory::MemoryRecord;
pub use value::{AttrValue, EnumMember};

/// Shared handle to a record
pub type RecordRef = Arc<dyn Record>;

/// Row object produced by the relational layer
pub trait Record: fmt::Debug + Send + Sync {
    /// Name of the model the record belongs to
    fn model(&self) -> &str;

    /// Reads an attribute.
    ///
    /// Returns `None` when the record has no such attribute, which is
    /// different from an attribute holding `AttrValue::Null`.
    fn get(&self, field: &str) -> Option<AttrValue>;

    /// Custom column type declared for `field`, if any
    fn column_type(&self, _field: &str) -> Option<&dyn ColumnType> {
        None
    }
}

/// Failure of a column type's bind-parameter coercion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("coercion failed: {0}")]
pub struct CoercionError(pub String);

/// Custom column type able to normalize stored values
pub trait ColumnType: fmt::Debug + Send + Sync {
    /// Converts a stored value into its bind-parameter representation
    fn process_bind_param(&self, value: &AttrValue) -> Result<AttrValue, CoercionError>;
}
