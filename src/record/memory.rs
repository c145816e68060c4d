//! In-memory record
//!
//! Attribute map backed record used with the in-memory query engine.
//! Attributes can be set after construction so that related records may
//! reference each other.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use super::{AttrValue, ColumnType, Record, RecordRef};

/// Record holding its attributes in memory
pub struct MemoryRecord {
    model: String,
    fields: RwLock<BTreeMap<String, AttrValue>>,
    column_types: BTreeMap<String, Arc<dyn ColumnType>>,
}

impl MemoryRecord {
    /// Creates a record of `model` with no attributes
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            fields: RwLock::new(BTreeMap::new()),
            column_types: BTreeMap::new(),
        }
    }

    /// Creates a record from the members of a JSON object.
    ///
    /// Non-object values produce a record with no attributes.
    pub fn from_json(model: impl Into<String>, value: serde_json::Value) -> Self {
        let mut record = Self::new(model);
        if let serde_json::Value::Object(map) = value {
            for (field, v) in map {
                record = record.with(field, v);
            }
        }
        record
    }

    /// Builder: sets an attribute
    pub fn with(mut self, field: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        let fields = match self.fields.get_mut() {
            Ok(fields) => fields,
            Err(poisoned) => poisoned.into_inner(),
        };
        fields.insert(field.into(), value.into());
        self
    }

    /// Builder: declares a custom column type for `field`
    pub fn with_column_type(
        mut self,
        field: impl Into<String>,
        column_type: Arc<dyn ColumnType>,
    ) -> Self {
        self.column_types.insert(field.into(), column_type);
        self
    }

    /// Sets an attribute on a shared record
    pub fn set(&self, field: impl Into<String>, value: impl Into<AttrValue>) {
        let mut fields = match self.fields.write() {
            Ok(fields) => fields,
            Err(poisoned) => poisoned.into_inner(),
        };
        fields.insert(field.into(), value.into());
    }

    /// Removes an attribute, so that reads report it as missing
    pub fn unset(&self, field: &str) {
        let mut fields = match self.fields.write() {
            Ok(fields) => fields,
            Err(poisoned) => poisoned.into_inner(),
        };
        fields.remove(field);
    }

    /// Names of the attributes currently set
    pub fn field_names(&self) -> Vec<String> {
        let fields = match self.fields.read() {
            Ok(fields) => fields,
            Err(poisoned) => poisoned.into_inner(),
        };
        fields.keys().cloned().collect()
    }

    /// Wraps the record into a shared handle
    pub fn into_ref(self) -> RecordRef {
        Arc::new(self)
    }
}

impl Record for MemoryRecord {
    fn model(&self) -> &str {
        &self.model
    }

    fn get(&self, field: &str) -> Option<AttrValue> {
        let fields = match self.fields.read() {
            Ok(fields) => fields,
            Err(poisoned) => poisoned.into_inner(),
        };
        fields.get(field).cloned()
    }

    fn column_type(&self, field: &str) -> Option<&dyn ColumnType> {
        self.column_types.get(field).map(|ty| ty.as_ref())
    }
}

// Field values are left out: related records can form cycles.
impl fmt::Debug for MemoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRecord")
            .field("model", &self.model)
            .field("fields", &self.field_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_and_missing() {
        let record = MemoryRecord::new("Book").with("title", "Dune").with("isbn", None::<String>);

        assert_eq!(record.get("title").unwrap().as_str(), Some("Dune"));
        assert!(record.get("isbn").unwrap().is_null());
        assert!(record.get("pages").is_none());
    }

    #[test]
    fn test_from_json() {
        let record = MemoryRecord::from_json("Book", json!({"id": 7, "title": "Dune"}));
        assert_eq!(record.model(), "Book");
        assert_eq!(record.get("id").unwrap().as_i64(), Some(7));
        assert_eq!(record.field_names(), vec!["id", "title"]);
    }

    #[test]
    fn test_cyclic_references_debug() {
        let author = Arc::new(MemoryRecord::new("Person").with("id", 1));
        let book = Arc::new(MemoryRecord::new("Book").with("id", 10));
        book.set("author", AttrValue::Record(author.clone()));
        author.set("books", AttrValue::List(vec![AttrValue::Record(book.clone())]));

        let rendered = format!("{:?}", book);
        assert!(rendered.contains("author"));

        author.unset("books");
        assert!(author.get("books").is_none());
    }
}
