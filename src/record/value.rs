//! Relational attribute values
//!
//! Every value a record attribute can hold is one of a closed set of
//! variants. Adding a column kind means adding a variant here, and every
//! match over values then has to decide what to do with it.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::{Record, RecordRef};

/// Enumeration-like value reduced to its name or label in documents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumMember {
    /// Member exposing a `name`
    Named(String),
    /// Member exposing only a `label`
    Labeled(String),
}

impl EnumMember {
    /// The name, or the label when the member has no name
    pub fn value(&self) -> &str {
        match self {
            EnumMember::Named(name) => name,
            EnumMember::Labeled(label) => label,
        }
    }
}

/// A single attribute value read from a record
#[derive(Clone)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    /// Reference to a related record
    Record(RecordRef),
    Map(BTreeMap<String, AttrValue>),
    List(Vec<AttrValue>),
    /// Unordered collection; duplicates are removed when sanitized
    Set(Vec<AttrValue>),
    Enum(EnumMember),
}

impl AttrValue {
    /// Wraps a record into a related-record reference
    pub fn record(record: impl Record + 'static) -> Self {
        AttrValue::Record(Arc::new(record))
    }

    /// Returns true for mappings, sequences and sets
    pub fn is_collection(&self) -> bool {
        matches!(self, AttrValue::Map(_) | AttrValue::List(_) | AttrValue::Set(_))
    }

    /// Returns true for related-record references
    pub fn is_record(&self) -> bool {
        matches!(self, AttrValue::Record(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Short kind name for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Null => "null",
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Text(_) => "text",
            AttrValue::Bytes(_) => "bytes",
            AttrValue::Timestamp(_) => "timestamp",
            AttrValue::Uuid(_) => "uuid",
            AttrValue::Record(_) => "record",
            AttrValue::Map(_) => "map",
            AttrValue::List(_) => "list",
            AttrValue::Set(_) => "set",
            AttrValue::Enum(_) => "enum",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Enum(member) => Some(member.value()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => write!(f, "Null"),
            AttrValue::Bool(b) => write!(f, "Bool({})", b),
            AttrValue::Int(i) => write!(f, "Int({})", i),
            AttrValue::Float(x) => write!(f, "Float({})", x),
            AttrValue::Text(s) => write!(f, "Text({:?})", s),
            AttrValue::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            AttrValue::Timestamp(ts) => write!(f, "Timestamp({})", ts.to_rfc3339()),
            AttrValue::Uuid(u) => write!(f, "Uuid({})", u),
            // Related records may point back at their parent
            AttrValue::Record(r) => write!(f, "Record({})", r.model()),
            AttrValue::Map(m) => f.debug_tuple("Map").field(m).finish(),
            AttrValue::List(items) => f.debug_tuple("List").field(items).finish(),
            AttrValue::Set(items) => f.debug_tuple("Set").field(items).finish(),
            AttrValue::Enum(member) => f.debug_tuple("Enum").field(member).finish(),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(value.into())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Vec<u8>> for AttrValue {
    fn from(value: Vec<u8>) -> Self {
        AttrValue::Bytes(value)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttrValue::Timestamp(value)
    }
}

impl From<Uuid> for AttrValue {
    fn from(value: Uuid) -> Self {
        AttrValue::Uuid(value)
    }
}

impl From<RecordRef> for AttrValue {
    fn from(value: RecordRef) -> Self {
        AttrValue::Record(value)
    }
}

impl From<EnumMember> for AttrValue {
    fn from(value: EnumMember) -> Self {
        AttrValue::Enum(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttrValue::Int(i),
                None => AttrValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => AttrValue::Text(s),
            Value::Array(items) => AttrValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                AttrValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_member_value() {
        assert_eq!(EnumMember::Named("draft".into()).value(), "draft");
        assert_eq!(EnumMember::Labeled("Draft".into()).value(), "Draft");
    }

    #[test]
    fn test_from_json() {
        let value = AttrValue::from(json!({"a": [1, 2.5, "x", null, true]}));
        let AttrValue::Map(map) = value else {
            panic!("expected map");
        };
        let AttrValue::List(items) = &map["a"] else {
            panic!("expected list");
        };
        assert_eq!(items[0].as_i64(), Some(1));
        assert!(matches!(items[1], AttrValue::Float(f) if f == 2.5));
        assert_eq!(items[2].as_str(), Some("x"));
        assert!(items[3].is_null());
        assert!(matches!(items[4], AttrValue::Bool(true)));
    }

    #[test]
    fn test_collection_kinds() {
        assert!(AttrValue::List(vec![]).is_collection());
        assert!(AttrValue::Set(vec![]).is_collection());
        assert!(AttrValue::Map(BTreeMap::new()).is_collection());
        assert!(!AttrValue::Int(1).is_collection());
        assert_eq!(AttrValue::from(Some("x")).kind(), "text");
        assert_eq!(AttrValue::from(None::<i64>).kind(), "null");
    }
}
