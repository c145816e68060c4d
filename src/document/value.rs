//! Document values
//!
//! The document-safe counterpart of [`AttrValue`]: no record references and
//! no enumeration members, only scalars and collections.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

use crate::record::AttrValue;

/// Projected output for one record
pub type Document = BTreeMap<String, DocumentValue>;

/// A sanitized value
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Map(Document),
    List(Vec<DocumentValue>),
    /// Unique items, in first-seen order
    Set(Vec<DocumentValue>),
}

impl DocumentValue {
    /// Builds a set, dropping repeated items
    ///
    /// Floats are compared bitwise, so repeated NaNs collapse too.
    pub fn set(items: impl IntoIterator<Item = DocumentValue>) -> Self {
        let items: Vec<DocumentValue> = items.into_iter().collect();
        let first_seen: Vec<bool> = {
            let mut seen = HashSet::with_capacity(items.len());
            items.iter().map(|item| seen.insert(SetKey::of(item))).collect()
        };
        let unique = items
            .into_iter()
            .zip(first_seen)
            .filter_map(|(item, first)| first.then_some(item))
            .collect();
        DocumentValue::Set(unique)
    }

    /// Null or empty text, as found in an unassigned concurrency tag
    pub fn is_blank(&self) -> bool {
        match self {
            DocumentValue::Null => true,
            DocumentValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DocumentValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Document> {
        match self {
            DocumentValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DocumentValue]> {
        match self {
            DocumentValue::List(items) | DocumentValue::Set(items) => Some(items),
            _ => None,
        }
    }
}

/// Hashable identity of a value, used to deduplicate sets
#[derive(PartialEq, Eq, Hash)]
enum SetKey<'v> {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(&'v str),
    Bytes(&'v [u8]),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Map(Vec<(&'v str, SetKey<'v>)>),
    List(Vec<SetKey<'v>>),
    Set(Vec<SetKey<'v>>),
}

impl<'v> SetKey<'v> {
    fn of(value: &'v DocumentValue) -> Self {
        match value {
            DocumentValue::Null => SetKey::Null,
            DocumentValue::Bool(b) => SetKey::Bool(*b),
            DocumentValue::Int(i) => SetKey::Int(*i),
            DocumentValue::Float(f) => SetKey::Float(f.to_bits()),
            DocumentValue::Text(s) => SetKey::Text(s),
            DocumentValue::Bytes(bytes) => SetKey::Bytes(bytes),
            DocumentValue::Timestamp(ts) => SetKey::Timestamp(*ts),
            DocumentValue::Uuid(uuid) => SetKey::Uuid(*uuid),
            DocumentValue::Map(map) => SetKey::Map(
                map.iter()
                    .map(|(key, value)| (key.as_str(), SetKey::of(value)))
                    .collect(),
            ),
            DocumentValue::List(items) => SetKey::List(items.iter().map(SetKey::of).collect()),
            DocumentValue::Set(items) => SetKey::Set(items.iter().map(SetKey::of).collect()),
        }
    }
}

impl Serialize for DocumentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocumentValue::Null => serializer.serialize_unit(),
            DocumentValue::Bool(b) => serializer.serialize_bool(*b),
            DocumentValue::Int(i) => serializer.serialize_i64(*i),
            DocumentValue::Float(f) => serializer.serialize_f64(*f),
            DocumentValue::Text(s) => serializer.serialize_str(s),
            DocumentValue::Bytes(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            DocumentValue::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            DocumentValue::Uuid(uuid) => uuid.serialize(serializer),
            DocumentValue::Map(map) => serializer.collect_map(map),
            DocumentValue::List(items) | DocumentValue::Set(items) => {
                serializer.collect_seq(items)
            }
        }
    }
}

impl From<DocumentValue> for AttrValue {
    fn from(value: DocumentValue) -> Self {
        match value {
            DocumentValue::Null => AttrValue::Null,
            DocumentValue::Bool(b) => AttrValue::Bool(b),
            DocumentValue::Int(i) => AttrValue::Int(i),
            DocumentValue::Float(f) => AttrValue::Float(f),
            DocumentValue::Text(s) => AttrValue::Text(s),
            DocumentValue::Bytes(b) => AttrValue::Bytes(b),
            DocumentValue::Timestamp(ts) => AttrValue::Timestamp(ts),
            DocumentValue::Uuid(u) => AttrValue::Uuid(u),
            DocumentValue::Map(map) => {
                AttrValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            DocumentValue::List(items) => {
                AttrValue::List(items.into_iter().map(Into::into).collect())
            }
            DocumentValue::Set(items) => {
                AttrValue::Set(items.into_iter().map(Into::into).collect())
            }
        }
    }
}
