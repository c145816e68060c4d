//! Resource descriptor definitions
//!
//! A resource descriptor carries the schema and policy metadata of one named
//! resource: which fields may be filtered on, which fields relate to other
//! resources, the identifier field and the default projection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Wildcard entry of `allowed_filters`
pub const ANY_FIELD: &str = "*";

/// Target of a relationship field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRelation {
    /// Related resource name
    pub resource: String,
    /// Field of the related resource the relation points at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Whether clients may ask for this relation to be embedded
    #[serde(default)]
    pub embeddable: bool,
}

impl DataRelation {
    /// Create a non-embeddable relation
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            field: None,
            embeddable: false,
        }
    }

    /// Mark the relation as embeddable
    pub fn embeddable(mut self) -> Self {
        self.embeddable = true;
        self
    }
}

/// Schema entry of a single field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Declared type name (informational)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Direct relation to another resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_relation: Option<DataRelation>,
    /// Item schema, used by list fields whose items are relations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<FieldSchema>>,
    /// Identifier column standing in for this relationship in queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id_field: Option<String>,
}

impl FieldSchema {
    /// Plain typed field
    pub fn typed(field_type: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            ..Self::default()
        }
    }

    /// Field relating to a single record of another resource
    pub fn relation(relation: DataRelation) -> Self {
        Self {
            field_type: Some("objectid".to_string()),
            data_relation: Some(relation),
            ..Self::default()
        }
    }

    /// List field whose items follow `item`
    pub fn list_of(item: FieldSchema) -> Self {
        Self {
            field_type: Some("list".to_string()),
            schema: Some(Box::new(item)),
            ..Self::default()
        }
    }

    /// Declare the identifier column backing this relationship
    pub fn with_local_id_field(mut self, column: impl Into<String>) -> Self {
        self.local_id_field = Some(column.into());
        self
    }

    /// Returns the relation of this field.
    ///
    /// When an item schema is present the relation lives there, otherwise on
    /// the field itself.
    pub fn relation_target(&self) -> Option<&DataRelation> {
        match &self.schema {
            Some(item) => item.data_relation.as_ref(),
            None => self.data_relation.as_ref(),
        }
    }
}

fn default_allowed_filters() -> Vec<String> {
    vec![ANY_FIELD.to_string()]
}

/// Metadata for a named resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Resource name, assigned on registration
    #[serde(skip)]
    pub name: String,
    /// Name of the model backing the resource (defaults to the resource name)
    #[serde(default)]
    pub source: String,
    /// Identifier field (defaults to the domain-wide setting)
    #[serde(default)]
    pub id_field: String,
    /// Fields clients may filter on; `*` allows any
    #[serde(default = "default_allowed_filters")]
    pub allowed_filters: Vec<String>,
    /// Field schemas
    #[serde(default)]
    pub schema: BTreeMap<String, FieldSchema>,
    /// Default projection: field name to inclusion flag
    #[serde(default)]
    pub projection: BTreeMap<String, Value>,
    /// Embedding paths applied to every request on this resource
    #[serde(default)]
    pub embedded_fields: Vec<String>,
}

impl ResourceDescriptor {
    /// Creates an empty descriptor allowing filters on any field
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: String::new(),
            id_field: String::new(),
            allowed_filters: default_allowed_filters(),
            schema: BTreeMap::new(),
            projection: BTreeMap::new(),
            embedded_fields: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.schema.insert(name.into(), schema);
        self
    }

    pub fn with_allowed_filters<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_filters = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the projection to exactly `fields`
    pub fn with_projection<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = fields
            .into_iter()
            .map(|f| (f.into(), Value::from(1)))
            .collect();
        self
    }

    pub fn with_embedded_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.embedded_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the schema entry of a field
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.schema.get(name)
    }

    /// Checks whether clients may filter on `field`
    pub fn allows_filter(&self, field: &str) -> bool {
        self.allowed_filters
            .iter()
            .any(|allowed| allowed == ANY_FIELD || allowed == field)
    }

    /// Fields rendered when a record of this resource is embedded.
    ///
    /// Truthy projection entries, or the identifier followed by every schema
    /// field when no projection is configured.
    pub fn projected_fields(&self) -> Vec<String> {
        if !self.projection.is_empty() {
            return self
                .projection
                .iter()
                .filter(|(_, flag)| is_truthy(flag))
                .map(|(field, _)| field.clone())
                .collect();
        }

        let mut fields = vec![self.id_field.clone()];
        fields.extend(
            self.schema
                .keys()
                .filter(|field| **field != self.id_field)
                .cloned(),
        );
        fields
    }

    /// Relationship field to identifier column mapping
    pub fn relationship_rename_mapping(&self) -> BTreeMap<String, String> {
        self.schema
            .iter()
            .filter_map(|(field, schema)| {
                schema
                    .local_id_field
                    .as_ref()
                    .map(|column| (field.clone(), column.clone()))
            })
            .collect()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn books() -> ResourceDescriptor {
        ResourceDescriptor::new("books")
            .with_id_field("id")
            .with_field("title", FieldSchema::typed("string"))
            .with_field(
                "author",
                FieldSchema::relation(DataRelation::new("people").embeddable())
                    .with_local_id_field("author_id"),
            )
            .with_field(
                "tags",
                FieldSchema::list_of(FieldSchema::relation(DataRelation::new("tags"))),
            )
    }

    #[test]
    fn test_relation_target_prefers_item_schema() {
        let desc = books();
        assert_eq!(
            desc.field("author").unwrap().relation_target().unwrap().resource,
            "people"
        );
        assert_eq!(
            desc.field("tags").unwrap().relation_target().unwrap().resource,
            "tags"
        );
        assert!(desc.field("title").unwrap().relation_target().is_none());
    }

    #[test]
    fn test_projected_fields_default_to_schema() {
        let desc = books();
        assert_eq!(desc.projected_fields(), vec!["id", "author", "tags", "title"]);
    }

    #[test]
    fn test_projected_fields_skip_falsy_entries() {
        let mut desc = books();
        desc.projection.insert("title".into(), json!(1));
        desc.projection.insert("author".into(), json!(0));
        desc.projection.insert("id".into(), json!(true));
        assert_eq!(desc.projected_fields(), vec!["id", "title"]);
    }

    #[test]
    fn test_allowed_filters() {
        let desc = books();
        assert!(desc.allows_filter("anything"));

        let desc = books().with_allowed_filters(["title"]);
        assert!(desc.allows_filter("title"));
        assert!(!desc.allows_filter("author"));
    }

    #[test]
    fn test_rename_mapping() {
        let mapping = books().relationship_rename_mapping();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["author"], "author_id");
    }

    #[test]
    fn test_deserialize_descriptor() {
        let desc: ResourceDescriptor = serde_json::from_value(json!({
            "schema": {
                "author": {
                    "type": "objectid",
                    "data_relation": {"resource": "people", "embeddable": true},
                    "local_id_field": "author_id"
                }
            },
            "projection": {"author": 1}
        }))
        .unwrap();

        assert_eq!(desc.allowed_filters, vec!["*"]);
        assert!(desc.field("author").unwrap().data_relation.as_ref().unwrap().embeddable);
        assert_eq!(desc.projected_fields(), vec!["author"]);
    }
}
