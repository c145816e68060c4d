//! Relationship field renaming
//!
//! Relationship fields stand for an identifier column in queries. These
//! helpers rewrite relationship names into their column names using the
//! resource's `local_id_field` declarations.

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::domain::ResourceDescriptor;
use crate::errors::{ProjectionError, ProjectionResult};
use crate::query::SortKey;

/// Renames the fields of sort keys
pub fn rename_relationship_fields_in_sort_args(
    resource: &ResourceDescriptor,
    sort: &[SortKey],
) -> Vec<SortKey> {
    let mapping = resource.relationship_rename_mapping();
    sort.iter()
        .map(|key| SortKey {
            field: mapping.get(&key.field).unwrap_or(&key.field).clone(),
            direction: key.direction,
        })
        .collect()
}

/// Renames the keys of a mapping
pub fn rename_relationship_fields_in_dict(
    resource: &ResourceDescriptor,
    dict: &Map<String, Value>,
) -> Map<String, Value> {
    let mapping = resource.relationship_rename_mapping();
    dict.iter()
        .map(|(key, value)| (mapping.get(key).unwrap_or(key).clone(), value.clone()))
        .collect()
}

/// Renames whole-word occurrences inside a filter expression.
///
/// Every occurrence is renamed once, so a column name that is itself a
/// relationship field is not renamed again.
pub fn rename_relationship_fields_in_str(
    resource: &ResourceDescriptor,
    expression: &str,
) -> ProjectionResult<String> {
    let mapping = resource.relationship_rename_mapping();
    if mapping.is_empty() {
        return Ok(expression.to_string());
    }

    let mut fields: Vec<&str> = mapping.keys().map(String::as_str).collect();
    fields.sort_by_key(|field| std::cmp::Reverse(field.len()));
    let alternation = fields
        .iter()
        .map(|field| regex::escape(field))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = Regex::new(&format!(r"\b(?:{})\b", alternation))
        .map_err(|e| ProjectionError::Config(e.to_string()))?;

    let renamed = pattern.replace_all(expression, |caps: &Captures<'_>| {
        let field = &caps[0];
        mapping
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.to_string())
    });
    Ok(renamed.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataRelation, FieldSchema};
    use serde_json::json;

    fn books() -> ResourceDescriptor {
        ResourceDescriptor::new("books")
            .with_field(
                "author",
                FieldSchema::relation(DataRelation::new("people")).with_local_id_field("author_id"),
            )
            .with_field("title", FieldSchema::typed("string"))
    }

    #[test]
    fn test_rename_in_dict() {
        let Value::Object(dict) = json!({"author": 5, "title": "x"}) else {
            unreachable!()
        };
        assert_eq!(
            Value::Object(rename_relationship_fields_in_dict(&books(), &dict)),
            json!({"author_id": 5, "title": "x"})
        );
    }

    #[test]
    fn test_rename_in_sort_args() {
        let sort = vec![SortKey::desc("author"), SortKey::asc("title")];
        assert_eq!(
            rename_relationship_fields_in_sort_args(&books(), &sort),
            vec![SortKey::desc("author_id"), SortKey::asc("title")]
        );
    }

    #[test]
    fn test_rename_in_str_whole_words_only() {
        let expression = "author == 5 and coauthor == 3 or authors > 1";
        let renamed = rename_relationship_fields_in_str(&books(), expression).unwrap();
        assert_eq!(renamed, "author_id == 5 and coauthor == 3 or authors > 1");
    }

    #[test]
    fn test_rename_in_str_applies_once() {
        let chained = ResourceDescriptor::new("books")
            .with_field(
                "author",
                FieldSchema::relation(DataRelation::new("people")).with_local_id_field("writer"),
            )
            .with_field(
                "writer",
                FieldSchema::relation(DataRelation::new("people"))
                    .with_local_id_field("writer_id"),
            );

        let renamed = rename_relationship_fields_in_str(&chained, "author == 1 or writer == 2")
            .unwrap();
        assert_eq!(renamed, "writer == 1 or writer_id == 2");
    }

    #[test]
    fn test_no_mapping_leaves_input() {
        let plain = ResourceDescriptor::new("tags");
        assert_eq!(
            rename_relationship_fields_in_str(&plain, "name == 'author'").unwrap(),
            "name == 'author'"
        );
    }
}
