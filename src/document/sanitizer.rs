//! Value sanitizer
//!
//! Turns record attributes into document values. Related records are either
//! reduced to their identifier or, when the request embeds their field,
//! converted into nested documents. Recursion state travels in a
//! [`SanitizeContext`]; nothing is stored between calls.

use tracing::{debug, trace};

use super::embedding::{EmbeddingResolver, NoEmbedding};
use super::projection::FieldProjection;
use super::value::{Document, DocumentValue};
use crate::domain::Domain;
use crate::errors::{ProjectionError, ProjectionResult};
use crate::record::{AttrValue, Record, RecordRef};

/// Position of a value within a recursive conversion
#[derive(Debug, Clone, Copy)]
pub struct SanitizeContext<'a> {
    /// Root resource whose embedding request governs the whole walk
    pub base_resource: &'a str,
    /// Resource owning the value
    pub resource: &'a str,
    /// Attribute the value was read from
    pub field: Option<&'a str>,
    /// Dotted prefix of the fields embedded so far, e.g. `author.`
    pub embedded_till_now: &'a str,
    /// Projection the attribute was selected from
    pub subfields: Option<&'a FieldProjection>,
}

impl<'a> SanitizeContext<'a> {
    /// Context of a top-level, field-less value
    pub fn new(base_resource: &'a str, resource: &'a str) -> Self {
        Self {
            base_resource,
            resource,
            field: None,
            embedded_till_now: "",
            subfields: None,
        }
    }

    pub fn with_field(mut self, field: &'a str) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_prefix(mut self, embedded_till_now: &'a str) -> Self {
        self.embedded_till_now = embedded_till_now;
        self
    }

    pub fn with_subfields(mut self, subfields: &'a FieldProjection) -> Self {
        self.subfields = Some(subfields);
        self
    }
}

/// Converts records and attribute values into documents
#[derive(Clone, Copy)]
pub struct Sanitizer<'a> {
    domain: &'a Domain,
    embedding: &'a dyn EmbeddingResolver,
}

impl<'a> Sanitizer<'a> {
    /// Sanitizer reducing every related record to its identifier
    pub fn flat(domain: &'a Domain) -> Self {
        Self {
            domain,
            embedding: &NoEmbedding,
        }
    }

    /// Sanitizer embedding the paths `embedding` requests
    pub fn embedding(domain: &'a Domain, embedding: &'a dyn EmbeddingResolver) -> Self {
        Self { domain, embedding }
    }

    pub fn domain(&self) -> &'a Domain {
        self.domain
    }

    /// Sanitizes a single value.
    ///
    /// Collections keep the context of their owning attribute, so a list of
    /// related records under an embedded field is embedded item by item.
    pub fn sanitize(
        &self,
        value: AttrValue,
        ctx: &SanitizeContext<'_>,
    ) -> ProjectionResult<DocumentValue> {
        let sanitized = match value {
            AttrValue::Record(record) => match ctx.field {
                Some(field) if self.is_embedded(field, ctx) => self.embed(&record, field, ctx)?,
                _ => self.identifier_of(&record, ctx)?,
            },
            AttrValue::Map(map) => DocumentValue::Map(
                map.into_iter()
                    .map(|(key, value)| Ok((key, self.sanitize(value, ctx)?)))
                    .collect::<ProjectionResult<Document>>()?,
            ),
            AttrValue::List(items) => DocumentValue::List(self.sanitize_all(items, ctx)?),
            AttrValue::Set(items) => DocumentValue::set(self.sanitize_all(items, ctx)?),
            AttrValue::Enum(member) => DocumentValue::Text(member.value().to_string()),
            AttrValue::Null => DocumentValue::Null,
            AttrValue::Bool(b) => DocumentValue::Bool(b),
            AttrValue::Int(i) => DocumentValue::Int(i),
            AttrValue::Float(f) => DocumentValue::Float(f),
            AttrValue::Text(s) => DocumentValue::Text(s),
            AttrValue::Bytes(bytes) => DocumentValue::Bytes(bytes),
            AttrValue::Timestamp(ts) => DocumentValue::Timestamp(ts),
            AttrValue::Uuid(uuid) => DocumentValue::Uuid(uuid),
        };
        Ok(sanitized)
    }

    fn sanitize_all(
        &self,
        items: Vec<AttrValue>,
        ctx: &SanitizeContext<'_>,
    ) -> ProjectionResult<Vec<DocumentValue>> {
        items
            .into_iter()
            .map(|item| self.sanitize(item, ctx))
            .collect()
    }

    /// Converts a record into a document holding the heads of `fields`.
    ///
    /// Attributes the record lacks are left out, as are related records
    /// whose identifier is missing. A blank concurrency tag is removed.
    pub fn record_to_document(
        &self,
        record: &dyn Record,
        fields: &FieldProjection,
        resource: &str,
        base_resource: &str,
        embedded_till_now: &str,
    ) -> ProjectionResult<Document> {
        let mut document = Document::new();
        for field in fields.heads() {
            let Some(raw) = record.get(field) else {
                trace!(model = record.model(), field, "attribute missing, field omitted");
                continue;
            };

            let value = coerce(record, field, raw);
            let ctx = SanitizeContext::new(base_resource, resource)
                .with_field(field)
                .with_prefix(embedded_till_now)
                .with_subfields(fields);

            match self.sanitize(value, &ctx) {
                Ok(value) => {
                    document.insert(field.to_string(), value);
                }
                Err(ProjectionError::MissingAttribute { model, field: missing }) => {
                    trace!(
                        %model,
                        field,
                        missing = %missing,
                        "related attribute missing, field omitted"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        let etag = &self.domain.settings().etag;
        if document.get(etag).map_or(false, DocumentValue::is_blank) {
            document.remove(etag);
        }
        Ok(document)
    }

    /// Converts a record without embedding, adding the bookkeeping fields
    pub fn flat_document(
        &self,
        record: &dyn Record,
        fields: &FieldProjection,
        resource: &str,
    ) -> ProjectionResult<Document> {
        let fields = fields.with_fields(self.domain.settings().bookkeeping_fields());
        self.record_to_document(record, &fields, resource, resource, "")
    }

    /// Checks whether `field`, at the current depth, heads a requested path
    fn is_embedded(&self, field: &str, ctx: &SanitizeContext<'_>) -> bool {
        self.embedding
            .embedded_fields(ctx.base_resource)
            .iter()
            .filter_map(|path| path.strip_prefix(ctx.embedded_till_now))
            .any(|rest| rest.split('.').next() == Some(field))
    }

    fn embed(
        &self,
        record: &RecordRef,
        field: &str,
        ctx: &SanitizeContext<'_>,
    ) -> ProjectionResult<DocumentValue> {
        let relation = self
            .domain
            .descriptor(ctx.resource)?
            .field(field)
            .and_then(|schema| schema.relation_target());
        let Some(relation) = relation else {
            trace!(
                resource = ctx.resource,
                field,
                "embedded field has no relation, identifier kept"
            );
            return self.identifier_of(record, ctx);
        };
        let target = self.domain.descriptor(&relation.resource)?;

        let fields = match ctx.subfields.and_then(|p| p.child(field)) {
            Some(requested) if !requested.is_empty() => requested.clone(),
            _ => FieldProjection::from_paths(target.projected_fields()),
        };
        let prefix = format!("{}{}.", ctx.embedded_till_now, field);

        trace!(
            resource = ctx.resource,
            field,
            target = %target.name,
            prefix = %prefix,
            "embedding related record"
        );

        let document = self.record_to_document(
            record.as_ref(),
            &fields,
            &target.name,
            ctx.base_resource,
            &prefix,
        )?;
        Ok(DocumentValue::Map(document))
    }

    /// Reduces a related record to the identifier of its own resource
    fn identifier_of(
        &self,
        record: &RecordRef,
        ctx: &SanitizeContext<'_>,
    ) -> ProjectionResult<DocumentValue> {
        let model = record.model();
        let descriptor = self
            .domain
            .resource_for_model(model)
            .ok_or_else(|| ProjectionError::UnknownModel(model.to_string()))?;
        let id = record
            .get(&descriptor.id_field)
            .ok_or_else(|| ProjectionError::missing_attribute(model, &descriptor.id_field))?;

        let ctx = SanitizeContext::new(ctx.base_resource, &descriptor.name);
        self.sanitize(id, &ctx)
    }
}

/// Applies the column's bind-parameter coercion, keeping the raw value on
/// failure
fn coerce(record: &dyn Record, field: &str, value: AttrValue) -> AttrValue {
    if value.is_collection() || value.is_record() {
        return value;
    }
    let Some(column) = record.column_type(field) else {
        return value;
    };
    match column.process_bind_param(&value) {
        Ok(coerced) => coerced,
        Err(err) => {
            debug!(
                model = record.model(),
                field,
                error = %err,
                "column coercion failed, raw value kept"
            );
            value
        }
    }
}
