//! Embedding requests
//!
//! An embedding request lists dotted paths, relative to the root resource of
//! a request, whose relationship fields are expanded into nested documents
//! instead of being reduced to identifiers.

use serde_json::Value;
use tracing::debug;

use crate::domain::Domain;
use crate::errors::{ProjectionError, ProjectionResult};

/// Source of the embedding paths requested for a root resource
pub trait EmbeddingResolver {
    /// Fully-qualified embedding paths for requests rooted at `base_resource`
    fn embedded_fields(&self, base_resource: &str) -> &[String];
}

/// Resolver that never embeds
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmbedding;

impl EmbeddingResolver for NoEmbedding {
    fn embedded_fields(&self, _base_resource: &str) -> &[String] {
        &[]
    }
}

impl EmbeddingResolver for Vec<String> {
    fn embedded_fields(&self, _base_resource: &str) -> &[String] {
        self
    }
}

/// Embedding paths of a single request, validated against the domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEmbedding {
    resource: String,
    fields: Vec<String>,
}

impl RequestEmbedding {
    /// Creates a request without validation
    pub fn new<I, S>(resource: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource: resource.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves the embedding of a request on `resource`.
    ///
    /// `embedded` is the client's argument, a JSON object mapping paths to
    /// `1` (embed) or `0` (do not embed). The resource's default embedded
    /// fields apply unless the client switches them off. Every resulting
    /// path must walk embeddable relations only.
    pub fn parse(
        domain: &Domain,
        resource: &str,
        embedded: Option<&str>,
    ) -> ProjectionResult<Self> {
        let descriptor = domain.descriptor(resource)?;

        let mut requested = Vec::new();
        let mut disabled = Vec::new();
        if let Some(raw) = embedded.filter(|raw| !raw.trim().is_empty()) {
            let parsed: Value = serde_json::from_str(raw).map_err(|e| {
                ProjectionError::invalid_argument(format!(
                    "Unable to parse `embedded` clause: {}",
                    e
                ))
            })?;
            let Value::Object(entries) = parsed else {
                return Err(ProjectionError::invalid_argument(
                    "`embedded` clause must be a JSON object",
                ));
            };
            for (path, flag) in entries {
                if is_enabled(&flag) {
                    requested.push(path);
                } else {
                    disabled.push(path);
                }
            }
        }

        let mut fields: Vec<String> = Vec::new();
        for path in descriptor.embedded_fields.iter().chain(requested.iter()) {
            if !disabled.contains(path) && !fields.contains(path) {
                fields.push(path.clone());
            }
        }

        for path in &fields {
            validate_path(domain, resource, path)?;
        }

        debug!(resource, embedded = ?fields, "embedding resolved");
        Ok(Self::new(resource, fields))
    }

    /// Root resource of the request
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Requested paths
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl EmbeddingResolver for RequestEmbedding {
    fn embedded_fields(&self, base_resource: &str) -> &[String] {
        if base_resource == self.resource {
            &self.fields
        } else {
            &[]
        }
    }
}

fn is_enabled(flag: &Value) -> bool {
    match flag {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Walks `path` segment by segment, following relation targets
fn validate_path(domain: &Domain, resource: &str, path: &str) -> ProjectionResult<()> {
    let not_embeddable = || ProjectionError::NotEmbeddable {
        resource: resource.to_string(),
        path: path.to_string(),
    };

    let mut current = domain.descriptor(resource)?;
    for segment in path.split('.') {
        let relation = current
            .field(segment)
            .and_then(|schema| schema.relation_target())
            .filter(|relation| relation.embeddable)
            .ok_or_else(not_embeddable)?;
        current = domain.descriptor(&relation.resource)?;
    }
    Ok(())
}
