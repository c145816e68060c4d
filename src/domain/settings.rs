//! Global projection settings
//!
//! Names of the bookkeeping fields every flat document carries, and whether
//! concurrency control (the `_etag` field) is active.

use serde::{Deserialize, Serialize};

/// Settings shared by every resource of a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Identifier field used when a resource does not declare one.
    pub id_field: String,
    /// Last-modification timestamp field.
    pub last_updated: String,
    /// Creation timestamp field.
    pub date_created: String,
    /// Concurrency-control tag field.
    pub etag: String,
    /// Whether concurrency control is enabled.
    pub if_match: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id_field: "_id".to_string(),
            last_updated: "_updated".to_string(),
            date_created: "_created".to_string(),
            etag: "_etag".to_string(),
            if_match: true,
        }
    }
}

impl Settings {
    /// Settings with concurrency control switched off.
    pub fn without_concurrency_control() -> Self {
        Self {
            if_match: false,
            ..Self::default()
        }
    }

    /// Bookkeeping fields the flat conversion always extracts.
    pub fn bookkeeping_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.last_updated.as_str(), self.date_created.as_str()];
        if self.if_match {
            fields.push(self.etag.as_str());
        }
        fields
    }
}
