//! Domain registry and loader
//!
//! Holds every resource descriptor of an API, keyed by resource name. The
//! registry is read-only once built; the projection engine only looks
//! descriptors up on demand.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::errors::{DomainError, DomainResult};
use super::settings::Settings;
use super::types::ResourceDescriptor;
use crate::errors::{ProjectionError, ProjectionResult};

/// On-disk layout of a domain definition
#[derive(Debug, Deserialize)]
struct DomainFile {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    domain: BTreeMap<String, ResourceDescriptor>,
}

/// Registry of resource descriptors plus global settings
#[derive(Debug, Clone, Default)]
pub struct Domain {
    settings: Settings,
    resources: BTreeMap<String, ResourceDescriptor>,
}

impl Domain {
    /// Creates an empty domain
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            resources: BTreeMap::new(),
        }
    }

    /// Parses a domain definition from JSON.
    ///
    /// Every data relation must point at a resource of the same document.
    pub fn from_json_str(content: &str) -> DomainResult<Self> {
        let file: DomainFile =
            serde_json::from_str(content).map_err(|e| DomainError::Malformed(e.to_string()))?;

        let mut domain = Self::new(file.settings);
        for (name, descriptor) in file.domain {
            domain.register(name, descriptor)?;
        }
        domain.validate_relations()?;

        debug!(resources = domain.resources.len(), "domain loaded");
        Ok(domain)
    }

    /// Loads a domain definition file.
    pub fn load(path: &Path) -> DomainResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| DomainError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Registers a descriptor under `name`.
    ///
    /// Fills in the resource name, the default model source and the default
    /// identifier field.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        mut descriptor: ResourceDescriptor,
    ) -> DomainResult<()> {
        let name = name.into();
        if self.resources.contains_key(&name) {
            return Err(DomainError::DuplicateResource(name));
        }

        descriptor.name = name.clone();
        if descriptor.source.is_empty() {
            descriptor.source = name.clone();
        }
        if descriptor.id_field.is_empty() {
            descriptor.id_field = self.settings.id_field.clone();
        }

        self.resources.insert(name, descriptor);
        Ok(())
    }

    /// Builder form of [`Domain::register`]
    pub fn with_resource(mut self, descriptor: ResourceDescriptor) -> DomainResult<Self> {
        let name = descriptor.name.clone();
        self.register(name, descriptor)?;
        Ok(self)
    }

    /// Checks that every relation targets a registered resource
    pub fn validate_relations(&self) -> DomainResult<()> {
        for (name, descriptor) in &self.resources {
            for (field, schema) in &descriptor.schema {
                if let Some(relation) = schema.relation_target() {
                    if !self.resources.contains_key(&relation.resource) {
                        return Err(DomainError::UnknownRelationTarget {
                            resource: name.clone(),
                            field: field.clone(),
                            target: relation.resource.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Global settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Gets a descriptor by resource name
    pub fn resource(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(name)
    }

    /// Gets a descriptor by resource name, failing on unknown names
    pub fn descriptor(&self, name: &str) -> ProjectionResult<&ResourceDescriptor> {
        self.resource(name)
            .ok_or_else(|| ProjectionError::UnknownResource(name.to_string()))
    }

    /// Finds the resource backed by `model`
    pub fn resource_for_model(&self, model: &str) -> Option<&ResourceDescriptor> {
        self.resources.values().find(|d| d.source == model)
    }

    /// Identifier field of a resource
    pub fn id_field_for(&self, resource: &str) -> ProjectionResult<&str> {
        Ok(self.descriptor(resource)?.id_field.as_str())
    }

    /// Returns all registered resource names
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}
