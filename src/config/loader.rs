//! Load a config document from JSON and resolve it into registered resources.

use crate::concern::ConcernRegistry;
use crate::config::{validate, FullConfig, ResourceConfig};
use crate::error::ConfigError;
use crate::registry::ResourceRegistry;
use crate::resource::{ResourceDescriptor, Services};
use crate::schema::SchemaRef;
use std::path::Path;
use std::sync::Arc;

pub fn load_from_str(json: &str) -> Result<FullConfig, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))
}

pub async fn load_from_path(path: impl AsRef<Path>) -> Result<FullConfig, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    load_from_str(&raw)
}

/// Schemas of the document as shared references, with derived defaults filled in.
pub fn schema_refs(config: &FullConfig) -> Vec<SchemaRef> {
    config
        .schemas
        .iter()
        .cloned()
        .map(|s| s.into_ref())
        .collect()
}

/// Validate the document and build one descriptor per resource entry. Any failure
/// aborts the whole registration.
pub fn resolve(
    config: &FullConfig,
    concerns: &dyn ConcernRegistry,
    services: &Services,
) -> Result<ResourceRegistry, ConfigError> {
    validate(config)?;
    let schemas = schema_refs(config);
    let mut registry = ResourceRegistry::new();
    for entry in &config.resources {
        let schema = entry
            .schema
            .as_deref()
            .and_then(|name| schemas.iter().find(|s| s.answers_to(name)).cloned());
        let resource_config = ResourceConfig {
            concern: entry.concern.clone(),
            domain: entry.domain.clone(),
            schema,
            adapter: entry.adapter.clone(),
            repo: None,
            paginate: entry.paginate,
            services: services.clone(),
        };
        let descriptor = ResourceDescriptor::resolve(resource_config, concerns)?;
        registry.register(Arc::new(descriptor))?;
    }
    Ok(registry)
}
