//! Resource configuration: the programmatic record resolved into a descriptor, and the
//! JSON document shape (schemas, concerns, resources) for declarative setups.

use crate::repo::RepoRef;
use crate::resource::Services;
use crate::schema::{SchemaDef, SchemaRef};
use serde::{Deserialize, Serialize};

/// Options for one resource. Only `schema` is mandatory; everything else falls back
/// to concern-level defaults while resolving.
#[derive(Clone, Default)]
pub struct ResourceConfig {
    pub concern: Option<String>,
    pub domain: Option<String>,
    pub schema: Option<SchemaRef>,
    pub adapter: Option<String>,
    pub repo: Option<RepoRef>,
    pub paginate: Option<bool>,
    pub services: Services,
}

impl ResourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(mut self, schema: SchemaRef) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn concern(mut self, concern: impl Into<String>) -> Self {
        self.concern = Some(concern.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = Some(adapter.into());
        self
    }

    pub fn repo(mut self, repo: RepoRef) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn paginate(mut self, paginate: bool) -> Self {
        self.paginate = Some(paginate);
        self
    }

    pub fn services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }
}

/// Concern-level defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConcernConfig {
    pub name: String,
    #[serde(default)]
    pub adapter: Option<String>,
    #[serde(default)]
    pub paginate: Option<bool>,
    #[serde(default)]
    pub theme: Option<String>,
}

impl ConcernConfig {
    pub fn named(name: &str) -> Self {
        ConcernConfig {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// One resource entry in a config document. `schema` names a schema in the same document;
/// the repository always comes from the concern.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResourceEntry {
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub concern: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub adapter: Option<String>,
    #[serde(default)]
    pub paginate: Option<bool>,
}

/// Whole config document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FullConfig {
    #[serde(default)]
    pub schemas: Vec<SchemaDef>,
    #[serde(default)]
    pub concerns: Vec<ConcernConfig>,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}
