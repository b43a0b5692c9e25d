//! Resource descriptor: per-schema configuration resolved once at registration.

use crate::case::pluralize;
use crate::concern::ConcernRegistry;
use crate::config::ResourceConfig;
use crate::error::ConfigError;
use crate::repo::RepoRef;
use crate::resource::{naming, Services};
use crate::schema::SchemaRef;
use std::fmt;

/// Localization domain used when a resource does not name one.
pub const DEFAULT_DOMAIN: &str = "talon";

/// Immutable once built; share it behind an `Arc` across requests.
#[derive(Clone)]
pub struct ResourceDescriptor {
    concern: Option<String>,
    schema: SchemaRef,
    adapter: String,
    repo: RepoRef,
    paginate: bool,
    domain: String,
    theme: Option<String>,
    params_key: String,
    route_name: String,
    services: Services,
}

impl ResourceDescriptor {
    /// Resolve every field from explicit options first, then concern-level defaults.
    ///
    /// - adapter: option, else the concern's adapter, else `AdapterRequired`
    /// - repo: option, else the concern's repository (its failure propagates)
    /// - paginate: option, else the concern's setting, else `true`
    /// - domain: option, else [`DEFAULT_DOMAIN`]
    pub fn resolve(config: ResourceConfig, concerns: &dyn ConcernRegistry) -> Result<Self, ConfigError> {
        let schema = config.schema.ok_or(ConfigError::SchemaRequired)?;
        let concern = config.concern;

        let adapter = match config.adapter {
            Some(adapter) => adapter,
            None => concern
                .as_deref()
                .and_then(|c| concerns.adapter(c))
                .ok_or(ConfigError::AdapterRequired)?,
        };

        let repo = match config.repo {
            Some(repo) => repo,
            None => {
                let c = concern.as_deref().ok_or(ConfigError::ConcernRequired)?;
                concerns.repository(c)?
            }
        };

        let paginate = config
            .paginate
            .or_else(|| concern.as_deref().and_then(|c| concerns.paginate(c)))
            .unwrap_or(true);
        let domain = config.domain.unwrap_or_else(|| DEFAULT_DOMAIN.to_string());
        let theme = concern.as_deref().and_then(|c| concerns.theme(c));

        let params_key = naming::params_key(schema.as_ref());
        let route_name = pluralize(&params_key);

        tracing::info!(
            schema = %schema.qualified_name(),
            route_name = %route_name,
            adapter = %adapter,
            paginate,
            "resource resolved"
        );

        Ok(ResourceDescriptor {
            concern,
            schema,
            adapter,
            repo,
            paginate,
            domain,
            theme,
            params_key,
            route_name,
            services: config.services,
        })
    }

    pub fn concern(&self) -> Option<&str> {
        self.concern.as_deref()
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    pub fn paginate(&self) -> bool {
        self.paginate
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Singular snake_case key derived from the schema's short name, e.g. "blog_post".
    pub fn params_key(&self) -> &str {
        &self.params_key
    }

    /// Plural of [`Self::params_key`], e.g. "blog_posts".
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    pub fn services(&self) -> &Services {
        &self.services
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("concern", &self.concern)
            .field("schema", &self.schema.qualified_name())
            .field("adapter", &self.adapter)
            .field("paginate", &self.paginate)
            .field("domain", &self.domain)
            .field("route_name", &self.route_name)
            .finish_non_exhaustive()
    }
}
