//! Concern registry: per-concern defaults consulted while resolving resource descriptors.

use crate::config::ConcernConfig;
use crate::error::ConfigError;
use crate::repo::RepoRef;
use std::collections::HashMap;

pub trait ConcernRegistry: Send + Sync {
    /// The concern's own repository. Fails when the concern is unknown or has none.
    fn repository(&self, concern: &str) -> Result<RepoRef, ConfigError>;

    fn adapter(&self, concern: &str) -> Option<String>;

    fn paginate(&self, concern: &str) -> Option<bool>;

    fn theme(&self, concern: &str) -> Option<String>;
}

struct ConcernEntry {
    config: ConcernConfig,
    repo: Option<RepoRef>,
}

/// Map-backed registry built from concern config plus attached repositories.
#[derive(Default)]
pub struct StaticConcerns {
    concerns: HashMap<String, ConcernEntry>,
}

impl StaticConcerns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(configs: &[ConcernConfig]) -> Self {
        configs
            .iter()
            .cloned()
            .fold(Self::new(), |acc, c| acc.with_concern(c))
    }

    pub fn with_concern(mut self, config: ConcernConfig) -> Self {
        let repo = self.concerns.remove(&config.name).and_then(|e| e.repo);
        self.concerns
            .insert(config.name.clone(), ConcernEntry { config, repo });
        self
    }

    /// Attach the default repository of `concern`, registering the concern if needed.
    pub fn with_repository(mut self, concern: &str, repo: RepoRef) -> Self {
        self.concerns
            .entry(concern.to_string())
            .or_insert_with(|| ConcernEntry {
                config: ConcernConfig::named(concern),
                repo: None,
            })
            .repo = Some(repo);
        self
    }

    pub fn contains(&self, concern: &str) -> bool {
        self.concerns.contains_key(concern)
    }
}

impl ConcernRegistry for StaticConcerns {
    fn repository(&self, concern: &str) -> Result<RepoRef, ConfigError> {
        let entry = self
            .concerns
            .get(concern)
            .ok_or_else(|| ConfigError::UnknownConcern(concern.to_string()))?;
        entry.repo.clone().ok_or_else(|| ConfigError::MissingReference {
            kind: "repository",
            id: concern.to_string(),
        })
    }

    fn adapter(&self, concern: &str) -> Option<String> {
        self.concerns.get(concern).and_then(|e| e.config.adapter.clone())
    }

    fn paginate(&self, concern: &str) -> Option<bool> {
        self.concerns.get(concern).and_then(|e| e.config.paginate)
    }

    fn theme(&self, concern: &str) -> Option<String> {
        self.concerns.get(concern).and_then(|e| e.config.theme.clone())
    }
}
