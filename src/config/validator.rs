//! Config validation: referential integrity between schemas, concerns and resources.

use crate::config::FullConfig;
use crate::error::ConfigError;
use std::collections::HashSet;

pub fn validate(config: &FullConfig) -> Result<(), ConfigError> {
    let mut schema_names = HashSet::new();
    for s in &config.schemas {
        if !schema_names.insert(s.name.as_str()) {
            return Err(ConfigError::Validation(format!("duplicate schema: {}", s.name)));
        }
    }
    let known_schema = |name: &str| {
        config
            .schemas
            .iter()
            .any(|s| s.name == name || s.name.rsplit(['.', ':']).next() == Some(name))
    };

    let mut concern_names = HashSet::new();
    for c in &config.concerns {
        if !concern_names.insert(c.name.as_str()) {
            return Err(ConfigError::Validation(format!("duplicate concern: {}", c.name)));
        }
    }

    for s in &config.schemas {
        for a in &s.associations {
            if !known_schema(&a.related) {
                return Err(ConfigError::MissingReference {
                    kind: "schema",
                    id: a.related.clone(),
                });
            }
        }
    }

    for r in &config.resources {
        if let Some(schema) = &r.schema {
            if !known_schema(schema) {
                return Err(ConfigError::MissingReference {
                    kind: "schema",
                    id: schema.clone(),
                });
            }
        }
        if let Some(concern) = &r.concern {
            if !concern_names.contains(concern.as_str()) {
                return Err(ConfigError::MissingReference {
                    kind: "concern",
                    id: concern.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConcernConfig, ResourceEntry};
    use crate::schema::SchemaDef;

    fn base() -> FullConfig {
        FullConfig {
            schemas: vec![SchemaDef::new("MyBlog.BlogPost").belongs_to("author", "Author", "author_id"), SchemaDef::new("MyBlog.Author")],
            concerns: vec![ConcernConfig::named("MyBlog")],
            resources: vec![ResourceEntry {
                schema: Some("BlogPost".into()),
                concern: Some("MyBlog".into()),
                ..ResourceEntry::default()
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&base()).is_ok());
    }

    #[test]
    fn test_unknown_references() {
        let mut c = base();
        c.resources[0].schema = Some("Comment".into());
        assert!(matches!(validate(&c), Err(ConfigError::MissingReference { kind: "schema", .. })));

        let mut c = base();
        c.resources[0].concern = Some("Shop".into());
        assert!(matches!(validate(&c), Err(ConfigError::MissingReference { kind: "concern", .. })));

        let mut c = base();
        c.schemas.remove(1);
        assert!(matches!(validate(&c), Err(ConfigError::MissingReference { kind: "schema", .. })));
    }

    #[test]
    fn test_duplicates() {
        let mut c = base();
        c.concerns.push(ConcernConfig::named("MyBlog"));
        assert!(matches!(validate(&c), Err(ConfigError::Validation(_))));
    }
}
