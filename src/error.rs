//! Typed errors: registration-time configuration failures and request-time collaborator failures.

use thiserror::Error;

/// Raised while building a resource descriptor or loading resource config.
/// A resource whose descriptor fails to build must not be registered.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("schema is required")]
    SchemaRequired,
    #[error("schema_adapter required")]
    AdapterRequired,
    #[error("concern is required")]
    ConcernRequired,
    #[error("unknown concern: {0}")]
    UnknownConcern(String),
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("duplicate route: {0}")]
    DuplicateRoute(String),
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Request-time errors. Data-access failures pass through unchanged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
}
