//! Talon resource: schema-driven admin resource descriptors.
//!
//! A [`ResourceDescriptor`] is resolved once per schema from a [`ResourceConfig`] and
//! concern-level defaults. Presentation code asks it for columns and titles; the data-access
//! layer pipes queries through its preload / query / search / paginate hooks.

pub mod action;
pub mod case;
pub mod concern;
pub mod config;
pub mod error;
pub mod i18n;
pub mod query;
pub mod registry;
pub mod repo;
pub mod resource;
pub mod schema;
pub mod sql;

pub use action::{Action, PageKind};
pub use concern::{ConcernRegistry, StaticConcerns};
pub use config::{load_from_path, load_from_str, resolve, ConcernConfig, FullConfig, ResourceConfig};
pub use error::{AppError, ConfigError};
pub use i18n::{Catalog, Localizer};
pub use query::{Params, Query, Searcher, SortParser, SortTranslator, TextSearch};
pub use registry::{ResourceMeta, ResourceRef, ResourceRegistry};
pub use repo::{Listing, MemoryRepository, Page, PgRepository, RepoRef, Repository};
pub use resource::{
    load_record, run_pipeline, PreloadTarget, Resource, ResourceDescriptor, Services, DEFAULT_DOMAIN,
};
pub use schema::{FieldType, Record, Schema, SchemaDef, SchemaRef};
