//! Data-access seam: repositories execute resource queries and preload associations.

pub mod memory;
pub mod pg;

pub use memory::MemoryRepository;
pub use pg::PgRepository;

use crate::error::{AppError, ConfigError};
use crate::query::{Params, Query};
use crate::schema::{Association, Record, SchemaRef};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Repository: Send + Sync {
    /// One page of records matching `query`; page and page size come from `params`.
    async fn paginate(&self, query: &Query, params: &Params) -> Result<Page, AppError>;

    /// Every record matching `query`.
    async fn all(&self, query: &Query) -> Result<Vec<Record>, AppError>;

    /// Load `associations` onto an already fetched record.
    async fn preload(&self, record: Record, associations: &[String]) -> Result<Record, AppError>;
}

pub type RepoRef = Arc<dyn Repository>;

#[derive(Clone, Debug, Serialize)]
pub struct Page {
    pub entries: Vec<Record>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_entries: u64,
    pub total_pages: u32,
}

/// Result of the paginate hook: `{"page": ...}` or `{"resources": [...]}`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Listing {
    Page(Page),
    Resources(Vec<Record>),
}

impl Listing {
    pub fn records(&self) -> &[Record] {
        match self {
            Listing::Page(page) => &page.entries,
            Listing::Resources(records) => records,
        }
    }
}

/// Equality that treats a scalar and its text form as equal ("5" == 5), as query-string ids arrive as text.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (scalar_text(a), scalar_text(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Look up an association declared on the record's schema.
pub(crate) fn association<'a>(schema: &'a SchemaRef, name: &str) -> Result<&'a Association, AppError> {
    schema.association(name).ok_or_else(|| {
        AppError::Config(ConfigError::MissingReference {
            kind: "association",
            id: format!("{}.{}", schema.qualified_name(), name),
        })
    })
}

/// Find the related schema among the schemas a repository knows.
pub(crate) fn related_schema(schemas: &[SchemaRef], assoc: &Association) -> Result<SchemaRef, AppError> {
    schemas
        .iter()
        .find(|s| s.answers_to(&assoc.related))
        .cloned()
        .ok_or_else(|| {
            AppError::Config(ConfigError::MissingReference {
                kind: "schema",
                id: assoc.related.clone(),
            })
        })
}

/// Distinct non-null values of our join key across `records`.
pub(crate) fn association_keys(records: &[Record], assoc: &Association) -> Vec<Value> {
    let mut keys: Vec<Value> = Vec::new();
    for r in records {
        if let Some(v) = r.get(&assoc.our_key).filter(|v| !v.is_null()) {
            if !keys.iter().any(|k| loose_eq(k, v)) {
                keys.push(v.clone());
            }
        }
    }
    keys
}

/// Set the association on each record: one object (or null) for to_one, an array for to_many.
pub(crate) fn attach(records: &mut [Record], assoc: &Association, related: &[Record]) {
    for record in records.iter_mut() {
        let key = record.get(&assoc.our_key).cloned().unwrap_or(Value::Null);
        let mut matches = related
            .iter()
            .filter(|r| !key.is_null() && r.get(&assoc.their_key).is_some_and(|v| loose_eq(v, &key)))
            .map(Record::to_value);
        let value = if assoc.kind.is_many() {
            Value::Array(matches.collect())
        } else {
            matches.next().unwrap_or(Value::Null)
        };
        record.insert(assoc.name.clone(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, SchemaDef};
    use serde_json::json;

    #[test]
    fn test_loose_eq() {
        assert!(loose_eq(&json!(5), &json!("5")));
        assert!(loose_eq(&json!("a"), &json!("a")));
        assert!(!loose_eq(&json!(5), &json!(6)));
        assert!(!loose_eq(&json!(null), &json!("null")));
    }

    #[test]
    fn test_attach_to_one_and_to_many() {
        let author = SchemaDef::new("Author").field("id", FieldType::Integer).into_ref();
        let post = SchemaDef::new("Post")
            .field("id", FieldType::Integer)
            .field("author_id", FieldType::Integer)
            .belongs_to("author", "Author", "author_id")
            .into_ref();
        let mut posts = vec![
            Record::from_value(post.clone(), json!({"id": 1, "author_id": 7})),
            Record::from_value(post.clone(), json!({"id": 2, "author_id": null})),
        ];
        let authors = vec![Record::from_value(author.clone(), json!({"id": 7}))];
        let assoc = post.association("author").unwrap().clone();
        assert_eq!(association_keys(&posts, &assoc), vec![json!(7)]);
        attach(&mut posts, &assoc, &authors);
        assert_eq!(posts[0].get("author"), Some(&json!({"id": 7})));
        assert_eq!(posts[1].get("author"), Some(&Value::Null));

        let author = SchemaDef::new("Author")
            .field("id", FieldType::Integer)
            .has_many("posts", "Post", "author_id")
            .into_ref();
        let mut authors = vec![Record::from_value(author.clone(), json!({"id": 7}))];
        let assoc = author.association("posts").unwrap().clone();
        attach(&mut authors, &assoc, &posts);
        assert_eq!(authors[0].get("posts").and_then(Value::as_array).map(Vec::len), Some(1));
    }
}
