//! Full-text / attribute search collaborator.

use crate::query::{Query, SearchClause};
use crate::schema::Schema;

pub trait Searcher: Send + Sync {
    /// Narrow `query` to records matching `terms`.
    fn search(&self, schema: &dyn Schema, query: Query, terms: &str) -> Query;
}

/// Case-insensitive substring match over every string field of the schema.
/// Blank terms, or schemas without string fields, leave the query unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextSearch;

impl Searcher for TextSearch {
    fn search(&self, schema: &dyn Schema, query: Query, terms: &str) -> Query {
        let term = terms.trim();
        if term.is_empty() {
            return query;
        }
        let columns: Vec<String> = schema
            .fields()
            .iter()
            .filter(|f| f.ty.is_string())
            .map(|f| f.name.clone())
            .collect();
        if columns.is_empty() {
            return query;
        }
        query.search(SearchClause { columns, term: term.to_string() })
    }
}
