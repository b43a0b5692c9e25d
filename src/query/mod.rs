//! Backend-neutral query value piped through the resource hooks, plus request params
//! and the sort/search collaborators that annotate it.

pub mod params;
pub mod search;
pub mod sort;

pub use params::*;
pub use search::*;
pub use sort::*;

use crate::schema::SchemaRef;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        OrderBy { column: column.into(), direction: Direction::Asc }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        OrderBy { column: column.into(), direction: Direction::Desc }
    }
}

/// Exact-match constraint on one column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

/// Case-insensitive substring match of `term` against any of `columns`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchClause {
    pub columns: Vec<String>,
    pub term: String,
}

/// A query over one schema. Builder methods consume and return the query.
#[derive(Clone, Debug)]
pub struct Query {
    schema: SchemaRef,
    pub filters: Vec<Filter>,
    pub order: Vec<OrderBy>,
    pub preloads: Vec<String>,
    pub search: Option<SearchClause>,
}

impl Query {
    pub fn from_schema(schema: SchemaRef) -> Self {
        Query {
            schema,
            filters: Vec::new(),
            order: Vec::new(),
            preloads: Vec::new(),
            search: None,
        }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn source(&self) -> &str {
        self.schema.source()
    }

    /// Add an exact-match filter, replacing any earlier filter on the same column.
    pub fn filter(mut self, column: impl Into<String>, value: Value) -> Self {
        let column = column.into();
        self.filters.retain(|f| f.column != column);
        self.filters.push(Filter { column, value });
        self
    }

    /// Constrain to one primary key value. Schemas without a declared key fall back to "id".
    pub fn where_id(self, id: Value) -> Self {
        let pk = self.schema.primary_key().unwrap_or("id").to_string();
        self.filter(pk, id)
    }

    /// Replace the ordering.
    pub fn order_by(mut self, order: Vec<OrderBy>) -> Self {
        self.order = order;
        self
    }

    /// Mark associations for eager loading; duplicates are ignored.
    pub fn preload<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.preloads.contains(&name) {
                self.preloads.push(name);
            }
        }
        self
    }

    pub fn search(mut self, clause: SearchClause) -> Self {
        self.search = Some(clause);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.filters.is_empty() && self.order.is_empty() && self.preloads.is_empty() && self.search.is_none()
    }
}
