//! In-process repository: applies resource queries to rows held in memory.

use crate::error::{AppError, ConfigError};
use crate::query::{Direction, Params, Query};
use crate::repo::{association, association_keys, attach, loose_eq, related_schema, Page, Repository};
use crate::schema::{Record, SchemaRef};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;

#[derive(Debug)]
struct Table {
    schema: SchemaRef,
    rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: Vec<Table>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rows for `schema`; non-object values are skipped.
    pub fn with_rows(mut self, schema: SchemaRef, rows: Vec<Value>) -> Self {
        let rows: Vec<Map<String, Value>> = rows
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(m) => Some(m),
                _ => None,
            })
            .collect();
        match self
            .tables
            .iter_mut()
            .find(|t| t.schema.qualified_name() == schema.qualified_name())
        {
            Some(table) => table.rows.extend(rows),
            None => self.tables.push(Table { schema, rows }),
        }
        self
    }

    fn schemas(&self) -> Vec<SchemaRef> {
        self.tables.iter().map(|t| t.schema.clone()).collect()
    }

    fn table(&self, schema: &SchemaRef) -> Result<&Table, AppError> {
        self.tables
            .iter()
            .find(|t| t.schema.qualified_name() == schema.qualified_name())
            .ok_or_else(|| {
                AppError::Config(ConfigError::MissingReference {
                    kind: "table",
                    id: schema.source().to_string(),
                })
            })
    }

    /// Filtered, searched and ordered records, before pagination and preloads.
    fn select(&self, query: &Query) -> Result<Vec<Record>, AppError> {
        let table = self.table(query.schema())?;
        let mut rows: Vec<&Map<String, Value>> = table
            .rows
            .iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|f| row.get(&f.column).is_some_and(|v| loose_eq(v, &f.value)))
            })
            .filter(|row| match &query.search {
                Some(search) => {
                    let term = search.term.to_lowercase();
                    search.columns.iter().any(|c| {
                        row.get(c)
                            .and_then(Value::as_str)
                            .is_some_and(|s| s.to_lowercase().contains(&term))
                    })
                }
                None => true,
            })
            .collect();
        let pk = query.schema().primary_key();
        rows.sort_by(|a, b| {
            if query.order.is_empty() {
                return match pk {
                    Some(pk) => compare(a.get(pk), b.get(pk)),
                    None => Ordering::Equal,
                };
            }
            query
                .order
                .iter()
                .map(|o| {
                    let ord = compare(a.get(&o.column), b.get(&o.column));
                    match o.direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(rows
            .into_iter()
            .map(|row| Record::new(query.schema().clone(), row.clone()))
            .collect())
    }

    fn preload_records(&self, mut records: Vec<Record>, associations: &[String]) -> Result<Vec<Record>, AppError> {
        let Some(schema) = records.first().map(|r| r.schema().clone()) else {
            return Ok(records);
        };
        let schemas = self.schemas();
        for name in associations {
            let assoc = association(&schema, name)?;
            let related = related_schema(&schemas, assoc)?;
            let keys = association_keys(&records, assoc);
            let rows: Vec<Record> = self
                .table(&related)?
                .rows
                .iter()
                .filter(|row| {
                    row.get(&assoc.their_key)
                        .is_some_and(|v| keys.iter().any(|k| loose_eq(k, v)))
                })
                .map(|row| Record::new(related.clone(), row.clone()))
                .collect();
            attach(&mut records, assoc, &rows);
        }
        Ok(records)
    }
}

/// Nulls first, then numbers, booleans and strings by value.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn paginate(&self, query: &Query, params: &Params) -> Result<Page, AppError> {
        let request = params.page_request();
        let matching = self.select(query)?;
        let total_entries = matching.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let entries: Vec<Record> = matching
            .into_iter()
            .skip(offset)
            .take(request.page_size as usize)
            .collect();
        let entries = self.preload_records(entries, &query.preloads)?;
        Ok(Page {
            entries,
            page_number: request.page,
            page_size: request.page_size,
            total_entries,
            total_pages: request.total_pages(total_entries),
        })
    }

    async fn all(&self, query: &Query) -> Result<Vec<Record>, AppError> {
        let records = self.select(query)?;
        self.preload_records(records, &query.preloads)
    }

    async fn preload(&self, record: Record, associations: &[String]) -> Result<Record, AppError> {
        let mut records = self.preload_records(vec![record], associations)?;
        records
            .pop()
            .ok_or_else(|| AppError::NotFound("record".into()))
    }
}
