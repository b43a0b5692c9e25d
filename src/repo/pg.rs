//! PostgreSQL repository: executes resource queries through sqlx and preloads
//! associations by batch-fetching related rows.

use crate::error::AppError;
use crate::query::{Params, Query};
use crate::repo::{association, association_keys, attach, related_schema, Page, Repository};
use crate::schema::{Record, SchemaRef};
use crate::sql::{count, select, select_by_column_in, PgBindValue, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

pub struct PgRepository {
    pool: PgPool,
    /// Schemas reachable through associations.
    schemas: Vec<SchemaRef>,
    /// PostgreSQL schema qualifying table names; unqualified (search_path) when None.
    pg_schema: Option<String>,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        PgRepository {
            pool,
            schemas: Vec::new(),
            pg_schema: None,
        }
    }

    pub fn with_schema(mut self, schema: SchemaRef) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn with_pg_schema(mut self, pg_schema: impl Into<String>) -> Self {
        self.pg_schema = Some(pg_schema.into());
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn query_many(&self, schema: &SchemaRef, q: &QueryBuf) -> Result<Vec<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|r| Record::from_value(schema.clone(), row_to_json(r)))
            .collect())
    }

    async fn query_count(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let n = query.fetch_one(&self.pool).await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn preload_records(&self, mut records: Vec<Record>, associations: &[String]) -> Result<Vec<Record>, AppError> {
        let Some(schema) = records.first().map(|r| r.schema().clone()) else {
            return Ok(records);
        };
        for name in associations {
            let assoc = association(&schema, name)?;
            let related = related_schema(&self.schemas, assoc)?;
            let keys = association_keys(&records, assoc);
            if keys.is_empty() {
                attach(&mut records, assoc, &[]);
                continue;
            }
            let q = select_by_column_in(related.as_ref(), &assoc.their_key, &keys, self.pg_schema.as_deref());
            let rows = self.query_many(&related, &q).await?;
            attach(&mut records, assoc, &rows);
        }
        Ok(records)
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn paginate(&self, query: &Query, params: &Params) -> Result<Page, AppError> {
        let request = params.page_request();
        let pg_schema = self.pg_schema.as_deref();
        let total_entries = self.query_count(&count(query, pg_schema)).await?;
        let q = select(query, Some(request.page_size), Some(request.offset()), pg_schema);
        let entries = self.query_many(query.schema(), &q).await?;
        let entries = self.preload_records(entries, &query.preloads).await?;
        Ok(Page {
            entries,
            page_number: request.page,
            page_size: request.page_size,
            total_entries,
            total_pages: request.total_pages(total_entries),
        })
    }

    async fn all(&self, query: &Query) -> Result<Vec<Record>, AppError> {
        let q = select(query, None, None, self.pg_schema.as_deref());
        let records = self.query_many(query.schema(), &q).await?;
        self.preload_records(records, &query.preloads).await
    }

    async fn preload(&self, record: Record, associations: &[String]) -> Result<Record, AppError> {
        let mut records = self.preload_records(vec![record], associations).await?;
        records
            .pop()
            .ok_or_else(|| AppError::NotFound("record".into()))
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        let v = cell_to_value(row, name);
        map.insert(name.to_string(), v);
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(f64::from(n)) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}
