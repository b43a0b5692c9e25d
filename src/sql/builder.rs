//! Builds parameterized SELECT / COUNT statements from a resource query.

use crate::query::{Direction, Query};
use crate::schema::{FieldType, Schema};
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from schema descriptions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name; unqualified when no pg schema is given.
fn qualified_table(pg_schema: Option<&str>, table: &str) -> String {
    match pg_schema {
        Some(schema) => format!("{}.{}", quoted(schema), quoted(table)),
        None => quoted(table),
    }
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// Placeholder with a cast to the column's declared type, so text-bound values compare correctly.
fn placeholder(schema: &dyn Schema, column: &str, param_num: u32) -> String {
    schema
        .field_type(column)
        .and_then(FieldType::pg_cast)
        .map(|t| format!("${}::{}", param_num, t))
        .unwrap_or_else(|| format!("${}", param_num))
}

/// SELECT list: each field as-is, except decimal and unknown types as col::text so rows decode to strings.
fn select_column_list(schema: &dyn Schema) -> String {
    schema
        .fields()
        .iter()
        .map(|f| {
            let q = quoted(&f.name);
            match f.ty {
                FieldType::Decimal | FieldType::Other(_) => format!("{}::text AS {}", q, q),
                _ => q,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// WHERE clause from every filter and the search clause. Filters on undeclared columns
/// bind without a cast.
fn where_clause(q: &mut QueryBuf, query: &Query) -> String {
    let schema = query.schema().as_ref();
    let mut parts = Vec::new();
    for f in &query.filters {
        let n = q.push_param(f.value.clone());
        parts.push(format!("{} = {}", quoted(&f.column), placeholder(schema, &f.column, n)));
    }
    if let Some(search) = &query.search {
        let columns: Vec<&String> = search
            .columns
            .iter()
            .filter(|c| schema.field_type(c).is_some())
            .collect();
        if !columns.is_empty() {
            let n = q.push_param(Value::String(format!("%{}%", escape_like(&search.term))));
            let ors: Vec<String> = columns
                .iter()
                .map(|c| format!("{}::text ILIKE ${}", quoted(c), n))
                .collect();
            parts.push(format!("({})", ors.join(" OR ")));
        }
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// ORDER BY from the query, else by primary key when one is declared.
fn order_clause(query: &Query) -> String {
    let schema = query.schema().as_ref();
    let mut parts: Vec<String> = query
        .order
        .iter()
        .filter(|o| schema.field_type(&o.column).is_some())
        .map(|o| {
            let dir = match o.direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            format!("{} {}", quoted(&o.column), dir)
        })
        .collect();
    if parts.is_empty() {
        if let Some(pk) = schema.primary_key() {
            parts.push(quoted(pk));
        }
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}", parts.join(", "))
    }
}

/// SELECT rows matching the query with optional LIMIT/OFFSET.
pub fn select(query: &Query, limit: Option<u32>, offset: Option<u64>, pg_schema: Option<&str>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let schema = query.schema().as_ref();
    let table = qualified_table(pg_schema, schema.source());
    let where_sql = where_clause(&mut q, query);
    let order_sql = order_clause(query);
    let limit_sql = limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    let offset_sql = offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {}{}{}{}{}",
        select_column_list(schema),
        table,
        where_sql,
        order_sql,
        limit_sql,
        offset_sql
    );
    q
}

/// COUNT(*) of rows matching the query (ordering ignored).
pub fn count(query: &Query, pg_schema: Option<&str>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(pg_schema, query.source());
    let where_sql = where_clause(&mut q, query);
    q.sql = format!("SELECT COUNT(*) AS \"count\" FROM {}{}", table, where_sql);
    q
}

/// SELECT * FROM schema WHERE column IN ($1, $2, ...). Used for batch-fetching associated rows.
pub fn select_by_column_in(
    schema: &dyn Schema,
    column_name: &str,
    values: &[Value],
    pg_schema: Option<&str>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(pg_schema, schema.source());
    let cols = select_column_list(schema);
    if values.is_empty() {
        q.sql = format!("SELECT {} FROM {} WHERE 1 = 0", cols, table);
        return q;
    }
    let placeholders: Vec<String> = values
        .iter()
        .map(|v| {
            let n = q.push_param(v.clone());
            placeholder(schema, column_name, n)
        })
        .collect();
    let order = schema.primary_key().map(|pk| format!(" ORDER BY {}", quoted(pk))).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} IN ({}){}",
        cols,
        table,
        quoted(column_name),
        placeholders.join(", "),
        order
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{OrderBy, SearchClause};
    use crate::schema::SchemaDef;
    use serde_json::json;

    fn post_query() -> Query {
        let schema = SchemaDef::new("MyBlog.BlogPost")
            .field("id", FieldType::Integer)
            .field("title", FieldType::String)
            .field("price", FieldType::Decimal)
            .into_ref();
        Query::from_schema(schema)
    }

    #[test]
    fn test_select_unconstrained_orders_by_pk() {
        let q = select(&post_query(), None, None, None);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"title\", \"price\"::text AS \"price\" FROM \"blog_posts\" ORDER BY \"id\""
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn test_select_with_filter_search_order_and_limit() {
        let query = post_query()
            .where_id(json!("5"))
            .search(SearchClause { columns: vec!["title".into()], term: "50%_off".into() })
            .order_by(vec![OrderBy::desc("title")]);
        let q = select(&query, Some(20), Some(40), Some("public"));
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"title\", \"price\"::text AS \"price\" FROM \"public\".\"blog_posts\" \
             WHERE \"id\" = $1::bigint AND (\"title\"::text ILIKE $2) ORDER BY \"title\" DESC LIMIT 20 OFFSET 40"
        );
        assert_eq!(q.params, vec![json!("5"), json!("%50\\%\\_off%")]);
    }

    #[test]
    fn test_id_filter_kept_without_primary_key() {
        let schema = SchemaDef::new("Log")
            .with_primary_key(None)
            .field("msg", FieldType::String)
            .into_ref();
        let q = select(&Query::from_schema(schema).where_id(json!(5)), None, None, None);
        assert_eq!(q.sql, "SELECT \"msg\" FROM \"logs\" WHERE \"id\" = $1");
        assert_eq!(q.params, vec![json!(5)]);
    }

    #[test]
    fn test_filter_on_undeclared_column_is_applied() {
        let query = post_query().filter("tenant_id", json!(7));
        let q = select(&query, None, None, None);
        assert!(q.sql.contains("WHERE \"tenant_id\" = $1 ORDER BY"));
        let q = count(&query, None);
        assert!(q.sql.ends_with("WHERE \"tenant_id\" = $1"));
        assert_eq!(q.params, vec![json!(7)]);
    }

    #[test]
    fn test_count_ignores_order() {
        let query = post_query().filter("title", json!("a")).order_by(vec![OrderBy::asc("id")]);
        let q = count(&query, None);
        assert_eq!(q.sql, "SELECT COUNT(*) AS \"count\" FROM \"blog_posts\" WHERE \"title\" = $1::text");
    }

    #[test]
    fn test_select_by_column_in() {
        let query = post_query();
        let q = select_by_column_in(query.schema().as_ref(), "id", &[json!(1), json!(2)], None);
        assert!(q.sql.ends_with("WHERE \"id\" IN ($1::bigint, $2::bigint) ORDER BY \"id\""));
        let empty = select_by_column_in(query.schema().as_ref(), "id", &[], None);
        assert!(empty.sql.ends_with("WHERE 1 = 0"));
    }
}
