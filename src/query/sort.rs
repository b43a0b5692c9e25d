//! Sort-order translation: turns the raw `order` param into orderings on schema columns.

use crate::query::{Direction, OrderBy};
use crate::schema::Schema;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub trait SortTranslator: Send + Sync {
    fn parse(&self, schema: &dyn Schema, spec: &Value) -> Vec<OrderBy>;
}

/// Accepts `"title"`, `"-title"`, `"title:desc,body"`, `["title", "-body"]` or `{"title": "desc"}`.
/// Entries naming unknown columns or unknown directions are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct SortParser;

fn is_identifier(s: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

fn direction(s: &str) -> Option<Direction> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "asc" => Some(Direction::Asc),
        "desc" => Some(Direction::Desc),
        _ => None,
    }
}

fn entry(schema: &dyn Schema, column: &str, dir: Option<Direction>) -> Option<OrderBy> {
    let column = column.trim();
    if !is_identifier(column) || schema.field_type(column).is_none() {
        return None;
    }
    dir.map(|direction| OrderBy { column: column.to_string(), direction })
}

fn parse_term(schema: &dyn Schema, term: &str) -> Option<OrderBy> {
    let term = term.trim();
    if let Some(col) = term.strip_prefix('-') {
        return entry(schema, col, Some(Direction::Desc));
    }
    match term.split_once(':') {
        Some((col, dir)) => entry(schema, col, direction(dir)),
        None => entry(schema, term, Some(Direction::Asc)),
    }
}

impl SortTranslator for SortParser {
    fn parse(&self, schema: &dyn Schema, spec: &Value) -> Vec<OrderBy> {
        match spec {
            Value::String(s) => s.split(',').filter_map(|t| parse_term(schema, t)).collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|t| parse_term(schema, t))
                .collect(),
            Value::Object(map) => map
                .iter()
                .filter_map(|(col, dir)| entry(schema, col, dir.as_str().and_then(direction)))
                .collect(),
            _ => Vec::new(),
        }
    }
}
