//! Request parameters as handed over by the web layer.

use serde_json::{Map, Value};
use std::collections::HashMap;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Params(Map::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Non-null value of `key`.
    fn present(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn id(&self) -> Option<&Value> {
        self.present("id")
    }

    pub fn order(&self) -> Option<&Value> {
        self.present("order")
    }

    /// Raw `search_terms` value; empty when absent.
    pub fn search_terms(&self) -> &str {
        self.present("search_terms").and_then(Value::as_str).unwrap_or("")
    }

    /// Requested page and page size, defaulted and clamped.
    pub fn page_request(&self) -> PageRequest {
        let page = self.present("page").and_then(as_u32).unwrap_or(1).max(1);
        let page_size = self
            .present("page_size")
            .and_then(as_u32)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        PageRequest { page, page_size }
    }
}

fn as_u32(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params(map)
    }
}

/// Query-string params arrive as plain strings.
impl From<HashMap<String, String>> for Params {
    fn from(map: HashMap<String, String>) -> Self {
        Params(map.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// At least one page, even when there are no entries.
    pub fn total_pages(&self, total_entries: u64) -> u32 {
        let size = u64::from(self.page_size);
        let pages = total_entries.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_values_are_absent() {
        let p = Params::new().with("id", Value::Null).with("order", Value::Null);
        assert!(p.id().is_none());
        assert!(p.order().is_none());
        assert_eq!(p.search_terms(), "");
    }

    #[test]
    fn test_page_request_defaults_and_clamps() {
        assert_eq!(Params::new().page_request(), PageRequest { page: 1, page_size: 20 });
        let p = Params::new().with("page", json!("3")).with("page_size", json!(500));
        assert_eq!(p.page_request(), PageRequest { page: 3, page_size: 100 });
        let p = Params::new().with("page", json!(0)).with("page_size", json!("x"));
        assert_eq!(p.page_request(), PageRequest { page: 1, page_size: 20 });
    }

    #[test]
    fn test_offset_and_total_pages() {
        let r = PageRequest { page: 3, page_size: 10 };
        assert_eq!(r.offset(), 20);
        assert_eq!(r.total_pages(0), 1);
        assert_eq!(r.total_pages(10), 1);
        assert_eq!(r.total_pages(11), 2);
    }

    #[test]
    fn test_from_query_string_map() {
        let mut raw = HashMap::new();
        raw.insert("search_terms".to_string(), "rust".to_string());
        let p = Params::from(raw);
        assert_eq!(p.search_terms(), "rust");
    }
}
