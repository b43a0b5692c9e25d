//! Default naming and display inference from a schema description.

use crate::action::PageKind;
use crate::case::{humanize, pluralize, title_case, to_snake_case};
use crate::schema::{Record, Schema};
use serde_json::Value;

/// Bookkeeping columns never shown by default.
const HIDDEN_COLUMNS: [&str; 3] = ["id", "inserted_at", "updated_at"];

pub fn params_key(schema: &dyn Schema) -> String {
    to_snake_case(schema.short_name()).to_lowercase()
}

/// Fields in declaration order minus id and timestamps. Same set for every page kind.
pub fn display_columns(schema: &dyn Schema, _kind: PageKind) -> Vec<String> {
    schema
        .fields()
        .iter()
        .filter(|f| !HIDDEN_COLUMNS.contains(&f.name.as_str()))
        .map(|f| f.name.clone())
        .collect()
}

pub fn render_column_name(_kind: PageKind, field: &str) -> String {
    humanize(field)
}

/// The field that names a record: a string `name` field, else the first string field,
/// else the primary key (None when the schema declares none).
pub fn name_field(schema: &dyn Schema) -> Option<String> {
    if schema.field_type("name").is_some_and(|t| t.is_string()) {
        return Some("name".to_string());
    }
    schema
        .fields()
        .iter()
        .find(|f| f.ty.is_string())
        .map(|f| f.name.clone())
        .or_else(|| schema.primary_key().map(str::to_string))
}

/// Value of the record's name field as display text.
pub fn resource_title(record: &Record) -> String {
    name_field(record.schema().as_ref())
        .map(|field| field_text(record, &field))
        .unwrap_or_default()
}

/// Value of `field` as display text; empty when absent or null.
pub fn field_text(record: &Record, field: &str) -> String {
    record.get(field).map(value_text).unwrap_or_default()
}

pub fn display_name(schema: &dyn Schema) -> String {
    title_case(&to_snake_case(schema.short_name()))
}

/// Pluralizes the rendered title ("Blog Post" -> "Blog Posts"), not the raw identifier.
pub fn display_name_plural(schema: &dyn Schema) -> String {
    pluralize(&display_name(schema))
}

fn value_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, SchemaDef};
    use serde_json::json;

    fn blog_post() -> SchemaDef {
        SchemaDef::new("MyBlog.BlogPost")
            .field("id", FieldType::Integer)
            .field("title", FieldType::String)
            .field("body", FieldType::String)
            .field("inserted_at", FieldType::DateTime)
            .field("updated_at", FieldType::DateTime)
    }

    #[test]
    fn test_display_columns_drop_bookkeeping() {
        let s = SchemaDef::new("Person")
            .field("first_name", FieldType::String)
            .field("id", FieldType::Integer)
            .field("state_id", FieldType::Integer)
            .field("updated_at", FieldType::DateTime)
            .field("age", FieldType::Integer);
        for kind in PageKind::ALL {
            assert_eq!(display_columns(&s, kind), vec!["first_name", "state_id", "age"]);
        }
        assert_eq!(display_columns(&blog_post(), PageKind::Index), vec!["title", "body"]);
    }

    #[test]
    fn test_render_column_name() {
        assert_eq!(render_column_name(PageKind::Index, "state_id"), "State");
        assert_eq!(render_column_name(PageKind::Index, "first_name"), "First Name");
    }

    #[test]
    fn test_name_field_prefers_name() {
        let s = SchemaDef::new("User")
            .field("email", FieldType::String)
            .field("name", FieldType::String);
        assert_eq!(name_field(&s).as_deref(), Some("name"));
    }

    #[test]
    fn test_name_field_ignores_non_string_name() {
        let s = SchemaDef::new("Slot")
            .field("name", FieldType::Integer)
            .field("label", FieldType::String);
        assert_eq!(name_field(&s).as_deref(), Some("label"));
    }

    #[test]
    fn test_name_field_first_string_then_primary_key() {
        assert_eq!(name_field(&blog_post()).as_deref(), Some("title"));
        let s = SchemaDef::new("Reading").field("id", FieldType::Integer).field("value", FieldType::Float);
        assert_eq!(name_field(&s).as_deref(), Some("id"));
        let s = SchemaDef::new("Join").with_primary_key(None);
        assert_eq!(name_field(&s), None);
    }

    #[test]
    fn test_display_names() {
        let s = blog_post();
        assert_eq!(params_key(&s), "blog_post");
        assert_eq!(display_name(&s), "Blog Post");
        assert_eq!(display_name_plural(&s), "Blog Posts");
        assert_eq!(display_name_plural(&SchemaDef::new("Admin.Category")), "Categories");
    }

    #[test]
    fn test_resource_title() {
        let r = Record::from_value(blog_post().into_ref(), json!({"id": 4, "title": "Hello"}));
        assert_eq!(resource_title(&r), "Hello");
        let reading = SchemaDef::new("Reading").field("id", FieldType::Integer).into_ref();
        assert_eq!(resource_title(&Record::from_value(reading, json!({"id": 9}))), "9");
    }
}
