//! Schema description seam between resource descriptors and the data-access layer.

use crate::case::{pluralize, to_snake_case};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Declared type of a schema field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Uuid,
    Map,
    Array,
    Other(String),
}

impl FieldType {
    pub fn is_string(&self) -> bool {
        matches!(self, FieldType::String)
    }

    /// PostgreSQL type used when casting bound parameters for this field.
    pub fn pg_cast(&self) -> Option<&'static str> {
        match self {
            FieldType::String => Some("text"),
            FieldType::Integer => Some("bigint"),
            FieldType::Float => Some("double precision"),
            FieldType::Decimal => Some("numeric"),
            FieldType::Boolean => Some("boolean"),
            FieldType::Date => Some("date"),
            FieldType::DateTime => Some("timestamptz"),
            FieldType::Uuid => Some("uuid"),
            FieldType::Map => Some("jsonb"),
            FieldType::Array | FieldType::Other(_) => None,
        }
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "string" | "text" | "varchar" => FieldType::String,
            "integer" | "int" | "id" | "bigint" | "serial" => FieldType::Integer,
            "float" | "double" => FieldType::Float,
            "decimal" | "numeric" => FieldType::Decimal,
            "boolean" | "bool" => FieldType::Boolean,
            "date" => FieldType::Date,
            "datetime" | "utc_datetime" | "naive_datetime" | "timestamp" | "timestamptz" => {
                FieldType::DateTime
            }
            "uuid" | "binary_id" => FieldType::Uuid,
            "map" | "json" | "jsonb" => FieldType::Map,
            "array" => FieldType::Array,
            _ => FieldType::Other(s),
        }
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::String => "string".into(),
            FieldType::Integer => "integer".into(),
            FieldType::Float => "float".into(),
            FieldType::Decimal => "decimal".into(),
            FieldType::Boolean => "boolean".into(),
            FieldType::Date => "date".into(),
            FieldType::DateTime => "datetime".into(),
            FieldType::Uuid => "uuid".into(),
            FieldType::Map => "map".into(),
            FieldType::Array => "array".into(),
            FieldType::Other(s) => s,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

/// to_one (we hold the key pointing at them) or to_many (they hold a key pointing at us).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    BelongsTo,
    HasOne,
    HasMany,
}

impl AssociationKind {
    pub fn is_many(self) -> bool {
        matches!(self, AssociationKind::HasMany)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub name: String,
    pub kind: AssociationKind,
    /// Name of the related schema.
    pub related: String,
    /// Our column used in the join (our FK for belongs_to; our PK otherwise).
    pub our_key: String,
    /// Their column used in the join (their PK for belongs_to; their FK otherwise).
    pub their_key: String,
}

/// What the data-access layer knows about a schema type.
pub trait Schema: Send + Sync + fmt::Debug {
    /// Qualified type name, e.g. "MyBlog.BlogPost" or "my_blog::BlogPost".
    fn qualified_name(&self) -> &str;

    /// Backing table / collection name.
    fn source(&self) -> &str;

    /// Fields in declaration order.
    fn fields(&self) -> &[Field];

    fn associations(&self) -> &[Association];

    fn primary_key(&self) -> Option<&str>;

    /// Last segment of the qualified name.
    fn short_name(&self) -> &str {
        let name = self.qualified_name();
        name.rsplit(['.', ':']).next().unwrap_or(name)
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields().iter().map(|f| f.name.as_str()).collect()
    }

    fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.fields().iter().find(|f| f.name == name).map(|f| &f.ty)
    }

    fn association(&self, name: &str) -> Option<&Association> {
        self.associations().iter().find(|a| a.name == name)
    }

    fn association_names(&self) -> Vec<String> {
        self.associations().iter().map(|a| a.name.clone()).collect()
    }

    /// True when `name` refers to this schema by qualified or short name.
    fn answers_to(&self, name: &str) -> bool {
        self.qualified_name() == name || self.short_name() == name
    }
}

pub type SchemaRef = Arc<dyn Schema>;

fn default_primary_key() -> Option<String> {
    Some("id".into())
}

/// Declarative schema description, loadable from JSON config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SchemaDef {
    pub name: String,
    /// Defaults to the pluralized snake_case short name.
    #[serde(default)]
    pub table: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub associations: Vec<Association>,
}

impl SchemaDef {
    pub fn new(name: impl Into<String>) -> Self {
        SchemaDef {
            name: name.into(),
            table: String::new(),
            primary_key: default_primary_key(),
            fields: Vec::new(),
            associations: Vec::new(),
        }
        .normalized()
    }

    /// Fill in derived defaults left empty by deserialization.
    pub fn normalized(mut self) -> Self {
        if self.table.is_empty() {
            self.table = pluralize(&to_snake_case(self.short_name()));
        }
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_primary_key(mut self, pk: Option<&str>) -> Self {
        self.primary_key = pk.map(str::to_string);
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(Field { name: name.into(), ty });
        self
    }

    pub fn belongs_to(mut self, name: &str, related: &str, our_key: &str) -> Self {
        self.associations.push(Association {
            name: name.into(),
            kind: AssociationKind::BelongsTo,
            related: related.into(),
            our_key: our_key.into(),
            their_key: "id".into(),
        });
        self
    }

    pub fn has_many(mut self, name: &str, related: &str, their_key: &str) -> Self {
        let our_key = self.primary_key.clone().unwrap_or_else(|| "id".into());
        self.associations.push(Association {
            name: name.into(),
            kind: AssociationKind::HasMany,
            related: related.into(),
            our_key,
            their_key: their_key.into(),
        });
        self
    }

    pub fn into_ref(self) -> SchemaRef {
        Arc::new(self.normalized())
    }
}

impl Schema for SchemaDef {
    fn qualified_name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.table
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn associations(&self) -> &[Association] {
        &self.associations
    }

    fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }
}

/// A materialized instance: its schema plus field values.
#[derive(Clone, Debug)]
pub struct Record {
    schema: SchemaRef,
    data: Map<String, Value>,
}

impl Record {
    pub fn new(schema: SchemaRef, data: Map<String, Value>) -> Self {
        Record { schema, data }
    }

    /// Build from a JSON value; non-objects yield an empty record.
    pub fn from_value(schema: SchemaRef, value: Value) -> Self {
        let data = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Record { schema, data }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.data.insert(field.into(), value);
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}
