//! Input boundary: the catalog and parsed queries handed over by sqlc.
//!
//! These types mirror the generate request that sqlc sends to codegen
//! plugins, decoded from JSON.
//!
//! # Example
//! ```
//! use sqlc_ir::catalog::GenerateRequest;
//!
//! let json = r#"{
//!     "settings": { "engine": "postgresql" },
//!     "catalog": {
//!         "default_schema": "public",
//!         "schemas": [{
//!             "name": "public",
//!             "tables": [{
//!                 "rel": { "name": "users" },
//!                 "columns": [
//!                     { "name": "id", "not_null": true, "type": { "name": "integer" } }
//!                 ]
//!             }]
//!         }]
//!     }
//! }"#;
//!
//! let req = GenerateRequest::from_json(json.as_bytes()).unwrap();
//! assert_eq!(req.catalog.schemas[0].tables[0].rel.name, "users");
//! ```

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::GenResult;

/// Schemas that never produce models or enums.
pub const RESERVED_SCHEMAS: [&str; 2] = ["pg_catalog", "information_schema"];

/// Whether `schema` is one of the system schemas.
pub fn is_reserved_schema(schema: &str) -> bool {
    RESERVED_SCHEMAS.contains(&schema)
}

/// A complete generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub queries: Vec<Query>,
    #[serde(default)]
    pub sqlc_version: String,
    /// Raw plugin options, decoded into [`crate::config::Config`].
    #[serde(default)]
    pub plugin_options: serde_json::Value,
}

impl GenerateRequest {
    /// Decode a request from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> GenResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Global sqlc settings relevant to type resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: Dialect,
}

/// Database catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub default_schema: String,
    #[serde(default)]
    pub schemas: Vec<Schema>,
}

/// A schema with its tables and enums.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub enums: Vec<Enum>,
}

/// A table definition with columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub rel: Identifier,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub comment: String,
}

/// A database enum type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    #[serde(default)]
    pub vals: Vec<String>,
    #[serde(default)]
    pub comment: String,
}

/// A possibly qualified object name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(default)]
    pub catalog: String,
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub name: String,
}

impl Identifier {
    /// An identifier for `schema.name`.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            catalog: String::new(),
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// The data type name as sqlc spells it: `schema.name` or bare `name`.
    pub fn data_type(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }

    /// Whether this column-side table reference points at `table`.
    ///
    /// An empty schema on the reference means the catalog default schema.
    pub fn same_table(&self, table: &Identifier, default_schema: &str) -> bool {
        let schema = if self.schema.is_empty() {
            default_schema
        } else {
            self.schema.as_str()
        };
        self.catalog == table.catalog && schema == table.schema && self.name == table.name
    }
}

/// Column metadata, used for table columns, parameters and result columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub length: i32,
    /// Table the column originates from, when known.
    #[serde(default)]
    pub table: Option<Identifier>,
    #[serde(rename = "type", default)]
    pub data_type: Identifier,
}

impl Column {
    /// Create a nullable column of the given raw type.
    pub fn new(name: &str, typ: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: Identifier::new("", typ),
            ..Self::default()
        }
    }

    /// Builder: mark as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Builder: mark as an array column.
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Builder: set the declared length.
    pub fn length(mut self, length: i32) -> Self {
        self.length = length;
        self
    }

    /// Builder: set the originating table.
    pub fn from_table(mut self, table: Identifier) -> Self {
        self.table = Some(table);
        self
    }
}

/// A parsed query as sqlc reports it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub name: String,
    /// Command tag such as `:one` or `:many`.
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub filename: String,
}

/// A numbered query parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    /// Placeholder ordinal (`$1` is 1).
    pub number: i32,
    #[serde(default)]
    pub column: Column,
}

impl Parameter {
    pub fn new(number: i32, column: Column) -> Self {
        Self { number, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = GenerateRequest::from_json(br#"{"settings": {"engine": "sqlite"}}"#).unwrap();
        assert_eq!(req.settings.engine, Dialect::Sqlite);
        assert!(req.queries.is_empty());
        assert!(req.plugin_options.is_null());
    }

    #[test]
    fn test_unknown_engine_rejected() {
        let err = GenerateRequest::from_json(br#"{"settings": {"engine": "oracle"}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_data_type() {
        assert_eq!(Identifier::new("pg_catalog", "int4").data_type(), "pg_catalog.int4");
        assert_eq!(Identifier::new("", "text").data_type(), "text");
    }

    #[test]
    fn test_same_table_uses_default_schema() {
        let model = Identifier::new("public", "users");
        assert!(Identifier::new("", "users").same_table(&model, "public"));
        assert!(Identifier::new("public", "users").same_table(&model, "public"));
        assert!(!Identifier::new("audit", "users").same_table(&model, "public"));
        assert!(!Identifier::new("", "accounts").same_table(&model, "public"));
    }

    #[test]
    fn test_column_type_key() {
        let json = r#"{"name": "id", "not_null": true, "type": {"schema": "pg_catalog", "name": "int8"}}"#;
        let col: Column = serde_json::from_str(json).unwrap();
        assert!(col.not_null);
        assert_eq!(col.data_type.data_type(), "pg_catalog.int8");
    }
}
