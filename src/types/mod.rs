//! Type resolution: catalog column descriptors to semantic types.
//!
//! Each dialect owns a [`TypeMap`] translating raw type keywords into a
//! [`BaseType`]. Names the map does not know are looked up among the
//! catalog enums and otherwise degrade to [`BaseType::Dynamic`].

pub mod mysql;
pub mod postgres;
pub mod sqlite;

use serde::Serialize;
use std::fmt;

use crate::catalog::{Catalog, Column, is_reserved_schema};
use crate::dialect::Dialect;
use crate::naming::{MODELS_MODULE, model_name};

/// Raw type keyword tables of one SQL dialect.
pub trait TypeMap {
    /// Map a lower-cased raw type name to a base type.
    ///
    /// `length` is the declared column length (0 when absent).
    fn base_type(&self, data_type: &str, length: i32) -> Option<BaseType>;
}

/// The closed set of target scalar types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "ref", rename_all = "snake_case")]
pub enum BaseType {
    Integer,
    Float,
    Decimal,
    String,
    Bytes,
    Bool,
    Date,
    Time,
    DateTime,
    Interval,
    Uuid,
    /// Untyped value, used for JSON and for anything unrecognized.
    Dynamic,
    /// A generated enum.
    Enum(EnumRef),
}

/// Reference to a generated enum, optionally through the models module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EnumRef {
    pub module: Option<String>,
    pub name: String,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Integer => write!(f, "integer"),
            BaseType::Float => write!(f, "float"),
            BaseType::Decimal => write!(f, "decimal"),
            BaseType::String => write!(f, "string"),
            BaseType::Bytes => write!(f, "bytes"),
            BaseType::Bool => write!(f, "bool"),
            BaseType::Date => write!(f, "date"),
            BaseType::Time => write!(f, "time"),
            BaseType::DateTime => write!(f, "datetime"),
            BaseType::Interval => write!(f, "interval"),
            BaseType::Uuid => write!(f, "uuid"),
            BaseType::Dynamic => write!(f, "dynamic"),
            BaseType::Enum(EnumRef {
                module: Some(module),
                name,
            }) => write!(f, "{}.{}", module, name),
            BaseType::Enum(EnumRef { module: None, name }) => write!(f, "{}", name),
        }
    }
}

/// A resolved column type. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SemanticType {
    pub base: BaseType,
    pub is_array: bool,
    pub is_nullable: bool,
}

impl SemanticType {
    /// A non-null, non-array type.
    pub fn new(base: BaseType) -> Self {
        Self {
            base,
            is_array: false,
            is_nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// The same type as seen from inside the models module.
    pub fn local(mut self) -> Self {
        if let BaseType::Enum(ref mut r) = self.base {
            r.module = None;
        }
        self
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if self.is_array {
            write!(f, "[]")?;
        }
        if self.is_nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// Resolves columns of one catalog under one dialect.
pub struct TypeResolver<'a> {
    dialect: Dialect,
    catalog: &'a Catalog,
    map: Box<dyn TypeMap>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(dialect: Dialect, catalog: &'a Catalog) -> Self {
        Self {
            dialect,
            catalog,
            map: dialect.type_map(),
        }
    }

    /// Resolve a column as referenced from query files.
    pub fn resolve(&self, col: &Column) -> SemanticType {
        SemanticType {
            base: self.base_type(col),
            is_array: col.is_array,
            is_nullable: !col.not_null,
        }
    }

    /// Resolve a column as referenced from the models module itself.
    pub fn resolve_local(&self, col: &Column) -> SemanticType {
        self.resolve(col).local()
    }

    fn base_type(&self, col: &Column) -> BaseType {
        let data_type = col.data_type.data_type();
        if let Some(base) = self.map.base_type(&data_type.to_ascii_lowercase(), col.length) {
            return base;
        }
        if let Some(name) = self.enum_name(col) {
            return BaseType::Enum(EnumRef {
                module: Some(MODELS_MODULE.to_string()),
                name,
            });
        }
        tracing::warn!("unknown {} type: {}", self.dialect, data_type);
        BaseType::Dynamic
    }

    /// Generated name of the catalog enum this column refers to, if any.
    fn enum_name(&self, col: &Column) -> Option<String> {
        let typ = &col.data_type;
        let data_type = typ.data_type();
        for schema in &self.catalog.schemas {
            if is_reserved_schema(&schema.name) {
                continue;
            }
            for e in &schema.enums {
                let bare = data_type == e.name;
                let qualified = typ.schema == schema.name && typ.name == e.name;
                if !bare && !qualified {
                    continue;
                }
                if schema.name == self.catalog.default_schema {
                    return Some(model_name(&e.name));
                }
                return Some(model_name(&format!("{}_{}", schema.name, e.name)));
            }
        }
        None
    }
}
