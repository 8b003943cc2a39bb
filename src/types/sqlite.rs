use super::{BaseType, TypeMap};

/// SQLite type affinities.
pub struct SqliteTypes;

impl TypeMap for SqliteTypes {
    fn base_type(&self, data_type: &str, _length: i32) -> Option<BaseType> {
        let base = match data_type {
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint"
            | "unsignedbigint" | "int2" | "int8" => BaseType::Integer,
            "blob" => BaseType::Bytes,
            "real" | "double" | "double precision" | "float" => BaseType::Float,
            "boolean" | "bool" => BaseType::Bool,
            "date" => BaseType::Date,
            "datetime" | "timestamp" => BaseType::DateTime,
            "any" => BaseType::Dynamic,
            "text" | "clob" | "json" => BaseType::String,
            "numeric" => BaseType::Float,
            dt if is_character(dt) => BaseType::String,
            dt if dt.starts_with("decimal") => BaseType::Float,
            _ => return None,
        };
        Some(base)
    }
}

/// Declared types carrying a length, e.g. `varchar(255)`.
fn is_character(dt: &str) -> bool {
    const PREFIXES: [&str; 6] = [
        "character",
        "varchar",
        "varyingcharacter",
        "nchar",
        "nativecharacter",
        "nvarchar",
    ];
    PREFIXES.iter().any(|p| dt.starts_with(p))
}
