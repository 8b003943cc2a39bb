use super::{BaseType, TypeMap};

/// MySQL type keywords.
///
/// `tinyint(1)` is the conventional single-bit flag column and maps to
/// [`BaseType::Bool`].
pub struct MysqlTypes;

impl TypeMap for MysqlTypes {
    fn base_type(&self, data_type: &str, length: i32) -> Option<BaseType> {
        let base = match data_type {
            "varchar" | "text" | "char" | "tinytext" | "mediumtext" | "longtext" => {
                BaseType::String
            }
            "tinyint" if length == 1 => BaseType::Bool,
            "tinyint" => BaseType::Integer,
            "int" | "integer" | "smallint" | "mediumint" | "year" | "bigint" => BaseType::Integer,
            // TODO: map binary columns to BaseType::Bytes once the driver returns bytes for them
            "blob" | "binary" | "varbinary" | "tinyblob" | "mediumblob" | "longblob" => {
                BaseType::Dynamic
            }
            "double" | "double precision" | "real" | "float" => BaseType::Float,
            "decimal" | "dec" | "fixed" => BaseType::String,
            "enum" => BaseType::String,
            "date" | "timestamp" | "datetime" | "time" => BaseType::Date,
            "boolean" | "bool" => BaseType::Bool,
            "json" | "any" => BaseType::Dynamic,
            _ => return None,
        };
        Some(base)
    }
}
