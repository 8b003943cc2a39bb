use super::{BaseType, TypeMap};

/// PostgreSQL type keywords, bare or `pg_catalog.` qualified.
pub struct PostgresTypes;

impl TypeMap for PostgresTypes {
    fn base_type(&self, data_type: &str, _length: i32) -> Option<BaseType> {
        let name = data_type.strip_prefix("pg_catalog.").unwrap_or(data_type);
        let base = match name {
            "serial" | "serial2" | "serial4" | "serial8" | "smallserial" | "bigserial"
            | "integer" | "int" | "int2" | "int4" | "int8" | "smallint" | "bigint" => {
                BaseType::Integer
            }
            "float" | "double precision" | "float4" | "float8" | "real" => BaseType::Float,
            "numeric" | "money" => BaseType::Decimal,
            "boolean" | "bool" => BaseType::Bool,
            "json" | "jsonb" => BaseType::Dynamic,
            "bytea" | "blob" => BaseType::Bytes,
            "date" => BaseType::Date,
            "time" | "timetz" => BaseType::Time,
            "timestamp" | "timestamptz" => BaseType::DateTime,
            "interval" => BaseType::Interval,
            "text" | "varchar" | "bpchar" | "char" | "string" | "citext" => BaseType::String,
            "inet" | "cidr" | "macaddr" | "macaddr8" => BaseType::String,
            "ltree" | "lquery" | "ltxtquery" => BaseType::String,
            "uuid" => BaseType::Uuid,
            _ => return None,
        };
        Some(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_family() {
        for name in ["serial", "pg_catalog.int4", "bigint", "pg_catalog.serial8", "int2"] {
            assert_eq!(PostgresTypes.base_type(name, 0), Some(BaseType::Integer), "{}", name);
        }
    }

    #[test]
    fn test_temporal_family() {
        assert_eq!(PostgresTypes.base_type("date", 0), Some(BaseType::Date));
        assert_eq!(PostgresTypes.base_type("pg_catalog.timestamptz", 0), Some(BaseType::DateTime));
        assert_eq!(PostgresTypes.base_type("pg_catalog.timetz", 0), Some(BaseType::Time));
        assert_eq!(PostgresTypes.base_type("interval", 0), Some(BaseType::Interval));
    }

    #[test]
    fn test_misc() {
        assert_eq!(PostgresTypes.base_type("pg_catalog.varchar", 255), Some(BaseType::String));
        assert_eq!(PostgresTypes.base_type("jsonb", 0), Some(BaseType::Dynamic));
        assert_eq!(PostgresTypes.base_type("bytea", 0), Some(BaseType::Bytes));
        assert_eq!(PostgresTypes.base_type("numeric", 0), Some(BaseType::Decimal));
        assert_eq!(PostgresTypes.base_type("uuid", 0), Some(BaseType::Uuid));
        assert_eq!(PostgresTypes.base_type("tsvector", 0), None);
    }

    #[test]
    fn test_tinyint_length_ignored() {
        assert_eq!(PostgresTypes.base_type("smallint", 1), Some(BaseType::Integer));
    }
}
