use serde::{Deserialize, Serialize};

use crate::types::TypeMap;
use crate::types::mysql::MysqlTypes;
use crate::types::postgres::PostgresTypes;
use crate::types::sqlite::SqliteTypes;

/// Supported SQL engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    #[serde(rename = "postgresql")]
    Postgres,
    #[serde(rename = "mysql")]
    MySQL,
    #[serde(rename = "sqlite")]
    Sqlite,
}

impl Dialect {
    pub fn type_map(&self) -> Box<dyn TypeMap> {
        match self {
            Dialect::Postgres => Box::new(PostgresTypes),
            Dialect::MySQL => Box::new(MysqlTypes),
            Dialect::Sqlite => Box::new(SqliteTypes),
        }
    }

    /// Whether queries use `$N` placeholders that need rewriting to `:pN`.
    pub fn positional_placeholders(&self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// The engine name sqlc uses in its settings.
    pub fn engine_name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgresql",
            Dialect::MySQL => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySQL),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(format!("unsupported engine '{}'", other)),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.engine_name())
    }
}
