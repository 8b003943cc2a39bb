//! Plugin configuration.
//!
//! Options arrive as the `plugin_options` JSON object of the request, or
//! from a file passed to the CLI (`.json`, otherwise TOML).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GenError, GenResult};

/// Inline parameter limit used when none is configured.
pub const DEFAULT_QUERY_PARAMETER_LIMIT: i32 = 4;

/// Default name of the models file.
pub const DEFAULT_MODELS_FILE_NAME: &str = "models.py";

/// Generation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Use table names as-is instead of singularizing them.
    pub emit_exact_table_names: bool,

    /// Tables exempt from singularization.
    pub inflection_exclude_table_names: Vec<String>,

    /// Parameters above this count are packed into one struct; 0 always packs.
    pub query_parameter_limit: Option<i32>,

    /// Declare models as pydantic models instead of dataclasses.
    pub emit_pydantic_models: bool,

    /// Build the synchronous querier.
    pub emit_sync_querier: bool,

    /// Build the asynchronous querier.
    pub emit_async_querier: bool,

    /// Package the query files import the models module from.
    pub package: String,

    /// Output directory.
    pub out: String,

    /// Models file name; `null` skips the models file.
    #[serde(default = "default_models_file_name")]
    pub output_models_file_name: Option<String>,
}

fn default_models_file_name() -> Option<String> {
    Some(DEFAULT_MODELS_FILE_NAME.to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            emit_exact_table_names: false,
            inflection_exclude_table_names: Vec::new(),
            query_parameter_limit: None,
            emit_pydantic_models: false,
            emit_sync_querier: false,
            emit_async_querier: false,
            package: String::new(),
            out: String::new(),
            output_models_file_name: default_models_file_name(),
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Decode the request's plugin options. `null` yields the defaults.
    pub fn from_value(value: &serde_json::Value) -> GenResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Config::deserialize(value)?)
    }

    /// Load configuration from JSON text.
    pub fn from_json(json: &str) -> GenResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from TOML text.
    pub fn from_toml(input: &str) -> GenResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load configuration from a file path (auto-detects format).
    pub fn from_file(path: &Path) -> GenResult<Self> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|e| e == "json") {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Reject option values the generator cannot honour.
    pub fn validate(&self) -> GenResult<()> {
        if let Some(limit) = self.query_parameter_limit {
            if limit < 0 {
                return Err(GenError::InvalidParameterLimit(limit));
            }
        }
        if let Some(name) = &self.output_models_file_name {
            if name.trim().is_empty() {
                return Err(GenError::Config(
                    "output_models_file_name must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The effective inline parameter limit.
    pub fn parameter_limit(&self) -> usize {
        let limit = self
            .query_parameter_limit
            .unwrap_or(DEFAULT_QUERY_PARAMETER_LIMIT);
        usize::try_from(limit).unwrap_or(0)
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Keep table names exactly as declared.
    pub fn exact_table_names(mut self, exact: bool) -> Self {
        self.config.emit_exact_table_names = exact;
        self
    }

    /// Exempt a table from singularization.
    pub fn exclude_inflection(mut self, table: impl Into<String>) -> Self {
        self.config.inflection_exclude_table_names.push(table.into());
        self
    }

    /// Set the inline parameter limit.
    pub fn query_parameter_limit(mut self, limit: i32) -> Self {
        self.config.query_parameter_limit = Some(limit);
        self
    }

    pub fn pydantic_models(mut self, enabled: bool) -> Self {
        self.config.emit_pydantic_models = enabled;
        self
    }

    pub fn sync_querier(mut self, enabled: bool) -> Self {
        self.config.emit_sync_querier = enabled;
        self
    }

    pub fn async_querier(mut self, enabled: bool) -> Self {
        self.config.emit_async_querier = enabled;
        self
    }

    /// Set the package the models module lives in.
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.config.package = package.into();
        self
    }

    /// Set or disable the models file name.
    pub fn models_file_name(mut self, name: Option<&str>) -> Self {
        self.config.output_models_file_name = name.map(str::to_string);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_value(&serde_json::Value::Null).unwrap();
        assert_eq!(config.parameter_limit(), 4);
        assert!(!config.emit_exact_table_names);
        assert_eq!(config.output_models_file_name.as_deref(), Some("models.py"));
    }

    #[test]
    fn test_from_json_options() {
        let json = serde_json::json!({
            "package": "querytest",
            "emit_sync_querier": true,
            "query_parameter_limit": 0,
            "inflection_exclude_table_names": ["metrics"]
        });
        let config = Config::from_value(&json).unwrap();
        assert_eq!(config.package, "querytest");
        assert!(config.emit_sync_querier);
        assert_eq!(config.parameter_limit(), 0);
        assert_eq!(config.inflection_exclude_table_names, vec!["metrics"]);
    }

    #[test]
    fn test_null_models_file_disables_it() {
        let config = Config::from_json(r#"{"output_models_file_name": null}"#).unwrap();
        assert_eq!(config.output_models_file_name, None);
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(
            r#"
            package = "app.db"
            emit_async_querier = true
            query_parameter_limit = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.package, "app.db");
        assert!(config.emit_async_querier);
        assert_eq!(config.parameter_limit(), 2);
    }

    #[test]
    fn test_negative_limit_rejected() {
        let config = Config::builder().query_parameter_limit(-1).build();
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidParameterLimit(-1))
        ));
    }

    #[test]
    fn test_malformed_options() {
        let json = serde_json::json!({ "query_parameter_limit": "four" });
        assert!(matches!(Config::from_value(&json), Err(GenError::Json(_))));
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .exact_table_names(true)
            .exclude_inflection("news")
            .sync_querier(true)
            .models_file_name(None)
            .build();
        assert!(config.emit_exact_table_names);
        assert_eq!(config.inflection_exclude_table_names, vec!["news"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.output_models_file_name, None);
    }
}
