//! # sqlc-ir
//!
//! Compiles a sqlc generation request (catalog, queries, plugin options)
//! into a language-neutral intermediate representation for emitting a
//! typed Python data-access layer.
//!
//! ## Pipeline
//!
//! | Stage            | Module           | Produces                        |
//! |------------------|------------------|---------------------------------|
//! | Type resolution  | [`types`]        | `SemanticType` per column       |
//! | Enum extraction  | [`enums`]        | sorted `Enum` IR                |
//! | Model extraction | [`models`]       | sorted table `Struct` IR        |
//! | Query analysis   | [`queries`]      | sorted `Query` IR               |
//! | Assembly         | [`context`]      | per-file `Generation`           |
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use sqlc_ir::prelude::*;
//!
//! let req = GenerateRequest::from_json(&std::fs::read("request.json")?)?;
//! let generation = sqlc_ir::generate(&req)?;
//! for name in generation.file_names() {
//!     println!("{}", name);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod dialect;
pub mod enums;
pub mod error;
pub mod inflection;
pub mod ir;
pub mod models;
pub mod naming;
pub mod querier;
pub mod queries;
pub mod requirements;
pub mod rewrite;
pub mod types;

pub mod prelude {
    pub use crate::catalog::{Catalog, Column, GenerateRequest, Identifier, Parameter};
    pub use crate::config::Config;
    pub use crate::context::{FileContext, Generation, Ir, ModelStyle, QueryFile};
    pub use crate::dialect::Dialect;
    pub use crate::error::*;
    pub use crate::ir::{Field, Query, QueryKind, QueryValue, Struct, TypeRef};
    pub use crate::querier::{Flavor, Method, Querier};
    pub use crate::types::{BaseType, SemanticType, TypeResolver};
}

use catalog::GenerateRequest;
use config::Config;
use context::{Generation, Ir};
use error::GenResult;

/// Run the whole pipeline with the options carried by the request.
pub fn generate(req: &GenerateRequest) -> GenResult<Generation> {
    let config = Config::from_value(&req.plugin_options)?;
    generate_with_config(req, &config)
}

/// Run the whole pipeline with explicit options.
///
/// Fails without partial output on the first fatal error.
pub fn generate_with_config(req: &GenerateRequest, config: &Config) -> GenResult<Generation> {
    let ir = analyze(req, config)?;
    let generation = Generation::assemble(&ir, config, &req.sqlc_version)?;
    tracing::info!(
        "generated {} enums, {} models, {} queries in {} files",
        ir.enums.len(),
        ir.models.len(),
        ir.queries.len(),
        generation.file_names().len()
    );
    Ok(generation)
}

/// Build the IR of a request without assembling files.
pub fn analyze(req: &GenerateRequest, config: &Config) -> GenResult<Ir> {
    config.validate()?;
    let dialect = req.settings.engine;
    let catalog = &req.catalog;
    let types = types::TypeResolver::new(dialect, catalog);

    let enums = enums::build_enums(catalog)?;
    let models = models::build_models(config, catalog, &types)?;
    let queries = queries::QueryAnalyzer::new(config, catalog, dialect, &types, &models)
        .analyze_all(&req.queries)?;

    Ir::new(enums, models, queries)
}
