//! IR assembly into per-file generation units.

use serde::Serialize;

use crate::config::Config;
use crate::error::GenResult;
use crate::ir::{Enum, Query, Struct};
use crate::naming::{MODELS_MODULE, ensure_unique};
use crate::querier::{Flavor, Querier};
use crate::requirements::Requirements;

pub use crate::requirements::ModelStyle;

/// The analyzed schema and queries of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ir {
    pub enums: Vec<Enum>,
    pub models: Vec<Struct>,
    pub queries: Vec<Query>,
}

impl Ir {
    /// Combine extracted parts.
    ///
    /// Enums and models share the models namespace, so a name used by both
    /// is rejected.
    pub fn new(enums: Vec<Enum>, models: Vec<Struct>, queries: Vec<Query>) -> GenResult<Self> {
        ensure_unique(
            "type",
            enums
                .iter()
                .map(|e| (e.name.as_str(), "an enum"))
                .chain(models.iter().map(|m| (m.name.as_str(), "a table model"))),
        )?;
        Ok(Self {
            enums,
            models,
            queries,
        })
    }

    /// Distinct query source files, sorted.
    pub fn source_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.queries.iter().map(|q| q.source_name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// View of the IR restricted to one source file.
    pub fn file_context<'a>(&'a self, source_name: &'a str) -> FileContext<'a> {
        FileContext {
            source_name,
            enums: &self.enums,
            models: &self.models,
            queries: self
                .queries
                .iter()
                .filter(|q| q.source_name == source_name)
                .collect(),
        }
    }
}

/// Everything emission of one file may look at.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    pub source_name: &'a str,
    pub enums: &'a [Enum],
    pub models: &'a [Struct],
    pub queries: Vec<&'a Query>,
}

impl FileContext<'_> {
    /// Whether `query` belongs to this file.
    pub fn output_query(&self, query: &Query) -> bool {
        query.source_name == self.source_name
    }
}

/// Import of the models module from a query file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelsImport {
    pub package: String,
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelsFile {
    pub name: String,
    pub style: ModelStyle,
    pub enums: Vec<Enum>,
    pub models: Vec<Struct>,
    pub requirements: Requirements,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryFile {
    pub name: String,
    pub source_name: String,
    pub models_import: ModelsImport,
    pub queries: Vec<Query>,
    /// Params and Row structs declared in this file, in query order.
    pub declarations: Vec<Struct>,
    pub queriers: Vec<Querier>,
    pub requirements: Requirements,
}

/// Output of one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub sqlc_version: String,
    pub models_file: Option<ModelsFile>,
    pub query_files: Vec<QueryFile>,
}

impl Generation {
    /// Assemble the per-file units of `ir`.
    ///
    /// Two sources mapping to the same output name, or a query file named
    /// like the models file, is a collision.
    pub fn assemble(ir: &Ir, config: &Config, sqlc_version: &str) -> GenResult<Self> {
        let style = if config.emit_pydantic_models {
            ModelStyle::Pydantic
        } else {
            ModelStyle::Dataclass
        };

        let models_file = config.output_models_file_name.as_ref().map(|name| ModelsFile {
            name: name.clone(),
            style,
            enums: ir.enums.clone(),
            models: ir.models.clone(),
            requirements: Requirements::for_models(&ir.enums, &ir.models, style),
        });

        let mut query_files = Vec::new();
        for source in ir.source_names() {
            let ctx = ir.file_context(source);
            let file = query_file(&ctx, config, style);
            tracing::debug!(
                "{} -> {} ({} queries)",
                source,
                file.name,
                file.queries.len()
            );
            query_files.push(file);
        }

        ensure_unique(
            "output file",
            models_file
                .iter()
                .map(|m| (m.name.as_str(), "the models file"))
                .chain(
                    query_files
                        .iter()
                        .map(|f| (f.name.as_str(), f.source_name.as_str())),
                ),
        )?;
        query_files.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            sqlc_version: sqlc_version.to_string(),
            models_file,
            query_files,
        })
    }

    /// Names of all files this generation produces.
    pub fn file_names(&self) -> Vec<&str> {
        self.models_file
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.query_files.iter().map(|f| f.name.as_str()))
            .collect()
    }
}

fn query_file(ctx: &FileContext<'_>, config: &Config, style: ModelStyle) -> QueryFile {
    let queries: Vec<Query> = ctx.queries.iter().map(|q| (*q).clone()).collect();
    let declarations = queries
        .iter()
        .flat_map(Query::emitted_structs)
        .cloned()
        .collect();

    let mut queriers = Vec::new();
    if config.emit_sync_querier {
        queriers.push(Querier::plan(Flavor::Sync, &queries));
    }
    if config.emit_async_querier {
        queriers.push(Querier::plan(Flavor::Async, &queries));
    }
    let requirements = Requirements::for_queries(&queries, &queriers, style);

    QueryFile {
        name: output_file_name(ctx.source_name),
        source_name: ctx.source_name.to_string(),
        models_import: ModelsImport {
            package: config.package.clone(),
            module: MODELS_MODULE.to_string(),
        },
        queries,
        declarations,
        queriers,
        requirements,
    }
}

/// Output file name of a query source file: `query.sql` -> `query.py`.
pub fn output_file_name(source: &str) -> String {
    if source.ends_with(".py") {
        return source.to_string();
    }
    let stem = source.strip_suffix(".sql").unwrap_or(source);
    format!("{}.py", stem)
}
