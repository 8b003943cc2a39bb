//! Table model extraction.

use crate::catalog::{Catalog, Identifier, is_reserved_schema};
use crate::config::Config;
use crate::error::GenResult;
use crate::inflection;
use crate::ir::{Field, Struct};
use crate::naming::{ensure_unique, model_name};
use crate::types::TypeResolver;

/// Build one model [`Struct`] per table, sorted by name.
///
/// Field types are resolved as seen from inside the models module, so
/// enum references are unqualified.
pub fn build_models(
    config: &Config,
    catalog: &Catalog,
    types: &TypeResolver<'_>,
) -> GenResult<Vec<Struct>> {
    let mut structs = Vec::new();

    for schema in &catalog.schemas {
        if is_reserved_schema(&schema.name) {
            continue;
        }
        for table in &schema.tables {
            let mut table_name = if schema.name == catalog.default_schema {
                table.rel.name.clone()
            } else {
                format!("{}_{}", schema.name, table.rel.name)
            };
            if !config.emit_exact_table_names {
                table_name =
                    inflection::singular(&table_name, &config.inflection_exclude_table_names);
            }

            let fields = table
                .columns
                .iter()
                .map(|col| Field {
                    name: col.name.clone(),
                    ty: types.resolve_local(col),
                    comment: col.comment.clone(),
                })
                .collect();

            structs.push(Struct {
                table: Some(Identifier::new(schema.name.clone(), table.rel.name.clone())),
                name: model_name(&table_name),
                fields,
                comment: table.comment.clone(),
            });
        }
    }

    let origins: Vec<String> = structs
        .iter()
        .filter_map(|s| s.table.as_ref())
        .map(|t| format!("{}.{}", t.schema, t.name))
        .collect();
    ensure_unique(
        "model",
        structs
            .iter()
            .zip(&origins)
            .map(|(s, origin)| (s.name.as_str(), origin.as_str())),
    )?;

    structs.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!("extracted {} models", structs.len());
    Ok(structs)
}
