//! Enum extraction.

use crate::catalog::{Catalog, is_reserved_schema};
use crate::error::GenResult;
use crate::ir::{Constant, Enum};
use crate::naming::{NameAllocator, enum_value_name, ensure_unique, model_name};

/// Build one [`Enum`] per catalog enum, sorted by name.
///
/// Enums outside the default schema are prefixed with their schema.
/// Two enums ending up with the same name is an error.
pub fn build_enums(catalog: &Catalog) -> GenResult<Vec<Enum>> {
    let mut enums = Vec::new();
    let mut origins = Vec::new();

    for schema in &catalog.schemas {
        if is_reserved_schema(&schema.name) {
            continue;
        }
        for e in &schema.enums {
            let name = if schema.name == catalog.default_schema {
                e.name.clone()
            } else {
                format!("{}_{}", schema.name, e.name)
            };

            let mut members = NameAllocator::new();
            let constants = e
                .vals
                .iter()
                .map(|v| Constant {
                    name: members.unique(&enum_value_name(v)),
                    value: v.clone(),
                })
                .collect();

            enums.push(Enum {
                name: model_name(&name),
                comment: e.comment.clone(),
                constants,
            });
            origins.push(format!("{}.{}", schema.name, e.name));
        }
    }

    ensure_unique(
        "enum",
        enums
            .iter()
            .zip(&origins)
            .map(|(e, origin)| (e.name.as_str(), origin.as_str())),
    )?;

    enums.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!("extracted {} enums", enums.len());
    Ok(enums)
}
