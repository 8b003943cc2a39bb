//! Query analysis: argument packing, return shapes and classification.

use crate::catalog::{self, Catalog, Column};
use crate::config::Config;
use crate::dialect::Dialect;
use crate::error::GenResult;
use crate::ir::{Cmd, Field, Query, QueryValue, Struct};
use crate::naming::{NameAllocator, column_name, lower_title, method_name, param_name};
use crate::rewrite::rewrite_sql;
use crate::types::TypeResolver;

/// Argument name of a packed parameter struct.
pub const PARAMS_ARG: &str = "arg";

/// Variable name of a returned row struct.
pub const ROW_VALUE: &str = "i";

/// Turns parsed queries into [`Query`] IR against a fixed set of models.
pub struct QueryAnalyzer<'a> {
    config: &'a Config,
    catalog: &'a Catalog,
    dialect: Dialect,
    types: &'a TypeResolver<'a>,
    models: &'a [Struct],
}

impl<'a> QueryAnalyzer<'a> {
    pub fn new(
        config: &'a Config,
        catalog: &'a Catalog,
        dialect: Dialect,
        types: &'a TypeResolver<'a>,
        models: &'a [Struct],
    ) -> Self {
        Self {
            config,
            catalog,
            dialect,
            types,
            models,
        }
    }

    /// Analyze every query, sorted by method name.
    ///
    /// Queries without a name or command are skipped.
    pub fn analyze_all(&self, queries: &[catalog::Query]) -> GenResult<Vec<Query>> {
        let mut out = Vec::with_capacity(queries.len());
        for query in queries {
            if let Some(q) = self.analyze(query)? {
                out.push(q);
            }
        }
        out.sort_by(|a, b| a.method_name.cmp(&b.method_name));
        Ok(out)
    }

    /// Analyze a single query.
    pub fn analyze(&self, query: &catalog::Query) -> GenResult<Option<Query>> {
        if query.name.is_empty() || query.cmd.is_empty() {
            tracing::debug!("skipping unnamed or untagged query in {}", query.filename);
            return Ok(None);
        }
        let kind = Cmd::parse(&query.name, &query.cmd)?.kind(&query.name)?;
        let method = method_name(&query.name);

        let q = Query {
            kind,
            comments: query.comments.clone(),
            constant_name: method.to_uppercase(),
            field_name: format!("{}Stmt", lower_title(&query.name)),
            method_name: method,
            sql: rewrite_sql(&query.text, self.dialect),
            source_name: query.filename.clone(),
            args: self.build_args(query),
            ret: self.build_ret(query),
        };
        tracing::debug!(
            "analyzed {} ({:?}, {} args)",
            q.method_name,
            q.kind,
            q.args.len()
        );
        Ok(Some(q))
    }

    fn build_args(&self, query: &catalog::Query) -> Vec<QueryValue> {
        if query.params.is_empty() {
            return Vec::new();
        }

        let limit = self.config.parameter_limit();
        if query.params.len() > limit || limit == 0 {
            let columns = query
                .params
                .iter()
                .map(|p| (p.number, param_name(p), &p.column));
            let def = self.columns_to_struct(format!("{}Params", query.name), columns);
            return vec![QueryValue::Struct {
                name: PARAMS_ARG.to_string(),
                def,
                emit: true,
            }];
        }

        let mut names = NameAllocator::new();
        query
            .params
            .iter()
            .filter_map(|p| {
                let (name, is_new) = names.allocate(p.number, &param_name(p));
                is_new.then(|| QueryValue::Scalar {
                    name,
                    ty: self.types.resolve(&p.column),
                })
            })
            .collect()
    }

    fn build_ret(&self, query: &catalog::Query) -> QueryValue {
        match query.columns.as_slice() {
            [] => QueryValue::Empty,
            [col] => QueryValue::Scalar {
                name: column_name(col, 0),
                ty: self.types.resolve(col),
            },
            columns => {
                if let Some(model) = find_model(
                    self.models,
                    columns,
                    self.types,
                    &self.catalog.default_schema,
                ) {
                    return QueryValue::Struct {
                        name: ROW_VALUE.to_string(),
                        def: model.clone(),
                        emit: false,
                    };
                }
                let positions = columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (i as i32, column_name(c, i), c));
                QueryValue::Struct {
                    name: ROW_VALUE.to_string(),
                    def: self.columns_to_struct(format!("{}Row", query.name), positions),
                    emit: true,
                }
            }
        }
    }

    /// Build a synthetic struct from `(key, name, column)` entries.
    ///
    /// Entries sharing a key (the same placeholder ordinal) share a field.
    fn columns_to_struct<'c>(
        &self,
        name: String,
        columns: impl Iterator<Item = (i32, String, &'c Column)>,
    ) -> Struct {
        let mut names = NameAllocator::new();
        let mut fields = Vec::new();
        for (key, base, col) in columns {
            let (field_name, is_new) = names.allocate(key, &base);
            if is_new {
                fields.push(Field::new(field_name, self.types.resolve(col)));
            }
        }
        Struct::synthetic(name, fields)
    }
}

/// Find a model with exactly the shape of `columns`.
///
/// Every position must agree on name, type (models namespace stripped) and
/// originating table. Models are scanned in their sorted order and the
/// first match wins.
pub fn find_model<'m>(
    models: &'m [Struct],
    columns: &[Column],
    types: &TypeResolver<'_>,
    default_schema: &str,
) -> Option<&'m Struct> {
    models.iter().find(|model| {
        let Some(table) = &model.table else {
            return false;
        };
        model.fields.len() == columns.len()
            && model.fields.iter().zip(columns).enumerate().all(|(i, (f, c))| {
                f.name == column_name(c, i)
                    && f.ty == types.resolve_local(c)
                    && c.table
                        .as_ref()
                        .is_some_and(|t| t.same_table(table, default_schema))
            })
    })
}
