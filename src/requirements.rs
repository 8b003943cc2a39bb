//! Import requirements of generated files.
//!
//! Each output file needs a set of supporting declarations (dataclasses,
//! optional types, date types, the models module, driver types...). The
//! set is computed from the IR so emitters never have to scan it again.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::ir::{Enum, Query, QueryKind, QueryValue, Struct, TypeRef};
use crate::querier::{Flavor, Querier};
use crate::types::{BaseType, SemanticType};

/// How struct declarations are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStyle {
    Dataclass,
    Pydantic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Dataclass,
    Pydantic,
    Enum,
    Optional,
    List,
    Any,
    Decimal,
    Date,
    Time,
    DateTime,
    Interval,
    Uuid,
    Iterator,
    AsyncIterator,
    /// Types imported from the models module.
    ModelsModule,
    SyncDriver,
    AsyncDriver,
}

impl From<ModelStyle> for Feature {
    fn from(style: ModelStyle) -> Self {
        match style {
            ModelStyle::Dataclass => Feature::Dataclass,
            ModelStyle::Pydantic => Feature::Pydantic,
        }
    }
}

/// Ordered set of features a file depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Requirements(BTreeSet<Feature>);

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirements of the models file.
    pub fn for_models(enums: &[Enum], models: &[Struct], style: ModelStyle) -> Self {
        let mut req = Self::new();
        if !enums.is_empty() {
            req.insert(Feature::Enum);
        }
        if !models.is_empty() {
            req.insert(style.into());
        }
        for field in models.iter().flat_map(|m| &m.fields) {
            req.add_type(&field.ty);
        }
        req
    }

    /// Requirements of a query file.
    pub fn for_queries<'q>(
        queries: impl IntoIterator<Item = &'q Query>,
        queriers: &[Querier],
        style: ModelStyle,
    ) -> Self {
        let mut req = Self::new();
        let queries: Vec<&Query> = queries.into_iter().collect();

        for q in &queries {
            for value in q.args.iter().chain(std::iter::once(&q.ret)) {
                req.add_value(value);
            }
            for def in q.emitted_structs() {
                req.insert(style.into());
                for field in &def.fields {
                    req.add_type(&field.ty);
                }
            }
        }

        for querier in queriers {
            req.insert(match querier.flavor {
                Flavor::Sync => Feature::SyncDriver,
                Flavor::Async => Feature::AsyncDriver,
            });
            for q in &queries {
                match (q.kind, querier.flavor) {
                    (QueryKind::FetchOne, _) => req.insert(Feature::Optional),
                    (QueryKind::FetchMany, Flavor::Sync) => req.insert(Feature::Iterator),
                    (QueryKind::FetchMany, Flavor::Async) => req.insert(Feature::AsyncIterator),
                    (QueryKind::Exec | QueryKind::ExecRows | QueryKind::ExecResult, _) => {}
                }
                if q.kind.returns_rows() && q.ret.is_empty() {
                    req.insert(Feature::Any);
                }
            }
        }
        req
    }

    pub fn insert(&mut self, feature: Feature) {
        self.0.insert(feature);
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }

    fn add_value(&mut self, value: &QueryValue) {
        match value.type_ref() {
            Some(TypeRef::Scalar(ty)) => self.add_type(&ty),
            Some(TypeRef::Model(_)) => self.insert(Feature::ModelsModule),
            Some(TypeRef::Local(_)) | None => {}
        }
    }

    fn add_type(&mut self, ty: &SemanticType) {
        if ty.is_nullable {
            self.insert(Feature::Optional);
        }
        if ty.is_array {
            self.insert(Feature::List);
        }
        let feature = match &ty.base {
            BaseType::Dynamic => Feature::Any,
            BaseType::Decimal => Feature::Decimal,
            BaseType::Date => Feature::Date,
            BaseType::Time => Feature::Time,
            BaseType::DateTime => Feature::DateTime,
            BaseType::Interval => Feature::Interval,
            BaseType::Uuid => Feature::Uuid,
            BaseType::Enum(r) if r.module.is_some() => Feature::ModelsModule,
            _ => return,
        };
        self.insert(feature);
    }
}
