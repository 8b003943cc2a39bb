//! Querier planning.
//!
//! A querier wraps a connection and exposes one method per query. This
//! module decides each method's signature, parameter bindings, connection
//! call and row mapping; emitters only have to spell the plan out.

use serde::Serialize;

use crate::ir::{Query, QueryKind, QueryValue, TypeRef};
use crate::types::{BaseType, SemanticType};

/// Name of the synchronous querier class.
pub const SYNC_QUERIER: &str = "Querier";

/// Name of the asynchronous querier class.
pub const ASYNC_QUERIER: &str = "AsyncQuerier";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    Sync,
    Async,
}

impl Flavor {
    pub fn class_name(self) -> &'static str {
        match self {
            Flavor::Sync => SYNC_QUERIER,
            Flavor::Async => ASYNC_QUERIER,
        }
    }
}

/// How the method takes its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgStyle {
    /// A single struct argument, passed positionally.
    Positional,
    /// Every argument is keyword-only.
    KeywordOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodArg {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// Where a bound placeholder value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingSource {
    /// A scalar argument.
    Arg { arg: String },
    /// A field of a struct argument.
    Field { arg: String, field: String },
}

/// One named placeholder binding: `p1`, `p2`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub placeholder: String,
    pub source: BindingSource,
}

/// Connection entry point used to run the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnCall {
    Execute,
    Stream,
}

/// The statement execution of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    pub call: ConnCall,
    /// Constant holding the SQL text.
    pub constant: String,
    pub bindings: Vec<Binding>,
    pub awaited: bool,
}

/// How a result row becomes the returned value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowMapping {
    /// The first column, as is.
    Column { index: usize },
    /// A struct built with `field = row[column]` for every field.
    Construct {
        #[serde(rename = "type")]
        ty: TypeRef,
        fields: Vec<(String, usize)>,
    },
}

/// What the method does with the execution result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultHandling {
    /// Map the first row, or return none when there is no row.
    FirstRow { row: RowMapping },
    /// Map and yield every row.
    EachRow { row: RowMapping },
    /// Discard the result.
    Discard,
    /// Return the affected row count.
    RowCount,
    /// Return the driver result as is.
    Passthrough,
}

/// Declared return type of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum ReturnType {
    Optional(TypeRef),
    Iterator(TypeRef),
    AsyncIterator(TypeRef),
    Nothing,
    RowCount,
    DriverResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    pub is_async: bool,
    pub style: ArgStyle,
    pub args: Vec<MethodArg>,
    pub returns: ReturnType,
    pub execution: Execution,
    pub result: ResultHandling,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Querier {
    pub name: String,
    pub flavor: Flavor,
    pub methods: Vec<Method>,
}

impl Querier {
    /// Plan a querier over `queries`, keeping their order.
    pub fn plan<'q>(flavor: Flavor, queries: impl IntoIterator<Item = &'q Query>) -> Self {
        Self {
            name: flavor.class_name().to_string(),
            flavor,
            methods: queries.into_iter().map(|q| plan_method(q, flavor)).collect(),
        }
    }
}

/// Plan the method for one query.
pub fn plan_method(query: &Query, flavor: Flavor) -> Method {
    let is_async = flavor == Flavor::Async;
    let exec = |call| Execution {
        call,
        constant: query.constant_name.clone(),
        bindings: bindings(&query.args),
        awaited: is_async,
    };

    let (returns, execution, result) = match query.kind {
        QueryKind::FetchOne => {
            let (ty, row) = row_mapping(query);
            (
                ReturnType::Optional(ty),
                exec(ConnCall::Execute),
                ResultHandling::FirstRow { row },
            )
        }
        QueryKind::FetchMany => {
            let (ty, row) = row_mapping(query);
            match flavor {
                Flavor::Sync => (
                    ReturnType::Iterator(ty),
                    exec(ConnCall::Execute),
                    ResultHandling::EachRow { row },
                ),
                Flavor::Async => (
                    ReturnType::AsyncIterator(ty),
                    exec(ConnCall::Stream),
                    ResultHandling::EachRow { row },
                ),
            }
        }
        QueryKind::Exec => (
            ReturnType::Nothing,
            exec(ConnCall::Execute),
            ResultHandling::Discard,
        ),
        QueryKind::ExecRows => (
            ReturnType::RowCount,
            exec(ConnCall::Execute),
            ResultHandling::RowCount,
        ),
        QueryKind::ExecResult => (
            ReturnType::DriverResult,
            exec(ConnCall::Execute),
            ResultHandling::Passthrough,
        ),
    };

    Method {
        name: query.method_name.clone(),
        is_async,
        style: arg_style(&query.args),
        args: query
            .args
            .iter()
            .filter_map(|a| {
                Some(MethodArg {
                    name: a.name()?.to_string(),
                    ty: a.type_ref()?,
                })
            })
            .collect(),
        returns,
        execution,
        result,
    }
}

fn arg_style(args: &[QueryValue]) -> ArgStyle {
    match args {
        [single] if single.is_struct() => ArgStyle::Positional,
        _ => ArgStyle::KeywordOnly,
    }
}

/// Number placeholders `p1..pN` across args, struct fields expanded in order.
fn bindings(args: &[QueryValue]) -> Vec<Binding> {
    let sources = args.iter().flat_map(|arg| -> Vec<BindingSource> {
        match arg {
            QueryValue::Empty => Vec::new(),
            QueryValue::Scalar { name, .. } => vec![BindingSource::Arg { arg: name.clone() }],
            QueryValue::Struct { name, def, .. } => def
                .fields
                .iter()
                .map(|f| BindingSource::Field {
                    arg: name.clone(),
                    field: f.name.clone(),
                })
                .collect(),
        }
    });
    sources
        .enumerate()
        .map(|(i, source)| Binding {
            placeholder: format!("p{}", i + 1),
            source,
        })
        .collect()
}

/// Row type and mapping of a row-returning query.
///
/// A fetch without result columns degrades to a dynamic first column.
fn row_mapping(query: &Query) -> (TypeRef, RowMapping) {
    match &query.ret {
        QueryValue::Empty => {
            tracing::warn!(
                "{} fetches rows but has no result columns",
                query.method_name
            );
            (
                TypeRef::Scalar(SemanticType::new(BaseType::Dynamic)),
                RowMapping::Column { index: 0 },
            )
        }
        QueryValue::Scalar { ty, .. } => (TypeRef::Scalar(ty.clone()), RowMapping::Column { index: 0 }),
        QueryValue::Struct { def, .. } => {
            let ty = query
                .ret
                .type_ref()
                .unwrap_or_else(|| TypeRef::Local(def.name.clone()));
            let fields = def
                .fields
                .iter()
                .enumerate()
                .map(|(i, f)| (f.name.clone(), i))
                .collect();
            (
                ty.clone(),
                RowMapping::Construct { ty, fields },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Field, Struct};
    use pretty_assertions::assert_eq;

    fn int() -> SemanticType {
        SemanticType::new(BaseType::Integer)
    }

    fn query(kind: QueryKind, args: Vec<QueryValue>, ret: QueryValue) -> Query {
        Query {
            kind,
            comments: vec![],
            method_name: "get_author".to_string(),
            field_name: "getAuthorStmt".to_string(),
            constant_name: "GET_AUTHOR".to_string(),
            sql: "SELECT 1".to_string(),
            source_name: "query.sql".to_string(),
            args,
            ret,
        }
    }

    fn scalar(name: &str) -> QueryValue {
        QueryValue::Scalar {
            name: name.to_string(),
            ty: int(),
        }
    }

    fn params() -> QueryValue {
        QueryValue::Struct {
            name: "arg".to_string(),
            def: Struct::synthetic(
                "UpdateParams",
                vec![Field::new("id", int()), Field::new("name", int())],
            ),
            emit: true,
        }
    }

    #[test]
    fn test_fetch_one_scalar() {
        let q = query(QueryKind::FetchOne, vec![scalar("id")], scalar("count"));
        let m = plan_method(&q, Flavor::Sync);
        assert_eq!(m.returns, ReturnType::Optional(TypeRef::Scalar(int())));
        assert_eq!(m.style, ArgStyle::KeywordOnly);
        assert_eq!(
            m.result,
            ResultHandling::FirstRow {
                row: RowMapping::Column { index: 0 }
            }
        );
        assert_eq!(
            m.execution.bindings,
            vec![Binding {
                placeholder: "p1".to_string(),
                source: BindingSource::Arg {
                    arg: "id".to_string()
                },
            }]
        );
        assert!(!m.execution.awaited);
    }

    #[test]
    fn test_struct_arg_positional_and_expanded() {
        let q = query(QueryKind::Exec, vec![params()], QueryValue::Empty);
        let m = plan_method(&q, Flavor::Sync);
        assert_eq!(m.style, ArgStyle::Positional);
        assert_eq!(m.returns, ReturnType::Nothing);
        let placeholders: Vec<_> = m
            .execution
            .bindings
            .iter()
            .map(|b| b.placeholder.as_str())
            .collect();
        assert_eq!(placeholders, vec!["p1", "p2"]);
        assert_eq!(
            m.execution.bindings[1].source,
            BindingSource::Field {
                arg: "arg".to_string(),
                field: "name".to_string()
            }
        );
        assert_eq!(m.args[0].ty, TypeRef::Local("UpdateParams".to_string()));
    }

    #[test]
    fn test_fetch_many_async_streams() {
        let row = QueryValue::Struct {
            name: "i".to_string(),
            def: Struct::synthetic("ListRow", vec![Field::new("a", int()), Field::new("b", int())]),
            emit: true,
        };
        let q = query(QueryKind::FetchMany, vec![], row);

        let sync = plan_method(&q, Flavor::Sync);
        assert_eq!(sync.execution.call, ConnCall::Execute);
        assert_eq!(sync.returns, ReturnType::Iterator(TypeRef::Local("ListRow".to_string())));

        let asynchronous = plan_method(&q, Flavor::Async);
        assert!(asynchronous.is_async);
        assert!(asynchronous.execution.awaited);
        assert_eq!(asynchronous.execution.call, ConnCall::Stream);
        assert_eq!(
            asynchronous.result,
            ResultHandling::EachRow {
                row: RowMapping::Construct {
                    ty: TypeRef::Local("ListRow".to_string()),
                    fields: vec![("a".to_string(), 0), ("b".to_string(), 1)],
                }
            }
        );
    }

    #[test]
    fn test_exec_variants() {
        let rows = plan_method(&query(QueryKind::ExecRows, vec![], QueryValue::Empty), Flavor::Async);
        assert_eq!(rows.returns, ReturnType::RowCount);
        assert_eq!(rows.result, ResultHandling::RowCount);

        let raw = plan_method(&query(QueryKind::ExecResult, vec![], QueryValue::Empty), Flavor::Sync);
        assert_eq!(raw.returns, ReturnType::DriverResult);
        assert_eq!(raw.result, ResultHandling::Passthrough);
    }

    #[test]
    fn test_fetch_without_columns_degrades() {
        let m = plan_method(&query(QueryKind::FetchOne, vec![], QueryValue::Empty), Flavor::Sync);
        assert_eq!(
            m.returns,
            ReturnType::Optional(TypeRef::Scalar(SemanticType::new(BaseType::Dynamic)))
        );
    }

    #[test]
    fn test_querier_plan() {
        let queries = vec![query(QueryKind::Exec, vec![], QueryValue::Empty)];
        let querier = Querier::plan(Flavor::Async, &queries);
        assert_eq!(querier.name, "AsyncQuerier");
        assert_eq!(querier.methods.len(), 1);
        assert!(querier.methods[0].args.is_empty());
    }
}
