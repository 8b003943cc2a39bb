//! Intermediate representation handed to emission.
//!
//! Everything here is plain data: built once per generation request,
//! never mutated afterwards, serializable for inspection.

use serde::Serialize;

use crate::catalog::Identifier;
use crate::error::{GenError, GenResult};
use crate::types::SemanticType;

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
            comment: String::new(),
        }
    }
}

/// A table model or a synthetic Params/Row aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Struct {
    /// Backing table; `None` for synthetic structs.
    pub table: Option<Identifier>,
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl Struct {
    /// A synthetic struct with no backing table.
    pub fn synthetic(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            table: None,
            name: name.into(),
            fields,
            comment: String::new(),
        }
    }
}

/// One enum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
    /// Sanitized identifier.
    pub name: String,
    /// Raw database literal.
    pub value: String,
}

/// A generated enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub constants: Vec<Constant>,
}

/// How a type is spelled where it is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypeRef {
    Scalar(SemanticType),
    /// Struct declared in the same file.
    Local(String),
    /// Struct declared in the models module.
    Model(String),
}

/// An argument or return value of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryValue {
    /// No value: a query without parameters or result columns.
    Empty,
    Scalar {
        name: String,
        #[serde(rename = "type")]
        ty: SemanticType,
    },
    Struct {
        name: String,
        #[serde(rename = "struct")]
        def: Struct,
        /// Declared alongside the query rather than taken from the models.
        emit: bool,
    },
}

impl QueryValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryValue::Empty)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, QueryValue::Struct { .. })
    }

    /// The struct this value must declare, if any.
    pub fn emitted_struct(&self) -> Option<&Struct> {
        match self {
            QueryValue::Struct {
                def, emit: true, ..
            } => Some(def),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            QueryValue::Empty => None,
            QueryValue::Scalar { name, .. } | QueryValue::Struct { name, .. } => Some(name),
        }
    }

    /// Type annotation at the use site; `None` for [`QueryValue::Empty`].
    pub fn type_ref(&self) -> Option<TypeRef> {
        match self {
            QueryValue::Empty => None,
            QueryValue::Scalar { ty, .. } => Some(TypeRef::Scalar(ty.clone())),
            QueryValue::Struct { def, emit, .. } => Some(if *emit {
                TypeRef::Local(def.name.clone())
            } else {
                TypeRef::Model(def.name.clone())
            }),
        }
    }
}

/// What executing a query yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// At most one row; a null sentinel when nothing matches.
    FetchOne,
    /// A lazy sequence of rows.
    FetchMany,
    /// Side effect only.
    Exec,
    /// Side effect, returning the affected row count.
    ExecRows,
    /// Side effect, returning the driver's raw result handle.
    ExecResult,
}

/// Command tags as sqlc reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    One,
    Many,
    Exec,
    ExecRows,
    ExecResult,
    CopyFrom,
}

impl Cmd {
    /// Parse a command tag such as `:one`.
    pub fn parse(query: &str, tag: &str) -> GenResult<Self> {
        match tag {
            ":one" => Ok(Cmd::One),
            ":many" => Ok(Cmd::Many),
            ":exec" => Ok(Cmd::Exec),
            ":execrows" => Ok(Cmd::ExecRows),
            ":execresult" => Ok(Cmd::ExecResult),
            ":copyfrom" => Ok(Cmd::CopyFrom),
            other => Err(GenError::unknown_command(query, other)),
        }
    }

    /// Classify into a query kind; bulk copy has no querier shape.
    pub fn kind(self, query: &str) -> GenResult<QueryKind> {
        match self {
            Cmd::One => Ok(QueryKind::FetchOne),
            Cmd::Many => Ok(QueryKind::FetchMany),
            Cmd::Exec => Ok(QueryKind::Exec),
            Cmd::ExecRows => Ok(QueryKind::ExecRows),
            Cmd::ExecResult => Ok(QueryKind::ExecResult),
            Cmd::CopyFrom => Err(GenError::not_implemented(query, "CopyFrom")),
        }
    }
}

impl QueryKind {
    /// The sqlc tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            QueryKind::FetchOne => ":one",
            QueryKind::FetchMany => ":many",
            QueryKind::Exec => ":exec",
            QueryKind::ExecRows => ":execrows",
            QueryKind::ExecResult => ":execresult",
        }
    }

    pub fn returns_rows(self) -> bool {
        matches!(self, QueryKind::FetchOne | QueryKind::FetchMany)
    }
}

/// One analyzed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub kind: QueryKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// Snake-case method name, also the sort key.
    pub method_name: String,
    /// Prepared statement field name, e.g. `getAuthorStmt`.
    pub field_name: String,
    /// Name of the constant holding the SQL text.
    pub constant_name: String,
    /// Rewritten SQL text.
    pub sql: String,
    pub source_name: String,
    pub args: Vec<QueryValue>,
    pub ret: QueryValue,
}

impl Query {
    /// Text stored in the SQL constant: a name header, then the statement.
    pub fn constant_text(&self) -> String {
        format!(
            "-- name: {} {}{}\n{}\n",
            self.method_name,
            crate::rewrite::COLON_ESCAPE,
            self.kind.tag().trim_start_matches(':'),
            self.sql
        )
    }

    /// Structs the query file must declare for this query, in order.
    pub fn emitted_structs(&self) -> impl Iterator<Item = &Struct> {
        self.args
            .iter()
            .chain(std::iter::once(&self.ret))
            .filter_map(QueryValue::emitted_struct)
    }
}
