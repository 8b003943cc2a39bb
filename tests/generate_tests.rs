//! End-to-end tests: request in, generation out.

use pretty_assertions::assert_eq;
use sqlc_ir::catalog::{Schema, Table};
use sqlc_ir::prelude::*;
use sqlc_ir::querier::{ArgStyle, BindingSource, ConnCall, ReturnType};
use sqlc_ir::requirements::Feature;

fn fixture() -> GenerateRequest {
    let bytes = include_bytes!("fixtures/authors.json");
    GenerateRequest::from_json(bytes).expect("fixture parses")
}

fn users_request() -> GenerateRequest {
    let users = Identifier::new("public", "users");
    GenerateRequest {
        catalog: Catalog {
            default_schema: "public".to_string(),
            schemas: vec![Schema {
                name: "public".to_string(),
                tables: vec![Table {
                    rel: users.clone(),
                    columns: vec![
                        Column::new("id", "integer").not_null(),
                        Column::new("name", "text"),
                    ],
                    comment: String::new(),
                }],
                ..Schema::default()
            }],
            ..Catalog::default()
        },
        ..GenerateRequest::default()
    }
}

fn query(name: &str, cmd: &str, params: usize) -> sqlc_ir::catalog::Query {
    sqlc_ir::catalog::Query {
        name: name.to_string(),
        cmd: cmd.to_string(),
        text: "SELECT 1".to_string(),
        filename: "query.sql".to_string(),
        params: (1..=params as i32)
            .map(|n| Parameter::new(n, Column::new(&format!("p{}", n), "integer").not_null()))
            .collect(),
        ..Default::default()
    }
}

#[test]
fn test_users_model() {
    let generation = sqlc_ir::generate(&users_request()).unwrap();
    let models = generation.models_file.unwrap();
    assert_eq!(models.name, "models.py");
    assert_eq!(models.models.len(), 1);

    let user = &models.models[0];
    assert_eq!(user.name, "User");
    assert_eq!(
        user.fields,
        vec![
            Field::new("id", SemanticType::new(BaseType::Integer)),
            Field::new("name", SemanticType::new(BaseType::String).nullable()),
        ]
    );
    assert!(generation.query_files.is_empty());
}

#[test]
fn test_fixture_models_and_enums() {
    let generation = sqlc_ir::generate(&fixture()).unwrap();
    let models = generation.models_file.as_ref().unwrap();

    assert_eq!(models.enums.len(), 1);
    let status = &models.enums[0];
    assert_eq!(status.name, "AuthorStatus");
    let members: Vec<_> = status.constants.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(members, vec!["ACTIVE", "ON_LEAVE", "RETIRED"]);

    let names: Vec<_> = models.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Author"]);
    assert_eq!(models.models[0].comment, "Book authors");
    assert!(models.requirements.contains(Feature::Enum));
    assert!(models.requirements.contains(Feature::Dataclass));
    assert!(!models.requirements.contains(Feature::ModelsModule));
}

#[test]
fn test_fixture_query_files() {
    let generation = sqlc_ir::generate(&fixture()).unwrap();
    assert_eq!(
        generation.file_names(),
        vec!["models.py", "query.py", "stats.py"]
    );

    let file = &generation.query_files[0];
    assert_eq!(file.source_name, "query.sql");
    assert_eq!(file.models_import.package, "bookstore");
    let methods: Vec<_> = file.queries.iter().map(|q| q.method_name.as_str()).collect();
    assert_eq!(methods, vec!["get_author", "list_author_names", "update_author_bio"]);

    // GetAuthor selects exactly the authors columns and reuses the model.
    let get = &file.queries[0];
    assert_eq!(get.ret.type_ref(), Some(TypeRef::Model("Author".to_string())));

    // ListAuthorNames has a narrower shape and gets its own row struct.
    let declared: Vec<_> = file.declarations.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(declared, vec!["ListAuthorNamesRow"]);

    let update = &file.queries[2];
    assert_eq!(update.kind, QueryKind::ExecRows);
    assert_eq!(
        update.sql,
        "UPDATE authors SET bio = :p2 WHERE id = :p1 AND bio\\\\:\\\\:text <> :p2"
    );
    assert!(file.requirements.contains(Feature::ModelsModule));
    assert!(file.requirements.contains(Feature::SyncDriver));
    assert!(file.requirements.contains(Feature::AsyncDriver));
}

#[test]
fn test_fixture_queriers() {
    let generation = sqlc_ir::generate(&fixture()).unwrap();
    let file = &generation.query_files[0];
    assert_eq!(file.queriers.len(), 2);

    let sync = &file.queriers[0];
    assert_eq!(sync.name, "Querier");
    let list = &sync.methods[1];
    assert_eq!(
        list.returns,
        ReturnType::Iterator(TypeRef::Local("ListAuthorNamesRow".to_string()))
    );

    let update = &sync.methods[2];
    assert_eq!(update.style, ArgStyle::KeywordOnly);
    assert_eq!(update.returns, ReturnType::RowCount);
    let sources: Vec<_> = update
        .execution
        .bindings
        .iter()
        .map(|b| match &b.source {
            BindingSource::Arg { arg } => format!("{}={}", b.placeholder, arg),
            BindingSource::Field { arg, field } => format!("{}={}.{}", b.placeholder, arg, field),
        })
        .collect();
    assert_eq!(sources, vec!["p1=id", "p2=bio"]);

    let asynchronous = &file.queriers[1];
    assert_eq!(asynchronous.methods[1].execution.call, ConnCall::Stream);
    assert!(asynchronous.methods.iter().all(|m| m.is_async));
}

#[test]
fn test_deterministic() {
    let req = fixture();
    let first = serde_json::to_string(&sqlc_ir::generate(&req).unwrap()).unwrap();
    let second = serde_json::to_string(&sqlc_ir::generate(&req).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parameter_threshold() {
    let mut req = users_request();
    req.queries = vec![query("Four", ":exec", 4), query("Five", ":exec", 5)];
    let ir = sqlc_ir::analyze(&req, &Config::default()).unwrap();

    let five = &ir.queries[0];
    assert_eq!(five.method_name, "five");
    assert_eq!(five.args.len(), 1);
    assert_eq!(
        five.args[0].type_ref(),
        Some(TypeRef::Local("FiveParams".to_string()))
    );

    let four = &ir.queries[1];
    assert_eq!(four.args.len(), 4);
    assert!(four.args.iter().all(|a| !a.is_struct()));
}

#[test]
fn test_zero_limit_from_options() {
    let mut req = users_request();
    req.plugin_options = serde_json::json!({ "query_parameter_limit": 0, "emit_sync_querier": true });
    req.queries = vec![query("DeleteUser", ":exec", 1)];
    let generation = sqlc_ir::generate(&req).unwrap();

    let method = &generation.query_files[0].queriers[0].methods[0];
    assert_eq!(method.style, ArgStyle::Positional);
    assert_eq!(method.args[0].name, "arg");
}

#[test]
fn test_copyfrom_aborts() {
    let mut req = users_request();
    req.queries = vec![query("GetUser", ":one", 1), query("CopyUsers", ":copyfrom", 2)];
    let err = sqlc_ir::generate(&req).unwrap_err();
    assert!(matches!(err, GenError::NotImplemented { .. }));
    assert_eq!(
        err.to_string(),
        "Support for CopyFrom is not implemented (query 'CopyUsers')"
    );
}

#[test]
fn test_negative_limit_rejected() {
    let mut req = users_request();
    req.plugin_options = serde_json::json!({ "query_parameter_limit": -2 });
    assert!(matches!(
        sqlc_ir::generate(&req),
        Err(GenError::InvalidParameterLimit(-2))
    ));
}

#[test]
fn test_analyze_rejects_negative_limit() {
    let mut req = users_request();
    req.queries = vec![query("Upd", ":exec", 5)];
    let config = Config::builder().query_parameter_limit(-1).build();
    assert!(matches!(
        sqlc_ir::analyze(&req, &config),
        Err(GenError::InvalidParameterLimit(-1))
    ));
}

#[test]
fn test_colliding_output_files_abort() {
    let mut req = users_request();
    let mut from_py = query("ListUsers", ":many", 0);
    from_py.filename = "users.py".to_string();
    let mut from_sql = query("GetUser", ":one", 1);
    from_sql.filename = "users.sql".to_string();
    req.queries = vec![from_sql, from_py];
    assert!(matches!(
        sqlc_ir::generate(&req),
        Err(GenError::NameCollision { .. })
    ));
}

#[test]
fn test_unknown_engine_rejected() {
    let err = GenerateRequest::from_json(br#"{"settings": {"engine": "oracle"}}"#).unwrap_err();
    assert!(matches!(err, GenError::Json(_)));
}

#[test]
fn test_models_file_disabled() {
    let mut req = fixture();
    req.plugin_options = serde_json::json!({ "output_models_file_name": null });
    let generation = sqlc_ir::generate(&req).unwrap();
    assert!(generation.models_file.is_none());
    assert_eq!(generation.file_names(), vec!["query.py", "stats.py"]);
}
