//! sqlc-ir: compile a sqlc generation request into IR
//!
//! # Usage
//!
//! ```bash
//! # Summarize what would be generated
//! sqlc-ir request.json
//!
//! # Full IR as JSON, request on stdin
//! cat request.json | sqlc-ir --format json
//!
//! # Resolve a single column type
//! sqlc-ir resolve postgresql timestamptz --not-null
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlc_ir::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlc-ir")]
#[command(version)]
#[command(about = "Compile sqlc catalogs and queries into a typed IR", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlc-ir request.json
    sqlc-ir request.json --config sqlc-ir.toml --format json
    sqlc-ir resolve mysql tinyint --length 1 --not-null")]
struct Cli {
    /// Generation request (JSON); reads stdin when omitted
    request: Option<PathBuf>,

    /// Options file (.json or TOML); overrides the request's plugin options
    #[arg(short, long, env = "SQLC_IR_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one database type to its semantic type
    Resolve {
        /// Engine: postgresql, mysql or sqlite
        engine: Dialect,
        /// Database type name, e.g. `int4` or `pg_catalog.varchar`
        type_name: String,
        /// Declared length
        #[arg(long, default_value_t = 0)]
        length: i32,
        #[arg(long)]
        not_null: bool,
        #[arg(long)]
        array: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Resolve {
            engine,
            type_name,
            length,
            not_null,
            array,
        }) => {
            resolve_type(*engine, type_name, *length, *not_null, *array);
            Ok(())
        }
        None => run(&cli),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sqlc_ir=debug" } else { "sqlc_ir=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let bytes = match &cli.request {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read request from stdin")?;
            buf
        }
    };
    let req = GenerateRequest::from_json(&bytes).context("invalid generation request")?;

    let generation = match &cli.config {
        Some(path) => {
            let config = Config::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            sqlc_ir::generate_with_config(&req, &config)?
        }
        None => sqlc_ir::generate(&req)?,
    };

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&generation)?),
        OutputFormat::Summary => print_summary(&generation, req.settings.engine),
    }
    Ok(())
}

fn print_summary(generation: &Generation, engine: Dialect) {
    println!(
        "{} {} {}",
        "sqlc-ir".cyan().bold(),
        engine.to_string().dimmed(),
        generation.sqlc_version.dimmed()
    );
    println!();

    if let Some(models) = &generation.models_file {
        println!("{}", models.name.green().bold());
        for e in &models.enums {
            let values: Vec<&str> = e.constants.iter().map(|c| c.value.as_str()).collect();
            println!("  {} {} ({})", "enum".dimmed(), e.name.white(), values.join(", ").yellow());
        }
        for m in &models.models {
            println!("  {} {}", "model".dimmed(), m.name.white());
            for f in &m.fields {
                println!("    {} {}", f.name, f.ty.to_string().cyan());
            }
        }
        println!();
    }

    for file in &generation.query_files {
        println!("{} {}", file.name.green().bold(), format!("<- {}", file.source_name).dimmed());
        for s in &file.declarations {
            println!("  {} {}", "struct".dimmed(), s.name.white());
        }
        for q in &file.queries {
            let args: Vec<String> = q
                .args
                .iter()
                .filter_map(|a| Some(format!("{}: {}", a.name()?, describe(&a.type_ref()?))))
                .collect();
            let ret = q
                .ret
                .type_ref()
                .map(|t| describe(&t))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {} {}({}) -> {}",
                q.kind.tag().dimmed(),
                q.method_name.white(),
                args.join(", "),
                ret.cyan()
            );
        }
        for querier in &file.queriers {
            println!(
                "  {} {} ({} methods)",
                "querier".dimmed(),
                querier.name.white(),
                querier.methods.len()
            );
        }
        println!();
    }

    println!(
        "{} file(s)",
        generation.file_names().len().to_string().cyan()
    );
}

fn describe(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Scalar(t) => t.to_string(),
        TypeRef::Local(name) => name.clone(),
        TypeRef::Model(name) => format!("models.{}", name),
    }
}

fn resolve_type(engine: Dialect, type_name: &str, length: i32, not_null: bool, array: bool) {
    let catalog = Catalog::default();
    let resolver = TypeResolver::new(engine, &catalog);

    let (schema, name) = match type_name.split_once('.') {
        Some((schema, name)) => (schema, name),
        None => ("", type_name),
    };
    let mut col = Column::new("", name).length(length);
    col.data_type = Identifier::new(schema, name);
    if not_null {
        col = col.not_null();
    }
    if array {
        col = col.array();
    }

    let ty = resolver.resolve(&col);
    println!("{} {}", type_name.yellow(), format!("-> {}", ty).cyan().bold());
}
