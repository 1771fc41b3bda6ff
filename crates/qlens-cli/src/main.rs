//! qlens - GraphQL schema & document resolver
//!
//! Usage:
//!   qlens introspect <pointer>             # Resolve a schema and print SDL
//!   qlens introspect <pointer> -w out.gql  # Write SDL to a file
//!   qlens documents "src/**/*.graphql"     # Resolve operation documents

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qlens_core::prelude::{LoadOptions, load_documents, load_schema};

#[derive(Parser)]
#[command(name = "qlens")]
#[command(about = "GraphQL schema & document resolver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a schema pointer and print its SDL
    ///
    /// Pointers may be a local file or glob, a git revision
    /// (git:branch:path), a hosted repository blob
    /// (github:owner/name#ref:path), a live endpoint URL, or a code file
    /// with embedded schema literals.
    Introspect {
        /// Schema pointer to resolve
        pointer: String,

        /// Write the SDL to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        write: Option<String>,

        /// Bearer token for hosted repository or endpoint access
        #[arg(long)]
        token: Option<String>,

        /// HTTP header for endpoint requests ("Name: Value")
        #[arg(long = "header", value_name = "NAME: VALUE")]
        headers: Vec<String>,
    },

    /// Resolve operation documents from a file or glob pointer
    Documents {
        /// Document pointer (file path or glob pattern)
        pointer: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable listing
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qlens=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Introspect {
            pointer,
            write,
            token,
            headers,
        } => {
            run_introspect(&pointer, write.as_deref(), token, &headers).await?;
        }
        Commands::Documents { pointer, format } => {
            run_documents(&pointer, format).await?;
        }
    }

    Ok(())
}

async fn run_introspect(
    pointer: &str,
    write: Option<&str>,
    token: Option<String>,
    headers: &[String],
) -> Result<()> {
    let options = build_options(token, headers)?;
    let schema = load_schema(pointer, &options).await?;
    let sdl = schema.to_sdl();

    match write {
        Some(path) => {
            if !is_sdl_path(path) {
                anyhow::bail!(
                    "cannot write SDL to '{}': use a .graphql, .graphqls, .gql or .gqls path",
                    path
                );
            }
            std::fs::write(path, &sdl)?;
            println!("Wrote schema to {path}");
        }
        None => {
            println!("{sdl}");
        }
    }

    Ok(())
}

async fn run_documents(pointer: &str, format: OutputFormat) -> Result<()> {
    let documents = load_documents(pointer).await?;

    match format {
        OutputFormat::Table => {
            println!("Documents ({}):", documents.len());
            for document in &documents {
                let lines = document.body.lines().count();
                println!("  {} ({} lines)", document.location, lines);
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = documents
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "location": d.location,
                        "body": d.body,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn build_options(token: Option<String>, headers: &[String]) -> Result<LoadOptions> {
    let mut options = LoadOptions::new();
    if let Some(token) = token {
        options = options.with_token(token);
    }
    for header in headers {
        let (name, value) = split_header(header)?;
        options = options.with_header(name, value);
    }
    Ok(options)
}

fn split_header(header: &str) -> Result<(&str, &str)> {
    let Some((name, value)) = header.split_once(':') else {
        anyhow::bail!("Invalid header '{}'. Use the form 'Name: Value'", header);
    };
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() {
        anyhow::bail!("Invalid header '{}'. Use the form 'Name: Value'", header);
    }
    Ok((name, value))
}

fn is_sdl_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    ["graphql", "graphqls", "gql", "gqls"]
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}
