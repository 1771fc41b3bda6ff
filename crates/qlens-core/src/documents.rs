//! Document loading: queries and fragments for coverage and validation
//! tooling.
//!
//! Documents only ever come from the generic chain (URLs, files, globs, code
//! files); the version-control and remote-repository schemes address
//! schemas, not operations.

use std::fs;
use std::path::Path;

use url::Url;

use crate::error::{LoadError, Result};
use crate::loader::expand_pointer;
use crate::loader::extract_embedded_literals;
use crate::schema::extension;

const DOCUMENTS_CONTEXT: &str = "unable to load documents";
const URL_DOCUMENTS_CONTEXT: &str = "unable to download documents from url";

const DOCUMENT_EXTENSIONS: [&str; 4] = ["graphql", "graphqls", "gql", "gqls"];

/// A normalized query/fragment source plus its originating location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Canonically printed document text.
    pub body: String,
    /// Origin pointer or sub-path the document came from.
    pub location: String,
}

/// Load a document set from a pointer (URL, file path, or glob pattern).
///
/// A URL contributes the fetched text as one entry; each matched
/// `.graphql`-family file contributes one entry; each embedded literal in a
/// code file contributes one entry. No deduplication, match order preserved.
pub async fn load_documents(pointer: &str) -> Result<Vec<SourceDocument>> {
    // URLs take precedence over paths, mirroring the schema chain order.
    if is_remote(pointer) {
        return load_remote(pointer).await;
    }

    let files = expand_pointer(pointer)?;
    if files.is_empty() {
        return Err(LoadError::exhausted(pointer));
    }

    let mut documents = Vec::new();
    for path in files {
        let location = path.display().to_string();
        let content = read(&path)?;

        match extension(&location).as_deref() {
            Some(ext) if DOCUMENT_EXTENSIONS.contains(&ext) => {
                documents.push(normalize(&content, location)?);
            }
            Some("js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs") => {
                for literal in extract_embedded_literals(&content) {
                    documents.push(normalize(&literal, location.clone())?);
                }
            }
            _ => {
                return Err(LoadError::UnsupportedFormat { path: location });
            }
        }
    }

    tracing::debug!(pointer, count = documents.len(), "loaded documents");
    Ok(documents)
}

fn is_remote(pointer: &str) -> bool {
    Url::parse(pointer)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

async fn load_remote(pointer: &str) -> Result<Vec<SourceDocument>> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("qlens/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| LoadError::transport(URL_DOCUMENTS_CONTEXT, err.to_string()))?;

    let response = client
        .get(pointer)
        .send()
        .await
        .map_err(|err| LoadError::transport(URL_DOCUMENTS_CONTEXT, err.to_string()))?;

    if !response.status().is_success() {
        return Err(LoadError::transport(
            URL_DOCUMENTS_CONTEXT,
            format!("HTTP {} from {pointer}", response.status()),
        ));
    }

    let text = response
        .text()
        .await
        .map_err(|err| LoadError::transport(URL_DOCUMENTS_CONTEXT, err.to_string()))?;

    Ok(vec![normalize(&text, pointer.to_string())?])
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| {
        LoadError::transport(DOCUMENTS_CONTEXT, format!("{}: {err}", path.display()))
    })
}

/// Reprint a document through the canonical printer, tagged with its origin.
fn normalize(text: &str, location: String) -> Result<SourceDocument> {
    let ast = graphql_parser::parse_query::<String>(text)
        .map_err(|err| LoadError::DocumentParse(format!("{location}: {err}")))?;
    Ok(SourceDocument {
        body: ast.to_string(),
        location,
    })
}
