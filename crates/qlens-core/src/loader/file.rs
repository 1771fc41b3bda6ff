//! Local file loaders: SDL and introspection-JSON sources.
//!
//! Pointers may be plain paths or glob patterns; a pattern yields one
//! payload per matched file.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{LoadError, Result};
use crate::schema::{ResolvedPayload, SchemaFormat, extension};

use super::{LoadOptions, SchemaLoader};

const FILE_CONTEXT: &str = "unable to load schema from file";

/// Expand a pointer into concrete file paths. Plain paths pass through
/// untouched; glob patterns expand in match order.
pub(crate) fn expand(pointer: &str) -> Result<Vec<PathBuf>> {
    if !pointer.contains(['*', '?', '[']) {
        return Ok(vec![PathBuf::from(pointer)]);
    }

    let entries = glob::glob(pointer)
        .map_err(|err| LoadError::transport("invalid file pattern", err.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| LoadError::transport(FILE_CONTEXT, err.to_string()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn read(path: &PathBuf) -> Result<String> {
    fs::read_to_string(path).map_err(|err| {
        LoadError::transport(FILE_CONTEXT, format!("{}: {err}", path.display()))
    })
}

fn looks_local(pointer: &str) -> bool {
    !pointer.contains("://")
}

/// Loads local `.graphql`/`.graphqls`/`.gql`/`.gqls` files as raw SDL.
#[derive(Debug, Default)]
pub struct SdlFileLoader;

#[async_trait]
impl SchemaLoader for SdlFileLoader {
    fn name(&self) -> &'static str {
        "sdl-file"
    }

    fn recognize(&self, pointer: &str) -> bool {
        looks_local(pointer)
            && matches!(SchemaFormat::from_path(pointer), Ok(SchemaFormat::Sdl))
    }

    async fn load(&self, pointer: &str, _options: &LoadOptions) -> Result<Vec<ResolvedPayload>> {
        let mut payloads = Vec::new();
        for path in expand(pointer)? {
            payloads.push(ResolvedPayload::SchemaText {
                sdl: read(&path)?,
                location: path.display().to_string(),
            });
        }
        Ok(payloads)
    }
}

/// Loads local `.json` files as introspection results.
#[derive(Debug, Default)]
pub struct JsonFileLoader;

#[async_trait]
impl SchemaLoader for JsonFileLoader {
    fn name(&self) -> &'static str {
        "json-file"
    }

    fn recognize(&self, pointer: &str) -> bool {
        looks_local(pointer)
            && matches!(
                SchemaFormat::from_path(pointer),
                Ok(SchemaFormat::Introspection)
            )
    }

    async fn load(&self, pointer: &str, _options: &LoadOptions) -> Result<Vec<ResolvedPayload>> {
        let mut payloads = Vec::new();
        for path in expand(pointer)? {
            let text = read(&path)?;
            let json = serde_json::from_str(&text)
                .map_err(|err| LoadError::Introspection(err.to_string()))?;
            payloads.push(ResolvedPayload::IntrospectionJson {
                json,
                location: path.display().to_string(),
            });
        }
        Ok(payloads)
    }
}

pub(crate) fn is_code_extension(pointer: &str) -> bool {
    matches!(
        extension(pointer).as_deref(),
        Some("js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sdl_loader_recognizes_paths_and_globs() {
        let loader = SdlFileLoader;
        assert!(loader.recognize("./schema.graphql"));
        assert!(loader.recognize("schemas/**/*.gql"));
        assert!(!loader.recognize("schema.json"));
        assert!(!loader.recognize("https://example.com/schema.graphql"));
    }

    #[test]
    fn json_loader_recognizes_json_paths() {
        let loader = JsonFileLoader;
        assert!(loader.recognize("introspection.json"));
        assert!(!loader.recognize("schema.graphql"));
    }

    #[tokio::test]
    async fn missing_file_is_a_transport_error() {
        let loader = SdlFileLoader;
        let err = loader
            .load("/definitely/not/here.graphql", &LoadOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Transport { .. }));
    }

    #[tokio::test]
    async fn glob_pattern_yields_one_payload_per_file() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.graphql", "b.graphql"] {
            let mut file = fs::File::create(dir.path().join(name)).unwrap();
            writeln!(file, "type Query {{ hello: String }}").unwrap();
        }

        let pattern = format!("{}/*.graphql", dir.path().display());
        let payloads = SdlFileLoader.load(&pattern, &LoadOptions::new()).await.unwrap();
        assert_eq!(payloads.len(), 2);
    }
}
