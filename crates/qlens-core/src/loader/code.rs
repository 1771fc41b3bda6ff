//! Code-file loader: extracts GraphQL embedded in source-code files.
//!
//! Recognizes JavaScript/TypeScript files and pulls out `gql`/`graphql`
//! tagged template literals. For schema loading only literals that parse as
//! type-system documents count; executable operations are the document
//! pipeline's business.

use std::fs;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::{LoadError, Result};
use crate::schema::ResolvedPayload;

use super::file::{expand, is_code_extension};
use super::{LoadOptions, SchemaLoader};

const CODE_CONTEXT: &str = "unable to load schema from code file";

fn literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)\b(?:gql|graphql)\s*`([^`]*)`").expect("literal pattern is valid")
    })
}

/// Pull every tagged template literal body out of a source file.
pub(crate) fn extract_embedded(source: &str) -> Vec<String> {
    literal_pattern()
        .captures_iter(source)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Loads `.js`/`.jsx`/`.ts`/`.tsx` (and `.mjs`/`.cjs`) files containing
/// embedded schema literals.
#[derive(Debug, Default)]
pub struct CodeFileLoader;

impl CodeFileLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SchemaLoader for CodeFileLoader {
    fn name(&self) -> &'static str {
        "code-file"
    }

    fn recognize(&self, pointer: &str) -> bool {
        !pointer.contains("://") && is_code_extension(pointer)
    }

    async fn load(&self, pointer: &str, _options: &LoadOptions) -> Result<Vec<ResolvedPayload>> {
        let mut payloads = Vec::new();

        for path in expand(pointer)? {
            let source = fs::read_to_string(&path).map_err(|err| {
                LoadError::transport(CODE_CONTEXT, format!("{}: {err}", path.display()))
            })?;

            for literal in extract_embedded(&source) {
                // Operations and fragments are skipped here; only
                // type-system literals make a schema.
                if let Ok(document) = graphql_parser::parse_schema::<String>(&literal) {
                    payloads.push(ResolvedPayload::SyntaxTree {
                        document: document.into_static(),
                        location: path.display().to_string(),
                    });
                }
            }
        }

        Ok(payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_code_extensions() {
        let loader = CodeFileLoader::new();
        assert!(loader.recognize("src/schema.ts"));
        assert!(loader.recognize("src/schema.js"));
        assert!(loader.recognize("src/**/*.tsx"));
        assert!(!loader.recognize("schema.graphql"));
        assert!(!loader.recognize("https://example.com/schema.ts"));
    }

    #[test]
    fn extracts_tagged_template_literals() {
        let source = r#"
            import gql from 'graphql-tag';

            const typeDefs = gql`
                type Query {
                    hello: String
                }
            `;

            const query = graphql`query Hello { hello }`;
        "#;

        let literals = extract_embedded(source);
        assert_eq!(literals.len(), 2);
        assert!(literals[0].contains("type Query"));
        assert!(literals[1].contains("query Hello"));
    }

    #[test]
    fn untagged_templates_are_ignored() {
        let source = "const s = `type Query { hello: String }`;";
        assert!(extract_embedded(source).is_empty());
    }

    #[tokio::test]
    async fn only_type_system_literals_become_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.ts");
        fs::write(
            &path,
            r#"
            const typeDefs = gql`type Query { hello: String }`;
            const op = gql`query Hello { hello }`;
            "#,
        )
        .unwrap();

        let payloads = CodeFileLoader::new()
            .load(&path.display().to_string(), &LoadOptions::new())
            .await
            .unwrap();
        assert_eq!(payloads.len(), 1);
    }
}
