//! Canonical schema representation and payload materialization.
//!
//! Every loader route terminates here: whatever a loader produced (raw SDL,
//! an introspection result, an already-built schema, or a parsed syntax
//! tree) converges into one [`CanonicalSchema`].

use std::fmt;
use std::path::Path;

use graphql_parser::schema;

use crate::error::{LoadError, Result};
use crate::introspection;

/// Owned type-system document.
pub type SchemaAst = schema::Document<'static, String>;

/// File formats a schema can be read from, chosen by path extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// Schema definition language text.
    Sdl,
    /// JSON introspection result.
    Introspection,
}

const SDL_EXTENSIONS: [&str; 4] = ["graphql", "graphqls", "gql", "gqls"];

impl SchemaFormat {
    /// Dispatch on the path extension, case-insensitive.
    pub fn from_path(path: &str) -> Result<Self> {
        match extension(path) {
            Some(ext) if SDL_EXTENSIONS.contains(&ext.as_str()) => Ok(Self::Sdl),
            Some(ext) if ext == "json" => Ok(Self::Introspection),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_string(),
            }),
        }
    }
}

pub(crate) fn extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// What a loader hands to the materializer. Exactly one variant per
/// resolved unit; no shape sniffing downstream.
#[derive(Debug, Clone)]
pub enum ResolvedPayload {
    /// Raw SDL text.
    SchemaText { sdl: String, location: String },
    /// Parsed JSON matching the introspection result shape.
    IntrospectionJson {
        json: serde_json::Value,
        location: String,
    },
    /// An already-built canonical schema.
    Schema(CanonicalSchema),
    /// A parsed type-system document.
    SyntaxTree { document: SchemaAst, location: String },
}

impl ResolvedPayload {
    /// Origin of the payload, when the loader recorded one.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::SchemaText { location, .. }
            | Self::IntrospectionJson { location, .. }
            | Self::SyntaxTree { location, .. } => Some(location),
            Self::Schema(_) => None,
        }
    }
}

/// The normalized schema representation all downstream commands consume.
///
/// Top-level definitions are sorted by name at construction (schema block
/// first), so two payloads describing the same semantic type system compare
/// equal regardless of which route produced them. Equality and printing both
/// go through the canonical printer.
#[derive(Debug, Clone)]
pub struct CanonicalSchema {
    ast: SchemaAst,
}

impl CanonicalSchema {
    /// Parse SDL text into a canonical schema.
    pub fn from_sdl(sdl: &str) -> Result<Self> {
        let ast = graphql_parser::parse_schema::<String>(sdl)
            .map_err(|err| LoadError::SchemaParse(err.to_string()))?
            .into_static();
        Ok(Self::from_ast(ast))
    }

    /// Build a canonical schema from an introspection result, accepting both
    /// `{"data": {"__schema": …}}` and bare `{"__schema": …}` envelopes.
    pub fn from_introspection(json: &serde_json::Value) -> Result<Self> {
        let sdl = introspection::introspection_to_sdl(json)?;
        Self::from_sdl(&sdl)
    }

    /// Wrap an already-parsed type-system document.
    pub fn from_ast(mut ast: SchemaAst) -> Self {
        ast.definitions.sort_by_key(definition_sort_key);
        Self { ast }
    }

    /// The canonical SDL rendering of this schema.
    pub fn to_sdl(&self) -> String {
        self.ast.to_string()
    }

    /// The underlying type-system document.
    pub fn ast(&self) -> &SchemaAst {
        &self.ast
    }

    /// Consume the schema, yielding its type-system document.
    pub fn into_ast(self) -> SchemaAst {
        self.ast
    }
}

impl PartialEq for CanonicalSchema {
    fn eq(&self, other: &Self) -> bool {
        self.to_sdl() == other.to_sdl()
    }
}

impl Eq for CanonicalSchema {}

impl fmt::Display for CanonicalSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ast.fmt(f)
    }
}

fn definition_sort_key(definition: &schema::Definition<'static, String>) -> (u8, String) {
    use schema::Definition;

    match definition {
        Definition::SchemaDefinition(_) => (0, String::new()),
        Definition::TypeDefinition(def) => (1, type_definition_name(def).to_string()),
        Definition::TypeExtension(def) => (2, type_extension_name(def).to_string()),
        Definition::DirectiveDefinition(def) => (3, def.name.clone()),
    }
}

fn type_definition_name<'a>(def: &'a schema::TypeDefinition<'static, String>) -> &'a str {
    use schema::TypeDefinition;

    match def {
        TypeDefinition::Scalar(t) => &t.name,
        TypeDefinition::Object(t) => &t.name,
        TypeDefinition::Interface(t) => &t.name,
        TypeDefinition::Union(t) => &t.name,
        TypeDefinition::Enum(t) => &t.name,
        TypeDefinition::InputObject(t) => &t.name,
    }
}

fn type_extension_name<'a>(def: &'a schema::TypeExtension<'static, String>) -> &'a str {
    use schema::TypeExtension;

    match def {
        TypeExtension::Scalar(t) => &t.name,
        TypeExtension::Object(t) => &t.name,
        TypeExtension::Interface(t) => &t.name,
        TypeExtension::Union(t) => &t.name,
        TypeExtension::Enum(t) => &t.name,
        TypeExtension::InputObject(t) => &t.name,
    }
}

/// Converge resolved payloads into exactly one canonical schema.
///
/// Every payload contributes its definitions (a glob pointer resolves to one
/// payload per matched file); an empty result set means no loader produced
/// anything usable for this pointer.
pub fn materialize(pointer: &str, payloads: Vec<ResolvedPayload>) -> Result<CanonicalSchema> {
    if payloads.is_empty() {
        return Err(LoadError::exhausted(pointer));
    }

    let mut definitions = Vec::new();
    for payload in payloads {
        let ast = match payload {
            ResolvedPayload::Schema(schema) => schema.into_ast(),
            ResolvedPayload::SchemaText { sdl, .. } => {
                CanonicalSchema::from_sdl(&sdl)?.into_ast()
            }
            ResolvedPayload::IntrospectionJson { json, .. } => {
                CanonicalSchema::from_introspection(&json)?.into_ast()
            }
            ResolvedPayload::SyntaxTree { document, .. } => document,
        };
        definitions.extend(ast.definitions);
    }

    Ok(CanonicalSchema::from_ast(SchemaAst { definitions }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdl_extensions_dispatch_case_insensitively() {
        for path in [
            "schema.graphql",
            "schema.graphqls",
            "schema.gql",
            "schema.gqls",
            "SCHEMA.GraphQL",
            "nested/dir/schema.GQLS",
        ] {
            assert_eq!(SchemaFormat::from_path(path).unwrap(), SchemaFormat::Sdl);
        }
    }

    #[test]
    fn json_extension_dispatches_to_introspection() {
        assert_eq!(
            SchemaFormat::from_path("introspection.JSON").unwrap(),
            SchemaFormat::Introspection
        );
    }

    #[test]
    fn other_extensions_are_unsupported() {
        for path in ["schema.yaml", "schema", "schema.graphql.bak"] {
            let err = SchemaFormat::from_path(path).unwrap_err();
            assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
        }
    }

    #[test]
    fn canonical_schema_equality_ignores_definition_order() {
        let a = CanonicalSchema::from_sdl("type Query { user: User } type User { id: ID }").unwrap();
        let b = CanonicalSchema::from_sdl("type User { id: ID } type Query { user: User }").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_schema_distinguishes_different_fields() {
        let a = CanonicalSchema::from_sdl("type Query { hello: String }").unwrap();
        let b = CanonicalSchema::from_sdl("type Query { hello: Int }").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_sdl_is_a_schema_parse_error() {
        let err = CanonicalSchema::from_sdl("type Query {").unwrap_err();
        assert!(matches!(err, LoadError::SchemaParse(_)));
    }

    #[test]
    fn materialize_empty_payloads_is_exhausted() {
        let err = materialize("nothing.txt", Vec::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not resolve schema from pointer `nothing.txt`"
        );
    }

    #[test]
    fn materialize_converges_text_and_tree_payloads() {
        let sdl = "type Query { hello: String }";
        let from_text = materialize(
            "a.graphql",
            vec![ResolvedPayload::SchemaText {
                sdl: sdl.to_string(),
                location: "a.graphql".to_string(),
            }],
        )
        .unwrap();

        let document = graphql_parser::parse_schema::<String>(sdl)
            .unwrap()
            .into_static();
        let from_tree = materialize(
            "b.graphql",
            vec![ResolvedPayload::SyntaxTree {
                document,
                location: "b.graphql".to_string(),
            }],
        )
        .unwrap();

        assert_eq!(from_text, from_tree);
    }

    #[test]
    fn materialize_merges_every_payload() {
        let schema = materialize(
            "*.graphql",
            vec![
                ResolvedPayload::SchemaText {
                    sdl: "type Query { user: User }".to_string(),
                    location: "a.graphql".to_string(),
                },
                ResolvedPayload::SchemaText {
                    sdl: "type User { id: ID }".to_string(),
                    location: "b.graphql".to_string(),
                },
            ],
        )
        .unwrap();

        let merged = CanonicalSchema::from_sdl("type Query { user: User } type User { id: ID }")
            .unwrap();
        assert_eq!(schema, merged);
    }
}
