//! Typed model of the GraphQL introspection result and its SDL rendering.
//!
//! Loaders hand introspection payloads over as raw JSON; this module decodes
//! them and renders SDL text so the materializer has a single parse path for
//! every route into a canonical schema.

use serde::Deserialize;

use crate::error::{LoadError, Result};

/// The standard introspection query sent to live endpoints.
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

const BUILT_IN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];
const BUILT_IN_DIRECTIVES: [&str; 4] = ["skip", "include", "deprecated", "specifiedBy"];

/// Top-level introspection result: `{"__schema": …}`.
#[derive(Debug, Deserialize)]
pub struct IntrospectionResult {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: Option<NamedTypeRef>,
    #[serde(default)]
    pub mutation_type: Option<NamedTypeRef>,
    #[serde(default)]
    pub subscription_type: Option<NamedTypeRef>,
    pub types: Vec<FullType>,
    #[serde(default)]
    pub directives: Vec<DirectiveInfo>,
}

#[derive(Debug, Deserialize)]
pub struct NamedTypeRef {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    pub kind: TypeKind,
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<FieldInfo>>,
    #[serde(default)]
    pub input_fields: Option<Vec<InputValueInfo>>,
    #[serde(default)]
    pub interfaces: Option<Vec<TypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<EnumValueInfo>>,
    #[serde(default)]
    pub possible_types: Option<Vec<TypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<InputValueInfo>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValueInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// Possibly-wrapped type reference (`NON_NULL`/`LIST` chains).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Vec<InputValueInfo>,
}

impl TypeRef {
    fn render(&self) -> Result<String> {
        match self.kind {
            TypeKind::NonNull => Ok(format!("{}!", self.inner()?.render()?)),
            TypeKind::List => Ok(format!("[{}]", self.inner()?.render()?)),
            _ => self
                .name
                .clone()
                .ok_or_else(|| LoadError::Introspection("type reference is missing a name".into())),
        }
    }

    fn inner(&self) -> Result<&TypeRef> {
        self.of_type.as_deref().ok_or_else(|| {
            LoadError::Introspection("wrapping type reference is missing \"ofType\"".into())
        })
    }
}

/// Decode an introspection payload, accepting both `{"data": {"__schema"}}`
/// and bare `{"__schema"}` envelopes.
pub fn parse_introspection(json: &serde_json::Value) -> Result<IntrospectionResult> {
    let root = json.get("data").unwrap_or(json);
    if root.get("__schema").is_none() {
        return Err(LoadError::Introspection(
            "missing \"__schema\" key".to_string(),
        ));
    }
    serde_json::from_value(root.clone()).map_err(|err| LoadError::Introspection(err.to_string()))
}

/// Render an introspection payload as SDL text.
pub fn introspection_to_sdl(json: &serde_json::Value) -> Result<String> {
    let result = parse_introspection(json)?;
    render_sdl(&result.schema)
}

fn render_sdl(schema: &IntrospectionSchema) -> Result<String> {
    let mut out = String::new();

    if let Some(block) = render_schema_block(schema) {
        out.push_str(&block);
        out.push('\n');
    }

    for directive in &schema.directives {
        if BUILT_IN_DIRECTIVES.contains(&directive.name.as_str()) {
            continue;
        }
        out.push_str(&render_directive(directive)?);
        out.push('\n');
    }

    for ty in &schema.types {
        let Some(name) = ty.name.as_deref() else {
            continue;
        };
        // Introspection meta types and built-in scalars never appear in SDL.
        if name.starts_with("__") || BUILT_IN_SCALARS.contains(&name) {
            continue;
        }
        out.push_str(&render_type(ty, name)?);
        out.push('\n');
    }

    Ok(out)
}

fn render_schema_block(schema: &IntrospectionSchema) -> Option<String> {
    let query = schema.query_type.as_ref().map(|t| t.name.as_str());
    let mutation = schema.mutation_type.as_ref().map(|t| t.name.as_str());
    let subscription = schema.subscription_type.as_ref().map(|t| t.name.as_str());

    let all_default = query.unwrap_or("Query") == "Query"
        && mutation.unwrap_or("Mutation") == "Mutation"
        && subscription.unwrap_or("Subscription") == "Subscription";
    if all_default {
        return None;
    }

    let mut block = String::from("schema {\n");
    if let Some(name) = query {
        block.push_str(&format!("  query: {name}\n"));
    }
    if let Some(name) = mutation {
        block.push_str(&format!("  mutation: {name}\n"));
    }
    if let Some(name) = subscription {
        block.push_str(&format!("  subscription: {name}\n"));
    }
    block.push_str("}\n");
    Some(block)
}

fn render_directive(directive: &DirectiveInfo) -> Result<String> {
    let mut out = render_description(directive.description.as_deref(), "");
    out.push_str(&format!(
        "directive @{}{} on {}\n",
        directive.name,
        render_arguments(&directive.args)?,
        directive.locations.join(" | ")
    ));
    Ok(out)
}

fn render_type(ty: &FullType, name: &str) -> Result<String> {
    let mut out = render_description(ty.description.as_deref(), "");

    match ty.kind {
        TypeKind::Scalar => out.push_str(&format!("scalar {name}\n")),
        TypeKind::Object => {
            out.push_str(&format!(
                "type {name}{} {{\n",
                render_implements(ty.interfaces.as_deref())?
            ));
            out.push_str(&render_fields(ty.fields.as_deref().unwrap_or_default())?);
            out.push_str("}\n");
        }
        TypeKind::Interface => {
            out.push_str(&format!(
                "interface {name}{} {{\n",
                render_implements(ty.interfaces.as_deref())?
            ));
            out.push_str(&render_fields(ty.fields.as_deref().unwrap_or_default())?);
            out.push_str("}\n");
        }
        TypeKind::Union => {
            let members = ty
                .possible_types
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(TypeRef::render)
                .collect::<Result<Vec<_>>>()?;
            out.push_str(&format!("union {name} = {}\n", members.join(" | ")));
        }
        TypeKind::Enum => {
            out.push_str(&format!("enum {name} {{\n"));
            for value in ty.enum_values.as_deref().unwrap_or_default() {
                out.push_str(&render_description(value.description.as_deref(), "  "));
                out.push_str(&format!(
                    "  {}{}\n",
                    value.name,
                    render_deprecated(value.is_deprecated, value.deprecation_reason.as_deref())
                ));
            }
            out.push_str("}\n");
        }
        TypeKind::InputObject => {
            out.push_str(&format!("input {name} {{\n"));
            for input in ty.input_fields.as_deref().unwrap_or_default() {
                out.push_str(&render_description(input.description.as_deref(), "  "));
                out.push_str(&format!("  {}\n", render_input_value(input)?));
            }
            out.push_str("}\n");
        }
        TypeKind::List | TypeKind::NonNull => {
            return Err(LoadError::Introspection(format!(
                "unexpected wrapping type at schema level: {name}"
            )));
        }
    }

    Ok(out)
}

fn render_implements(interfaces: Option<&[TypeRef]>) -> Result<String> {
    let interfaces = interfaces.unwrap_or_default();
    if interfaces.is_empty() {
        return Ok(String::new());
    }
    let names = interfaces
        .iter()
        .map(TypeRef::render)
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(" implements {}", names.join(" & ")))
}

fn render_fields(fields: &[FieldInfo]) -> Result<String> {
    let mut out = String::new();
    for field in fields {
        out.push_str(&render_description(field.description.as_deref(), "  "));
        out.push_str(&format!(
            "  {}{}: {}{}\n",
            field.name,
            render_arguments(&field.args)?,
            field.type_ref.render()?,
            render_deprecated(field.is_deprecated, field.deprecation_reason.as_deref())
        ));
    }
    Ok(out)
}

fn render_arguments(args: &[InputValueInfo]) -> Result<String> {
    if args.is_empty() {
        return Ok(String::new());
    }
    let rendered = args
        .iter()
        .map(render_input_value)
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("({})", rendered.join(", ")))
}

fn render_input_value(input: &InputValueInfo) -> Result<String> {
    let mut out = format!("{}: {}", input.name, input.type_ref.render()?);
    if let Some(default) = &input.default_value {
        // defaultValue is already a GraphQL literal.
        out.push_str(&format!(" = {default}"));
    }
    Ok(out)
}

fn render_deprecated(is_deprecated: bool, reason: Option<&str>) -> String {
    if !is_deprecated {
        return String::new();
    }
    match reason {
        Some(reason) => format!(" @deprecated(reason: \"{}\")", escape_string(reason)),
        None => " @deprecated".to_string(),
    }
}

fn render_description(description: Option<&str>, indent: &str) -> String {
    match description {
        Some(text) if !text.is_empty() => {
            let escaped = text.replace("\"\"\"", "\\\"\"\"");
            if escaped.ends_with('"') {
                // A trailing quote would run into the closing delimiter.
                format!("{indent}\"\"\"{escaped}\n{indent}\"\"\"\n")
            } else {
                format!("{indent}\"\"\"{escaped}\"\"\"\n")
            }
        }
        _ => String::new(),
    }
}

fn escape_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
