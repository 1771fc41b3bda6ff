//! Remote-repository loader: fetches blob content through the GitHub
//! GraphQL API.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{LoadError, Result};
use crate::pointer::GithubPointer;
use crate::schema::{ResolvedPayload, SchemaFormat};

use super::{LoadOptions, SchemaLoader};

const GITHUB_API_URL: &str = "https://api.github.com/graphql";
const GITHUB_CONTEXT: &str = "unable to download schema from github";
const OPERATION_NAME: &str = "GetBlobContent";

const BLOB_QUERY: &str = r#"
query GetBlobContent($owner: String!, $name: String!, $expression: String!) {
  repository(owner: $owner, name: $name) {
    object(expression: $expression) {
      ... on Blob {
        text
      }
    }
  }
}
"#;

/// Loads `github:owner/name#ref:path` pointers with a single blob query
/// against the hosting provider's API, authenticated via bearer token.
#[derive(Debug, Default)]
pub struct GithubLoader;

impl GithubLoader {
    pub fn new() -> Self {
        Self
    }

    async fn fetch_blob(&self, pointer: &GithubPointer, options: &LoadOptions) -> Result<String> {
        let expression = pointer.expression();

        let client = reqwest::Client::builder()
            .user_agent(concat!("qlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| LoadError::transport(GITHUB_CONTEXT, err.to_string()))?;

        let mut request = client.post(GITHUB_API_URL).json(&json!({
            "query": BLOB_QUERY,
            "variables": {
                "owner": pointer.owner,
                "name": pointer.name,
                "expression": expression,
            },
            "operationName": OPERATION_NAME,
        }));

        if let Some(token) = &options.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("bearer {token}"));
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|err| LoadError::transport(GITHUB_CONTEXT, err.to_string()))?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| LoadError::transport(GITHUB_CONTEXT, err.to_string()))?;

        extract_blob_text(&body, &expression)
    }
}

/// Pull the blob text out of a blob-query response body.
///
/// An error list wins over everything; a body without `data` surfaces the
/// whole body; a null `repository`/`object` means the query was well-formed
/// but the ref or path does not exist.
fn extract_blob_text(body: &Value, expression: &str) -> Result<String> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let message = errors
                .iter()
                .filter_map(|err| err.get("message").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(LoadError::remote_api(format!("{GITHUB_CONTEXT}: {message}")));
        }
    }

    let Some(data) = body.get("data") else {
        return Err(LoadError::remote_api(format!("{GITHUB_CONTEXT}: {body}")));
    };

    match data
        .pointer("/repository/object/text")
        .and_then(Value::as_str)
    {
        Some(text) => Ok(text.to_string()),
        None => Err(LoadError::remote_api(format!(
            "{GITHUB_CONTEXT}: no blob found at \"{expression}\""
        ))),
    }
}

#[async_trait]
impl SchemaLoader for GithubLoader {
    fn name(&self) -> &'static str {
        "github"
    }

    fn recognize(&self, pointer: &str) -> bool {
        GithubPointer::matches(pointer)
    }

    async fn load(&self, pointer: &str, options: &LoadOptions) -> Result<Vec<ResolvedPayload>> {
        let parsed = GithubPointer::parse(pointer)?;
        let format = SchemaFormat::from_path(&parsed.path)?;
        let text = self.fetch_blob(&parsed, options).await?;

        let payload = match format {
            SchemaFormat::Sdl => ResolvedPayload::SchemaText {
                sdl: text,
                location: pointer.to_string(),
            },
            SchemaFormat::Introspection => {
                let json = serde_json::from_str(&text)
                    .map_err(|err| LoadError::Introspection(err.to_string()))?;
                ResolvedPayload::IntrospectionJson {
                    json,
                    location: pointer.to_string(),
                }
            }
        };

        Ok(vec![payload])
    }
}
