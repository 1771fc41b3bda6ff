//! Remote endpoint loader: introspects a live GraphQL service.

use async_trait::async_trait;
use serde_json::{Value, json};
use url::Url;

use crate::error::{LoadError, Result};
use crate::introspection::INTROSPECTION_QUERY;
use crate::schema::ResolvedPayload;

use super::{LoadOptions, SchemaLoader};

const URL_CONTEXT: &str = "unable to download schema from url";

/// Loads http/https pointers by POSTing the standard introspection query to
/// the endpoint and yielding the response as an introspection payload.
#[derive(Debug, Default)]
pub struct UrlLoader;

impl UrlLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SchemaLoader for UrlLoader {
    fn name(&self) -> &'static str {
        "url"
    }

    fn recognize(&self, pointer: &str) -> bool {
        Url::parse(pointer)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    async fn load(&self, pointer: &str, options: &LoadOptions) -> Result<Vec<ResolvedPayload>> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("qlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| LoadError::transport(URL_CONTEXT, err.to_string()))?;

        let mut request = client.post(pointer).json(&json!({
            "query": INTROSPECTION_QUERY,
            "operationName": "IntrospectionQuery",
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
            .map_err(|err| LoadError::transport(URL_CONTEXT, err.to_string()))?;

        if !response.status().is_success() {
            return Err(LoadError::transport(
                URL_CONTEXT,
                format!("HTTP {} from {pointer}", response.status()),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| LoadError::transport(URL_CONTEXT, err.to_string()))?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .filter_map(|err| err.get("message").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(LoadError::remote_api(format!("{URL_CONTEXT}: {message}")));
            }
        }

        Ok(vec![ResolvedPayload::IntrospectionJson {
            json: body,
            location: pointer.to_string(),
        }])
    }
}
