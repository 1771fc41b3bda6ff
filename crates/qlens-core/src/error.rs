//! Error taxonomy for pointer resolution.

use thiserror::Error;

/// Result type for qlens operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors produced while resolving a pointer into a schema or document set.
///
/// Every variant is terminal for the resolution attempt: the engine performs
/// no retries and never falls back to another scheme once a loader has
/// claimed a pointer.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A scheme prefix matched but the rest of the pointer is malformed.
    #[error("{message}")]
    PointerParse { message: String },

    /// Recognized scheme, but the file extension is outside the supported set.
    #[error(
        "unsupported schema format: {path} (expected .graphql, .graphqls, .gql, .gqls or .json)"
    )]
    UnsupportedFormat { path: String },

    /// An underlying read or network call failed.
    #[error("{context}: {detail}")]
    Transport { context: String, detail: String },

    /// The remote API answered, but with an error list or without data.
    #[error("{message}")]
    RemoteApi { message: String },

    /// SDL text did not parse as a type-system document.
    #[error("failed to parse schema: {0}")]
    SchemaParse(String),

    /// Query/fragment text did not parse as an executable document.
    #[error("failed to parse document: {0}")]
    DocumentParse(String),

    /// The payload did not match the introspection result shape.
    #[error("invalid introspection result: {0}")]
    Introspection(String),

    /// No loader claimed the pointer, or a claimed pointer produced nothing.
    #[error("could not resolve schema from pointer `{pointer}`")]
    ResolutionExhausted { pointer: String },
}

impl LoadError {
    pub(crate) fn pointer_parse(message: impl Into<String>) -> Self {
        Self::PointerParse {
            message: message.into(),
        }
    }

    pub(crate) fn transport(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn remote_api(message: impl Into<String>) -> Self {
        Self::RemoteApi {
            message: message.into(),
        }
    }

    pub(crate) fn exhausted(pointer: impl Into<String>) -> Self {
        Self::ResolutionExhausted {
            pointer: pointer.into(),
        }
    }
}
