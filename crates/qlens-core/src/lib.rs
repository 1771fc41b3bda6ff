//! qlens core library
//!
//! Resolves pointer strings (remote repository, version control, URL, file,
//! glob, or code file) into a canonical in-memory GraphQL schema or a set of
//! normalized source documents.

pub mod documents;
pub mod error;
pub mod introspection;
pub mod loader;
pub mod pointer;
pub mod schema;

/// Re-exports of commonly used types
pub mod prelude {
    // Errors
    pub use crate::error::{LoadError, Result};

    // Resolution engine
    pub use crate::loader::{LoadOptions, SchemaLoader, SchemaResolver, load_schema};

    // Pointer classification
    pub use crate::pointer::{GitPointer, GithubPointer, Scheme, classify};

    // Canonical representations
    pub use crate::schema::{CanonicalSchema, ResolvedPayload, SchemaFormat};

    // Documents
    pub use crate::documents::{SourceDocument, load_documents};
}
