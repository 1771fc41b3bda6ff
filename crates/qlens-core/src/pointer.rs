//! Pointer classification for schema and document sources.
//!
//! A pointer is an opaque caller-supplied string. Classification is a pure
//! function of its shape: `github:` and `git:` prefixes are checked in that
//! fixed order, anything else is handed to the generic loader chain.

use crate::error::{LoadError, Result};

const GITHUB_PREFIX: &str = "github:";
const GIT_PREFIX: &str = "git:";

const GITHUB_SHAPE: &str = "schema pointer should match \"github:owner/name#ref:path/to/file\"";
const GIT_SHAPE: &str = "schema pointer should match \"git:branchName:path/to/file\"";

/// Addressing scheme a pointer belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    /// Remote repository blob, fetched through the hosting provider's API.
    Github(GithubPointer),
    /// File content at a revision of a local repository.
    Git(GitPointer),
    /// Everything else: URL, local file, glob, or code file.
    Generic,
}

/// Parsed `github:owner/name#ref:path` pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubPointer {
    pub owner: String,
    pub name: String,
    pub reference: String,
    pub path: String,
}

/// Parsed `git:ref:path` pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitPointer {
    pub reference: String,
    pub path: String,
}

/// Classify a pointer by shape. Prefix matches with a malformed remainder
/// are parse errors, never a silent fall-through to the generic scheme.
pub fn classify(pointer: &str) -> Result<Scheme> {
    if GithubPointer::matches(pointer) {
        return Ok(Scheme::Github(GithubPointer::parse(pointer)?));
    }
    if GitPointer::matches(pointer) {
        return Ok(Scheme::Git(GitPointer::parse(pointer)?));
    }
    Ok(Scheme::Generic)
}

impl GithubPointer {
    /// Whether the pointer carries the case-insensitive `github:` prefix.
    pub fn matches(pointer: &str) -> bool {
        strip_prefix_ci(pointer, GITHUB_PREFIX).is_some()
    }

    /// Parse `github:owner/name#ref:path` into its four fields.
    pub fn parse(pointer: &str) -> Result<Self> {
        let rest = strip_prefix_ci(pointer, GITHUB_PREFIX)
            .ok_or_else(|| LoadError::pointer_parse(GITHUB_SHAPE))?;

        let (repo, file) = rest
            .split_once('#')
            .ok_or_else(|| LoadError::pointer_parse(GITHUB_SHAPE))?;
        let (owner, name) = repo
            .split_once('/')
            .ok_or_else(|| LoadError::pointer_parse(GITHUB_SHAPE))?;
        let (reference, path) = file
            .split_once(':')
            .ok_or_else(|| LoadError::pointer_parse(GITHUB_SHAPE))?;

        if owner.is_empty() || name.is_empty() || reference.is_empty() || path.is_empty() {
            return Err(LoadError::pointer_parse(GITHUB_SHAPE));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            reference: reference.to_string(),
            path: path.to_string(),
        })
    }

    /// The `ref:path` expression used in the provider's blob query.
    pub fn expression(&self) -> String {
        format!("{}:{}", self.reference, self.path)
    }
}

impl GitPointer {
    /// Whether the pointer carries the case-insensitive `git:` prefix.
    pub fn matches(pointer: &str) -> bool {
        strip_prefix_ci(pointer, GIT_PREFIX).is_some()
    }

    /// Parse `git:ref:path`. Exactly two colon-delimited segments are
    /// accepted after the prefix.
    pub fn parse(pointer: &str) -> Result<Self> {
        let rest =
            strip_prefix_ci(pointer, GIT_PREFIX).ok_or_else(|| LoadError::pointer_parse(GIT_SHAPE))?;

        let parts: Vec<&str> = rest.split(':').collect();
        if parts.len() != 2 {
            return Err(LoadError::pointer_parse(GIT_SHAPE));
        }

        Ok(Self {
            reference: parts[0].to_string(),
            path: parts[1].to_string(),
        })
    }
}

fn strip_prefix_ci<'a>(pointer: &'a str, prefix: &str) -> Option<&'a str> {
    // `get` also rejects splits inside a multibyte character, which an ASCII
    // prefix can never produce on a real match.
    let rest = pointer.get(prefix.len()..)?;
    if pointer.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes()) {
        Some(rest)
    } else {
        None
    }
}
