//! Version-control loader: reads blob content from local git history.

use std::path::PathBuf;
use std::process::Command;

use async_trait::async_trait;

use crate::error::{LoadError, Result};
use crate::pointer::GitPointer;
use crate::schema::{ResolvedPayload, SchemaFormat};

use super::{LoadOptions, SchemaLoader};

const GIT_CONTEXT: &str = "unable to load schema from git";

/// Loads `git:<ref>:<path>` pointers with a point-in-time read against
/// repository history (`git show <ref>:<path>`). Never mutates the working
/// tree or the repository.
#[derive(Debug)]
pub struct GitLoader {
    repo_root: PathBuf,
}

impl GitLoader {
    /// Read from the repository at the current working directory.
    pub fn new() -> Self {
        Self::with_root(".")
    }

    /// Read from a repository rooted elsewhere.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: root.into(),
        }
    }

    fn show(&self, pointer: &GitPointer) -> Result<String> {
        let spec = format!("{}:{}", pointer.reference, pointer.path);
        let output = Command::new("git")
            .args(["show", &spec])
            .current_dir(&self.repo_root)
            .output()
            .map_err(|err| LoadError::transport(GIT_CONTEXT, err.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LoadError::transport(GIT_CONTEXT, stderr.trim().to_string()));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| LoadError::transport(GIT_CONTEXT, "file content is not valid UTF-8"))
    }
}

impl Default for GitLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaLoader for GitLoader {
    fn name(&self) -> &'static str {
        "git"
    }

    fn recognize(&self, pointer: &str) -> bool {
        GitPointer::matches(pointer)
    }

    async fn load(&self, pointer: &str, _options: &LoadOptions) -> Result<Vec<ResolvedPayload>> {
        let parsed = GitPointer::parse(pointer)?;
        let format = SchemaFormat::from_path(&parsed.path)?;
        let text = self.show(&parsed)?;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_git_prefix_only() {
        let loader = GitLoader::new();
        assert!(loader.recognize("git:main:schema.graphql"));
        assert!(loader.recognize("GIT:main:schema.graphql"));
        assert!(!loader.recognize("github:acme/api#main:schema.graphql"));
        assert!(!loader.recognize("./schema.graphql"));
    }

    #[tokio::test]
    async fn unsupported_extension_fails_before_any_read() {
        let loader = GitLoader::with_root("/nonexistent");
        let err = loader
            .load("git:main:schema.yaml", &LoadOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }
}
