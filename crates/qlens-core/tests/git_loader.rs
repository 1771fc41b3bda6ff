mod support;

use qlens_core::error::LoadError;
use qlens_core::loader::{GitLoader, LoadOptions, SchemaLoader, SchemaResolver};
use qlens_core::schema::CanonicalSchema;
use tempfile::TempDir;

use support::git::init_repo_with_file;

const SDL: &str = "type Query { hello: String }\n";

const INTROSPECTION: &str = r#"{
  "__schema": {
    "queryType": { "name": "Query" },
    "types": [
      {
        "kind": "OBJECT",
        "name": "Query",
        "fields": [
          {
            "name": "hello",
            "args": [],
            "type": { "kind": "SCALAR", "name": "String" }
          }
        ]
      },
      { "kind": "SCALAR", "name": "String" }
    ],
    "directives": []
  }
}"#;

fn resolver_for(repo: &TempDir) -> SchemaResolver {
    SchemaResolver::with_loaders(vec![Box::new(GitLoader::with_root(repo.path()))])
}

#[tokio::test]
async fn resolves_sdl_from_git_history() {
    let repo = TempDir::new().unwrap();
    init_repo_with_file(repo.path(), "main", "schema.graphql", SDL);

    let schema = resolver_for(&repo)
        .resolve_schema("git:main:schema.graphql", &LoadOptions::new())
        .await
        .unwrap();

    assert_eq!(schema, CanonicalSchema::from_sdl(SDL).unwrap());
}

#[tokio::test]
async fn resolves_introspection_json_from_git_history() {
    let repo = TempDir::new().unwrap();
    init_repo_with_file(repo.path(), "main", "schema.json", INTROSPECTION);

    let schema = resolver_for(&repo)
        .resolve_schema("git:main:schema.json", &LoadOptions::new())
        .await
        .unwrap();

    // Both routes converge on the same canonical schema.
    assert_eq!(schema, CanonicalSchema::from_sdl(SDL).unwrap());
}

#[tokio::test]
async fn missing_path_surfaces_git_stderr() {
    let repo = TempDir::new().unwrap();
    init_repo_with_file(repo.path(), "main", "schema.graphql", SDL);

    let err = resolver_for(&repo)
        .resolve_schema("git:main:missing.graphql", &LoadOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Transport { .. }));
    assert!(err.to_string().contains("unable to load schema from git"));
}

#[tokio::test]
async fn malformed_git_pointer_is_a_parse_error_not_a_fallthrough() {
    let repo = TempDir::new().unwrap();
    init_repo_with_file(repo.path(), "main", "schema.graphql", SDL);

    // The loader claims anything with the scheme prefix, so the malformed
    // remainder must fail parsing instead of reaching a later loader.
    let loader = GitLoader::with_root(repo.path());
    assert!(loader.recognize("git:onlyonepart"));

    let err = resolver_for(&repo)
        .resolve("git:onlyonepart", &LoadOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::PointerParse { .. }));
    assert!(err.to_string().contains("git:branchName:path/to/file"));
}

#[tokio::test]
async fn reads_are_point_in_time() {
    let repo = TempDir::new().unwrap();
    init_repo_with_file(repo.path(), "main", "schema.graphql", SDL);

    // Dirty the working tree after the commit; history must win.
    std::fs::write(
        repo.path().join("schema.graphql"),
        "type Query { goodbye: String }\n",
    )
    .unwrap();

    let schema = resolver_for(&repo)
        .resolve_schema("git:main:schema.graphql", &LoadOptions::new())
        .await
        .unwrap();
    assert!(schema.to_sdl().contains("hello"));
    assert!(!schema.to_sdl().contains("goodbye"));
}
