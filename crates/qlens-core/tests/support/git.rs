use std::path::Path;
use std::process::Command;

const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

pub fn git_command() -> Command {
    let mut cmd = Command::new("git");
    for key in GIT_ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    cmd
}

pub fn run_git(repo: &Path, args: &[&str]) {
    let status = git_command()
        .args(args)
        .current_dir(repo)
        .status()
        .expect("Failed to invoke git");
    assert!(status.success(), "git command failed: {:?}", args);
}

/// Initialize a repository on `branch` containing a single committed file.
pub fn init_repo_with_file(repo: &Path, branch: &str, file: &str, content: &str) {
    std::fs::create_dir_all(repo).expect("Failed to create repo dir");
    run_git(repo, &["init"]);
    run_git(
        repo,
        &["symbolic-ref", "HEAD", &format!("refs/heads/{branch}")],
    );
    run_git(repo, &["config", "user.email", "test@example.com"]);
    run_git(repo, &["config", "user.name", "test"]);
    std::fs::write(repo.join(file), content).expect("Failed to write fixture file");
    run_git(repo, &["add", "."]);
    run_git(repo, &["commit", "-m", "init"]);
}
