//! Publishing the regenerated index with git.
//!
//! `git add` → `git commit` → `git push`, stopping at the first failure.
//! Steps already done are left as they are; the page itself is on disk
//! before any of this runs.

use crate::{
    config::IndexConfig,
    log,
    utils::{date, git},
};
use anyhow::{Context, Result};
use gix::ThreadSafeRepository;
use std::path::PathBuf;
use thiserror::Error;

/// The publishing step that failed. Attached as context to the underlying error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PublishError {
    #[error("Cannot open git repository at `{0}`")]
    Open(PathBuf),

    #[error("Publishing failed at `git add`")]
    Add,

    #[error("Publishing failed at `git commit`")]
    Commit,

    #[error("Publishing failed at `git push`")]
    Push,
}

/// Open the repository the project root belongs to.
pub fn open_repo(config: &IndexConfig) -> Result<ThreadSafeRepository> {
    let root = config.get_root();
    git::open_repo(root).context(PublishError::Open(root.to_path_buf()))
}

/// Stage, commit and push the configured paths.
pub fn deploy_index(repo: &ThreadSafeRepository, config: &IndexConfig) -> Result<()> {
    let root = config.get_root();
    let message = config.commit_message(date::today());

    git::add(root, &config.deploy.paths).context(PublishError::Add)?;
    git::commit(root, &message).context(PublishError::Commit)?;
    git::push(repo, config).context(PublishError::Push)?;

    log!("deploy"; "published `{}`", message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, IndexConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        exec!(root; ["git"]; "init", "-q").unwrap();
        exec!(root; ["git"]; "checkout", "-q", "-b", "main").unwrap();
        exec!(root; ["git"]; "config", "user.name", "Index Bot").unwrap();
        exec!(root; ["git"]; "config", "user.email", "bot@example.com").unwrap();
        exec!(root; ["git"]; "config", "commit.gpgsign", "false").unwrap();

        let mut config = IndexConfig::default();
        config.set_root(root);
        config.deploy.message = "Update index ({date})".into();
        (dir, config)
    }

    fn failed_step(err: &anyhow::Error) -> Option<&PublishError> {
        err.downcast_ref::<PublishError>()
    }

    #[test]
    fn test_open_repo_error_names_path() {
        let dir = TempDir::new().unwrap();
        let mut config = IndexConfig::default();
        config.set_root(dir.path());
        if let Err(err) = open_repo(&config) {
            assert_eq!(
                failed_step(&err),
                Some(&PublishError::Open(dir.path().to_path_buf()))
            );
        }
    }

    #[test]
    fn test_deploy_commits_then_fails_at_push_without_upstream() {
        let (dir, config) = project();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let repo = open_repo(&config).unwrap();
        let err = deploy_index(&repo, &config).unwrap_err();
        assert_eq!(failed_step(&err), Some(&PublishError::Push));

        let out = exec!(dir.path(); ["git"]; "log", "-1", "--format=%s").unwrap();
        let subject = String::from_utf8_lossy(&out.stdout).trim().to_owned();
        assert_eq!(subject, config.commit_message(date::today()));
    }

    #[test]
    fn test_deploy_nothing_to_commit() {
        let (_dir, config) = project();
        let repo = open_repo(&config).unwrap();
        let err = deploy_index(&repo, &config).unwrap_err();
        assert_eq!(failed_step(&err), Some(&PublishError::Commit));
    }

    #[test]
    fn test_deploy_pushes_to_branch() {
        let (dir, mut config) = project();
        let bare = TempDir::new().unwrap();
        exec!(bare.path(); ["git"]; "init", "-q", "--bare").unwrap();
        let url = bare.path().to_string_lossy().into_owned();
        exec!(dir.path(); ["git"]; "remote", "add", "origin", &url).unwrap();
        config.deploy.branch = "main".into();

        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        let repo = open_repo(&config).unwrap();
        deploy_index(&repo, &config).unwrap();

        let out = exec!(bare.path(); ["git"]; "log", "-1", "--format=%s", "main").unwrap();
        assert!(String::from_utf8_lossy(&out.stdout).starts_with("Update index ("));
    }
}
