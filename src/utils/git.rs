//! git operations used by `deploy`.
//!
//! The repository is opened with gix to check it exists and to inspect its
//! remotes; staging, committing and pushing go through the `git` binary so
//! the user's hooks, credentials and config apply.

use crate::{
    config::IndexConfig,
    exec, log,
    utils::command::{self, to_cmd_vec, to_os},
};
use anyhow::{Result, anyhow, bail};
use gix::{Repository, ThreadSafeRepository, remote::Direction};
use std::{ffi::OsString, path::Path};

// ============================================================================
// Repository
// ============================================================================

/// Open the repository containing `root`, searching parent directories.
pub fn open_repo(root: &Path) -> Result<ThreadSafeRepository> {
    let repo = gix::discover(root)
        .map_err(|err| anyhow!("`{}` is not inside a git repository: {err}", root.display()))?;
    Ok(repo.into_sync())
}

/// Working tree root of a repository. Bare repositories have none.
pub fn get_repo_root(repo: &Repository) -> Result<&Path> {
    repo.workdir()
        .ok_or_else(|| anyhow!("Repository at `{}` has no working tree", repo.path().display()))
}

// ============================================================================
// Staging and committing
// ============================================================================

/// `git add` the given pathspecs.
pub fn add(root: &Path, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
        bail!("Nothing to add: no pathspecs given");
    }

    let mut args: Vec<OsString> = vec![to_os("add"), to_os("--")];
    args.extend(paths.iter().map(to_os));
    command::exec(Some(root), &to_cmd_vec(["git"]), &args)?;

    log!("git"; "staged {}", paths.join(" "));
    Ok(())
}

/// `git commit -m <message>`. Fails when nothing is staged.
pub fn commit(root: &Path, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Commit message cannot be empty");
    }
    exec!(root; ["git"]; "commit", "-m", message)?;
    log!("git"; "committed: {}", message);
    Ok(())
}

// ============================================================================
// Pushing
// ============================================================================

struct Remote;

impl Remote {
    /// Push (or fetch) URL of a named remote, if it exists.
    fn url(repo: &Repository, name: &str) -> Option<String> {
        let remote = repo.find_remote(name).ok()?;
        remote
            .url(Direction::Push)
            .or_else(|| remote.url(Direction::Fetch))
            .map(|url| url.to_bstring().to_string())
    }
}

/// Push the current branch.
///
/// With `[deploy.branch]` empty this is a plain `git push` to the configured
/// upstream. Otherwise the upstream is set to `[deploy.remote]`/`branch`,
/// which must exist as a remote.
pub fn push(repo: &ThreadSafeRepository, config: &IndexConfig) -> Result<()> {
    let deploy = &config.deploy;
    let repo_local = repo.to_thread_local();
    let root = get_repo_root(&repo_local)?;
    let force = if deploy.force { "-f" } else { "" };

    if deploy.branch.is_empty() {
        log!("git"; "pushing to upstream");
        exec!(root; ["git"]; "push", force)?;
        return Ok(());
    }

    let Some(url) = Remote::url(&repo_local, &deploy.remote) else {
        bail!(
            "Remote `{}` not found in `{}`. Add it with `git remote add` or fix [deploy.remote].",
            deploy.remote,
            root.display()
        );
    };
    log!("git"; "pushing {} to {} ({})", deploy.branch, deploy.remote, url);
    exec!(root; ["git"]; "push", "--set-upstream", &deploy.remote, &deploy.branch, force)?;
    Ok(())
}
