//! Repository metadata used to enrich the commit prompt.

use std::path::PathBuf;

use tracing::debug;

use super::runner::{GitRunner, git_args};
use crate::error::GitError;

/// Branch name used when HEAD cannot be resolved.
pub const DEFAULT_BRANCH: &str = "main";

/// Number of recent commit subjects to fetch.
const RECENT_COMMITS: usize = 5;

/// Get the current branch name, falling back to [`DEFAULT_BRANCH`].
pub fn current_branch<G: GitRunner + ?Sized>(git: &G) -> String {
    match git.run(&git_args(["rev-parse", "--abbrev-ref", "HEAD"])) {
        Ok(out) if !out.trim().is_empty() => out.trim().to_string(),
        Ok(_) => DEFAULT_BRANCH.to_string(),
        Err(e) => {
            debug!("Could not resolve current branch: {e}");
            DEFAULT_BRANCH.to_string()
        }
    }
}

/// Subjects of the most recent commits, newest first. Empty for a fresh repo.
pub fn recent_commit_subjects<G: GitRunner + ?Sized>(git: &G) -> Vec<String> {
    let count = format!("-n{RECENT_COMMITS}");
    match git.run(&git_args(["log", count.as_str(), "--pretty=format:%s"])) {
        Ok(out) => out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            debug!("Could not read recent commits: {e}");
            Vec::new()
        }
    }
}

/// Whether anything at all is staged, regardless of the exclusion list.
pub fn has_staged_changes<G: GitRunner + ?Sized>(git: &G) -> bool {
    git.run(&git_args(["diff", "--cached", "--name-only"]))
        .map(|out| !out.trim().is_empty())
        .unwrap_or(false)
}

/// Fail unless the working directory is inside a git work tree.
pub fn ensure_work_tree<G: GitRunner + ?Sized>(git: &G) -> Result<(), GitError> {
    git.run(&git_args(["rev-parse", "--is-inside-work-tree"]))
        .map(|_| ())
}

/// Directory git reads hooks from, honouring `core.hooksPath` and worktrees.
pub fn hooks_dir<G: GitRunner + ?Sized>(git: &G) -> Result<PathBuf, GitError> {
    let out = git.run(&git_args(["rev-parse", "--git-path", "hooks"]))?;
    Ok(PathBuf::from(out.trim()))
}
