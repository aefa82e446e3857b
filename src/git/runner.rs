//! Git subprocess execution.
//!
//! All git access shells out to the system `git` binary so the user's own
//! config, attributes and pathspec semantics apply. Calls are synchronous and
//! carry no timeout: they are short-lived local operations.

use std::path::PathBuf;
use std::process::Command;

use crate::error::GitError;

/// Runs a git command and returns its stdout.
///
/// This abstraction allows feeding synthetic git output in tests.
#[cfg_attr(test, mockall::automock)]
pub trait GitRunner: Send + Sync {
    fn run(&self, args: &[String]) -> Result<String, GitError>;
}

impl<T: GitRunner + ?Sized> GitRunner for &T {
    fn run(&self, args: &[String]) -> Result<String, GitError> {
        (**self).run(args)
    }
}

/// Runner backed by the real `git` executable.
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    workdir: Option<PathBuf>,
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every command inside `dir` instead of the process working directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(dir.into()),
        }
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[String]) -> Result<String, GitError> {
        let operation = args.first().cloned().unwrap_or_default();

        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| GitError::SpawnFailed {
            operation: operation.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(GitError::NonZeroExit {
                operation,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Convert a static argument list into the owned form [`GitRunner`] takes.
pub fn git_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    args.into_iter().map(Into::into).collect()
}
