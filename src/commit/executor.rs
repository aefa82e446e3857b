//! Creating the commit once a message is chosen.

use tracing::debug;

use crate::error::CommitError;
use crate::git::runner::{GitRunner, git_args};

/// Run `git commit -m <message>` over the current index.
///
/// The message is passed as its own argument, so quotes and shell
/// metacharacters reach git unchanged. Returns git's stdout.
pub fn commit_with_message<G: GitRunner + ?Sized>(
    git: &G,
    message: &str,
) -> Result<String, CommitError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(CommitError::EmptyMessage);
    }

    debug!("Committing with message: {message}");
    git.run(&git_args(["commit", "-m", message]))
        .map_err(CommitError::CommitFailed)
}
