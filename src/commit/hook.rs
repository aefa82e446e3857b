//! Git `prepare-commit-msg` hook support.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::commit::prompt::{CommitPromptInput, build_commit_prompt, hook_messages};
use crate::commit::suggest::request_choices;
use crate::error::{AiError, CommitError};
use crate::llm::router::AiClient;

pub const HOOK_NAME: &str = "prepare-commit-msg";

/// Marker line identifying a hook script written by this tool.
const HOOK_MARKER: &str = "# Commitra Git hook";

/// What the hook did with the message file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// The file already holds a message, or was unreadable.
    KeptExisting,
    /// Nothing staged worth describing.
    NoDiff,
    /// The provider returned no usable suggestion.
    NoSuggestions,
    /// Suggestions were appended as comment lines.
    Appended(usize),
}

/// Whether the message file has content other than `#` comment lines.
pub fn has_user_message(contents: &str) -> bool {
    contents
        .lines()
        .any(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
}

/// Comment block listing suggestions for the user to uncomment.
pub fn render_suggestions(suggestions: &[String]) -> String {
    let mut out = String::from(
        "# Commitra AI suggestions\n# Choose one by uncommenting it OR edit freely.\n\n",
    );
    for suggestion in suggestions {
        out.push_str("# ");
        out.push_str(suggestion);
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Fill an empty commit message file with commented suggestions.
///
/// A file that already carries a message (for example from `-m`, a merge or
/// an amend) is left untouched, as is an unreadable one. The diff context and
/// the client are only produced once a suggestion is actually needed.
pub async fn prepare_commit_msg<D, C>(
    message_file: &Path,
    diff_context: D,
    make_client: C,
    locale: &str,
    generate: u32,
) -> Result<HookOutcome, CommitError>
where
    D: FnOnce() -> String,
    C: FnOnce() -> Result<Box<dyn AiClient>, AiError>,
{
    match fs::read_to_string(message_file) {
        Ok(contents) if has_user_message(&contents) => return Ok(HookOutcome::KeptExisting),
        Ok(_) => {}
        Err(e) => {
            debug!("Could not read {}: {e}", message_file.display());
            return Ok(HookOutcome::KeptExisting);
        }
    }

    let diff = diff_context();
    if diff.trim().is_empty() {
        return Ok(HookOutcome::NoDiff);
    }

    let client = make_client()?;
    let prompt = build_commit_prompt(&CommitPromptInput {
        locale,
        ..CommitPromptInput::new(&diff)
    });
    let suggestions = request_choices(client.as_ref(), &hook_messages(prompt), generate).await?;
    if suggestions.is_empty() {
        return Ok(HookOutcome::NoSuggestions);
    }

    let message_file_err = |source| CommitError::MessageFile {
        path: message_file.display().to_string(),
        source,
    };
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(message_file)
        .map_err(message_file_err)?;
    file.write_all(render_suggestions(&suggestions).as_bytes())
        .map_err(message_file_err)?;

    Ok(HookOutcome::Appended(suggestions.len()))
}

/// Single-quote `value` for `/bin/sh`; an embedded `'` becomes `'\''`.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Shell shim that forwards the hook invocation to `exe`.
pub fn hook_script(exe: &Path) -> String {
    format!(
        "#!/bin/sh\n{HOOK_MARKER} (auto-generated)\nexec {} {HOOK_NAME} \"$@\"\n",
        shell_quote(&exe.display().to_string())
    )
}

/// Result of installing or removing the hook script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookChange {
    Installed(PathBuf),
    AlreadyInstalled(PathBuf),
    Removed(PathBuf),
    NotInstalled(PathBuf),
}

fn is_ours(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|c| c.contains(HOOK_MARKER))
        .unwrap_or(false)
}

/// Write the hook shim into `hooks_dir`, leaving an existing one of ours alone.
pub fn install_hook(hooks_dir: &Path, exe: &Path) -> Result<HookChange, CommitError> {
    let path = hooks_dir.join(HOOK_NAME);
    if is_ours(&path) {
        return Ok(HookChange::AlreadyInstalled(path));
    }

    let io_err = |source| CommitError::HookFile {
        path: path.display().to_string(),
        source,
    };
    fs::create_dir_all(hooks_dir).map_err(io_err)?;
    fs::write(&path, hook_script(exe)).map_err(io_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).map_err(io_err)?;
    }

    info!("Installed {HOOK_NAME} hook at {}", path.display());
    Ok(HookChange::Installed(path))
}

/// Remove the hook shim, but only if this tool wrote it.
pub fn uninstall_hook(hooks_dir: &Path) -> Result<HookChange, CommitError> {
    let path = hooks_dir.join(HOOK_NAME);
    if !is_ours(&path) {
        return Ok(HookChange::NotInstalled(path));
    }

    fs::remove_file(&path).map_err(|source| CommitError::HookFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(HookChange::Removed(path))
}
