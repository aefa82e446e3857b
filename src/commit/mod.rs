//! AI-generated commit messages using LLM providers.
//!
//! Orchestrates the `commit` command (preflight, diff context, suggestion
//! fan-out, selection, `git commit`) and the `prepare-commit-msg` hook.

pub mod executor;
pub mod hook;
pub mod prompt;
pub mod suggest;

use std::path::Path;

use dialoguer::{Confirm, Input, Select};
use tracing::debug;

use crate::config::RuntimeConfig;
use crate::error::CommitError;
use crate::git::{
    DiffContextBuilder, SystemGit, build_enhanced_diff_context, current_branch, ensure_work_tree,
    has_staged_changes, hooks_dir, recent_commit_subjects,
};
use crate::llm::create_ai_client;

pub use executor::commit_with_message;
pub use hook::{HookChange, HookOutcome, install_hook, prepare_commit_msg, uninstall_hook};
pub use prompt::{CommitPromptInput, build_commit_prompt, commit_messages, hook_messages};
pub use suggest::{dedup_suggestions, generate_suggestions, request_choices};

/// Options for the `commit` command, derived from CLI flags.
pub struct CommitConfig {
    pub runtime: RuntimeConfig,
    /// Overrides `runtime.generate` when set.
    pub generate: Option<u32>,
    pub suggest_only: bool,
    /// Commit the first suggestion without prompting.
    pub yes: bool,
}

/// How a `commit` run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    NothingStaged,
    Suggested(String),
    Committed { message: String, output: String },
    Cancelled,
}

/// Install or remove the `prepare-commit-msg` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HookAction {
    Install,
    Uninstall,
}

/// Number of suggestions to request; never below one.
pub fn suggestion_count(cli: Option<u32>, configured: u32) -> u32 {
    cli.unwrap_or(configured).max(1)
}

/// Run the full `commit` flow in the current directory.
pub async fn run_commit(config: CommitConfig) -> Result<CommitOutcome, CommitError> {
    which::which("git").map_err(|_| CommitError::GitNotFound)?;

    let git = SystemGit::new();
    ensure_work_tree(&git).map_err(CommitError::NotARepository)?;

    if !has_staged_changes(&git) {
        return Ok(CommitOutcome::NothingStaged);
    }

    let branch = current_branch(&git);
    let last_commits = recent_commit_subjects(&git);
    let diff = DiffContextBuilder::new(&git).build();
    debug!(branch = %branch, chars = diff.len(), "built diff context");

    let client = create_ai_client(&config.runtime)?;
    let count = suggestion_count(config.generate, config.runtime.generate);

    let prompt = build_commit_prompt(&CommitPromptInput {
        diff: &diff,
        branch: &branch,
        last_commits: &last_commits,
        locale: &config.runtime.locale,
        max_length: prompt::DEFAULT_MAX_LENGTH,
    });

    println!("Analyzing changes using {}...", client.provider());
    let suggestions = generate_suggestions(client.as_ref(), &commit_messages(prompt), count).await?;
    let first = suggestions.first().cloned().ok_or(CommitError::NoSuggestions)?;

    if config.suggest_only {
        return Ok(CommitOutcome::Suggested(first));
    }

    let message = if config.yes {
        first
    } else {
        match choose_message(&suggestions)? {
            Some(message) => message,
            None => return Ok(CommitOutcome::Cancelled),
        }
    };

    let output = commit_with_message(&git, &message)?;
    Ok(CommitOutcome::Committed { message, output })
}

/// Let the user pick, edit or reject a suggestion. `None` means cancelled.
fn choose_message(suggestions: &[String]) -> Result<Option<String>, CommitError> {
    if suggestions.len() > 1 {
        let selected = Select::new()
            .with_prompt("Choose your preferred commit message")
            .items(suggestions)
            .default(0)
            .interact_opt()
            .map_err(|_| CommitError::Cancelled)?;
        return Ok(selected.map(|i| suggestions[i].clone()));
    }

    let Some(message) = suggestions.first() else {
        return Ok(None);
    };

    let action = Select::new()
        .with_prompt(format!("Review commit message:\n\n   {message}\n"))
        .items(&["Use", "Edit", "Cancel"])
        .default(0)
        .interact_opt()
        .map_err(|_| CommitError::Cancelled)?;

    match action {
        Some(0) => Ok(Some(message.clone())),
        Some(1) => {
            let edited: String = Input::new()
                .with_prompt("Edit commit message")
                .with_initial_text(message.as_str())
                .validate_with(|input: &String| -> Result<(), &str> {
                    if input.trim().is_empty() {
                        Err("Message cannot be empty.")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()
                .map_err(|_| CommitError::Cancelled)?;
            let edited = edited.trim().to_string();

            let proceed = Confirm::new()
                .with_prompt(format!("Proceed with this commit message?\n\n   {edited}\n"))
                .default(true)
                .interact()
                .map_err(|_| CommitError::Cancelled)?;
            Ok(proceed.then_some(edited))
        }
        _ => Ok(None),
    }
}

/// Entry point for git's `prepare-commit-msg` hook.
pub async fn run_prepare_commit_msg(
    message_file: &Path,
    runtime: &RuntimeConfig,
) -> Result<HookOutcome, CommitError> {
    prepare_commit_msg(
        message_file,
        build_enhanced_diff_context,
        || create_ai_client(runtime),
        &runtime.locale,
        runtime.generate,
    )
    .await
}

/// Install or remove the hook shim in the current repository.
pub fn run_hook_action(action: HookAction) -> Result<HookChange, CommitError> {
    let git = SystemGit::new();
    let dir = hooks_dir(&git).map_err(CommitError::NotARepository)?;

    match action {
        HookAction::Install => {
            let exe = std::env::current_exe().map_err(|source| CommitError::HookFile {
                path: "<current executable>".to_string(),
                source,
            })?;
            install_hook(&dir, &exe)
        }
        HookAction::Uninstall => uninstall_hook(&dir),
    }
}
