//! commitra - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commitra::commit::{
    CommitConfig, CommitOutcome, HookAction, HookChange, HookOutcome, run_commit, run_hook_action,
    run_prepare_commit_msg,
};
use commitra::config::{ConfigLayer, RuntimeConfig, default_config_path};
use commitra::git::build_enhanced_diff_context;

/// Generate conventional commit messages from staged changes.
#[derive(Parser, Debug)]
#[command(name = "commitra")]
#[command(about = "Generate conventional commit messages from staged changes using AI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// LLM provider: openai, groq, anthropic or local
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model name (overrides the provider default)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// HTTP(S) proxy URL for provider requests
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Config file (defaults to ~/.commitra.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message for the staged changes and commit
    Commit {
        /// Number of suggestions to generate
        #[arg(short = 'g', long)]
        generate: Option<u32>,

        /// Print the first suggestion without committing
        #[arg(long)]
        suggest_only: bool,

        /// Commit the first suggestion without prompting
        #[arg(short, long)]
        yes: bool,
    },

    /// Install or uninstall the prepare-commit-msg git hook
    Hook {
        #[arg(value_enum)]
        action: HookAction,
    },

    /// Run as git's prepare-commit-msg hook
    #[command(name = "prepare-commit-msg", hide = true)]
    PrepareCommitMsg {
        /// Path to the commit message file
        message_file: PathBuf,

        /// Commit message source passed by git
        source: Option<String>,

        /// Commit SHA passed by git for amends
        sha: Option<String>,
    },

    /// Print the diff context that would be sent to the provider
    Context,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("commitra=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let overrides = ConfigLayer {
        provider: cli.provider.clone(),
        model: cli.model.clone(),
        timeout: cli.timeout,
        proxy: cli.proxy.clone(),
        ..ConfigLayer::default()
    };
    let path = cli.config.clone().or_else(default_config_path);

    RuntimeConfig::load(overrides, path.as_deref()).context("Failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Commit {
            generate,
            suggest_only,
            yes,
        } => {
            let config = CommitConfig {
                runtime: load_config(&cli)?,
                generate: *generate,
                suggest_only: *suggest_only,
                yes: *yes,
            };

            match run_commit(config).await.context("Commit failed")? {
                CommitOutcome::NothingStaged => {
                    println!("No staged changes found. Stage files first with: git add <file>");
                }
                CommitOutcome::Suggested(message) => println!("{message}"),
                CommitOutcome::Committed { output, .. } => {
                    print!("{output}");
                    println!("Successfully committed!");
                }
                CommitOutcome::Cancelled => println!("Commit cancelled."),
            }
        }

        Command::Hook { action } => match run_hook_action(*action)? {
            HookChange::Installed(path) => println!("Commitra hook installed at {}", path.display()),
            HookChange::AlreadyInstalled(_) => println!("Hook already installed."),
            HookChange::Removed(path) => println!("Commitra hook removed from {}", path.display()),
            HookChange::NotInstalled(_) => {
                println!("Hook is not installed or was not created by commitra.")
            }
        },

        Command::PrepareCommitMsg {
            message_file,
            source,
            ..
        } => {
            tracing::debug!(source = ?source, "prepare-commit-msg invoked");
            let runtime = load_config(&cli)?;
            let outcome = run_prepare_commit_msg(message_file, &runtime)
                .await
                .context("Commitra hook failed")?;
            if let HookOutcome::Appended(count) = outcome {
                eprintln!("Commitra added {count} suggestion(s)");
            }
        }

        Command::Context => {
            println!("{}", build_enhanced_diff_context());
        }
    }

    Ok(())
}
