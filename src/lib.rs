//! commitra - A CLI tool that turns staged git changes into conventional
//! commit messages using pluggable LLM providers.
//!
//! # Overview
//!
//! commitra condenses the staged diff into a bounded context block, sends it
//! to one of several providers (OpenAI, Groq, Anthropic or a local endpoint)
//! behind a single chat interface, and commits the message the user picks.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLayer, RuntimeConfig};
pub use error::{AiError, CommitError, ConfigError, GitError};
pub use git::{DiffContextBuilder, build_enhanced_diff_context};
pub use llm::{AiClient, ChatCompletionResponse, ChatMessage, ChatOptions, create_ai_client};
