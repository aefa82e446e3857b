//! Error types for commitra modules using thiserror.

use thiserror::Error;

/// Errors from the AI client layer and its provider clients.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("{provider_label} API key missing for provider {provider}")]
    MissingCredential {
        provider: &'static str,
        provider_label: &'static str,
    },

    #[error("Local model URL missing for provider local (set LOCAL_MODEL_URL)")]
    MissingLocalUrl,

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid client configuration for {provider}: {reason}")]
    Configuration {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} request timed out after {timeout_ms}ms")]
    Timeout {
        provider: &'static str,
        timeout_ms: u64,
    },

    #[error("{provider} request failed: {status} {message}")]
    Api {
        provider: &'static str,
        status: u16,
        /// Canonical reason phrase for the status.
        message: String,
        /// Error message from the response body, when the provider sent one.
        detail: Option<String>,
    },

    #[error("Could not reach {provider} API ({host})")]
    Unreachable {
        provider: &'static str,
        host: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} transport error: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned an unreadable response: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
}

impl AiError {
    /// HTTP status code, when the failure came from a provider response.
    pub fn status(&self) -> Option<u16> {
        match self {
            AiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AiError::Timeout { .. })
    }

    /// Whether this error was raised before any network attempt.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AiError::MissingCredential { .. }
                | AiError::MissingLocalUrl
                | AiError::UnsupportedProvider(_)
                | AiError::Configuration { .. }
        )
    }
}

/// Errors from git subprocess invocations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} exited with code {}: {stderr}", code.map_or("unknown".to_string(), |c| c.to_string()))]
    NonZeroExit {
        operation: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Errors from runtime configuration resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors from the commit message workflow.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("git is not installed or not on PATH")]
    GitNotFound,

    #[error("Not a git repository: {0}")]
    NotARepository(#[source] GitError),

    #[error("No commit messages generated")]
    NoSuggestions,

    #[error("Commit message cannot be empty")]
    EmptyMessage,

    #[error("Commit cancelled")]
    Cancelled,

    #[error("AI generation failed: {0}")]
    Generation(#[from] AiError),

    #[error("Failed to access commit message file {path}: {source}")]
    MessageFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Hook file error at {path}: {source}")]
    HookFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Commit failed: {0}")]
    CommitFailed(#[source] GitError),
}
