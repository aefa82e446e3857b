//! Provider-neutral chat request and response types.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of a conversation. Order within a slice is conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Token accounting reported by the provider, passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    /// Provider-specific fields (timings, token breakdowns) kept as sent.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One candidate completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Choice {
    pub fn assistant(content: impl Into<String>, finish_reason: Option<String>) -> Self {
        Self {
            message: ChatMessage::assistant(content),
            finish_reason,
        }
    }
}

/// Normalized chat completion. An empty `choices` list is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Trimmed, non-empty choice contents in order.
    pub fn contents(&self) -> Vec<String> {
        self.choices
            .iter()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

/// What a completion is for. Groq picks its model from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Commit,
    Readme,
}

/// Per-call options. Unset fields take each provider's default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub max_tokens: Option<u32>,
    pub n: Option<u32>,
    pub temperature: Option<f32>,
    pub kind: Option<CompletionKind>,
}

impl ChatOptions {
    /// Options used for commit message generation.
    pub fn commit() -> Self {
        Self {
            max_tokens: Some(400),
            n: Some(1),
            temperature: Some(0.4),
            kind: Some(CompletionKind::Commit),
        }
    }
}

/// Construction-time options shared by every provider client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiClientOptions {
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub model: Option<String>,
}

impl Default for AiClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            proxy: None,
            model: None,
        }
    }
}
