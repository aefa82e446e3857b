//! Provider selection and client construction.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::RuntimeConfig;
use crate::error::AiError;
use crate::llm::types::{AiClientOptions, ChatCompletionResponse, ChatMessage, ChatOptions};
use crate::providers::{AnthropicClient, GroqClient, LocalClient, OpenAiClient};

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Groq,
    Anthropic,
    Local,
}

impl Provider {
    /// Tag used in configuration and on [`AiClient::provider`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
            Provider::Anthropic => "anthropic",
            Provider::Local => "local",
        }
    }

    /// Human-readable product name.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Groq => "Groq",
            Provider::Anthropic => "Anthropic",
            Provider::Local => "Local",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "groq" => Ok(Provider::Groq),
            "anthropic" => Ok(Provider::Anthropic),
            "local" => Ok(Provider::Local),
            other => Err(AiError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// A chat-capable client bound to one provider.
///
/// Implementations hold only immutable configuration, so one client can
/// serve many concurrent `chat` calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Tag identifying the wrapped backend.
    fn provider(&self) -> &'static str;

    /// Send the conversation and return the normalized completion.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, AiError>;
}

/// Resolve the provider-specific secret, failing before any network attempt.
fn require_key(provider: Provider, key: Option<&str>) -> Result<String, AiError> {
    match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(k) => Ok(k.to_string()),
        None => Err(AiError::MissingCredential {
            provider: provider.as_str(),
            provider_label: provider.label(),
        }),
    }
}

/// Build the client for the configured provider.
///
/// Performs no I/O: only validates that the provider's credential or
/// endpoint is present and wires the shared options through.
pub fn create_ai_client(cfg: &RuntimeConfig) -> Result<Box<dyn AiClient>, AiError> {
    let provider: Provider = cfg.provider.parse()?;
    let opts = AiClientOptions {
        timeout: Duration::from_millis(cfg.timeout_ms),
        proxy: cfg.proxy.clone(),
        model: cfg.model.clone(),
    };

    let client: Box<dyn AiClient> = match provider {
        Provider::OpenAi => {
            let key = require_key(provider, cfg.openai_api_key.as_deref())?;
            Box::new(OpenAiClient::new(key, opts)?)
        }
        Provider::Groq => {
            let key = require_key(provider, cfg.groq_api_key.as_deref())?;
            Box::new(GroqClient::new(key, opts)?)
        }
        Provider::Anthropic => {
            let key = require_key(provider, cfg.anthropic_api_key.as_deref())?;
            Box::new(AnthropicClient::new(key, opts, cfg.anthropic_strategy)?)
        }
        Provider::Local => {
            let url = cfg
                .local_model_url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .ok_or(AiError::MissingLocalUrl)?;
            Box::new(LocalClient::new(url, opts)?)
        }
    };

    Ok(client)
}
