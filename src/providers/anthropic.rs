//! Anthropic legacy text-completion client.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::llm::router::AiClient;
use crate::llm::timeout::with_timeout;
use crate::llm::types::{AiClientOptions, ChatCompletionResponse, ChatMessage, ChatOptions, Choice};
use crate::providers::http::{build_http_client, endpoint, send_json};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-2.1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const DEFAULT_MAX_TOKENS_TO_SAMPLE: u32 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.2;

/// How requests are authenticated against the completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnthropicStrategy {
    /// Official SDK header set: `x-api-key` plus `anthropic-version`.
    Native,
    /// Plain HTTP with a bearer token.
    RawHttp,
}

impl Default for AnthropicStrategy {
    fn default() -> Self {
        if cfg!(feature = "anthropic-native") {
            AnthropicStrategy::Native
        } else {
            AnthropicStrategy::RawHttp
        }
    }
}

impl AnthropicStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnthropicStrategy::Native => "native",
            AnthropicStrategy::RawHttp => "raw-http",
        }
    }
}

impl fmt::Display for AnthropicStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnthropicStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(AnthropicStrategy::Native),
            "raw-http" | "raw" | "http" => Ok(AnthropicStrategy::RawHttp),
            other => Err(format!("unknown anthropic strategy '{other}'")),
        }
    }
}

/// Flatten a conversation into `[ROLE] content` blocks separated by blank lines.
pub fn flatten_prompt(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("[{}] {}", m.role.as_str().to_uppercase(), m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Debug, Serialize)]
struct CompleteRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens_to_sample: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompleteResponse {
    #[serde(default)]
    completion: Option<String>,
}

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    strategy: AnthropicStrategy,
    opts: AiClientOptions,
}

impl AnthropicClient {
    pub fn new(
        api_key: impl Into<String>,
        opts: AiClientOptions,
        strategy: AnthropicStrategy,
    ) -> Result<Self, AiError> {
        Ok(Self {
            http: build_http_client("anthropic", &opts)?,
            api_key: api_key.into(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            strategy,
            opts,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn strategy(&self) -> AnthropicStrategy {
        self.strategy
    }
}

#[async_trait]
impl AiClient for AnthropicClient {
    fn provider(&self) -> &'static str {
        "anthropic"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, AiError> {
        let prompt = flatten_prompt(messages);
        let body = CompleteRequest {
            model: self.opts.model.as_deref().unwrap_or(DEFAULT_MODEL),
            prompt: &prompt,
            max_tokens_to_sample: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS_TO_SAMPLE),
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        };

        let request = self.http.post(endpoint(&self.base_url, "v1/complete"));
        let request = match self.strategy {
            AnthropicStrategy::Native => request
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            AnthropicStrategy::RawHttp => request.bearer_auth(&self.api_key),
        }
        .json(&body);

        let resp: CompleteResponse =
            with_timeout("anthropic", self.opts.timeout, send_json("anthropic", request)).await?;

        // The completion API reports no finish reason.
        Ok(ChatCompletionResponse {
            id: None,
            choices: vec![Choice::assistant(resp.completion.unwrap_or_default(), None)],
            usage: None,
        })
    }
}
