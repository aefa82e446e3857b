//! OpenAI chat completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::llm::router::AiClient;
use crate::llm::timeout::with_timeout;
use crate::llm::types::{
    AiClientOptions, ChatCompletionResponse, ChatMessage, ChatOptions, Choice, Role, Usage,
};
use crate::providers::http::{build_http_client, endpoint, send_json};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Token ceiling when the caller gives no hint: 12x a 150 token baseline,
/// never below 200.
const DEFAULT_MAX_TOKENS: u32 = {
    let scaled = 12 * 150;
    if scaled > 200 { scaled } else { 200 }
};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    content: Option<String>,
}

impl From<CompletionResponse> for ChatCompletionResponse {
    fn from(resp: CompletionResponse) -> Self {
        let choices = resp
            .choices
            .into_iter()
            .map(|c| Choice {
                message: ChatMessage {
                    role: c.message.role.unwrap_or(Role::Assistant),
                    content: c.message.content.unwrap_or_default(),
                },
                finish_reason: c.finish_reason,
            })
            .collect();

        ChatCompletionResponse {
            id: resp.id,
            choices,
            usage: resp.usage,
        }
    }
}

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    opts: AiClientOptions,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, opts: AiClientOptions) -> Result<Self, AiError> {
        Ok(Self {
            http: build_http_client("openai", &opts)?,
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            opts,
        })
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl AiClient for OpenAiClient {
    fn provider(&self) -> &'static str {
        "openai"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, AiError> {
        let body = CompletionRequest {
            model: self.opts.model.as_deref().unwrap_or(DEFAULT_MODEL),
            messages,
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            n: options.n.unwrap_or(1),
        };

        let request = self
            .http
            .post(endpoint(&self.base_url, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body);

        let resp: CompletionResponse =
            with_timeout("openai", self.opts.timeout, send_json("openai", request)).await?;
        Ok(resp.into())
    }
}
