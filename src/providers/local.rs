//! Client for a self-hosted model behind `POST <base>/chat`.
//!
//! The endpoint is expected to already answer in the shared
//! [`ChatCompletionResponse`] shape, so the body is returned as decoded with
//! no normalization.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AiError;
use crate::llm::router::AiClient;
use crate::llm::timeout::with_timeout;
use crate::llm::types::{AiClientOptions, ChatCompletionResponse, ChatMessage, ChatOptions};
use crate::providers::http::{build_http_client, send_json};

const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    n: u32,
}

pub struct LocalClient {
    http: reqwest::Client,
    base_url: String,
    opts: AiClientOptions,
}

impl LocalClient {
    pub fn new(base_url: &str, opts: AiClientOptions) -> Result<Self, AiError> {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url).to_string();
        Ok(Self {
            http: build_http_client("local", &opts)?,
            base_url,
            opts,
        })
    }

    /// Chat endpoint derived from the configured base.
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}

#[async_trait]
impl AiClient for LocalClient {
    fn provider(&self) -> &'static str {
        "local"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, AiError> {
        let body = ChatRequest {
            messages,
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            n: options.n.unwrap_or(1),
        };

        let request = self.http.post(self.chat_url()).json(&body);
        with_timeout("local", self.opts.timeout, send_json("local", request)).await
    }
}
