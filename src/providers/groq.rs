//! Groq chat completions client.
//!
//! Unlike the other providers this client post-processes the output for
//! commit-message use and logs a classification of every failure before
//! returning it.

use std::error::Error as _;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::AiError;
use crate::llm::router::AiClient;
use crate::llm::timeout::with_timeout;
use crate::llm::types::{
    AiClientOptions, ChatCompletionResponse, ChatMessage, ChatOptions, Choice, CompletionKind,
    Role, Usage,
};
use crate::providers::http::{build_http_client, endpoint, send_json};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Small instruction-tuned model used for commit messages.
pub const COMMIT_MODEL: &str = "moonshotai/kimi-k2-instruct-0905";
/// General-purpose model for everything else.
pub const GENERAL_MODEL: &str = "openai/gpt-oss-20b";

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 400;
const STATUS_PAGE: &str = "https://console.groq.com/status";

static EDGE_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["']|["']\.?$"#).expect("Invalid regex"));
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r]").expect("Invalid regex"));
static TRAILING_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w)\.$").expect("Invalid regex"));

/// Normalize a model reply into commit-subject form.
///
/// Trims, strips one leading and one trailing quote (a period after the
/// closing quote goes with it), turns line breaks into spaces, and drops a
/// trailing period that directly follows a word character.
pub fn sanitize_message(msg: &str) -> String {
    let unquoted = EDGE_QUOTES.replace_all(msg.trim(), "");
    let single_line = LINE_BREAKS.replace_all(&unquoted, " ");
    TRAILING_PERIOD.replace(&single_line, "${1}").into_owned()
}

/// Model for a call: explicit configuration wins, then the completion kind.
fn select_model<'a>(configured: Option<&'a str>, kind: Option<CompletionKind>) -> &'a str {
    match (configured.filter(|m| !m.is_empty()), kind) {
        (Some(model), _) => model,
        (None, Some(CompletionKind::Commit)) => COMMIT_MODEL,
        (None, _) => GENERAL_MODEL,
    }
}

/// SDK-style error name for an HTTP status.
pub fn error_name(status: u16) -> &'static str {
    match status {
        400 => "BadRequestError",
        401 => "AuthenticationError",
        403 => "PermissionDeniedError",
        404 => "NotFoundError",
        422 => "UnprocessableEntityError",
        429 => "RateLimitError",
        s if s >= 500 => "InternalServerError",
        _ => "APIError",
    }
}

/// Whether a transport failure is a host-name resolution failure.
fn is_dns_failure(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string().to_lowercase();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return true;
        }
        source = cause.source();
    }
    false
}

/// Reclassify a failure and log it with user guidance.
fn classify_error(err: AiError) -> AiError {
    match err {
        AiError::Api {
            status,
            ref detail,
            ..
        } => {
            let mut report = format!("Groq API Error: {status} - {}", error_name(status));
            if let Some(detail) = detail {
                report.push_str(&format!("\n→ {detail}"));
            }
            if status == 413 {
                report.push_str(
                    "\nYour diff may be too large.\nTry committing smaller batches or reducing included files.",
                );
            }
            if status == 429 {
                report.push_str("\nRate limit exceeded. Try again shortly.");
            }
            if status >= 500 {
                report.push_str(&format!("\nGroq API might be temporarily down: {STATUS_PAGE}"));
            }
            error!("{report}");
            err
        }
        AiError::Transport { provider, source } if is_dns_failure(&source) => {
            let host = source
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("api.groq.com")
                .to_string();
            error!("Could not reach Groq API ({host}). Check your internet or proxy settings.");
            AiError::Unreachable {
                provider,
                host,
                source,
            }
        }
        other => {
            error!("Unexpected Groq error: {other}");
            other
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    top_p: f32,
    max_completion_tokens: u32,
    n: u32,
    stream: bool,
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
    #[serde(default)]
    message: Option<WireMessage>,
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

fn normalize(resp: CompletionResponse) -> ChatCompletionResponse {
    let choices: Vec<Choice> = resp
        .choices
        .into_iter()
        .map(|c| {
            let (role, content) = match c.message {
                Some(m) => (m.role, m.content.unwrap_or_default()),
                None => (None, String::new()),
            };
            Choice {
                message: ChatMessage {
                    role: role.unwrap_or(Role::Assistant),
                    content: sanitize_message(&content),
                },
                finish_reason: c.finish_reason,
            }
        })
        .filter(|c| !c.message.content.is_empty())
        .collect();

    if choices.is_empty() {
        warn!("Groq returned an empty message. Check your model or try smaller diffs.");
    }

    ChatCompletionResponse {
        id: resp.id,
        choices,
        usage: resp.usage,
    }
}

pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    opts: AiClientOptions,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>, opts: AiClientOptions) -> Result<Self, AiError> {
        Ok(Self {
            http: build_http_client("groq", &opts)?,
            api_key: api_key.into(),
            base_url: GROQ_BASE_URL.to_string(),
            opts,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, AiError> {
        let body = CompletionRequest {
            model: select_model(self.opts.model.as_deref(), options.kind),
            messages,
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            top_p: 1.0,
            max_completion_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_COMPLETION_TOKENS),
            n: options.n.unwrap_or(1),
            stream: false,
        };

        let request = self
            .http
            .post(endpoint(&self.base_url, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body);

        let resp: CompletionResponse =
            with_timeout("groq", self.opts.timeout, send_json("groq", request)).await?;
        Ok(normalize(resp))
    }
}

#[async_trait]
impl AiClient for GroqClient {
    fn provider(&self) -> &'static str {
        "groq"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, AiError> {
        self.request(messages, options).await.map_err(classify_error)
    }
}
