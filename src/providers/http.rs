//! Shared reqwest plumbing for the provider clients.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AiError;
use crate::llm::types::AiClientOptions;

/// Build the HTTP client for one provider, routing through the proxy if set.
///
/// The request deadline is not set here; callers wrap each request in
/// [`crate::llm::with_timeout`] so expiry surfaces as [`AiError::Timeout`].
pub(crate) fn build_http_client(
    provider: &'static str,
    opts: &AiClientOptions,
) -> Result<Client, AiError> {
    let mut builder = Client::builder();

    // The resolved config already folds in the proxy environment variables,
    // so reqwest's own system proxy lookup stays off.
    match opts.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(proxy) => {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| AiError::Configuration {
                provider,
                reason: format!("invalid proxy '{proxy}': {e}"),
            })?;
            builder = builder.proxy(proxy);
        }
        None => builder = builder.no_proxy(),
    }

    builder.build().map_err(|e| AiError::Configuration {
        provider,
        reason: e.to_string(),
    })
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Send a prepared request and decode a JSON body.
///
/// Non-2xx responses become [`AiError::Api`] with the status code and its
/// canonical reason; the provider's own error message, when the body carries
/// one, is kept as `detail`.
pub(crate) async fn send_json<R: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<R, AiError> {
    let response = request
        .send()
        .await
        .map_err(|source| AiError::Transport { provider, source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| AiError::Transport { provider, source })?;

    if !status.is_success() {
        debug!(provider, status = status.as_u16(), "provider returned error status");
        return Err(api_error(provider, status, &body));
    }

    serde_json::from_str(&body).map_err(|e| AiError::InvalidResponse {
        provider,
        reason: e.to_string(),
    })
}

fn api_error(provider: &'static str, status: StatusCode, body: &str) -> AiError {
    AiError::Api {
        provider,
        status: status.as_u16(),
        message: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
        detail: error_detail(body),
    }
}

/// Pull `error.message` (or a string `error`) out of a provider error body.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_single_slash() {
        assert_eq!(
            endpoint("https://api.example.com/v1/", "/chat/completions"),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(endpoint("http://localhost:8080", "chat"), "http://localhost:8080/chat");
    }

    #[test]
    fn test_error_detail_reads_nested_message() {
        let body = r#"{"error": {"message": "Request too large", "type": "invalid_request_error"}}"#;
        assert_eq!(error_detail(body).as_deref(), Some("Request too large"));
    }

    #[test]
    fn test_error_detail_reads_string_error() {
        assert_eq!(error_detail(r#"{"error": "nope"}"#).as_deref(), Some("nope"));
    }

    #[test]
    fn test_error_detail_ignores_non_json() {
        assert_eq!(error_detail("<html>502</html>"), None);
        assert_eq!(error_detail(r#"{"status": "bad"}"#), None);
    }

    #[test]
    fn test_api_error_uses_canonical_reason() {
        let err = api_error("local", StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503 Service Unavailable"));
    }

    #[test]
    fn test_proxy_is_accepted() {
        let opts = AiClientOptions {
            proxy: Some("http://127.0.0.1:3128".to_string()),
            ..AiClientOptions::default()
        };
        assert!(build_http_client("openai", &opts).is_ok());
    }

    #[test]
    fn test_malformed_proxy_is_configuration_error() {
        let opts = AiClientOptions {
            proxy: Some("http://[invalid".to_string()),
            ..AiClientOptions::default()
        };
        let err = build_http_client("openai", &opts).unwrap_err();
        assert!(err.is_configuration());
    }
}
