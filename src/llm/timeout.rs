//! Call-with-timeout for provider requests.

use std::future::Future;
use std::time::Duration;

use crate::error::AiError;

/// Run a provider request, cancelling it once `timeout` elapses.
///
/// The in-flight future is dropped on expiry, which aborts the underlying
/// HTTP request, and the call fails with [`AiError::Timeout`].
pub async fn with_timeout<T, F>(
    provider: &'static str,
    timeout: Duration,
    request: F,
) -> Result<T, AiError>
where
    F: Future<Output = Result<T, AiError>>,
{
    tokio::time::timeout(timeout, request)
        .await
        .map_err(|_| AiError::Timeout {
            provider,
            timeout_ms: timeout.as_millis() as u64,
        })?
}
