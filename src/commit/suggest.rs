//! Commit suggestion generation, including concurrent fan-out.

use futures::future::try_join_all;
use tracing::debug;

use crate::error::AiError;
use crate::llm::router::AiClient;
use crate::llm::types::{ChatMessage, ChatOptions};

/// Drop blanks and repeats, keeping first-seen order.
pub fn dedup_suggestions<I>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut unique: Vec<String> = Vec::new();
    for candidate in candidates {
        let trimmed = candidate.trim();
        if !trimmed.is_empty() && !unique.iter().any(|u| u == trimmed) {
            unique.push(trimmed.to_string());
        }
    }
    unique
}

/// Ask for `count` commit message suggestions.
///
/// A single suggestion is one call whose non-empty choices are all kept.
/// More than one issues `count` independent calls concurrently, takes the
/// first choice of each and de-duplicates. Any failed call fails the whole
/// batch.
pub async fn generate_suggestions(
    client: &dyn AiClient,
    messages: &[ChatMessage],
    count: u32,
) -> Result<Vec<String>, AiError> {
    let options = ChatOptions::commit();

    if count <= 1 {
        let resp = client.chat(messages, &options).await?;
        return Ok(dedup_suggestions(resp.contents()));
    }

    debug!(count, provider = client.provider(), "requesting suggestions concurrently");
    let responses = try_join_all((0..count).map(|_| client.chat(messages, &options))).await?;

    Ok(dedup_suggestions(responses.into_iter().filter_map(|resp| {
        resp.choices.into_iter().next().map(|c| c.message.content)
    })))
}

/// One call asking the provider itself for `n` choices.
///
/// Used by the commit hook, where latency matters more than diversity.
pub async fn request_choices(
    client: &dyn AiClient,
    messages: &[ChatMessage],
    n: u32,
) -> Result<Vec<String>, AiError> {
    let options = ChatOptions {
        n: Some(n.max(1)),
        ..ChatOptions::commit()
    };
    let resp = client.chat(messages, &options).await?;
    Ok(resp.contents())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::llm::router::MockAiClient;
    use crate::llm::types::{ChatCompletionResponse, Choice, CompletionKind};

    fn reply(contents: &[&str]) -> ChatCompletionResponse {
        ChatCompletionResponse {
            choices: contents.iter().map(|c| Choice::assistant(*c, None)).collect(),
            ..Default::default()
        }
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::user("diff")]
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let out = dedup_suggestions(
            ["fix: b", " feat: a ", "", "fix: b", "feat: a"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(out, vec!["fix: b".to_string(), "feat: a".to_string()]);
    }

    #[tokio::test]
    async fn test_single_suggestion_keeps_all_choices() {
        let mut mock = MockAiClient::new();
        mock.expect_chat()
            .withf(|_, opts| {
                opts.n == Some(1)
                    && opts.max_tokens == Some(400)
                    && opts.kind == Some(CompletionKind::Commit)
            })
            .times(1)
            .returning(|_, _| Ok(reply(&["feat: add x", "  ", "fix: y"])));

        let out = generate_suggestions(&mock, &messages(), 1).await.unwrap();
        assert_eq!(out, vec!["feat: add x".to_string(), "fix: y".to_string()]);
    }

    #[tokio::test]
    async fn test_fan_out_deduplicates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut mock = MockAiClient::new();
        mock.expect_provider().return_const("groq");
        mock.expect_chat().times(3).returning(move |_, _| {
            let reply_text = match counter.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => "feat: add cache",
                _ => "fix: evict stale entries",
            };
            Ok(reply(&[reply_text, "ignored second choice"]))
        });

        let out = generate_suggestions(&mock, &messages(), 3).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(out.len(), 2);
        assert!(out.contains(&"feat: add cache".to_string()));
        assert!(out.contains(&"fix: evict stale entries".to_string()));
        assert!(!out.contains(&"ignored second choice".to_string()));
    }

    #[tokio::test]
    async fn test_fan_out_drops_empty_and_missing_choices() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut mock = MockAiClient::new();
        mock.expect_provider().return_const("local");
        mock.expect_chat().times(3).returning(move |_, _| {
            Ok(match counter.fetch_add(1, Ordering::SeqCst) {
                0 => reply(&[]),
                1 => reply(&["   "]),
                _ => reply(&["chore: tidy"]),
            })
        });

        let out = generate_suggestions(&mock, &messages(), 3).await.unwrap();
        assert_eq!(out, vec!["chore: tidy".to_string()]);
    }

    #[tokio::test]
    async fn test_fan_out_fails_if_any_call_fails() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut mock = MockAiClient::new();
        mock.expect_provider().return_const("openai");
        mock.expect_chat().returning(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                Err(AiError::Api {
                    provider: "openai",
                    status: 500,
                    message: "Internal Server Error".to_string(),
                    detail: None,
                })
            } else {
                Ok(reply(&["feat: ok"]))
            }
        });

        let err = generate_suggestions(&mock, &messages(), 3).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_request_choices_asks_for_n() {
        let mut mock = MockAiClient::new();
        mock.expect_chat()
            .withf(|_, opts| opts.n == Some(2))
            .times(1)
            .returning(|_, _| Ok(reply(&["feat: a", "feat: b"])));

        let out = request_choices(&mock, &messages(), 2).await.unwrap();
        assert_eq!(out.len(), 2);
    }
}
