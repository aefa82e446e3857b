//! Concrete [`AiClient`](crate::llm::AiClient) implementations, one per provider.

pub mod anthropic;
pub mod groq;
pub(crate) mod http;
pub mod local;
pub mod openai;

pub use anthropic::{AnthropicClient, AnthropicStrategy};
pub use groq::GroqClient;
pub use local::LocalClient;
pub use openai::OpenAiClient;
