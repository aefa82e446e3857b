//! Uniform chat contract over the supported LLM providers.

pub mod router;
pub mod timeout;
pub mod types;

pub use router::{AiClient, Provider, create_ai_client};
pub use timeout::with_timeout;
pub use types::{
    AiClientOptions, ChatCompletionResponse, ChatMessage, ChatOptions, Choice, CompletionKind,
    Role, Usage,
};
