use async_trait::async_trait;

use crate::agent::input_types::ChatMessage;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Per-call generation options
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionOptions {
    pub max_tokens: Option<u32>,
}

/// Interface for a stateless language model
/// Stateless means the LLM doesn't store memory, system prompts, or user messages
#[async_trait]
pub trait StatelessLLMInterface: Send + Sync {
    /// Run one chat completion and return the first choice's text
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        system: Option<&str>,
        options: CompletionOptions,
    ) -> Result<String, LlmError>;
}
