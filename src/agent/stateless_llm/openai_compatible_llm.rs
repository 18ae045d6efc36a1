use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::stateless_llm_interface::{CompletionOptions, LlmError, StatelessLLMInterface};
use crate::agent::input_types::ChatMessage;
use crate::config_manager::OpenAICompatibleConfig;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// OpenAI compatible LLM implementation
pub struct OpenAICompatibleLLM {
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
    http_client: reqwest::Client,
}

impl OpenAICompatibleLLM {
    pub fn new(
        model: String,
        base_url: String,
        api_key: String,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        info!(
            "Initialized OpenAICompatibleLLM: model={}, base_url={}",
            model, base_url
        );
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            temperature,
            http_client,
        })
    }

    /// Build a client for `model` from the shared provider settings
    pub fn from_config(config: &OpenAICompatibleConfig, model: &str) -> Result<Self, LlmError> {
        Self::new(
            model.to_string(),
            config.base_url.clone(),
            config.llm_api_key.clone(),
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| LlmError::InvalidResponse("invalid API key format".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}

#[async_trait]
impl StatelessLLMInterface for OpenAICompatibleLLM {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        system: Option<&str>,
        options: CompletionOptions,
    ) -> Result<String, LlmError> {
        let mut request_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(sys) = system {
            request_messages.push(ChatMessage::system(sys));
        }
        request_messages.extend(messages);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: request_messages,
            temperature: self.temperature,
            max_tokens: options.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!("POST {} model={}", url, self.model);

        let response = self
            .http_client
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("response has no message content".to_string()))
    }
}
