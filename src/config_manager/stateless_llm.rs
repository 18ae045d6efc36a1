use serde::{Deserialize, Serialize};

/// Configuration for the OpenAI-compatible chat provider shared by the
/// agents and the image analyst
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAICompatibleConfig {
    #[serde(rename = "llm_api_key")]
    pub llm_api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for image analysis; falls back to `model`
    #[serde(default)]
    pub vision_model: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_vision_max_tokens")]
    pub vision_max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_vision_max_tokens() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    300
}

impl OpenAICompatibleConfig {
    pub fn vision_model(&self) -> &str {
        self.vision_model.as_deref().unwrap_or(&self.model)
    }
}
