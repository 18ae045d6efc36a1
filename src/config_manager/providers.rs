use serde::{Deserialize, Serialize};

/// OpenWeatherMap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,

    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    #[serde(default = "default_units")]
    pub units: String,

    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_weather_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_lang() -> String {
    "tr".to_string()
}

fn default_weather_timeout_secs() -> u64 {
    120
}

/// Serper web search settings, used by the style researcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub api_key: String,

    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    #[serde(default = "default_num_results")]
    pub num_results: u32,

    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_search_base_url() -> String {
    "https://google.serper.dev".to_string()
}

fn default_num_results() -> u32 {
    5
}

fn default_search_timeout_secs() -> u64 {
    60
}

/// Object storage (Firebase / Google Cloud Storage bucket) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,

    /// JSON file holding an OAuth `access_token` for the bucket
    pub credentials_path: String,

    #[serde(default = "default_storage_base_url")]
    pub base_url: String,

    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Prefix object names with a random id so uploads never overwrite
    #[serde(default)]
    pub unique_object_names: bool,
}

fn default_storage_base_url() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_public_base_url() -> String {
    "https://storage.googleapis.com".to_string()
}
