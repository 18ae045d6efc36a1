use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body for `/upload_image`
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Log file written next to stderr; `null` keeps logging on stderr only
    #[serde(default = "default_log_file")]
    pub log_file: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_file() -> Option<String> {
    Some("app.log".to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            log_file: default_log_file(),
        }
    }
}

/// Values applied when a request leaves an optional field out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_location")]
    pub location: String,
}

pub fn default_location() -> String {
    "İstanbul".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
        }
    }
}
