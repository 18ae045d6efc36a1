use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::Result;

use crate::config_manager::utils::{is_unresolved_placeholder, read_config_text};
use crate::config_manager::{
    DefaultsConfig, OpenAICompatibleConfig, SearchConfig, ServerConfig, StorageConfig,
    WeatherConfig,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    pub llm: OpenAICompatibleConfig,
    pub weather: WeatherConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Load and validate a YAML or JSON configuration file
    pub fn load(path: &str) -> Result<Self> {
        let content = read_config_text(path)?;

        let path_lower = path.to_lowercase();
        let config: Config = if path_lower.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Refuse to start with missing credentials
    pub fn validate(&self) -> Result<()> {
        let keys = [
            ("llm.llm_api_key", &self.llm.llm_api_key),
            ("weather.api_key", &self.weather.api_key),
            ("search.api_key", &self.search.api_key),
            ("storage.bucket", &self.storage.bucket),
        ];

        let missing: Vec<&str> = keys
            .iter()
            .filter(|(_, value)| value.trim().is_empty() || is_unresolved_placeholder(value))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            anyhow::bail!("API anahtarları eksik! Missing configuration: {}", missing.join(", "));
        }

        if !Path::new(&self.storage.credentials_path).is_file() {
            anyhow::bail!(
                "Storage credential file not found: {}",
                self.storage.credentials_path
            );
        }

        if self.defaults.location.trim().is_empty() {
            anyhow::bail!("defaults.location must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_temp(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn yaml_with(credentials_path: &str, llm_key: &str) -> String {
        format!(
            r#"
llm:
  llm_api_key: "{llm_key}"
weather:
  api_key: weather-key
search:
  api_key: serper-key
storage:
  bucket: clothing-gourmet.firebasestorage.app
  credentials_path: "{credentials_path}"
"#
        )
    }

    #[test]
    fn loads_yaml_with_defaults() {
        let creds = write_temp("creds.json", r#"{"access_token":"t"}"#);
        let path = write_temp("conf.yaml", &yaml_with(&creds, "sk-test"));

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.defaults.location, "İstanbul");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.vision_model(), "gpt-4o-mini");
        assert_eq!(config.llm.vision_max_tokens, 1000);
        assert_eq!(config.weather.timeout_secs, 120);
        assert_eq!(config.weather.units, "metric");
        assert_eq!(config.weather.lang, "tr");
        assert!(!config.storage.unique_object_names);
        assert_eq!(config.search.timeout_secs, 60);
        assert_eq!(config.server.log_file.as_deref(), Some("app.log"));

        fs::remove_file(path).unwrap();
        fs::remove_file(creds).unwrap();
    }

    #[test]
    fn loads_json() {
        let creds = write_temp("creds.json", r#"{"access_token":"t"}"#);
        let body = serde_json::json!({
            "server": { "port": 8080 },
            "llm": { "llm_api_key": "sk-test", "model": "gpt-4o" },
            "weather": { "api_key": "w" },
            "search": { "api_key": "s", "timeout_secs": 15 },
            "storage": { "bucket": "b", "credentials_path": creds },
        });
        let path = write_temp("conf.json", &body.to_string());

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.search.timeout_secs, 15);

        fs::remove_file(path).unwrap();
        fs::remove_file(creds).unwrap();
    }

    #[test]
    fn unresolved_placeholder_fails_fast() {
        let creds = write_temp("creds.json", r#"{"access_token":"t"}"#);
        let path = write_temp(
            "conf.yaml",
            &yaml_with(&creds, "${CLOTHING_GOURMET_TEST_UNSET_KEY}"),
        );

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("llm.llm_api_key"));

        fs::remove_file(path).unwrap();
        fs::remove_file(creds).unwrap();
    }

    #[test]
    fn missing_credential_file_fails_fast() {
        let path = write_temp("conf.yaml", &yaml_with("/nonexistent/creds.json", "sk-test"));

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("credential file"));

        fs::remove_file(path).unwrap();
    }
}
