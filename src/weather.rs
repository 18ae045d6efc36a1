use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config_manager::WeatherConfig;

/// Current conditions for one city, in the provider's metric units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_celsius: f64,
    pub description: String,
    pub humidity_percent: f64,
    pub wind_speed_mps: f64,
}

/// Result of a weather lookup. Never an `Err`: callers degrade to prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeatherSummary {
    Report(WeatherReport),
    Unavailable { error: String },
}

impl WeatherSummary {
    /// Render as the sentence embedded into agent and vision prompts
    pub fn to_prompt_text(&self) -> String {
        match self {
            WeatherSummary::Report(r) => format!(
                "{} için hava durumu: {}°C, {}, Nem: {}%, Rüzgar Hızı: {} m/s.",
                r.city, r.temperature_celsius, r.description, r.humidity_percent, r.wind_speed_mps
            ),
            WeatherSummary::Unavailable { error } => {
                format!("Hava durumu alınamadı: {}", error)
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, WeatherSummary::Report(_))
    }
}

#[derive(Debug, thiserror::Error)]
enum WeatherError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("unexpected response: {0}")]
    Payload(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_weather(&self, city: &str) -> WeatherSummary;
}

// Only the fields we read from the current-weather payload
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    main: MainBlock,
    weather: Vec<ConditionBlock>,
    wind: WindBlock,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f64,
}

/// OpenWeatherMap current-weather client
pub struct OpenWeatherMapClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
    lang: String,
}

impl OpenWeatherMapClient {
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
            lang: config.lang.clone(),
        })
    }

    async fn request(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status { status, body });
        }

        let payload: CurrentWeatherResponse = response.json().await?;
        let condition = payload
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Payload("no weather conditions".to_string()))?;

        Ok(WeatherReport {
            city: payload.name,
            temperature_celsius: payload.main.temp,
            description: condition.description,
            humidity_percent: payload.main.humidity,
            wind_speed_mps: payload.wind.speed,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    async fn fetch_weather(&self, city: &str) -> WeatherSummary {
        match self.request(city).await {
            Ok(report) => {
                debug!("Weather for {}: {:?}", city, report);
                WeatherSummary::Report(report)
            }
            Err(e) => {
                warn!("Weather lookup for {} failed: {}", city, e);
                WeatherSummary::Unavailable {
                    error: format!("Hava durumu API hatası: {}", e),
                }
            }
        }
    }
}
