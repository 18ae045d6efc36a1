use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::tool_interface::{Tool, ToolError};
use crate::config_manager::SearchConfig;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Google search through the Serper API
pub struct SerperSearchTool {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    num_results: u32,
}

impl SerperSearchTool {
    pub fn new(config: &SearchConfig) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            num_results: config.num_results,
        })
    }
}

#[async_trait]
impl Tool for SerperSearchTool {
    fn name(&self) -> &str {
        "Search the internet"
    }

    async fn run(&self, query: &str) -> Result<String, ToolError> {
        let url = format!("{}/search", self.base_url);
        debug!("Serper search: {}", query);

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&SearchRequest {
                q: query,
                num: self.num_results,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Status {
                tool: self.name().to_string(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let results: SearchResponse = response.json().await?;
        let formatted = results
            .organic
            .iter()
            .map(|r| format!("Title: {}\nLink: {}\nSnippet: {}\n---", r.title, r.link, r.snippet))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(formatted)
    }
}
