use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{tool} returned status {status}: {body}")]
    Status {
        tool: String,
        status: u16,
        body: String,
    },
}

/// A capability an agent role can call before answering its task
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Run the tool on `query` and return text for the agent's prompt
    async fn run(&self, query: &str) -> Result<String, ToolError>;
}
