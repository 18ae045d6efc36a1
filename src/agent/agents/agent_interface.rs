use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::agent::stateless_llm::LlmError;
use crate::agent::tools::Tool;

/// A persona bound to a language model: who the agent is and what it wants
#[derive(Clone)]
pub struct Role {
    pub name: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<Arc<dyn Tool>>,
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Role")
            .field("name", &self.name)
            .field("goal", &self.goal)
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// A unit of work handed to one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTask {
    pub description: String,
    pub expected_output: String,
}

/// A task bound to the role that executes it
#[derive(Debug, Clone)]
pub struct Stage {
    pub role: Role,
    pub task: AgentTask,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("pipeline has no stages")]
    EmptyPipeline,

    #[error("{role} failed: {source}")]
    Llm {
        role: String,
        #[source]
        source: LlmError,
    },
}

/// Runs an ordered list of stages, each one seeing the output of the
/// stages before it, and returns the last stage's text
#[async_trait]
pub trait AgentPipeline: Send + Sync {
    async fn run_pipeline(&self, stages: Vec<Stage>) -> Result<String, PipelineError>;
}
