use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::agent_interface::{AgentPipeline, AgentTask, PipelineError, Role, Stage};
use crate::agent::input_types::ChatMessage;
use crate::agent::output_types::{CrewOutput, TaskOutput};
use crate::agent::stateless_llm::{CompletionOptions, StatelessLLMInterface};

/// Executes stages strictly in order against one shared LLM.
///
/// Each stage is a single chat completion: the role becomes the system
/// prompt, the task plus tool results plus every earlier output become the
/// user prompt.
pub struct SequentialCrew {
    llm: Arc<dyn StatelessLLMInterface>,
}

impl SequentialCrew {
    pub fn new(llm: Arc<dyn StatelessLLMInterface>) -> Self {
        Self { llm }
    }

    /// Run every stage and keep all intermediate outputs
    pub async fn kickoff(&self, stages: Vec<Stage>) -> Result<CrewOutput, PipelineError> {
        if stages.is_empty() {
            return Err(PipelineError::EmptyPipeline);
        }

        let mut output = CrewOutput::default();
        for (index, stage) in stages.into_iter().enumerate() {
            info!("Stage {} started: {}", index + 1, stage.role.name);

            let tool_results = Self::run_tools(&stage.role, &stage.task).await;
            let system = role_prompt(&stage.role);
            let user = task_prompt(&stage.task, tool_results.as_deref(), output.context().as_deref());
            debug!("Stage {} prompt: '''{}'''", index + 1, user);

            let raw = self
                .llm
                .chat_completion(vec![ChatMessage::user(user)], Some(&system), CompletionOptions::default())
                .await
                .map_err(|source| PipelineError::Llm {
                    role: stage.role.name.clone(),
                    source,
                })?;

            info!("Stage {} finished: {}", index + 1, stage.role.name);
            output.tasks_output.push(TaskOutput {
                role: stage.role.name,
                description: stage.task.description,
                raw,
            });
        }

        Ok(output)
    }

    /// Tool failures only cost the stage its extra context
    async fn run_tools(role: &Role, task: &AgentTask) -> Option<String> {
        let mut sections = Vec::new();
        for tool in &role.tools {
            match tool.run(&task.description).await {
                Ok(result) if !result.trim().is_empty() => {
                    sections.push(format!("Tool: {}\nResult:\n{}", tool.name(), result));
                }
                Ok(_) => debug!("{} returned nothing for {}", tool.name(), role.name),
                Err(e) => warn!("{} failed for {}: {}", tool.name(), role.name, e),
            }
        }

        (!sections.is_empty()).then(|| sections.join("\n\n"))
    }
}

#[async_trait]
impl AgentPipeline for SequentialCrew {
    async fn run_pipeline(&self, stages: Vec<Stage>) -> Result<String, PipelineError> {
        let output = self.kickoff(stages).await?;
        Ok(output.final_text().to_string())
    }
}

fn role_prompt(role: &Role) -> String {
    format!(
        "You are {}. {}\nYour personal goal is: {}",
        role.name, role.backstory, role.goal
    )
}

fn task_prompt(task: &AgentTask, tool_results: Option<&str>, context: Option<&str>) -> String {
    let mut prompt = format!(
        "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
         you MUST return the actual complete content as the final answer, not a summary.",
        task.description, task.expected_output
    );

    if let Some(results) = tool_results {
        prompt.push_str("\n\nResearch results you gathered with your tools:\n");
        prompt.push_str(results);
    }

    if let Some(context) = context {
        prompt.push_str("\n\nThis is the context you're working with:\n");
        prompt.push_str(context);
    }

    prompt
}
