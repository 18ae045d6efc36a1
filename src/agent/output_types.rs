use serde::{Deserialize, Serialize};

/// Text produced by one stage of a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub role: String,
    pub description: String,
    pub raw: String,
}

/// Outputs of a completed pipeline run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewOutput {
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    /// The last task's text; empty when nothing ran
    pub fn final_text(&self) -> &str {
        self.tasks_output
            .last()
            .map(|t| t.raw.as_str())
            .unwrap_or_default()
    }

    /// Prior outputs formatted as context for the next stage
    pub fn context(&self) -> Option<String> {
        if self.tasks_output.is_empty() {
            return None;
        }
        Some(
            self.tasks_output
                .iter()
                .map(|t| t.raw.as_str())
                .collect::<Vec<_>>()
                .join("\n\n----------\n\n"),
        )
    }
}
