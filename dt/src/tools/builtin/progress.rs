//! progress_tracker tool - milestone/task bookkeeping

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use progressstore::{ProgressCommand, ProgressEngine, ProgressStore};

use crate::tools::{Tool, ToolContext, ToolResult};

/// Track project milestones and tasks through the progress engine
///
/// The input deserializes straight into a `ProgressCommand`; an unknown
/// or malformed action fails at parse time and comes back as an error
/// result, never a fault.
pub struct ProgressTrackerTool {
    file: PathBuf,
    project_name: String,
}

impl ProgressTrackerTool {
    /// Create the tool over a progress document path
    pub fn new(file: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            project_name: project_name.into(),
        }
    }
}

#[async_trait]
impl Tool for ProgressTrackerTool {
    fn name(&self) -> &'static str {
        "progress_tracker"
    }

    fn description(&self) -> &'static str {
        "Track project progress: create milestones, add tasks, complete tasks, and show progress summaries."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "description": "The progress operation to perform",
                    "enum": ["create_milestone", "add_task", "complete_task", "list_milestones", "show_summary"]
                },
                "milestone_name": {
                    "type": "string",
                    "description": "Milestone name (create_milestone, add_task)"
                },
                "task_name": {
                    "type": "string",
                    "description": "Task name (add_task, complete_task)"
                },
                "description": {
                    "type": "string",
                    "description": "Description for the milestone or task"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!(?input, "ProgressTrackerTool::execute: called");
        let command: ProgressCommand = match serde_json::from_value(input) {
            Ok(c) => c,
            Err(e) => return ToolResult::error(format!("Invalid progress command: {}", e)),
        };

        let engine = ProgressEngine::new(ProgressStore::new(&self.file, &self.project_name));
        match engine.dispatch(command) {
            Ok(text) => ToolResult::success(text),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}
