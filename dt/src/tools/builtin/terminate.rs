//! terminate tool - end the session

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolResult};

/// End the interaction
///
/// The dispatch loop recognizes the tool name and transitions to
/// `Terminated` after executing it.
pub struct TerminateTool;

#[async_trait]
impl Tool for TerminateTool {
    fn name(&self) -> &'static str {
        "terminate"
    }

    fn description(&self) -> &'static str {
        "End the interaction when the task is complete or cannot proceed. Report the final status."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "description": "Finish status of the interaction",
                    "enum": ["success", "failure"]
                }
            },
            "required": ["status"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!("TerminateTool::execute: called");
        match input["status"].as_str() {
            Some(status) => ToolResult::success(format!("The interaction has been completed with status: {}", status)),
            None => ToolResult::error("status is required"),
        }
    }
}
