//! ask_human tool - route a question to the user

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolResult};

/// Ask the user a question
///
/// The tool itself just carries the question through as its result; the
/// dispatch loop recognizes the tool name and suspends the session until
/// the user responds.
pub struct AskHumanTool;

#[async_trait]
impl Tool for AskHumanTool {
    fn name(&self) -> &'static str {
        "ask_human"
    }

    fn description(&self) -> &'static str {
        "Ask the user a question when the requirement is unclear or a decision needs their input."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "inquire": {
                    "type": "string",
                    "description": "The question to ask the user"
                }
            },
            "required": ["inquire"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!("AskHumanTool::execute: called");
        match input["inquire"].as_str() {
            Some(question) => ToolResult::success(question.to_string()),
            None => ToolResult::error("inquire is required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ask_human_echoes_question() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());
        let tool = AskHumanTool;

        let result = tool
            .execute(serde_json::json!({"inquire": "Which database should we use?"}), &ctx)
            .await;

        assert!(!result.is_error);
        assert_eq!(result.content, "Which database should we use?");
    }

    #[tokio::test]
    async fn test_ask_human_missing_question() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());
        let tool = AskHumanTool;

        let result = tool.execute(serde_json::json!({}), &ctx).await;
        assert!(result.is_error);
    }
}
