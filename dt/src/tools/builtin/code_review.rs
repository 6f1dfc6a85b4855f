//! code_review tool - heuristic review of a workspace file

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::analysis::{ReviewFocus, analyze_code};
use crate::tools::{Tool, ToolContext, ToolResult};

/// Run the heuristic code analyzer over a workspace file
pub struct CodeReviewTool;

#[async_trait]
impl Tool for CodeReviewTool {
    fn name(&self) -> &'static str {
        "code_review"
    }

    fn description(&self) -> &'static str {
        "Review a code file for readability, performance, security, and architecture concerns, and raise questions for the user."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "File to review, relative to the workspace"
                },
                "review_focus": {
                    "type": "string",
                    "description": "Focus area for the review (default: all)",
                    "enum": ["performance", "security", "readability", "architecture", "all"]
                },
                "ask_questions": {
                    "type": "boolean",
                    "description": "Include questions for the user in the report (default: true)"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "CodeReviewTool::execute: called");
        let Some(file_path) = input["file_path"].as_str() else {
            return ToolResult::error("file_path is required");
        };

        let focus = match input["review_focus"].as_str() {
            None => ReviewFocus::All,
            Some(s) => match ReviewFocus::parse(s) {
                Some(f) => f,
                None => return ToolResult::error(format!("Unknown review focus: {}", s)),
            },
        };
        let ask_questions = input["ask_questions"].as_bool().unwrap_or(true);

        let full_path = match ctx.validate_path(Path::new(file_path)) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let content = match tokio::fs::read_to_string(&full_path).await {
            Ok(c) => c,
            Err(e) => return ToolResult::error(format!("Failed to read {}: {}", file_path, e)),
        };

        let report = analyze_code(&content, file_path, focus);
        ToolResult::success(report.render(ask_questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_code_review_renders_report() {
        let temp = tempdir().unwrap();
        let code = "def f():\n    password = \"hunter2\"\n    return password\n";
        fs::write(temp.path().join("app.py"), code).unwrap();

        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());
        let tool = CodeReviewTool;

        let result = tool
            .execute(serde_json::json!({"file_path": "app.py"}), &ctx)
            .await;

        assert!(!result.is_error);
        assert!(result.content.contains("app.py"));
    }

    #[tokio::test]
    async fn test_code_review_unknown_focus() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("app.py"), "x = 1\n").unwrap();

        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());
        let tool = CodeReviewTool;

        let result = tool
            .execute(
                serde_json::json!({"file_path": "app.py", "review_focus": "vibes"}),
                &ctx,
            )
            .await;

        assert!(result.is_error);
    }

    #[tokio::test]
    async fn test_code_review_missing_file() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());
        let tool = CodeReviewTool;

        let result = tool
            .execute(serde_json::json!({"file_path": "nope.py"}), &ctx)
            .await;

        assert!(result.is_error);
        assert!(result.content.contains("Failed to read"));
    }
}
