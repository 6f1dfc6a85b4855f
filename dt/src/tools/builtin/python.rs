//! python_execute tool - run a Python code string

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolResult};

use super::run_command::truncate_output;

/// Run a Python code string via the system interpreter
pub struct PythonExecuteTool;

#[async_trait]
impl Tool for PythonExecuteTool {
    fn name(&self) -> &'static str {
        "python_execute"
    }

    fn description(&self) -> &'static str {
        "Execute a Python code string in the workspace. Only printed output is captured; use print() to see values."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Python code to execute"
                },
                "timeout_ms": {
                    "type": "integer",
                    "description": "Timeout in milliseconds (default: 30000)",
                    "minimum": 1,
                    "maximum": 600000
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!("PythonExecuteTool::execute: called");
        let Some(code) = input["code"].as_str() else {
            return ToolResult::error("code is required");
        };

        let timeout_ms = input["timeout_ms"].as_u64().unwrap_or(30_000);

        let output = match tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            tokio::process::Command::new("python3")
                .arg("-c")
                .arg(code)
                .current_dir(&ctx.workspace)
                .output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!(%e, "PythonExecuteTool::execute: failed to start interpreter");
                return ToolResult::error(format!("Failed to run python3: {}", e));
            }
            Err(_) => {
                debug!("PythonExecuteTool::execute: execution timed out");
                return ToolResult::error(format!("Execution timed out after {}ms", timeout_ms));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            let text = if stdout.is_empty() && !stderr.is_empty() {
                stderr.to_string()
            } else {
                stdout.to_string()
            };
            ToolResult::success(truncate_output(&text))
        } else {
            ToolResult::error(format!(
                "Exit code: {}\n{}",
                output.status.code().unwrap_or(-1),
                truncate_output(&stderr)
            ))
        }
    }
}
