//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::context::ToolContext;

/// Marker prefix on error result text crossing the tool boundary
pub const ERROR_MARKER: &str = "Error: ";

/// A tool the planner can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the planner's tool_use name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;
}

/// Result of a tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        debug!("ToolResult::success: called");
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        debug!("ToolResult::error: called");
        Self {
            content: content.into(),
            is_error: true,
        }
    }

    /// Render as the single text result the loop records; errors carry
    /// the fixed marker prefix
    pub fn result_text(&self) -> String {
        if self.is_error {
            format!("{}{}", ERROR_MARKER, self.content)
        } else {
            self.content.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("File written successfully");
        assert!(!result.is_error);
        assert_eq!(result.result_text(), "File written successfully");
    }

    #[test]
    fn test_tool_result_error_carries_marker() {
        let result = ToolResult::error("File not found");
        assert!(result.is_error);
        assert_eq!(result.result_text(), "Error: File not found");
    }
}
