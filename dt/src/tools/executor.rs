//! ToolExecutor - registry and dispatch for the fixed tool set

use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::planner::{ToolCall, ToolDefinition};

use super::builtin::{
    AskHumanTool, CodeReviewTool, ProgressTrackerTool, PythonExecuteTool, RequirementClarifierTool, RunCommandTool,
    StrReplaceEditorTool, TerminateTool,
};
use super::schema::validate_input;
use super::{Tool, ToolContext, ToolResult};

/// Manages tool execution for a session
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Create an executor with the standard development tool set
    pub fn standard(progress_file: impl AsRef<Path>, project_name: &str) -> Self {
        let mut executor = Self::empty();

        // Execution
        executor.add_tool(Box::new(RunCommandTool));
        executor.add_tool(Box::new(PythonExecuteTool));

        // File editing
        executor.add_tool(Box::new(StrReplaceEditorTool));

        // Conversation
        executor.add_tool(Box::new(AskHumanTool));
        executor.add_tool(Box::new(TerminateTool));

        // Analysis and bookkeeping
        executor.add_tool(Box::new(CodeReviewTool));
        executor.add_tool(Box::new(RequirementClarifierTool));
        executor.add_tool(Box::new(ProgressTrackerTool::new(
            progress_file.as_ref().to_path_buf(),
            project_name,
        )));

        executor
    }

    /// Create an empty executor (for testing)
    pub fn empty() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Add a tool to the executor
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get tool definitions for the planner
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect();
        // Stable order for the planner regardless of map iteration
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a tool call: validate the input against the tool's schema,
    /// then dispatch
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(tool = %tool_call.name, "ToolExecutor::execute: called");
        let Some(tool) = self.tools.get(&tool_call.name) else {
            return ToolResult::error(format!("Unknown tool: {}", tool_call.name));
        };

        if let Err(violation) = validate_input(&tool.input_schema(), &tool_call.input) {
            return ToolResult::error(format!("Invalid input for {}: {}", tool_call.name, violation));
        }

        tool.execute(tool_call.input.clone(), ctx).await
    }

    /// Execute multiple tool calls sequentially, in proposal order
    pub async fn execute_all(&self, tool_calls: &[ToolCall], ctx: &ToolContext) -> Vec<(String, ToolResult)> {
        let mut results = Vec::with_capacity(tool_calls.len());

        for call in tool_calls {
            let result = self.execute(call, ctx).await;
            results.push((call.id.clone(), result));
        }

        results
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }
}
