//! requirement_clarifier tool - analyze a requirement and raise questions

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::analysis::{AnalysisDepth, RequirementAnalyzer};
use crate::tools::{Tool, ToolContext, ToolResult};

/// Run the requirement analyzer and render its clarification report
pub struct RequirementClarifierTool;

#[async_trait]
impl Tool for RequirementClarifierTool {
    fn name(&self) -> &'static str {
        "requirement_clarifier"
    }

    fn description(&self) -> &'static str {
        "Analyze a user requirement for technology hints, ambiguity, and complexity, and generate clarification questions."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_requirement": {
                    "type": "string",
                    "description": "The requirement text to analyze"
                },
                "analysis_depth": {
                    "type": "string",
                    "description": "How deep to analyze (default: detailed)",
                    "enum": ["basic", "detailed", "comprehensive"]
                }
            },
            "required": ["user_requirement"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!("RequirementClarifierTool::execute: called");
        let Some(requirement) = input["user_requirement"].as_str() else {
            return ToolResult::error("user_requirement is required");
        };

        let depth = match input["analysis_depth"].as_str() {
            None => AnalysisDepth::Detailed,
            Some(s) => match AnalysisDepth::parse(s) {
                Some(d) => d,
                None => return ToolResult::error(format!("Unknown analysis depth: {}", s)),
            },
        };

        let analysis = RequirementAnalyzer::analyze(requirement, depth);
        ToolResult::success(analysis.render())
    }
}
