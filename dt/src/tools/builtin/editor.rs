//! str_replace_editor tool - view, create, and edit workspace files

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolResult};

/// View beyond this many lines is cut
const MAX_VIEW_LINES: usize = 2_000;

/// File editor with view / create / str_replace / insert commands
pub struct StrReplaceEditorTool;

#[async_trait]
impl Tool for StrReplaceEditorTool {
    fn name(&self) -> &'static str {
        "str_replace_editor"
    }

    fn description(&self) -> &'static str {
        "View, create, and edit files in the workspace. Commands: view, create, str_replace, insert."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Editor command to run",
                    "enum": ["view", "create", "str_replace", "insert"]
                },
                "path": {
                    "type": "string",
                    "description": "File path relative to the workspace"
                },
                "file_text": {
                    "type": "string",
                    "description": "Full file content (create)"
                },
                "old_str": {
                    "type": "string",
                    "description": "Exact string to find and replace (str_replace)"
                },
                "new_str": {
                    "type": "string",
                    "description": "Replacement or inserted string (str_replace, insert)"
                },
                "insert_line": {
                    "type": "integer",
                    "description": "1-based line number to insert after; 0 inserts at the top (insert)",
                    "minimum": 0
                }
            },
            "required": ["command", "path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "StrReplaceEditorTool::execute: called");
        let Some(command) = input["command"].as_str() else {
            return ToolResult::error("command is required");
        };
        let Some(path) = input["path"].as_str() else {
            return ToolResult::error("path is required");
        };

        let full_path = match ctx.validate_path(Path::new(path)) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        match command {
            "view" => view(&full_path, path).await,
            "create" => create(&full_path, path, &input).await,
            "str_replace" => str_replace(&full_path, path, &input).await,
            "insert" => insert(&full_path, path, &input).await,
            other => ToolResult::error(format!("Unknown editor command: {}", other)),
        }
    }
}

async fn view(full_path: &Path, path: &str) -> ToolResult {
    let content = match tokio::fs::read_to_string(full_path).await {
        Ok(c) => c,
        Err(e) => return ToolResult::error(format!("Failed to read {}: {}", path, e)),
    };

    let mut lines: Vec<String> = content
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:6}\t{}", i + 1, line))
        .collect();

    let total = lines.len();
    if total > MAX_VIEW_LINES {
        lines.truncate(MAX_VIEW_LINES);
        lines.push(format!("... [{} more lines]", total - MAX_VIEW_LINES));
    }

    ToolResult::success(lines.join("\n"))
}

async fn create(full_path: &Path, path: &str, input: &Value) -> ToolResult {
    let Some(file_text) = input["file_text"].as_str() else {
        return ToolResult::error("file_text is required for create");
    };

    if let Some(parent) = full_path.parent()
        && let Err(e) = tokio::fs::create_dir_all(parent).await
    {
        return ToolResult::error(format!("Failed to create parent directory: {}", e));
    }

    match tokio::fs::write(full_path, file_text).await {
        Ok(()) => ToolResult::success(format!("Created {}", path)),
        Err(e) => ToolResult::error(format!("Failed to write {}: {}", path, e)),
    }
}

async fn str_replace(full_path: &Path, path: &str, input: &Value) -> ToolResult {
    let Some(old_str) = input["old_str"].as_str() else {
        return ToolResult::error("old_str is required for str_replace");
    };
    let new_str = input["new_str"].as_str().unwrap_or("");

    let content = match tokio::fs::read_to_string(full_path).await {
        Ok(c) => c,
        Err(e) => return ToolResult::error(format!("Failed to read {}: {}", path, e)),
    };

    let count = content.matches(old_str).count();
    if count == 0 {
        return ToolResult::error("old_str not found in file. Make sure it matches exactly including whitespace.");
    }
    if count > 1 {
        return ToolResult::error(format!("old_str found {} times. Provide more surrounding context.", count));
    }

    let new_content = content.replacen(old_str, new_str, 1);
    match tokio::fs::write(full_path, &new_content).await {
        Ok(()) => ToolResult::success(format!("Replaced 1 occurrence in {}", path)),
        Err(e) => ToolResult::error(format!("Failed to write {}: {}", path, e)),
    }
}

async fn insert(full_path: &Path, path: &str, input: &Value) -> ToolResult {
    let Some(new_str) = input["new_str"].as_str() else {
        return ToolResult::error("new_str is required for insert");
    };
    let Some(insert_line) = input["insert_line"].as_u64() else {
        return ToolResult::error("insert_line is required for insert");
    };

    let content = match tokio::fs::read_to_string(full_path).await {
        Ok(c) => c,
        Err(e) => return ToolResult::error(format!("Failed to read {}: {}", path, e)),
    };

    let mut lines: Vec<&str> = content.lines().collect();
    let at = insert_line as usize;
    if at > lines.len() {
        return ToolResult::error(format!(
            "insert_line {} is past the end of the file ({} lines)",
            at,
            lines.len()
        ));
    }

    lines.insert(at, new_str);
    let mut new_content = lines.join("\n");
    if content.ends_with('\n') {
        new_content.push('\n');
    }

    match tokio::fs::write(full_path, &new_content).await {
        Ok(()) => ToolResult::success(format!("Inserted after line {} in {}", at, path)),
        Err(e) => ToolResult::error(format!("Failed to write {}: {}", path, e)),
    }
}
