//! Tool error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during tool execution
///
/// These never cross the tool boundary as raised faults; the executor
/// renders them into error results.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Path {path} escapes workspace {workspace}")]
    SandboxViolation { path: PathBuf, workspace: PathBuf },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Command timed out after {timeout_ms}ms")]
    CommandTimeout { timeout_ms: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_violation_message() {
        let err = ToolError::SandboxViolation {
            path: PathBuf::from("/etc/passwd"),
            workspace: PathBuf::from("/tmp/workspace"),
        };

        let msg = err.to_string();
        assert!(msg.contains("/etc/passwd"));
        assert!(msg.contains("/tmp/workspace"));
    }

    #[test]
    fn test_timeout_message() {
        let err = ToolError::CommandTimeout { timeout_ms: 5000 };
        assert!(err.to_string().contains("5000"));
    }
}
