//! ToolContext - execution context for tools

use std::path::{Path, PathBuf};
use tracing::debug;

use super::ToolError;

/// Execution context for tools, scoped to one session
///
/// All file operations are constrained to the workspace directory; a path
/// that resolves outside it is rejected before the tool touches disk.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Workspace path - all file ops constrained here
    pub workspace: PathBuf,

    /// Session id (for logging and coordination)
    pub session_id: String,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(workspace: PathBuf, session_id: String) -> Self {
        debug!(?workspace, %session_id, "ToolContext::new: called");
        Self { workspace, session_id }
    }

    /// Normalize a path relative to the workspace
    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// Validate that a path stays within the workspace
    pub fn validate_path(&self, path: &Path) -> Result<PathBuf, ToolError> {
        debug!(?path, "ToolContext::validate_path: called");
        let normalized = self.normalize_path(path);

        // Canonicalize what exists; for new files resolve the parent so
        // symlinks cannot smuggle a path outside
        let canonical = if normalized.exists() {
            normalized.canonicalize().unwrap_or_else(|_| normalized.clone())
        } else if let Some(parent) = normalized.parent() {
            if parent.exists() {
                let canonical_parent = parent.canonicalize().unwrap_or_else(|_| parent.to_path_buf());
                canonical_parent.join(normalized.file_name().unwrap_or_default())
            } else {
                normalized.clone()
            }
        } else {
            normalized.clone()
        };

        let workspace_canonical = self.workspace.canonicalize().unwrap_or_else(|_| self.workspace.clone());

        if canonical.starts_with(&workspace_canonical) {
            Ok(canonical)
        } else {
            debug!("ToolContext::validate_path: sandbox violation detected");
            Err(ToolError::SandboxViolation {
                path: path.to_path_buf(),
                workspace: self.workspace.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_validate_path_within_workspace() {
        let temp = tempdir().unwrap();
        let workspace = temp.path().to_path_buf();

        let file_path = workspace.join("test.txt");
        fs::write(&file_path, "content").unwrap();

        let ctx = ToolContext::new(workspace, "test".to_string());

        let result = ctx.validate_path(Path::new("test.txt"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_path_outside_workspace() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());

        let result = ctx.validate_path(Path::new("/etc/passwd"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ToolError::SandboxViolation { .. }));
    }

    #[test]
    fn test_validate_new_file_path() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());

        let result = ctx.validate_path(Path::new("new_file.txt"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_relative_escape() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf(), "test".to_string());

        let result = ctx.validate_path(Path::new("../outside.txt"));
        assert!(result.is_err());
    }
}
