//! Progress document model
//!
//! A single JSON document holds one project's milestones and tasks. The
//! document is always read and written whole - there are no partial updates.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Current document schema version
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    // Files written before versioning are treated as version 1
    1
}

/// Lifecycle of a milestone, derived from its progress percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Planning,
    InProgress,
    Completed,
}

impl std::fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MilestoneStatus::Planning => write!(f, "planning"),
            MilestoneStatus::InProgress => write!(f, "in_progress"),
            MilestoneStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Binary completion state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "todo"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A named group of tasks with an aggregate progress percentage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u32,
    /// Lookup key for task association (not required unique)
    pub name: String,
    pub description: String,
    /// ISO-8601 creation timestamp
    pub created_at: String,
    /// Integer percentage 0-100, recomputed from task completion
    pub progress: u8,
    pub status: MilestoneStatus,
    /// Ids of associated tasks, in association order
    pub tasks: Vec<u32>,
}

/// An atomic unit of work with binary completion state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    /// Lookup key for completion (not required unique)
    pub name: String,
    pub description: String,
    /// Name of the associated milestone, if any
    pub milestone: Option<String>,
    /// ISO-8601 creation timestamp
    pub created_at: String,
    pub status: TaskStatus,
    /// ISO-8601 completion timestamp, absent until completed
    pub completed_at: Option<String>,
}

impl Task {
    /// Whether this task has been completed (terminal state)
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// The whole progress document for one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub project_name: String,
    /// ISO-8601 creation timestamp
    pub created_at: String,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
    /// Integer percentage 0-100, mean of milestone progress
    pub overall_progress: u8,
}

impl ProgressDocument {
    /// Create an empty document for a fresh project
    pub fn new(project_name: impl Into<String>) -> Self {
        let project_name = project_name.into();
        debug!(%project_name, "ProgressDocument::new: called");
        Self {
            schema_version: SCHEMA_VERSION,
            project_name,
            created_at: now_iso8601(),
            milestones: Vec::new(),
            tasks: Vec::new(),
            overall_progress: 0,
        }
    }

    /// Next milestone id: one past the highest existing id
    ///
    /// Counting existing items would recycle ids if deletion is ever
    /// added; max+1 stays collision-free.
    pub fn next_milestone_id(&self) -> u32 {
        self.milestones.iter().map(|m| m.id).max().unwrap_or(0) + 1
    }

    /// Next task id: one past the highest existing id
    pub fn next_task_id(&self) -> u32 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Find a milestone by name (first match wins)
    pub fn milestone_by_name_mut(&mut self, name: &str) -> Option<&mut Milestone> {
        self.milestones.iter_mut().find(|m| m.name == name)
    }

    /// Find a task by name (first match wins)
    pub fn task_by_name_mut(&mut self, name: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.name == name)
    }
}

/// Migrate a parsed document up to the current schema version
///
/// Each future version bump gets its own step here; the field defaults
/// handle pre-versioned files by treating them as version 1.
pub fn migrate(doc: &mut ProgressDocument) {
    debug!(version = doc.schema_version, "migrate: called");
    // Version 1 is current - nothing to do yet.
    doc.schema_version = SCHEMA_VERSION;
}

/// Current wall-clock time as an ISO-8601 string
pub fn now_iso8601() -> String {
    chrono::Local::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_empty() {
        let doc = ProgressDocument::new("demo");
        assert_eq!(doc.project_name, "demo");
        assert_eq!(doc.schema_version, SCHEMA_VERSION);
        assert!(doc.milestones.is_empty());
        assert!(doc.tasks.is_empty());
        assert_eq!(doc.overall_progress, 0);
    }

    #[test]
    fn test_next_ids_start_at_one() {
        let doc = ProgressDocument::new("demo");
        assert_eq!(doc.next_milestone_id(), 1);
        assert_eq!(doc.next_task_id(), 1);
    }

    #[test]
    fn test_next_ids_use_max_not_count() {
        let mut doc = ProgressDocument::new("demo");
        doc.tasks.push(Task {
            id: 7,
            name: "late".to_string(),
            description: String::new(),
            milestone: None,
            created_at: now_iso8601(),
            status: TaskStatus::Todo,
            completed_at: None,
        });
        assert_eq!(doc.next_task_id(), 8);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&MilestoneStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(serde_json::to_string(&TaskStatus::Todo).unwrap(), "\"todo\"");
    }

    #[test]
    fn test_schema_version_defaults_for_old_files() {
        // A document written before versioning has no schema_version field
        let json = r#"{
            "project_name": "old",
            "created_at": "2025-01-01T00:00:00+00:00",
            "milestones": [],
            "tasks": [],
            "overall_progress": 0
        }"#;
        let mut doc: ProgressDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.schema_version, 1);
        migrate(&mut doc);
        assert_eq!(doc.schema_version, SCHEMA_VERSION);
    }
}
