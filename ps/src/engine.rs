//! ProgressEngine - milestone/task state machine and progress aggregation
//!
//! Every operation is one atomic load -> mutate -> save cycle over the
//! whole document. Nothing is cached between calls, so external edits to
//! the file are picked up on the next operation.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::document::{Milestone, MilestoneStatus, ProgressDocument, Task, TaskStatus, now_iso8601};
use crate::store::ProgressStore;

/// Errors from progress operations
///
/// Callers at the tool boundary convert these to user-facing text; they
/// never cross that boundary as raised faults.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("persistence: {0}")]
    Persistence(String),
}

/// A progress operation, one variant per action
///
/// Deserialized straight from tool input; an unknown action fails at
/// parse time instead of falling through a string match.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ProgressCommand {
    CreateMilestone {
        milestone_name: String,
        #[serde(default)]
        description: String,
    },
    AddTask {
        task_name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        milestone_name: Option<String>,
    },
    CompleteTask {
        task_name: String,
    },
    ListMilestones,
    ShowSummary,
}

/// Milestone/task bookkeeping over a [`ProgressStore`]
pub struct ProgressEngine {
    store: ProgressStore,
}

impl ProgressEngine {
    /// Create an engine over the given store
    pub fn new(store: ProgressStore) -> Self {
        Self { store }
    }

    /// Execute a command, returning its user-facing text result
    pub fn dispatch(&self, command: ProgressCommand) -> Result<String, ProgressError> {
        debug!(?command, "dispatch: called");
        match command {
            ProgressCommand::CreateMilestone {
                milestone_name,
                description,
            } => self.create_milestone(&milestone_name, &description),
            ProgressCommand::AddTask {
                task_name,
                description,
                milestone_name,
            } => self.add_task(&task_name, &description, milestone_name.as_deref()),
            ProgressCommand::CompleteTask { task_name } => self.complete_task(&task_name),
            ProgressCommand::ListMilestones => self.list_milestones(),
            ProgressCommand::ShowSummary => self.show_summary(),
        }
    }

    /// Create a milestone with progress 0 and status planning
    pub fn create_milestone(&self, name: &str, description: &str) -> Result<String, ProgressError> {
        debug!(%name, "create_milestone: called");
        if name.trim().is_empty() {
            return Err(ProgressError::Validation("milestone name must not be empty".to_string()));
        }

        let mut doc = self.store.load()?;
        let id = doc.next_milestone_id();
        doc.milestones.push(Milestone {
            id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: now_iso8601(),
            progress: 0,
            status: MilestoneStatus::Planning,
            tasks: Vec::new(),
        });
        self.store.save(&doc)?;

        info!(%name, id, "milestone created");
        Ok(format!("Created milestone #{}: {}", id, name))
    }

    /// Add a task, optionally associating it with a milestone by name
    pub fn add_task(&self, name: &str, description: &str, milestone: Option<&str>) -> Result<String, ProgressError> {
        debug!(%name, ?milestone, "add_task: called");
        if name.trim().is_empty() {
            return Err(ProgressError::Validation("task name must not be empty".to_string()));
        }

        let mut doc = self.store.load()?;
        let id = doc.next_task_id();
        doc.tasks.push(Task {
            id,
            name: name.to_string(),
            description: description.to_string(),
            milestone: milestone.map(String::from),
            created_at: now_iso8601(),
            status: TaskStatus::Todo,
            completed_at: None,
        });

        // First milestone with a matching name wins
        if let Some(milestone_name) = milestone
            && let Some(m) = doc.milestone_by_name_mut(milestone_name)
        {
            m.tasks.push(id);
        }

        self.store.save(&doc)?;

        info!(%name, id, "task added");
        match milestone {
            Some(m) => Ok(format!("Added task #{}: {} (milestone: {})", id, name, m)),
            None => Ok(format!("Added task #{}: {}", id, name)),
        }
    }

    /// Mark a task completed and recompute all progress from scratch
    pub fn complete_task(&self, name: &str) -> Result<String, ProgressError> {
        debug!(%name, "complete_task: called");
        let mut doc = self.store.load()?;

        // First task with a matching name wins
        let task = doc
            .task_by_name_mut(name)
            .ok_or_else(|| ProgressError::NotFound(format!("no task named '{}'", name)))?;
        task.status = TaskStatus::Completed;
        task.completed_at = Some(now_iso8601());

        recompute(&mut doc);
        self.store.save(&doc)?;

        info!(%name, overall = doc.overall_progress, "task completed");
        Ok(format!("Completed task: {}", name))
    }

    /// Read-only listing of all milestones with task counts
    pub fn list_milestones(&self) -> Result<String, ProgressError> {
        debug!("list_milestones: called");
        let doc = self.store.load()?;

        if doc.milestones.is_empty() {
            return Ok("No milestones yet. Use create_milestone to add the first one.".to_string());
        }

        let mut lines = vec![format!("Milestones ({} total)", doc.milestones.len())];
        for m in &doc.milestones {
            lines.push(format!("{} {} ({}%)", status_marker(m.status), m.name, m.progress));
            if !m.description.is_empty() {
                lines.push(format!("    {}", m.description));
            }
            if !m.tasks.is_empty() {
                let completed = doc
                    .tasks
                    .iter()
                    .filter(|t| m.tasks.contains(&t.id) && t.is_completed())
                    .count();
                lines.push(format!("    tasks: {}/{} complete", completed, m.tasks.len()));
            }
        }

        Ok(lines.join("\n"))
    }

    /// Read-only project summary with the 3 most recently completed tasks
    pub fn show_summary(&self) -> Result<String, ProgressError> {
        debug!("show_summary: called");
        let doc = self.store.load()?;

        let mut lines = vec![
            format!("Project: {}", doc.project_name),
            format!("Overall progress: {}%", doc.overall_progress),
            format!("Created: {}", date_part(&doc.created_at)),
        ];

        if !doc.milestones.is_empty() {
            let completed = doc
                .milestones
                .iter()
                .filter(|m| m.status == MilestoneStatus::Completed)
                .count();
            let in_progress = doc
                .milestones
                .iter()
                .filter(|m| m.status == MilestoneStatus::InProgress)
                .count();
            let planning = doc.milestones.len() - completed - in_progress;
            lines.push(format!(
                "Milestones: {} total ({} completed, {} in progress, {} planning)",
                doc.milestones.len(),
                completed,
                in_progress,
                planning
            ));
        }

        if !doc.tasks.is_empty() {
            let completed = doc.tasks.iter().filter(|t| t.is_completed()).count();
            lines.push(format!(
                "Tasks: {} total ({} completed, {} todo)",
                doc.tasks.len(),
                completed,
                doc.tasks.len() - completed
            ));
        }

        let mut recent: Vec<&Task> = doc.tasks.iter().filter(|t| t.completed_at.is_some()).collect();
        recent.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        if !recent.is_empty() {
            lines.push("Recently completed:".to_string());
            for task in recent.iter().take(3) {
                let date = task.completed_at.as_deref().map(date_part).unwrap_or_default();
                lines.push(format!("- {} ({})", task.name, date));
            }
        }

        Ok(lines.join("\n"))
    }
}

/// Recompute every milestone's progress/status and the overall progress
///
/// Always a full recompute from the task list; never patched incrementally.
fn recompute(doc: &mut ProgressDocument) {
    debug!("recompute: called");
    let tasks = doc.tasks.clone();

    for m in &mut doc.milestones {
        if m.tasks.is_empty() {
            m.progress = 0;
        } else {
            let completed = tasks.iter().filter(|t| m.tasks.contains(&t.id) && t.is_completed()).count();
            m.progress = (completed * 100 / m.tasks.len()) as u8;
        }

        m.status = match m.progress {
            0 => MilestoneStatus::Planning,
            100 => MilestoneStatus::Completed,
            _ => MilestoneStatus::InProgress,
        };
    }

    doc.overall_progress = if doc.milestones.is_empty() {
        0
    } else {
        let total: u32 = doc.milestones.iter().map(|m| m.progress as u32).sum();
        (total / doc.milestones.len() as u32) as u8
    };
}

fn status_marker(status: MilestoneStatus) -> &'static str {
    match status {
        MilestoneStatus::Planning => "[ ]",
        MilestoneStatus::InProgress => "[~]",
        MilestoneStatus::Completed => "[x]",
    }
}

/// Date prefix of an ISO-8601 timestamp
fn date_part(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}
