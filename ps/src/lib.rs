//! ProgressStore - milestone/task progress tracking over a JSON document
//!
//! One project's milestones and tasks live in a single JSON document.
//! The engine owns the state machine (tasks only move todo -> completed)
//! and the aggregation math (milestone progress and overall progress are
//! recomputed from scratch on every completion).
//!
//! # Architecture
//!
//! ```text
//! project_progress.json        # the whole document, rewritten per op
//! ├── milestones[]             # id, name, progress, status, task ids
//! └── tasks[]                  # id, name, status, completed_at
//! ```
//!
//! # Example
//!
//! ```ignore
//! use progressstore::{ProgressEngine, ProgressStore};
//!
//! let engine = ProgressEngine::new(ProgressStore::new("project_progress.json", "demo"));
//! engine.create_milestone("MVP", "first shippable cut")?;
//! engine.add_task("wire up CI", "", Some("MVP"))?;
//! engine.complete_task("wire up CI")?;
//! println!("{}", engine.show_summary()?);
//! ```

pub mod cli;
pub mod config;
mod document;
mod engine;
mod store;

pub use document::{Milestone, MilestoneStatus, ProgressDocument, SCHEMA_VERSION, Task, TaskStatus};
pub use engine::{ProgressCommand, ProgressEngine, ProgressError};
pub use store::ProgressStore;

/// Default progress file name
pub const DEFAULT_PROGRESS_FILE: &str = "project_progress.json";

/// Default project name for a fresh document
pub const DEFAULT_PROJECT_NAME: &str = "software project";
