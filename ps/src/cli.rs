//! CLI argument parsing for progressstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "Milestone/task progress tracking", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the progress file path
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the project summary
    Summary,

    /// List all milestones with their progress
    Milestones,

    /// Create a milestone
    AddMilestone {
        /// Milestone name
        #[arg(required = true)]
        name: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Add a task, optionally under a milestone
    AddTask {
        /// Task name
        #[arg(required = true)]
        name: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Milestone name to associate the task with
        #[arg(short, long)]
        milestone: Option<String>,
    },

    /// Mark a task completed
    CompleteTask {
        /// Task name
        #[arg(required = true)]
        name: String,
    },
}
