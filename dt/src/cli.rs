//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// devtalk - conversational software development agent
#[derive(Parser)]
#[command(
    name = "dt",
    about = "Conversational software development agent",
    after_help = "Sessions are saved as JSON documents under the sessions directory (default: conversations/)."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Start a new conversation, optionally seeded with a prompt
    Chat {
        /// Initial development request
        prompt: Option<String>,
    },

    /// Load a saved session and continue it
    Load {
        /// Session id (e.g. session_20250307_143022)
        session_id: String,
    },

    /// List all saved sessions
    List,
}
