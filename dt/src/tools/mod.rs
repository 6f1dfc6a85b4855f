//! Tool system
//!
//! Every tool takes a named-argument bundle validated against its declared
//! schema and returns a single text result; failures become error results
//! with a fixed marker, never raised faults.

pub mod builtin;
mod context;
mod error;
mod executor;
mod schema;
mod traits;

pub use context::ToolContext;
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use schema::validate_input;
pub use traits::{ERROR_MARKER, Tool, ToolResult};

/// Tool name the dispatch loop treats as "ask the user"
pub const ASK_HUMAN_TOOL: &str = "ask_human";

/// Tool name the dispatch loop treats as "end the session"
pub const TERMINATE_TOOL: &str = "terminate";
