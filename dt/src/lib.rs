//! devtalk - a conversational software development agent
//!
//! A bounded, multi-turn agent loop: each turn asks an external planner
//! for the next action, executes it through a fixed tool set, and records
//! the outcome in a persisted session.
//!
//! # Architecture
//!
//! ```text
//! dispatch   # turn state machine: Running / AwaitingUserInput / Terminated
//! session    # session state, manager, and JSON persistence
//! planner    # the external collaborator that picks the next tool call
//! tools      # schema-validated tool registry and the builtin tool set
//! analysis   # pluggable text analyzers (preferences, review, clarify)
//! prompts    # embedded templates, handlebars rendering
//! config     # YAML config chain
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod planner;
pub mod prompts;
pub mod session;
pub mod tools;
