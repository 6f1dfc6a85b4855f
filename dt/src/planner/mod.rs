//! Planner boundary
//!
//! The planner is the external collaborator that decides which tool to
//! call next. This module owns the interface (one completion call per
//! turn) and the Anthropic implementation; the core never looks behind
//! the trait.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod types;

pub use anthropic::AnthropicClient;
pub use client::PlannerClient;
pub use error::PlannerError;
pub use types::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, MessageContent, Role, StopReason, ToolCall,
    ToolDefinition,
};

use crate::config::PlannerConfig;

/// Create a planner client based on the provider specified in config
pub fn create_client(config: &PlannerConfig) -> Result<Arc<dyn PlannerClient>, PlannerError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        other => Err(PlannerError::InvalidResponse(format!(
            "Unknown planner provider: '{}'. Supported: anthropic",
            other
        ))),
    }
}
