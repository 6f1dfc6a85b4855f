//! Planner error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while asking the planner for the next action
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, PlannerError::RateLimited { .. })
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            PlannerError::RateLimited { .. } => true,
            PlannerError::Api { status, .. } => *status >= 500,
            PlannerError::Network(_) => true,
            PlannerError::Timeout(_) => true,
            PlannerError::InvalidResponse(_) => false,
            PlannerError::Json(_) => false,
        }
    }

    /// Get the retry duration if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            PlannerError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}
