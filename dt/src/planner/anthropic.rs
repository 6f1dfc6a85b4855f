//! Anthropic Claude API client implementation
//!
//! Implements the PlannerClient trait for Anthropic's Messages API.
//! Non-streaming: one request, one parsed response, with bounded retry
//! on transient failures.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, MessageContent, PlannerClient, PlannerError, Role,
    StopReason, ToolCall,
};
use crate::config::PlannerConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504 | 529)
}

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlannerError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = config
            .api_key()
            .map_err(|e| PlannerError::InvalidResponse(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(PlannerError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the Anthropic API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "system": request.system_prompt,
            "messages": self.convert_messages(&request.messages),
        });

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(
                request
                    .tools
                    .iter()
                    .map(|t| t.to_anthropic_schema())
                    .collect::<Vec<_>>()
            );
        }

        body
    }

    /// Convert transcript messages to Anthropic API format
    ///
    /// Loop-injected System notes are folded into user turns - the
    /// Messages API only accepts user/assistant roles in the messages
    /// array.
    fn convert_messages(&self, messages: &[Message]) -> Vec<serde_json::Value> {
        debug!(message_count = %messages.len(), "convert_messages: called");
        messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::Assistant => "assistant",
                    Role::User | Role::System => "user",
                };

                let content = match &msg.content {
                    MessageContent::Text(text) => match msg.role {
                        Role::System => serde_json::json!(format!("[system note] {}", text)),
                        _ => serde_json::json!(text),
                    },
                    MessageContent::Blocks(blocks) => {
                        serde_json::json!(blocks.iter().map(convert_content_block).collect::<Vec<_>>())
                    }
                };

                serde_json::json!({
                    "role": role,
                    "content": content,
                })
            })
            .collect()
    }

    /// Send one request, without retry
    async fn complete_once(&self, body: &serde_json::Value) -> Result<CompletionResponse, PlannerError> {
        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!(%status, "complete_once: response status");

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(60));
            return Err(PlannerError::RateLimited { retry_after });
        }

        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            return Err(PlannerError::Api { status, message });
        }

        let api_response: ApiResponse = response.json().await?;
        Ok(parse_response(api_response))
    }
}

#[async_trait]
impl PlannerClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, PlannerError> {
        let body = self.build_request_body(&request);

        let mut backoff_ms = INITIAL_BACKOFF_MS;
        let mut last_error = None;

        for attempt in 0..=MAX_RETRIES {
            match self.complete_once(&body).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    let retryable = match &e {
                        PlannerError::RateLimited { .. } => true,
                        PlannerError::Api { status, .. } => is_retryable_status(*status),
                        PlannerError::Network(_) | PlannerError::Timeout(_) => true,
                        _ => false,
                    };

                    if !retryable || attempt == MAX_RETRIES {
                        return Err(e);
                    }

                    let delay = e.retry_after().unwrap_or(Duration::from_millis(backoff_ms));
                    warn!(attempt, ?delay, error = %e, "planner request failed, retrying");
                    tokio::time::sleep(delay).await;
                    backoff_ms *= 2;
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PlannerError::InvalidResponse("retry loop exhausted".to_string())))
    }
}

/// Convert a ContentBlock to Anthropic API format
fn convert_content_block(block: &ContentBlock) -> serde_json::Value {
    match block {
        ContentBlock::Text { text } => serde_json::json!({
            "type": "text",
            "text": text,
        }),
        ContentBlock::ToolUse { id, name, input } => serde_json::json!({
            "type": "tool_use",
            "id": id,
            "name": name,
            "input": input,
        }),
        ContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => serde_json::json!({
            "type": "tool_result",
            "tool_use_id": tool_use_id,
            "content": content,
            "is_error": is_error,
        }),
    }
}

/// Wire format of an Anthropic Messages API response
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ApiContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ApiContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
}

/// Flatten the API response into our CompletionResponse
fn parse_response(api: ApiResponse) -> CompletionResponse {
    let mut text_parts = Vec::new();
    let mut tool_calls = Vec::new();

    for block in api.content {
        match block {
            ApiContentBlock::Text { text } => text_parts.push(text),
            ApiContentBlock::ToolUse { id, name, input } => tool_calls.push(ToolCall { id, name, input }),
        }
    }

    let content = if text_parts.is_empty() {
        None
    } else {
        Some(text_parts.join("\n"))
    };

    let stop_reason = api
        .stop_reason
        .as_deref()
        .map(StopReason::from_anthropic)
        .unwrap_or(StopReason::EndTurn);

    CompletionResponse {
        content,
        tool_calls,
        stop_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_text_only() {
        let api = ApiResponse {
            content: vec![ApiContentBlock::Text {
                text: "Hello".to_string(),
            }],
            stop_reason: Some("end_turn".to_string()),
        };

        let response = parse_response(api);
        assert_eq!(response.content, Some("Hello".to_string()));
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }

    #[test]
    fn test_parse_response_with_tool_call() {
        let api = ApiResponse {
            content: vec![
                ApiContentBlock::Text {
                    text: "Running it".to_string(),
                },
                ApiContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: "bash".to_string(),
                    input: serde_json::json!({"command": "ls"}),
                },
            ],
            stop_reason: Some("tool_use".to_string()),
        };

        let response = parse_response(api);
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "bash");
        assert_eq!(response.stop_reason, StopReason::ToolUse);
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(529));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(200));
    }
}
