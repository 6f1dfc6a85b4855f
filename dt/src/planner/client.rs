//! PlannerClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, PlannerError};

/// The external planner: given the conversation so far and the available
/// tools, it proposes the next action
///
/// The dispatch loop invokes this exactly once per turn. The core makes
/// no assumption about what sits behind it beyond this interface.
#[async_trait]
pub trait PlannerClient: Send + Sync {
    /// Send one completion request (blocks until the planner answers)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, PlannerError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Scripted planner for unit tests - returns canned responses in order
    pub struct MockPlanner {
        responses: Vec<CompletionResponse>,
        call_count: AtomicUsize,
    }

    impl MockPlanner {
        pub fn new(responses: Vec<CompletionResponse>) -> Self {
            debug!(response_count = %responses.len(), "MockPlanner::new: called");
            Self {
                responses,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlannerClient for MockPlanner {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, PlannerError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockPlanner::complete: fetching response");
            self.responses
                .get(idx)
                .cloned()
                .ok_or_else(|| PlannerError::InvalidResponse("No more mock responses".to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::planner::StopReason;

        #[tokio::test]
        async fn test_mock_planner_returns_responses_in_order() {
            let responses = vec![
                CompletionResponse {
                    content: Some("Response 1".to_string()),
                    tool_calls: vec![],
                    stop_reason: StopReason::EndTurn,
                },
                CompletionResponse {
                    content: Some("Response 2".to_string()),
                    tool_calls: vec![],
                    stop_reason: StopReason::EndTurn,
                },
            ];

            let client = MockPlanner::new(responses);

            let req = CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![],
                tools: vec![],
                max_tokens: 1000,
            };

            let resp1 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp1.content, Some("Response 1".to_string()));

            let resp2 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp2.content, Some("Response 2".to_string()));

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_planner_errors_when_exhausted() {
            let client = MockPlanner::new(vec![]);

            let req = CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![],
                tools: vec![],
                max_tokens: 1000,
            };

            let result = client.complete(req).await;
            assert!(result.is_err());
        }
    }
}
