//! DispatchLoop - the bounded reasoning/acting cycle
//!
//! One planner invocation per turn, tool executions awaited sequentially,
//! every outcome recorded through the session manager. The only suspension
//! point is `AwaitingUserInput`; the only exits are the terminate tool and
//! the hard step ceiling.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analysis::KeywordPreferenceExtractor;
use crate::config::Config;
use crate::planner::{CompletionRequest, CompletionResponse, ContentBlock, Message, PlannerClient};
use crate::prompts::PromptLoader;
use crate::session::{SessionManager, SessionStore};
use crate::tools::{ASK_HUMAN_TOOL, TERMINATE_TOOL, ToolContext, ToolExecutor};

/// State of the dispatch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Turns advance normally
    Running,
    /// Suspended on a question; resumes only via a user response
    AwaitingUserInput,
    /// Finished; entered via the terminate tool or the step ceiling
    Terminated,
}

/// The bounded reasoning/acting cycle over one session
pub struct DispatchLoop {
    session: SessionManager,
    planner: Arc<dyn PlannerClient>,
    executor: ToolExecutor,
    prompts: PromptLoader,
    workspace: PathBuf,
    max_steps: u32,
    max_tokens: u32,
    auto_save: bool,
    state: DispatchState,
    last_question_asked: Option<String>,
}

impl DispatchLoop {
    /// Create a loop over a fresh session
    pub fn new(config: &Config, planner: Arc<dyn PlannerClient>, workspace: PathBuf) -> Self {
        let store = SessionStore::new(&config.session.sessions_dir);
        let session = SessionManager::new(
            store,
            config.session.max_turns,
            Box::new(KeywordPreferenceExtractor::new()),
        );
        let executor = ToolExecutor::standard(&config.progress.file, &config.progress.project_name);
        let prompts = PromptLoader::new(&workspace);

        Self {
            session,
            planner,
            executor,
            prompts,
            workspace,
            max_steps: config.session.max_steps,
            max_tokens: config.planner.max_tokens,
            auto_save: config.session.auto_save,
            state: DispatchState::Running,
            last_question_asked: None,
        }
    }

    /// Current loop state
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// The question the loop is suspended on, if any
    pub fn last_question(&self) -> Option<&str> {
        self.last_question_asked.as_deref()
    }

    /// Read access to the session manager
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Mutable access to the session manager (load, save, list)
    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    /// Run turns until the loop produces something for the user: a plain
    /// reply, a question to answer, or the final session summary
    pub async fn run(&mut self, input: Option<&str>) -> eyre::Result<String> {
        if let Some(text) = input {
            self.session.push_user_message(text);
            self.state = DispatchState::Running;
        }

        match self.state {
            DispatchState::AwaitingUserInput => {
                // Still suspended; repeat the question instead of advancing
                return Ok(self.last_question_asked.clone().unwrap_or_default());
            }
            DispatchState::Terminated => {
                return Ok(self.session.conversation_summary());
            }
            DispatchState::Running => {}
        }

        loop {
            // Hard ceiling first: reaching it forces termination
            if self.session.state().current_step >= self.max_steps {
                warn!(max_steps = self.max_steps, "step ceiling reached, terminating");
                return Ok(self.finish(&format!("step ceiling ({}) reached", self.max_steps)));
            }

            self.session.begin_step();

            // Soft limit: advisory only, the loop keeps going
            if let Some(advisory) = self.session.advance_turn() {
                self.session.push_system_note(&advisory);
            }

            let request = CompletionRequest {
                system_prompt: self
                    .prompts
                    .system_prompt(&self.workspace, &self.session.context_summary())?,
                messages: self.session.state().messages.clone(),
                tools: self.executor.definitions(),
                max_tokens: self.max_tokens,
            };

            // Exactly one planner invocation per turn
            let response = match self.planner.complete(request).await {
                Ok(r) => r,
                Err(e) => {
                    // Retryable failures were already retried by the client;
                    // whatever reaches here is terminal for the turn, not
                    // for the process
                    warn!(error = %e, "planner call failed");
                    self.session.record_development("planner", "", &format!("Error: {}", e));
                    return Ok(format!("The planner is unavailable: {}", e));
                }
            };

            self.session.push_message(assistant_message(&response));

            if response.tool_calls.is_empty() {
                // The turn's text is the user-facing reply
                debug!("turn produced no tool calls, returning reply");
                return Ok(response.content.unwrap_or_default());
            }

            // Execute every proposed call in order, one record each
            let ctx = ToolContext::new(self.workspace.clone(), self.session.state().session_id.clone());
            let mut result_blocks = Vec::with_capacity(response.tool_calls.len());
            for call in &response.tool_calls {
                info!(tool = %call.name, "executing tool");
                let result = self.executor.execute(call, &ctx).await;
                self.session
                    .record_development(&call.name, &call.input.to_string(), &result.result_text());
                result_blocks.push(ContentBlock::tool_result(&call.id, &result.content, result.is_error));
            }
            self.session.push_message(Message::user_blocks(result_blocks));

            // Special tools transition the state machine; the first one in
            // proposal order wins
            for call in &response.tool_calls {
                match call.name.as_str() {
                    ASK_HUMAN_TOOL => {
                        let question = call.input["inquire"].as_str().unwrap_or_default().to_string();
                        info!(%question, "suspending for user input");
                        self.last_question_asked = Some(question.clone());
                        self.state = DispatchState::AwaitingUserInput;
                        return Ok(question);
                    }
                    TERMINATE_TOOL => {
                        return Ok(self.finish("terminate tool selected"));
                    }
                    _ => {}
                }
            }
        }
    }

    /// The explicit "user responded" event: resume the loop and feed the
    /// response into the transcript and the preference extractor
    pub fn handle_user_response(&mut self, input: &str) {
        debug!("handle_user_response: called");
        self.state = DispatchState::Running;
        self.last_question_asked = None;
        self.session.push_user_message(input);
        self.session.extract_preferences(input);
    }

    /// Clear everything, allocate a fresh session, and feed the seed input
    /// through the loop
    pub async fn start_new_session(&mut self, seed: &str) -> eyre::Result<String> {
        self.session.reset_for_new_session();
        self.state = DispatchState::Running;
        self.last_question_asked = None;
        self.run(Some(seed)).await
    }

    /// Enter `Terminated`: final record, summary, one auto-save
    fn finish(&mut self, reason: &str) -> String {
        info!(%reason, "session terminated");
        self.state = DispatchState::Terminated;

        self.session.record_development(
            "session ended",
            &format!(
                "turns: {}, steps: {}",
                self.session.state().current_conversation_turn,
                self.session.state().current_step
            ),
            reason,
        );

        let summary = self.session.conversation_summary();
        if self.auto_save {
            self.session.save_session();
        }
        summary
    }
}

/// Build the transcript message for a planner response
fn assistant_message(response: &CompletionResponse) -> Message {
    let mut blocks = Vec::new();

    if let Some(text) = &response.content {
        blocks.push(ContentBlock::text(text));
    }

    for call in &response.tool_calls {
        blocks.push(ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        });
    }

    Message::assistant_blocks(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::client::mock::MockPlanner;
    use crate::planner::{StopReason, ToolCall};
    use tempfile::tempdir;

    fn config(temp: &tempfile::TempDir) -> Config {
        let mut config = Config::default();
        config.session.sessions_dir = temp.path().join("conversations");
        config.progress.file = temp.path().join("progress.json");
        config
    }

    fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            content: Some(text.to_string()),
            tool_calls: vec![],
            stop_reason: StopReason::EndTurn,
        }
    }

    fn tool_response(calls: Vec<(&str, serde_json::Value)>) -> CompletionResponse {
        CompletionResponse {
            content: None,
            tool_calls: calls
                .into_iter()
                .enumerate()
                .map(|(i, (name, input))| ToolCall {
                    id: format!("call_{}", i),
                    name: name.to_string(),
                    input,
                })
                .collect(),
            stop_reason: StopReason::ToolUse,
        }
    }

    fn dispatch(temp: &tempfile::TempDir, responses: Vec<CompletionResponse>) -> DispatchLoop {
        DispatchLoop::new(
            &config(temp),
            Arc::new(MockPlanner::new(responses)),
            temp.path().to_path_buf(),
        )
    }

    #[tokio::test]
    async fn test_text_reply_stays_running() {
        let temp = tempdir().unwrap();
        let mut engine = dispatch(&temp, vec![text_response("Sounds good, let's begin.")]);

        let reply = engine.run(Some("build me a blog")).await.unwrap();

        assert_eq!(reply, "Sounds good, let's begin.");
        assert_eq!(engine.state(), DispatchState::Running);
        assert_eq!(engine.session().state().current_conversation_turn, 1);
        assert!(engine.session().state().development_history.is_empty());
    }

    #[tokio::test]
    async fn test_tool_call_produces_one_record_per_call() {
        let temp = tempdir().unwrap();
        let mut engine = dispatch(
            &temp,
            vec![
                tool_response(vec![("bash", serde_json::json!({"command": "echo hi"}))]),
                text_response("done"),
            ],
        );

        let reply = engine.run(Some("run something")).await.unwrap();

        assert_eq!(reply, "done");
        assert_eq!(engine.session().state().current_conversation_turn, 2);
        let history = &engine.session().state().development_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, "bash");
        assert_eq!(history[0].conversation_turn, 1);
        assert!(history[0].result.contains("hi"));
    }

    #[tokio::test]
    async fn test_multiple_tool_calls_each_recorded_in_order() {
        let temp = tempdir().unwrap();
        let mut engine = dispatch(
            &temp,
            vec![
                tool_response(vec![
                    ("bash", serde_json::json!({"command": "echo one"})),
                    ("bash", serde_json::json!({"command": "echo two"})),
                ]),
                text_response("both ran"),
            ],
        );

        engine.run(Some("run both")).await.unwrap();

        let history = &engine.session().state().development_history;
        assert_eq!(history.len(), 2);
        assert!(history[0].result.contains("one"));
        assert!(history[1].result.contains("two"));
        assert_eq!(history[0].conversation_turn, history[1].conversation_turn);
    }

    #[tokio::test]
    async fn test_turn_and_record_accounting_over_n_turns() {
        let temp = tempdir().unwrap();
        let n = 5;
        let mut responses: Vec<CompletionResponse> = (0..n)
            .map(|i| tool_response(vec![("bash", serde_json::json!({"command": format!("echo {}", i)}))]))
            .collect();
        responses.push(text_response("enough"));

        let mut engine = dispatch(&temp, responses);
        engine.run(Some("go")).await.unwrap();

        // N tool turns plus the final text turn
        assert_eq!(engine.session().state().current_conversation_turn, n + 1);
        let history = &engine.session().state().development_history;
        assert_eq!(history.len(), n as usize);
        let turns: Vec<u32> = history.iter().map(|r| r.conversation_turn).collect();
        let mut sorted = turns.clone();
        sorted.sort();
        assert_eq!(turns, sorted, "turn indices must be non-decreasing");
    }

    #[tokio::test]
    async fn test_ask_human_suspends_until_user_responds() {
        let temp = tempdir().unwrap();
        let mut engine = dispatch(
            &temp,
            vec![
                tool_response(vec![("ask_human", serde_json::json!({"inquire": "Which framework?"}))]),
                text_response("pytest it is"),
            ],
        );

        let question = engine.run(Some("set up tests")).await.unwrap();

        assert_eq!(question, "Which framework?");
        assert_eq!(engine.state(), DispatchState::AwaitingUserInput);
        assert_eq!(engine.last_question(), Some("Which framework?"));

        // Without a user response the loop does not advance
        let repeated = engine.run(None).await.unwrap();
        assert_eq!(repeated, "Which framework?");
        assert_eq!(engine.session().state().current_conversation_turn, 1);

        engine.handle_user_response("let's use pytest");
        assert_eq!(engine.state(), DispatchState::Running);
        assert!(engine.last_question().is_none());
        assert_eq!(
            engine.session().state().user_preferences.get("测试框架"),
            Some(&"pytest".to_string())
        );

        let reply = engine.run(None).await.unwrap();
        assert_eq!(reply, "pytest it is");
    }

    #[tokio::test]
    async fn test_terminate_transitions_and_autosaves_once() {
        let temp = tempdir().unwrap();
        let mut engine = dispatch(
            &temp,
            vec![tool_response(vec![(
                "terminate",
                serde_json::json!({"status": "success"}),
            )])],
        );

        let summary = engine.run(Some("all done")).await.unwrap();

        assert_eq!(engine.state(), DispatchState::Terminated);
        assert!(summary.contains("Conversation turns: 1"));
        assert_eq!(engine.session().save_count(), 1);

        // Final record sits after the tool record
        let history = &engine.session().state().development_history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, "terminate");
        assert_eq!(history[1].action, "session ended");
    }

    #[tokio::test]
    async fn test_terminate_without_autosave_does_not_save() {
        let temp = tempdir().unwrap();
        let mut config = config(&temp);
        config.session.auto_save = false;

        let mut engine = DispatchLoop::new(
            &config,
            Arc::new(MockPlanner::new(vec![tool_response(vec![(
                "terminate",
                serde_json::json!({"status": "success"}),
            )])])),
            temp.path().to_path_buf(),
        );

        engine.run(Some("done")).await.unwrap();

        assert_eq!(engine.state(), DispatchState::Terminated);
        assert_eq!(engine.session().save_count(), 0);
    }

    #[tokio::test]
    async fn test_step_ceiling_forces_termination() {
        let temp = tempdir().unwrap();
        let mut config = config(&temp);
        config.session.max_steps = 2;

        let responses: Vec<CompletionResponse> = (0..3)
            .map(|_| tool_response(vec![("bash", serde_json::json!({"command": "true"}))]))
            .collect();

        let mut engine = DispatchLoop::new(
            &config,
            Arc::new(MockPlanner::new(responses)),
            temp.path().to_path_buf(),
        );

        engine.run(Some("loop forever")).await.unwrap();

        assert_eq!(engine.state(), DispatchState::Terminated);
        assert_eq!(engine.session().state().current_step, 2);
        // Two tool records plus the final one
        assert_eq!(engine.session().state().development_history.len(), 3);
    }

    #[tokio::test]
    async fn test_soft_turn_limit_injects_advisory() {
        let temp = tempdir().unwrap();
        let mut config = config(&temp);
        config.session.max_turns = 1;

        let mut engine = DispatchLoop::new(
            &config,
            Arc::new(MockPlanner::new(vec![
                text_response("first"),
                text_response("second"),
            ])),
            temp.path().to_path_buf(),
        );

        engine.run(Some("hello")).await.unwrap();
        engine.handle_user_response("keep going");
        engine.run(None).await.unwrap();

        // Turn 2 passed the soft limit: advisory injected, loop continued
        assert_eq!(engine.state(), DispatchState::Running);
        let has_advisory = engine
            .session()
            .state()
            .messages
            .iter()
            .any(|m| m.role == crate::planner::Role::System);
        assert!(has_advisory);
    }

    #[tokio::test]
    async fn test_planner_error_becomes_turn_text() {
        let temp = tempdir().unwrap();
        // Empty script: the first call errors
        let mut engine = dispatch(&temp, vec![]);

        let reply = engine.run(Some("hello")).await.unwrap();

        assert!(reply.contains("planner is unavailable"));
        assert_eq!(engine.state(), DispatchState::Running);
        let history = &engine.session().state().development_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, "planner");
        assert!(history[0].result.starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_start_new_session_resets_and_runs_seed() {
        let temp = tempdir().unwrap();
        let mut engine = dispatch(
            &temp,
            vec![text_response("first session"), text_response("fresh start")],
        );

        engine.run(Some("old work")).await.unwrap();
        let old_id = engine.session().state().session_id.clone();
        assert_eq!(engine.session().state().current_conversation_turn, 1);

        let reply = engine.start_new_session("new work").await.unwrap();

        assert_eq!(reply, "fresh start");
        assert_eq!(engine.session().state().current_conversation_turn, 1);
        assert_eq!(engine.session().state().current_step, 1);
        // Transcript holds only the new seed and reply
        assert_eq!(engine.session().state().messages.len(), 2);
        let _ = old_id;
    }

    #[tokio::test]
    async fn test_tool_error_results_flow_into_transcript() {
        let temp = tempdir().unwrap();
        let mut engine = dispatch(
            &temp,
            vec![
                tool_response(vec![("no_such_tool", serde_json::json!({}))]),
                text_response("noted"),
            ],
        );

        engine.run(Some("try it")).await.unwrap();

        let history = &engine.session().state().development_history;
        assert_eq!(history.len(), 1);
        assert!(history[0].result.starts_with("Error: Unknown tool"));
    }
}
