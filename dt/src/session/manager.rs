//! SessionManager - owns one session's state and its persistence policy
//!
//! Turn accounting, development history, pending questions, and the
//! user-preference map all go through here. Saving never fails the
//! caller (errors are logged and swallowed); loading reports a boolean
//! and leaves the in-memory session untouched on failure.

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::analysis::PreferenceExtractor;
use crate::planner::Message;

use super::state::{DevelopmentRecord, SessionState};
use super::store::{SessionStore, SessionSummary};

/// Result text longer than this is truncated before it enters a record
const MAX_RESULT_CHARS: usize = 200;

/// How many recent development records the context summary shows
const SUMMARY_RECENT_RECORDS: usize = 3;

/// Owns the session state, counters, and persistence
pub struct SessionManager {
    state: SessionState,
    store: SessionStore,
    session_file: PathBuf,
    max_turns: u32,
    extractor: Box<dyn PreferenceExtractor>,
    saves: u32,
}

impl SessionManager {
    /// Create a manager with a fresh session
    pub fn new(store: SessionStore, max_turns: u32, extractor: Box<dyn PreferenceExtractor>) -> Self {
        let state = SessionState::new();
        let session_file = store.session_path(&state.session_id);
        info!(session_id = %state.session_id, "SessionManager::new: created session");
        Self {
            state,
            store,
            session_file,
            max_turns,
            extractor,
            saves: 0,
        }
    }

    /// Read access to the session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Path this session persists to
    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// How many times the session was written to disk
    pub fn save_count(&self) -> u32 {
        self.saves
    }

    /// Count one executed step
    pub fn begin_step(&mut self) {
        self.state.current_step += 1;
    }

    /// Advance the turn counter; past the soft limit an advisory is
    /// returned for the loop to inject. Never aborts.
    pub fn advance_turn(&mut self) -> Option<String> {
        self.state.current_conversation_turn += 1;
        debug!(turn = self.state.current_conversation_turn, "advance_turn: called");

        if self.state.current_conversation_turn > self.max_turns {
            warn!(
                turn = self.state.current_conversation_turn,
                max = self.max_turns,
                "conversation turn limit exceeded"
            );
            Some(format!(
                "The conversation has passed {} turns. Summarize progress so far and ask the user whether to continue.",
                self.max_turns
            ))
        } else {
            None
        }
    }

    /// Append a development record; long results are truncated for good
    pub fn record_development(&mut self, action: &str, details: &str, result: &str) {
        debug!(%action, "record_development: called");
        self.state.development_history.push(DevelopmentRecord {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            action: action.to_string(),
            details: details.to_string(),
            result: truncate_result(result),
            conversation_turn: self.state.current_conversation_turn,
        });
    }

    /// Set a context key
    pub fn update_context(&mut self, key: &str, value: serde_json::Value) {
        debug!(%key, "update_context: called");
        self.state.conversation_context.insert(key.to_string(), value);
    }

    /// Presentation-only summary of context, recent actions, and pending
    /// questions; empty string when there is nothing to show
    pub fn context_summary(&self) -> String {
        let mut parts = Vec::new();

        if !self.state.conversation_context.is_empty() {
            let mut lines = vec!["Project context:".to_string()];
            for (key, value) in &self.state.conversation_context {
                lines.push(format!("- {}: {}", key, value));
            }
            parts.push(lines.join("\n"));
        }

        if !self.state.development_history.is_empty() {
            let mut lines = vec!["Recent actions:".to_string()];
            let start = self.state.development_history.len().saturating_sub(SUMMARY_RECENT_RECORDS);
            for record in &self.state.development_history[start..] {
                lines.push(format!("- {}: {}", record.timestamp, record.action));
            }
            parts.push(lines.join("\n"));
        }

        if !self.state.pending_clarifications.is_empty() {
            let mut lines = vec!["Pending clarifications:".to_string()];
            for question in &self.state.pending_clarifications {
                lines.push(format!("- {}", question));
            }
            parts.push(lines.join("\n"));
        }

        parts.join("\n\n")
    }

    /// Queue a question for the user (no deduplication)
    pub fn add_pending_clarification(&mut self, question: &str) {
        debug!(%question, "add_pending_clarification: called");
        self.state.pending_clarifications.push(question.to_string());
    }

    /// Drop all queued questions
    pub fn clear_pending_clarifications(&mut self) {
        debug!("clear_pending_clarifications: called");
        self.state.pending_clarifications.clear();
    }

    /// Run the preference extractor over user input; every match
    /// overwrites the category's prior value
    pub fn extract_preferences(&mut self, input: &str) {
        for (category, value) in self.extractor.extract(input) {
            info!(%category, %value, "detected user preference");
            self.state.user_preferences.insert(category, value);
        }
    }

    /// Human-readable summary of the whole conversation
    pub fn conversation_summary(&self) -> String {
        let mut parts = vec![
            format!("Conversation turns: {}", self.state.current_conversation_turn),
            format!("Steps executed: {}", self.state.current_step),
        ];

        if !self.state.conversation_context.is_empty() {
            let keys: Vec<&str> = self.state.conversation_context.keys().map(String::as_str).collect();
            parts.push(format!("Context: {}", keys.join(", ")));
        }

        if !self.state.user_preferences.is_empty() {
            let prefs: Vec<String> = self
                .state
                .user_preferences
                .iter()
                .map(|(k, v)| format!("{}:{}", k, v))
                .collect();
            parts.push(format!("Preferences: {}", prefs.join(", ")));
        }

        if !self.state.development_history.is_empty() {
            parts.push(format!("Actions recorded: {}", self.state.development_history.len()));
        }

        parts.join("\n")
    }

    // === Transcript ===

    /// Append a user text message and count it into the transcript
    pub fn push_user_message(&mut self, text: &str) {
        self.state.messages.push(Message::user(text));
    }

    /// Append an assistant message
    pub fn push_message(&mut self, message: Message) {
        self.state.messages.push(message);
    }

    /// Append a loop-injected advisory
    pub fn push_system_note(&mut self, text: &str) {
        self.state.messages.push(Message::system(text));
    }

    // === Persistence ===

    /// Write the session to its file; failures are logged, never raised
    pub fn save_session(&mut self) {
        self.state.conversation_summary = self.conversation_summary();
        match self.store.save(&self.state) {
            Ok(path) => {
                self.saves += 1;
                info!(path = %path.display(), "session saved");
            }
            Err(e) => {
                // In-memory session continues unaffected
                error!(error = %e, "failed to save session");
            }
        }
    }

    /// Load a session document, replacing all in-memory state on success
    ///
    /// On any failure the previous state is left untouched and `false`
    /// is returned.
    pub fn load_session(&mut self, path: &Path) -> bool {
        match SessionStore::load(path) {
            Ok(state) => {
                info!(session_id = %state.session_id, path = %path.display(), "session loaded");
                self.state = state;
                self.session_file = path.to_path_buf();
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load session");
                false
            }
        }
    }

    /// List all saved sessions, most recent first
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.store.list()
    }

    /// Clear everything and allocate a fresh session id and file path
    pub fn reset_for_new_session(&mut self) {
        let state = SessionState::new();
        info!(session_id = %state.session_id, "starting new session");
        self.session_file = self.store.session_path(&state.session_id);
        self.state = state;
    }
}

/// Truncate result text to the storage limit, marking the cut
fn truncate_result(result: &str) -> String {
    if result.chars().count() > MAX_RESULT_CHARS {
        let truncated: String = result.chars().take(MAX_RESULT_CHARS).collect();
        format!("{}...", truncated)
    } else {
        result.to_string()
    }
}
