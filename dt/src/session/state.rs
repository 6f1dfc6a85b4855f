//! SessionState - the explicit, owned value holding one conversation's state
//!
//! Everything a session knows lives here as plain data: context map,
//! development history, preferences, transcript, counters. The manager
//! owns exactly one of these and passes it whole to the store; nothing
//! is mutated through ambient references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::planner::Message;

/// Current session document schema version
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    // Files written before versioning are treated as version 1
    1
}

/// One entry of the append-only development history
///
/// Immutable after creation; the result text is already truncated when
/// the record is built (the full-length result is not retained anywhere).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevelopmentRecord {
    /// Wall-clock time of day, "%H:%M:%S"
    pub timestamp: String,
    pub action: String,
    pub details: String,
    pub result: String,
    /// Turn index at which the record was created
    pub conversation_turn: u32,
}

/// Full state of one conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub session_id: String,
    /// ISO-8601 creation timestamp
    pub created_at: String,
    pub conversation_context: BTreeMap<String, serde_json::Value>,
    pub development_history: Vec<DevelopmentRecord>,
    pub user_preferences: BTreeMap<String, String>,
    pub conversation_summary: String,
    pub messages: Vec<Message>,
    pub current_step: u32,
    pub current_conversation_turn: u32,

    /// Questions queued for the user this conversation. Intentionally
    /// not part of the session document.
    #[serde(skip)]
    pub pending_clarifications: Vec<String>,
}

impl SessionState {
    /// Create a fresh session with a time-derived id
    pub fn new() -> Self {
        let now = chrono::Local::now();
        Self {
            schema_version: SCHEMA_VERSION,
            session_id: format!("session_{}", now.format("%Y%m%d_%H%M%S")),
            created_at: now.to_rfc3339(),
            conversation_context: BTreeMap::new(),
            development_history: Vec::new(),
            user_preferences: BTreeMap::new(),
            conversation_summary: String::new(),
            messages: Vec::new(),
            current_step: 0,
            current_conversation_turn: 0,
            pending_clarifications: Vec::new(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Migrate a parsed session document up to the current schema version
pub fn migrate(state: &mut SessionState) {
    // Version 1 is current - nothing to do yet.
    state.schema_version = SCHEMA_VERSION;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_zeroed_counters() {
        let state = SessionState::new();
        assert_eq!(state.current_step, 0);
        assert_eq!(state.current_conversation_turn, 0);
        assert!(state.session_id.starts_with("session_"));
    }

    #[test]
    fn test_pending_clarifications_not_serialized() {
        let mut state = SessionState::new();
        state.pending_clarifications.push("which database?".to_string());

        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("pending_clarifications"));

        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert!(back.pending_clarifications.is_empty());
    }

    #[test]
    fn test_schema_version_defaults_for_old_files() {
        let json = r#"{
            "session_id": "session_20250101_000000",
            "created_at": "2025-01-01T00:00:00+00:00",
            "conversation_context": {},
            "development_history": [],
            "user_preferences": {},
            "conversation_summary": "",
            "messages": [],
            "current_step": 3,
            "current_conversation_turn": 2
        }"#;

        let mut state: SessionState = serde_json::from_str(json).unwrap();
        assert_eq!(state.schema_version, 1);
        migrate(&mut state);
        assert_eq!(state.schema_version, SCHEMA_VERSION);
        assert_eq!(state.current_step, 3);
    }
}
