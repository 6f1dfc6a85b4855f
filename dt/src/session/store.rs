//! SessionStore - one JSON document per session id
//!
//! Documents live under a single directory, `<dir>/<session_id>.json`.
//! Loading always parses the whole file into a fresh value before anyone
//! sees it - a failed parse leaves no partial state behind.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::state::{self, SessionState};

/// Errors from session persistence
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {}", path.display(), source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {}", path.display(), source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {}", path.display(), source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Summary of a saved session, for listings
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub session_id: String,
    pub file_path: PathBuf,
    pub created_at: String,
    pub conversation_turns: u32,
    pub steps: u32,
    pub summary: String,
}

/// Persistence for session documents in one directory
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create a store over the given directory (not created until first save)
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the session documents
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a session id
    pub fn session_path(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", session_id))
    }

    /// Write a session document, creating the directory if needed
    pub fn save(&self, state: &SessionState) -> Result<PathBuf, SessionStoreError> {
        let path = self.session_path(&state.session_id);
        debug!(path = %path.display(), "SessionStore::save: called");

        fs::create_dir_all(&self.dir).map_err(|e| SessionStoreError::Write {
            path: self.dir.clone(),
            source: e,
        })?;

        let content = serde_json::to_string_pretty(state).map_err(|e| SessionStoreError::Parse {
            path: path.clone(),
            source: e,
        })?;

        fs::write(&path, content).map_err(|e| SessionStoreError::Write {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }

    /// Read and parse a session document
    ///
    /// The whole file is read and parsed into a fresh value; callers only
    /// replace their state after this returns Ok.
    pub fn load(path: &Path) -> Result<SessionState, SessionStoreError> {
        debug!(path = %path.display(), "SessionStore::load: called");

        if !path.exists() {
            return Err(SessionStoreError::NotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path).map_err(|e| SessionStoreError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut state: SessionState = serde_json::from_str(&content).map_err(|e| SessionStoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        state::migrate(&mut state);
        Ok(state)
    }

    /// List all saved sessions, most recent first
    ///
    /// Each file is parsed independently; a file that fails to parse is
    /// skipped, not reported. Equal timestamps keep directory order.
    pub fn list(&self) -> Vec<SessionSummary> {
        debug!(dir = %self.dir.display(), "SessionStore::list: called");
        let mut sessions = Vec::new();

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return sessions,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match Self::load(&path) {
                    Ok(state) => sessions.push(SessionSummary {
                        session_id: state.session_id,
                        file_path: path,
                        created_at: state.created_at,
                        conversation_turns: state.current_conversation_turn,
                        steps: state.current_step,
                        summary: state.conversation_summary,
                    }),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable session file");
                    }
                }
            }
        }

        // Stable sort keeps directory order for equal timestamps
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions
    }
}
