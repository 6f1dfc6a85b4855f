//! Session state, persistence, and the manager that owns both
//!
//! A session is one persisted conversation: context map, development
//! history, preference map, transcript, and counters. One JSON document
//! per session id under the sessions directory.

mod manager;
mod state;
mod store;

pub use manager::SessionManager;
pub use state::{DevelopmentRecord, SCHEMA_VERSION, SessionState};
pub use store::{SessionStore, SessionStoreError, SessionSummary};
