//! Turn dispatch - the session state machine
//!
//! `RUNNING -> RUNNING` on a normal turn, `RUNNING -> AWAITING_USER_INPUT`
//! when ask_human is selected, `RUNNING -> TERMINATED` via the terminate
//! tool or the hard step ceiling.

mod engine;

pub use engine::{DispatchLoop, DispatchState};
