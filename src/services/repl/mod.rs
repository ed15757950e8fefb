//! REPL session service
//!
//! Manages interactive sessions with a line-oriented shell process whose
//! output is shown in an editor buffer.
//!
//! # Data Flow
//!
//! 1. **Output chunk** (`session.rs`): the readiness tracker inspects the raw
//!    chunk and rewrites BEL characters, the text is appended at the process
//!    mark, then the classifier finalizes the chunk and restyles the output
//!    run it belongs to.
//!
//! 2. **Submitted input** (`session.rs`): the line is appended as an `input`
//!    field and the job-control tracker decides whether completion should be
//!    enabled. The line becomes read-only once the next output chunk arrives.
//!
//! 3. **Lifecycle** (`manager.rs`): sessions are opened, routed to and closed
//!    by [`SessionManager`], which keeps the [`SessionRegistry`] in sync.
//!
//! ## Module Responsibilities
//!
//! - `classifier.rs`: output/prompt field classification
//! - `tracker.rs`: readiness and job-control state
//! - `registry.rs`: session lookup by working directory
//! - `session.rs`: per-session record and chunk/input handlers
//! - `manager.rs`: session lifecycle and routing

pub mod classifier;
mod manager;
pub mod registry;
mod session;
pub mod tracker;

pub use manager::{SessionError, SessionManager};
pub use registry::SessionRegistry;
pub use session::ReplSession;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a REPL session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);
        Self(format!("repl_{}", NEXT_SESSION.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signals a session sends to its collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The shell printed its first prompt; tooling can attach to it now
    Ready { session_id: SessionId },

    /// Completion should be switched on or off
    CompletionRequested { session_id: SessionId, enabled: bool },

    /// The session was closed and removed from the registry
    Closed { session_id: SessionId },
}
