use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::registry::SessionRegistry;
use super::session::ReplSession;
use super::{SessionEvent, SessionId};
use crate::config::ReplConfig;

/// Errors returned when routing to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    UnknownSession(SessionId),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::UnknownSession(id) => write!(f, "Unknown REPL session: {id}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Owns all live REPL sessions and keeps the registry in sync with them
#[derive(Debug)]
pub struct SessionManager {
    config: ReplConfig,
    sessions: HashMap<SessionId, ReplSession>,
    registry: SessionRegistry,
}

impl SessionManager {
    pub fn new(config: ReplConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
            registry: SessionRegistry::new(),
        }
    }

    /// Open a session with a freshly generated id
    pub fn open(&mut self, working_dir: impl Into<PathBuf>) -> SessionId {
        let id = SessionId::new();
        self.open_with_id(id.clone(), working_dir);
        id
    }

    /// Open a session under a caller-chosen id.
    ///
    /// Reusing the id of a live session replaces that session and moves its
    /// registry entry to the new directory.
    pub fn open_with_id(&mut self, id: SessionId, working_dir: impl Into<PathBuf>) {
        let working_dir = working_dir.into();
        tracing::info!("Opening REPL session {} in {:?}", id, working_dir);

        let session = ReplSession::new(id.clone(), &self.config);
        if self.sessions.insert(id.clone(), session).is_some() {
            tracing::warn!("Replaced existing REPL session {}", id);
        }
        self.registry.register(id, working_dir);
    }

    pub fn handle_output(
        &mut self,
        id: &SessionId,
        chunk: &str,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        Ok(self.session_mut(id)?.handle_output(chunk))
    }

    pub fn submit_input(
        &mut self,
        id: &SessionId,
        line: &str,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        Ok(self.session_mut(id)?.submit_input(line))
    }

    /// Close a session and drop it from the registry.
    ///
    /// Closing an unknown id does nothing and returns no events.
    pub fn close(&mut self, id: &SessionId) -> Vec<SessionEvent> {
        let entry = self.registry.remove(id);
        match self.sessions.remove(id) {
            Some(_) => {
                tracing::info!(
                    "Closed REPL session {} in {:?}",
                    id,
                    entry.map(|e| e.working_dir)
                );
                vec![SessionEvent::Closed {
                    session_id: id.clone(),
                }]
            }
            None => Vec::new(),
        }
    }

    /// First session opened in exactly `path`
    pub fn find_by_directory(&self, path: &Path) -> Option<&SessionId> {
        self.registry.find_by_directory(path)
    }

    pub fn session(&self, id: &SessionId) -> Result<&ReplSession, SessionError> {
        self.sessions
            .get(id)
            .ok_or_else(|| SessionError::UnknownSession(id.clone()))
    }

    pub fn session_mut(&mut self, id: &SessionId) -> Result<&mut ReplSession, SessionError> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownSession(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(ReplConfig::default())
    }
}
