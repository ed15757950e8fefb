//! Recorded REPL traffic
//!
//! A transcript is a JSON-lines file with one event per line, either
//! `{"output": "..."}` for a chunk delivered by the shell or
//! `{"input": "..."}` for a line submitted by the user. Blank lines are
//! ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::services::repl::{ReplSession, SessionEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptEvent {
    Output(String),
    Input(String),
}

#[derive(Debug)]
pub enum TranscriptError {
    Io(std::io::Error),
    /// `line` is 1-based
    Parse { line: usize, message: String },
}

impl std::fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptError::Io(e) => write!(f, "IO error: {e}"),
            TranscriptError::Parse { line, message } => {
                write!(f, "Parse error on line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for TranscriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranscriptError::Io(e) => Some(e),
            TranscriptError::Parse { .. } => None,
        }
    }
}

impl From<std::io::Error> for TranscriptError {
    fn from(e: std::io::Error) -> Self {
        TranscriptError::Io(e)
    }
}

pub fn parse_transcript(contents: &str) -> Result<Vec<TranscriptEvent>, TranscriptError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| TranscriptError::Parse {
                line: idx + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

pub fn load_transcript<P: AsRef<Path>>(path: P) -> Result<Vec<TranscriptEvent>, TranscriptError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_transcript(&contents)
}

/// Feed every event to `session` in order and collect what it signalled
pub fn replay(session: &mut ReplSession, events: &[TranscriptEvent]) -> Vec<SessionEvent> {
    let mut signalled = Vec::new();
    for event in events {
        match event {
            TranscriptEvent::Output(chunk) => signalled.extend(session.handle_output(chunk)),
            TranscriptEvent::Input(line) => signalled.extend(session.submit_input(line)),
        }
    }
    tracing::debug!(
        "Replayed {} transcript events into session {}",
        events.len(),
        session.id()
    );
    signalled
}
