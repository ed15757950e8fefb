//! Session readiness and job-control tracking
//!
//! Readiness is one-way: a session becomes ready the first time its output
//! contains a prompt and never goes back. Job control is entered by
//! submitting a line that ends with BEL (the shell's job-control escape) and
//! left by submitting anything else.

use std::borrow::Cow;

use serde::Serialize;

use crate::primitives::prompt::PromptMatcher;

/// The control character that enters job-control mode in the shell
pub const BELL: char = '\u{7}';

/// Key sequence shown in place of a BEL received from the shell
pub const DEFAULT_BELL_HINT: &str = "C-q C-g RET";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    #[default]
    NotReady,
    Ready,
}

/// Result of inspecting one raw output chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInspection<'a> {
    /// The chunk with every BEL replaced by the hint
    pub text: Cow<'a, str>,
    /// The session turned ready on this chunk
    pub became_ready: bool,
}

/// Replace every BEL in `chunk` with `hint`
pub fn rewrite_bell<'a>(chunk: &'a str, hint: &str) -> Cow<'a, str> {
    if chunk.contains(BELL) {
        Cow::Owned(chunk.replace(BELL, hint))
    } else {
        Cow::Borrowed(chunk)
    }
}

/// Tracks whether the shell has printed its first prompt
#[derive(Debug, Clone)]
pub struct ReadinessTracker {
    state: Readiness,
    bell_hint: String,
}

impl Default for ReadinessTracker {
    fn default() -> Self {
        Self::new(DEFAULT_BELL_HINT)
    }
}

impl ReadinessTracker {
    pub fn new(bell_hint: impl Into<String>) -> Self {
        Self {
            state: Readiness::NotReady,
            bell_hint: bell_hint.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == Readiness::Ready
    }

    /// Inspect a raw chunk before it is appended to the buffer.
    ///
    /// The BEL rewrite applies to every chunk, ready or not.
    pub fn inspect<'a>(
        &mut self,
        chunk: &'a str,
        matcher: &PromptMatcher,
    ) -> OutputInspection<'a> {
        let became_ready = !self.is_ready() && matcher.contains_prompt(chunk) && self.mark_ready();
        OutputInspection {
            text: rewrite_bell(chunk, &self.bell_hint),
            became_ready,
        }
    }

    /// Mark the session ready; returns true if this was the transition
    pub fn mark_ready(&mut self) -> bool {
        if self.is_ready() {
            return false;
        }
        self.state = Readiness::Ready;
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobControlMode {
    #[default]
    Normal,
    JobControl,
}

/// Whether a submitted line is the job-control escape (BEL then newline)
pub fn is_job_control_escape(line: &str) -> bool {
    line.strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .is_some_and(|rest| rest.ends_with(BELL))
}

/// Tracks job-control mode across submitted input lines
#[derive(Debug, Clone, Default)]
pub struct JobControlTracker {
    mode: JobControlMode,
}

impl JobControlTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_job_control(&self) -> bool {
        self.mode == JobControlMode::JobControl
    }

    /// Update the mode for a submitted line.
    ///
    /// Returns whether completion should be enabled afterwards. Every line
    /// yields a request: escape lines disable completion, all other lines
    /// enable it again, including lines submitted outside job control.
    pub fn on_input(&mut self, line: &str) -> bool {
        if is_job_control_escape(line) {
            self.mode = JobControlMode::JobControl;
            false
        } else {
            self.mode = JobControlMode::Normal;
            true
        }
    }
}
