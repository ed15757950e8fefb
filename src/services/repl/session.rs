use super::classifier::OutputFieldClassifier;
use super::tracker::{JobControlTracker, ReadinessTracker};
use super::{SessionEvent, SessionId};
use crate::config::ReplConfig;
use crate::model::buffer::{FieldRegion, ReplBuffer};

/// State of one REPL session: its buffer and the trackers attached to it
#[derive(Debug, Clone)]
pub struct ReplSession {
    id: SessionId,
    buffer: ReplBuffer,
    classifier: OutputFieldClassifier,
    readiness: ReadinessTracker,
    job_control: JobControlTracker,
    completion_enabled: bool,
}

impl ReplSession {
    pub fn new(id: SessionId, config: &ReplConfig) -> Self {
        let classifier = OutputFieldClassifier::new(config.prompt_matcher(), &config.output_face)
            .with_partial_prompt_hold(config.hold_partial_prompts);
        Self {
            id,
            buffer: ReplBuffer::new(),
            classifier,
            readiness: ReadinessTracker::new(&config.bell_hint),
            job_control: JobControlTracker::new(),
            completion_enabled: config.completion_enabled,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn buffer(&self) -> &ReplBuffer {
        &self.buffer
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub fn in_job_control(&self) -> bool {
        self.job_control.in_job_control()
    }

    pub fn completion_enabled(&self) -> bool {
        self.completion_enabled
    }

    pub fn regions(&self) -> Vec<FieldRegion> {
        self.buffer.regions()
    }

    /// Handle one chunk of output from the shell, in delivery order
    pub fn handle_output(&mut self, chunk: &str) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        let inspection = self.readiness.inspect(chunk, self.classifier.matcher());
        if inspection.became_ready {
            self.push_ready(&mut events);
        }

        let text = inspection.text;
        if text.is_empty() {
            return events;
        }

        let appended = self.buffer.append_output(&text);
        let last_input = self.buffer.last_input_range();
        let outcome = self.classifier.finalize_output_chunk(
            &mut self.buffer,
            &text,
            last_input,
            appended.start,
        );

        // A prompt split across chunks is only seen once the buffer holds all of it.
        if outcome.prompt.is_some() && self.readiness.mark_ready() {
            self.push_ready(&mut events);
        }

        let start = self.buffer.output_run_start(outcome.search_start);
        let end = self.buffer.process_mark();
        let styled = self.classifier.classify_output_field(&mut self.buffer, start, end);

        tracing::debug!(
            "Session {}: {} byte chunk, classified {}..{} ({} output regions)",
            self.id,
            text.len(),
            start,
            end,
            styled.len()
        );
        events
    }

    /// Handle a line submitted by the user
    pub fn submit_input(&mut self, line: &str) -> Vec<SessionEvent> {
        self.classifier.discard_held_prompt();
        let range = self.buffer.append_input(line);

        let was_job_control = self.job_control.in_job_control();
        let enabled = self.job_control.on_input(line);
        if was_job_control != self.job_control.in_job_control() {
            tracing::info!(
                "Session {} {} job control",
                self.id,
                if was_job_control { "left" } else { "entered" }
            );
        }
        tracing::debug!("Session {}: input {:?}", self.id, range);

        self.completion_enabled = enabled;
        vec![SessionEvent::CompletionRequested {
            session_id: self.id.clone(),
            enabled,
        }]
    }

    fn push_ready(&self, events: &mut Vec<SessionEvent>) {
        tracing::info!("Session {} is ready", self.id);
        events.push(SessionEvent::Ready {
            session_id: self.id.clone(),
        });
    }
}
