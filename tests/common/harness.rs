use fresh_repl::config::ReplConfig;
use fresh_repl::primitives::text_property::FieldTag;
use fresh_repl::services::repl::{SessionEvent, SessionId, SessionManager};

/// Drives one session through a [`SessionManager`] and records every event
pub struct ReplHarness {
    pub manager: SessionManager,
    pub id: SessionId,
    pub events: Vec<SessionEvent>,
}

impl ReplHarness {
    pub fn new() -> Self {
        Self::with_config(ReplConfig::default())
    }

    pub fn with_config(config: ReplConfig) -> Self {
        super::tracing::init_tracing_from_env();
        let mut manager = SessionManager::new(config);
        let id = SessionId::from_string("s1".to_string());
        manager.open_with_id(id.clone(), "/tmp/a");
        Self {
            manager,
            id,
            events: Vec::new(),
        }
    }

    pub fn output(&mut self, chunk: &str) -> &mut Self {
        let events = self
            .manager
            .handle_output(&self.id, chunk)
            .expect("session is open");
        self.events.extend(events);
        self
    }

    pub fn input(&mut self, line: &str) -> &mut Self {
        let events = self
            .manager
            .submit_input(&self.id, line)
            .expect("session is open");
        self.events.extend(events);
        self
    }

    pub fn text(&self) -> String {
        self.session().buffer().text().to_string()
    }

    /// All text carrying `tag`, concatenated in buffer order
    pub fn tagged(&self, tag: FieldTag) -> String {
        let buffer = self.session().buffer();
        buffer
            .text()
            .char_indices()
            .filter(|(i, _)| buffer.field_at(*i) == Some(tag))
            .map(|(_, c)| c)
            .collect()
    }

    /// All text carrying any style, concatenated in buffer order
    pub fn styled(&self) -> String {
        let buffer = self.session().buffer();
        buffer
            .text()
            .char_indices()
            .filter(|(i, _)| buffer.style_at(*i).is_some())
            .map(|(_, c)| c)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(*e)).count()
    }

    pub fn session(&self) -> &fresh_repl::services::repl::ReplSession {
        self.manager.session(&self.id).expect("session is open")
    }
}
