//! Text buffer backing one REPL session
//!
//! Text only ever grows at the process mark. Output from the managed process
//! and submitted input lines are both appended there; nothing already in the
//! buffer is edited again, it is only tagged through the
//! [`FieldPropertyManager`].

use std::ops::Range;

use serde::Serialize;

use crate::primitives::text_property::{FieldPropertyManager, FieldTag};

/// A maximal run of text whose attributes are uniform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRegion {
    pub start: usize,
    pub end: usize,
    pub field: Option<FieldTag>,
    pub read_only: bool,
    pub style: Option<String>,
    pub text: String,
}

/// Append-only REPL buffer with field properties
#[derive(Debug, Clone, Default)]
pub struct ReplBuffer {
    text: String,
    properties: FieldPropertyManager,
    last_input: Range<usize>,
}

impl ReplBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Boundary between everything delivered so far and future text.
    pub fn process_mark(&self) -> usize {
        self.text.len()
    }

    /// Range of the most recently submitted input line
    pub fn last_input_range(&self) -> Range<usize> {
        self.last_input.clone()
    }

    /// Append an output chunk at the process mark.
    ///
    /// The chunk is left untagged; the classifier decides which part of it is
    /// output.
    pub fn append_output(&mut self, chunk: &str) -> Range<usize> {
        let start = self.process_mark();
        self.text.push_str(chunk);
        start..self.process_mark()
    }

    /// Append a submitted input line at the process mark, tagged as input
    pub fn append_input(&mut self, line: &str) -> Range<usize> {
        let start = self.process_mark();
        self.text.push_str(line);
        let range = start..self.process_mark();
        self.properties.set_field(range.clone(), FieldTag::Input);
        self.last_input = range.clone();
        range
    }

    pub fn properties(&self) -> &FieldPropertyManager {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut FieldPropertyManager {
        &mut self.properties
    }

    pub fn field_at(&self, pos: usize) -> Option<FieldTag> {
        self.properties.field_at(pos)
    }

    pub fn is_read_only(&self, pos: usize) -> bool {
        self.properties.is_read_only(pos)
    }

    pub fn style_at(&self, pos: usize) -> Option<&str> {
        self.properties.style_at(pos)
    }

    /// Start of the output run that `pos` belongs to or directly follows.
    ///
    /// Returns `pos` itself when neither `pos` nor the character before it is
    /// tagged as output.
    pub fn output_run_start(&self, pos: usize) -> usize {
        if let Some(span) = self
            .properties
            .field_span_at(pos)
            .filter(|s| s.value == FieldTag::Output)
        {
            return span.start;
        }
        let prev = self.text[..pos.min(self.len())]
            .chars()
            .next_back()
            .map(|c| pos - c.len_utf8());
        match prev.and_then(|p| self.properties.field_span_at(p)) {
            Some(span) if span.value == FieldTag::Output => span.start,
            _ => pos,
        }
    }

    /// List the buffer as consecutive regions of uniform attributes
    pub fn regions(&self) -> Vec<FieldRegion> {
        let mut edges = self.properties.boundaries();
        edges.push(0);
        edges.push(self.len());
        edges.retain(|&e| e <= self.len());
        edges.sort_unstable();
        edges.dedup();

        edges
            .windows(2)
            .filter(|w| w[0] < w[1])
            .map(|w| FieldRegion {
                start: w[0],
                end: w[1],
                field: self.field_at(w[0]),
                read_only: self.is_read_only(w[0]),
                style: self.style_at(w[0]).map(str::to_string),
                text: self.text[w[0]..w[1]].to_string(),
            })
            .collect()
    }
}
