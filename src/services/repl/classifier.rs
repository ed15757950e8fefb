//! Incremental output field classification
//!
//! Output from the managed process is classified in two passes per chunk:
//!
//! 1. [`OutputFieldClassifier::finalize_output_chunk`] runs once per delivered
//!    chunk. It freezes the last submitted input line and tags the text
//!    between the previous chunk boundary and the next prompt (or the process
//!    mark when no prompt arrived yet) as read-only `output`.
//!
//! 2. [`OutputFieldClassifier::classify_output_field`] scans a span left to
//!    right, closes every maximal `output` run it finds and gives it the
//!    output style. Prompt text is skipped and never styled. Styles inside
//!    the span are recomputed from scratch, so scanning the same span twice
//!    gives the same result and callers can re-scan from the start of the
//!    current output run to merge regions that grew across chunks.

use std::ops::Range;

use crate::model::buffer::ReplBuffer;
use crate::primitives::prompt::{PromptMatch, PromptMatcher};
use crate::primitives::text_property::FieldTag;

/// What [`OutputFieldClassifier::finalize_output_chunk`] did with a chunk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkFinalization {
    /// Position the prompt search started from
    pub search_start: usize,
    /// Range newly tagged as output, if any
    pub output: Option<Range<usize>>,
    /// First prompt found in the searched range
    pub prompt: Option<PromptMatch>,
    /// Start of a trailing prompt prefix held back for the next chunk
    pub held_prompt_start: Option<usize>,
}

/// Classifies REPL output into output and prompt fields
#[derive(Debug, Clone)]
pub struct OutputFieldClassifier {
    matcher: PromptMatcher,
    output_face: String,
    hold_partial_prompts: bool,
    held_prompt_start: Option<usize>,
}

impl OutputFieldClassifier {
    pub fn new(matcher: PromptMatcher, output_face: impl Into<String>) -> Self {
        Self {
            matcher,
            output_face: output_face.into(),
            hold_partial_prompts: false,
            held_prompt_start: None,
        }
    }

    /// Hold back a trailing prompt prefix until the next chunk shows whether
    /// it completes a prompt
    pub fn with_partial_prompt_hold(mut self, enabled: bool) -> Self {
        self.hold_partial_prompts = enabled;
        self
    }

    pub fn matcher(&self) -> &PromptMatcher {
        &self.matcher
    }

    pub fn held_prompt_start(&self) -> Option<usize> {
        self.held_prompt_start
    }

    /// Forget a held prompt prefix, leaving its text untagged.
    ///
    /// Called when input is appended after it, since the next output chunk
    /// no longer continues the held text.
    pub fn discard_held_prompt(&mut self) {
        if let Some(start) = self.held_prompt_start.take() {
            tracing::debug!("Discarding held prompt prefix at {}", start);
        }
    }

    /// Style every maximal output run in `start..end`.
    ///
    /// Positions before `start` must already be final. Returns the ranges that
    /// were styled.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end` lies past the end of the buffer.
    pub fn classify_output_field(
        &self,
        buffer: &mut ReplBuffer,
        start: usize,
        end: usize,
    ) -> Vec<Range<usize>> {
        assert!(
            start <= end && end <= buffer.len(),
            "classification span {}..{} outside buffer of {} bytes",
            start,
            end,
            buffer.len()
        );

        let text = buffer.text();
        let properties = buffer.properties();
        let mut closed = Vec::new();
        let mut pending_output_start: Option<usize> = None;
        let mut pos = start;

        while pos < end {
            if let Some(prompt) = self.matcher.prompt_at(text, pos) {
                if let Some(open) = pending_output_start.take() {
                    closed.push(open..prompt.start);
                }
                pos = prompt.end;
                continue;
            }

            let is_output = properties.field_at(pos) == Some(FieldTag::Output);
            match pending_output_start {
                None if is_output => pending_output_start = Some(pos),
                Some(open) if !is_output => {
                    closed.push(open..pos);
                    pending_output_start = None;
                }
                _ => {}
            }
            pos += text[pos..].chars().next().map_or(1, char::len_utf8);
        }

        if let Some(open) = pending_output_start {
            closed.push(open..end);
        }

        closed.retain(|r| !r.is_empty());
        buffer.properties_mut().clear_styles(start..end);
        for range in &closed {
            tracing::trace!("Styling output field {:?}", range);
            buffer.properties_mut().set_style(range.clone(), &self.output_face);
        }
        closed
    }

    /// Tag the output delivered by one chunk.
    ///
    /// `chunk` has already been appended at `last_output_start`. The last
    /// input range is made read-only, then the text from `last_output_start`
    /// (or from a held prompt prefix) up to the first prompt, or up to the
    /// process mark when there is none, is tagged read-only output. The
    /// character right before a prompt stays untagged. With the partial
    /// prompt hold on, a prompt prefix ending the chunk is held back even
    /// when a complete prompt precedes it.
    pub fn finalize_output_chunk(
        &mut self,
        buffer: &mut ReplBuffer,
        chunk: &str,
        last_input: Range<usize>,
        last_output_start: usize,
    ) -> ChunkFinalization {
        if chunk.is_empty() {
            return ChunkFinalization {
                search_start: last_output_start,
                held_prompt_start: self.held_prompt_start,
                ..Default::default()
            };
        }

        if !last_input.is_empty() {
            buffer.properties_mut().set_read_only(last_input);
        }

        let search_start = self
            .held_prompt_start
            .take()
            .map_or(last_output_start, |held| held.min(last_output_start));
        let chunk_end = (last_output_start + chunk.len()).min(buffer.len());

        let prompt = self
            .matcher
            .find_prompt(buffer.text(), search_start, chunk_end);

        // A prefix may trail the chunk whether or not a full prompt came first.
        let mark = buffer.process_mark();
        self.held_prompt_start = if self.hold_partial_prompts {
            let from = prompt.map_or(search_start, |p| p.end);
            self.matcher.partial_prompt_start(buffer.text(), from, mark)
        } else {
            None
        };

        let output_end = match prompt {
            Some(prompt) => buffer.text()[..prompt.start]
                .chars()
                .next_back()
                .map_or(prompt.start, |c| prompt.start - c.len_utf8()),
            None => self.held_prompt_start.unwrap_or(mark),
        };

        let output = (search_start < output_end).then(|| search_start..output_end);
        if let Some(range) = &output {
            let properties = buffer.properties_mut();
            properties.set_field(range.clone(), FieldTag::Output);
            properties.set_read_only(range.clone());
        }

        tracing::debug!(
            "Finalized chunk of {} bytes: output {:?}, prompt {:?}, held {:?}",
            chunk.len(),
            output,
            prompt,
            self.held_prompt_start
        );

        ChunkFinalization {
            search_start,
            output,
            prompt,
            held_prompt_start: self.held_prompt_start,
        }
    }
}
