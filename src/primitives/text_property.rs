//! Field properties for REPL buffers
//!
//! This module provides text properties restricted to the three
//! layers a REPL buffer needs: a field tag (`output` or `input`), a read-only
//! flag and a display style. Each layer is a [`SpanMap`], so a byte position
//! carries at most one value per layer, and neighbouring spans holding the
//! same value are always stored as a single span.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Semantic role of a stretch of REPL text.
///
/// Prompt text is deliberately left without a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTag {
    /// Text emitted by the managed process
    Output,
    /// Text submitted by the user
    Input,
}

/// A value attached to a byte range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span<T> {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    pub value: T,
}

impl<T> Span<T> {
    pub fn new(start: usize, end: usize, value: T) -> Self {
        Self { start, end, value }
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Sorted, non-overlapping spans.
///
/// Writing a value over a range replaces whatever was there, splitting the
/// spans at the edges. Adjacent spans with equal values are merged on write.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanMap<T> {
    spans: Vec<Span<T>>,
}

impl<T> Default for SpanMap<T> {
    fn default() -> Self {
        Self { spans: Vec::new() }
    }
}

impl<T: Clone + PartialEq> SpanMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the span covering a byte position
    pub fn span_at(&self, pos: usize) -> Option<&Span<T>> {
        let idx = self.spans.partition_point(|s| s.end <= pos);
        self.spans.get(idx).filter(|s| s.contains(pos))
    }

    /// Get the value at a byte position
    pub fn get(&self, pos: usize) -> Option<&T> {
        self.span_at(pos).map(|s| &s.value)
    }

    /// Set `value` over `range`, replacing anything previously there
    pub fn set(&mut self, range: Range<usize>, value: T) {
        if range.is_empty() {
            return;
        }
        self.remove_range(&range);
        let idx = self.spans.partition_point(|s| s.start < range.start);
        self.spans.insert(idx, Span::new(range.start, range.end, value));
        self.merge_neighbours(idx);
    }

    /// Remove all values in a range, trimming spans that straddle its edges
    pub fn remove_range(&mut self, range: &Range<usize>) {
        if range.is_empty() {
            return;
        }
        let first = self.spans.partition_point(|s| s.end <= range.start);
        let last = self.spans.partition_point(|s| s.start < range.end);
        if first >= last {
            return;
        }

        let mut remainder = Vec::with_capacity(2);
        let head = &self.spans[first];
        if head.start < range.start {
            remainder.push(Span::new(head.start, range.start, head.value.clone()));
        }
        let tail = &self.spans[last - 1];
        if tail.end > range.end {
            remainder.push(Span::new(range.end, tail.end, tail.value.clone()));
        }
        self.spans.splice(first..last, remainder);
    }

    pub fn all(&self) -> &[Span<T>] {
        &self.spans
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Span<T>> {
        self.spans.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    fn merge_neighbours(&mut self, idx: usize) {
        let mut idx = idx;
        if idx > 0 {
            let prev = &self.spans[idx - 1];
            let cur = &self.spans[idx];
            if prev.end == cur.start && prev.value == cur.value {
                let end = cur.end;
                self.spans.remove(idx);
                idx -= 1;
                self.spans[idx].end = end;
            }
        }
        if idx + 1 < self.spans.len() {
            let cur = &self.spans[idx];
            let next = &self.spans[idx + 1];
            if cur.end == next.start && cur.value == next.value {
                let end = next.end;
                self.spans.remove(idx + 1);
                self.spans[idx].end = end;
            }
        }
    }
}

/// Manager for the field properties of one REPL buffer
///
/// The manager stores attributes only. Deciding which text is output, and
/// keeping closed regions frozen, is the job of the classifier.
#[derive(Debug, Clone, Default)]
pub struct FieldPropertyManager {
    fields: SpanMap<FieldTag>,
    read_only: SpanMap<()>,
    styles: SpanMap<String>,
}

impl FieldPropertyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the field tag at a byte position
    pub fn field_at(&self, pos: usize) -> Option<FieldTag> {
        self.fields.get(pos).copied()
    }

    /// Get the span of the field covering a byte position
    pub fn field_span_at(&self, pos: usize) -> Option<&Span<FieldTag>> {
        self.fields.span_at(pos)
    }

    pub fn is_read_only(&self, pos: usize) -> bool {
        self.read_only.get(pos).is_some()
    }

    /// Get the display style at a byte position
    pub fn style_at(&self, pos: usize) -> Option<&str> {
        self.styles.get(pos).map(String::as_str)
    }

    pub fn set_field(&mut self, range: Range<usize>, tag: FieldTag) {
        self.fields.set(range, tag);
    }

    pub fn set_read_only(&mut self, range: Range<usize>) {
        self.read_only.set(range, ());
    }

    pub fn set_style(&mut self, range: Range<usize>, style: &str) {
        self.styles.set(range, style.to_string());
    }

    /// Remove display styles in a range; field tags are untouched
    pub fn clear_styles(&mut self, range: Range<usize>) {
        self.styles.remove_range(&range);
    }

    pub fn fields(&self) -> &SpanMap<FieldTag> {
        &self.fields
    }

    pub fn styles(&self) -> &SpanMap<String> {
        &self.styles
    }

    /// All positions where any layer changes value, sorted and deduplicated
    pub fn boundaries(&self) -> Vec<usize> {
        let mut edges: Vec<usize> = self
            .fields
            .iter()
            .flat_map(|s| [s.start, s.end])
            .chain(self.read_only.iter().flat_map(|s| [s.start, s.end]))
            .chain(self.styles.iter().flat_map(|s| [s.start, s.end]))
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_write() -> impl Strategy<Value = (usize, usize, u8)> {
        (0usize..100, 0usize..30, 0u8..3)
            .prop_map(|(start, len, value)| (start, start + len, value))
    }

    proptest! {
        /// Spans stay sorted, non-empty, non-overlapping and maximally merged
        #[test]
        fn prop_spans_are_canonical(writes in prop::collection::vec(arb_write(), 1..40)) {
            let mut map = SpanMap::new();
            for (start, end, value) in writes {
                map.set(start..end, value);
            }

            for span in map.iter() {
                prop_assert!(span.start < span.end);
            }
            for pair in map.all().windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
                if pair[0].end == pair[1].start {
                    prop_assert!(pair[0].value != pair[1].value);
                }
            }
        }

        /// The last write over a position wins
        #[test]
        fn prop_last_write_wins(writes in prop::collection::vec(arb_write(), 1..40)) {
            let mut map = SpanMap::new();
            let mut model = vec![None; 130];
            for (start, end, value) in writes {
                map.set(start..end, value);
                for slot in &mut model[start..end] {
                    *slot = Some(value);
                }
            }

            for (pos, expected) in model.iter().enumerate() {
                prop_assert_eq!(map.get(pos), expected.as_ref());
            }
        }
    }
}
