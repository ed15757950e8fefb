//! Prompt recognition for REPL output
//!
//! The managed shell signals that it is waiting for input by printing a
//! prompt such as `(node1@host)3> `: a parenthesised node name with an
//! optional `@host` part, an optional command counter, then `> `.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern for the shell prompt
pub const DEFAULT_PROMPT_PATTERN: &str = r"\([A-Za-z0-9_-]+(?:@[A-Za-z0-9_-]+)?\)[0-9]*> ";

/// Text that could still grow into a full prompt once more output arrives
const PARTIAL_PROMPT_PATTERN: &str = r"^\((?:[A-Za-z0-9_-]*|[A-Za-z0-9_-]+@[A-Za-z0-9_-]*|[A-Za-z0-9_-]+(?:@[A-Za-z0-9_-]+)?\)[0-9]*>?)$";

static DEFAULT_PROMPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_PROMPT_PATTERN).expect("default prompt pattern is valid"));

static DEFAULT_PROMPT_ANCHORED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^(?:{DEFAULT_PROMPT_PATTERN})"))
        .expect("default prompt pattern is valid")
});

static PARTIAL_PROMPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(PARTIAL_PROMPT_PATTERN).expect("partial prompt pattern is valid"));

/// Byte range of a prompt occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptMatch {
    pub start: usize,
    pub end: usize,
}

/// Finds prompts in buffer text
#[derive(Debug, Clone)]
pub struct PromptMatcher {
    regex: Regex,
    anchored: Regex,
    /// Only known for the built-in pattern
    partial: Option<Regex>,
}

impl Default for PromptMatcher {
    fn default() -> Self {
        Self {
            regex: DEFAULT_PROMPT.clone(),
            anchored: DEFAULT_PROMPT_ANCHORED.clone(),
            partial: Some(PARTIAL_PROMPT.clone()),
        }
    }
}

impl PromptMatcher {
    /// Matcher for the built-in prompt pattern
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher for a custom prompt pattern.
    ///
    /// Partial prompt detection is unavailable for custom patterns.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        let anchored = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self {
            regex,
            anchored,
            partial: None,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Find the first prompt starting at or after `from` that ends at or before `limit`
    pub fn find_prompt(&self, text: &str, from: usize, limit: usize) -> Option<PromptMatch> {
        let limit = limit.min(text.len());
        if from > limit || !text.is_char_boundary(from) || !text.is_char_boundary(limit) {
            return None;
        }
        self.regex
            .find_at(&text[..limit], from)
            .map(|m| PromptMatch {
                start: m.start(),
                end: m.end(),
            })
    }

    /// Match a prompt beginning exactly at `pos`
    pub fn prompt_at(&self, text: &str, pos: usize) -> Option<PromptMatch> {
        if pos > text.len() || !text.is_char_boundary(pos) {
            return None;
        }
        self.anchored.find(&text[pos..]).map(|m| PromptMatch {
            start: pos + m.start(),
            end: pos + m.end(),
        })
    }

    pub fn contains_prompt(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Start of a trailing prompt prefix in `text[from..limit]`, if any.
    ///
    /// A prompt prefix opens with `(` and runs to `limit`, so only the last
    /// `(` in the range can start one.
    pub fn partial_prompt_start(&self, text: &str, from: usize, limit: usize) -> Option<usize> {
        let partial = self.partial.as_ref()?;
        let limit = limit.min(text.len());
        if from >= limit || !text.is_char_boundary(from) || !text.is_char_boundary(limit) {
            return None;
        }
        let open = from + text[from..limit].rfind('(')?;
        partial.is_match(&text[open..limit]).then_some(open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_plain_node() {
        let matcher = PromptMatcher::new();
        let m = matcher.find_prompt("(node1)1> ", 0, 10).unwrap();
        assert_eq!((m.start, m.end), (0, 10));
    }

    #[test]
    fn test_matches_node_with_host_and_counter() {
        let matcher = PromptMatcher::new();
        let text = "ok\n(dev-1@my_host)42> ";
        let m = matcher.find_prompt(text, 0, text.len()).unwrap();
        assert_eq!(m.start, 3);
        assert_eq!(m.end, text.len());
    }

    #[test]
    fn test_counter_is_optional() {
        assert!(PromptMatcher::new().contains_prompt("(n)> "));
    }

    #[test]
    fn test_requires_trailing_space() {
        let matcher = PromptMatcher::new();
        assert!(!matcher.contains_prompt("(node1)1>"));
        assert!(!matcher.contains_prompt("(node1)1>x"));
    }

    #[test]
    fn test_rejects_malformed() {
        let matcher = PromptMatcher::new();
        assert!(!matcher.contains_prompt("()1> "));
        assert!(!matcher.contains_prompt("(node 1)1> "));
        assert!(!matcher.contains_prompt("(a@)1> "));
        assert!(!matcher.contains_prompt("(a@b@c)1> "));
    }

    #[test]
    fn test_find_respects_limit() {
        let matcher = PromptMatcher::new();
        let text = "(node1)1> ";
        assert!(matcher.find_prompt(text, 0, 9).is_none());
        assert!(matcher.find_prompt(text, 0, 10).is_some());
    }

    #[test]
    fn test_find_respects_from() {
        let matcher = PromptMatcher::new();
        let text = "(a)1> x(b)2> ";
        let m = matcher.find_prompt(text, 1, text.len()).unwrap();
        assert_eq!(m.start, 7);
    }

    #[test]
    fn test_prompt_at_is_anchored() {
        let matcher = PromptMatcher::new();
        let text = "x(a)1> ";
        assert!(matcher.prompt_at(text, 0).is_none());
        assert_eq!(
            matcher.prompt_at(text, 1),
            Some(PromptMatch { start: 1, end: 7 })
        );
        assert!(matcher.prompt_at(text, 7).is_none());
    }

    #[test]
    fn test_prompt_at_off_char_boundary() {
        let matcher = PromptMatcher::new();
        assert!(matcher.prompt_at("é(a)1> ", 1).is_none());
    }

    #[test]
    fn test_partial_prompt_prefixes() {
        let matcher = PromptMatcher::new();
        let full = "(node@host)12> ";
        for cut in 1..full.len() {
            let text = format!("out\n{}", &full[..cut]);
            assert_eq!(
                matcher.partial_prompt_start(&text, 0, text.len()),
                Some(4),
                "prefix {:?} should be held",
                &full[..cut]
            );
        }
    }

    #[test]
    fn test_partial_prompt_rejects_non_prompts() {
        let matcher = PromptMatcher::new();
        for text in ["f(x)\n", "(a b", "(a)1>x", "no parens", "(a)1> "] {
            assert_eq!(
                matcher.partial_prompt_start(text, 0, text.len()),
                None,
                "{text:?} is not a prompt prefix"
            );
        }
    }

    #[test]
    fn test_partial_prompt_respects_from() {
        let matcher = PromptMatcher::new();
        assert_eq!(matcher.partial_prompt_start("(ab", 1, 3), None);
    }

    #[test]
    fn test_custom_pattern() {
        let matcher = PromptMatcher::with_pattern(r"iex\([0-9]+\)> ").unwrap();
        assert!(matcher.contains_prompt("iex(3)> "));
        assert!(!matcher.contains_prompt("(node1)1> "));
        assert_eq!(matcher.partial_prompt_start("iex(", 0, 4), None);
    }

    #[test]
    fn test_invalid_custom_pattern() {
        assert!(PromptMatcher::with_pattern("(unclosed").is_err());
    }
}
