//! Tokenizer & matcher: per-text-node annotation.
//!
//! Splits a text node's trimmed content on single spaces, wraps every
//! pattern hit inside a matched token in the primary marker, and wraps up
//! to `num_surrounding_words` neighbors on each side in the context marker.
//! Word-token granularity only; no Unicode segmentation.

use regex::Regex;

use crate::engine::markup::{self, Marker, MARKER_GUARD};

/// Annotates text-node content for one search invocation.
#[derive(Debug)]
pub struct TokenAnnotator {
    regex: Regex,
    num_surrounding_words: usize,
}

impl TokenAnnotator {
    /// Create an annotator from a compiled pattern.
    ///
    /// The pattern comes from the user's term unescaped, so regex
    /// metacharacters act as wildcards.
    pub fn new(regex: Regex, num_surrounding_words: usize) -> Self {
        Self {
            regex,
            num_surrounding_words,
        }
    }

    /// The compiled pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Annotate one text node's content.
    ///
    /// Returns the replacement markup string, or `None` when no token
    /// matched (no mutation to queue). Content is trimmed before
    /// tokenizing; interior spacing is preserved by the single-space
    /// split/join.
    pub fn annotate(&self, raw: &str) -> Option<String> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        let mut tokens: Vec<String> = text.split(' ').map(str::to_string).collect();
        let mut changed = false;

        for i in 0..tokens.len() {
            // Idempotence guard: never reprocess an already-wrapped token
            if tokens[i].contains(MARKER_GUARD) {
                continue;
            }
            if !self.regex.is_match(&tokens[i]) {
                continue;
            }
            tokens[i] = self
                .regex
                .replace_all(&tokens[i], |caps: &regex::Captures| {
                    markup::wrap(Marker::Match, &caps[0])
                })
                .into_owned();
            changed = true;

            for j in 1..=self.num_surrounding_words {
                if i >= j {
                    let left = i - j;
                    if self.should_wrap_context(&tokens[left]) {
                        tokens[left] = markup::wrap(Marker::Context, &tokens[left]);
                        changed = true;
                    }
                }
                let right = i + j;
                if right < tokens.len() && self.should_wrap_context(&tokens[right]) {
                    tokens[right] = markup::wrap(Marker::Context, &tokens[right]);
                    changed = true;
                }
            }
        }

        if changed {
            Some(tokens.join(" "))
        } else {
            None
        }
    }

    /// A neighbor gets the context marker unless it is empty, already
    /// carries a marker, or itself matches the pattern (a neighbor that is
    /// a match in its own right is never demoted to context).
    fn should_wrap_context(&self, token: &str) -> bool {
        !token.is_empty() && !token.contains("class=\"blink") && !self.regex.is_match(token)
    }
}
