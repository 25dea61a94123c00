//! Marker classes and annotated-span markup.
//!
//! The tokenizer emits replacement markup strings in which matched tokens
//! are wrapped in a primary-match span and neighboring tokens in a context
//! span. Exactly two marker classes exist, and downstream components key on
//! them: the registry selects matches by [`MATCH_CLASS`] and the selected
//! blink walk follows [`CONTEXT_CLASS`] siblings.
//!
//! The parser here is deliberately lenient: only the two marker span
//! openings and their `</span>` closers are treated as markup. Any other
//! `<` is literal page text, so arbitrary text content survives a
//! wrap/strip round trip byte for byte.

/// Class carried by a primary match wrapper.
pub const MATCH_CLASS: &str = "blink";

/// Class carried by a surrounding-word context wrapper.
pub const CONTEXT_CLASS: &str = "blink-off";

/// Shared prefix of both marker openings; tokens containing it are already
/// processed and must not be wrapped again.
pub const MARKER_GUARD: &str = "<span class=\"blink";

const OPEN_MATCH: &str = "<span class=\"blink\">";
const OPEN_CONTEXT: &str = "<span class=\"blink-off\">";
const CLOSE: &str = "</span>";

/// Which of the two markers a wrapped segment carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// A matched token (or matched substring within a token).
    Match,
    /// A neighboring word inside the surrounding-word window.
    Context,
}

impl Marker {
    /// The marker's class attribute value.
    pub fn class_name(self) -> &'static str {
        match self {
            Marker::Match => MATCH_CLASS,
            Marker::Context => CONTEXT_CLASS,
        }
    }

    fn open_tag(self) -> &'static str {
        match self {
            Marker::Match => OPEN_MATCH,
            Marker::Context => OPEN_CONTEXT,
        }
    }
}

/// One piece of a parsed replacement markup string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text outside any marker.
    Text(String),
    /// Text wrapped in one of the two markers.
    Marked {
        /// Which marker wraps the text
        marker: Marker,
        /// The wrapped text
        text: String,
    },
}

/// Wrap `text` in the given marker's span.
pub fn wrap(marker: Marker, text: &str) -> String {
    format!("{}{}{}", marker.open_tag(), text, CLOSE)
}

/// Split a replacement markup string into literal and marked segments.
///
/// A marker span without a closer runs to the end of input; a stray closer
/// outside any span is literal text.
pub fn parse(markup: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = markup;

    while !rest.is_empty() {
        let next_match = rest.find(OPEN_MATCH);
        let next_context = rest.find(OPEN_CONTEXT);
        let (pos, marker, open_len) = match (next_match, next_context) {
            (Some(m), Some(c)) if m <= c => (m, Marker::Match, OPEN_MATCH.len()),
            (_, Some(c)) => (c, Marker::Context, OPEN_CONTEXT.len()),
            (Some(m), None) => (m, Marker::Match, OPEN_MATCH.len()),
            (None, None) => {
                segments.push(Segment::Text(rest.to_string()));
                break;
            }
        };
        if pos > 0 {
            segments.push(Segment::Text(rest[..pos].to_string()));
        }
        let after_open = &rest[pos + open_len..];
        let (inner, remaining) = match after_open.find(CLOSE) {
            Some(end) => (&after_open[..end], &after_open[end + CLOSE.len()..]),
            None => (after_open, ""),
        };
        segments.push(Segment::Marked {
            marker,
            text: inner.to_string(),
        });
        rest = remaining;
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_produces_marker_spans() {
        assert_eq!(
            wrap(Marker::Match, "needle"),
            "<span class=\"blink\">needle</span>"
        );
        assert_eq!(
            wrap(Marker::Context, "word"),
            "<span class=\"blink-off\">word</span>"
        );
    }

    #[test]
    fn test_parse_mixed_segments() {
        let markup = format!(
            "a {} {} z",
            wrap(Marker::Context, "b"),
            wrap(Marker::Match, "c")
        );
        assert_eq!(
            parse(&markup),
            vec![
                Segment::Text("a ".to_string()),
                Segment::Marked {
                    marker: Marker::Context,
                    text: "b".to_string()
                },
                Segment::Text(" ".to_string()),
                Segment::Marked {
                    marker: Marker::Match,
                    text: "c".to_string()
                },
                Segment::Text(" z".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_partial_token_wrap() {
        // A match inside a token keeps the unmatched characters literal
        let markup = "pre<span class=\"blink\">hit</span>post";
        assert_eq!(
            parse(markup),
            vec![
                Segment::Text("pre".to_string()),
                Segment::Marked {
                    marker: Marker::Match,
                    text: "hit".to_string()
                },
                Segment::Text("post".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_treats_foreign_markup_as_text() {
        let markup = "a <b>bold</b> </span> c";
        assert_eq!(parse(markup), vec![Segment::Text(markup.to_string())]);
    }

    #[test]
    fn test_parse_unterminated_span_runs_to_end() {
        let markup = "x <span class=\"blink\">tail";
        assert_eq!(
            parse(markup),
            vec![
                Segment::Text("x ".to_string()),
                Segment::Marked {
                    marker: Marker::Match,
                    text: "tail".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_roundtrip_preserves_text() {
        let original = "alpha beta gamma";
        let markup = format!(
            "alpha {} gamma",
            wrap(Marker::Match, "beta")
        );
        let text: String = parse(&markup)
            .into_iter()
            .map(|s| match s {
                Segment::Text(t) => t,
                Segment::Marked { text, .. } => text,
            })
            .collect();
        assert_eq!(text, original);
    }
}
