//! Mutation applier: commit buffered edits in one pass.
//!
//! The scan ran asynchronously, so every buffered mutation is re-verified
//! against the live tree before it is applied; stale references are skipped
//! silently. The pass itself is synchronous, so observers never see a
//! half-applied highlight set.

use crate::config::Settings;
use crate::dom::{Document, NodeId};
use crate::engine::markup::{self, Marker, Segment, MATCH_CLASS};
use crate::engine::scanner::PendingMutation;

/// Apply a batch of pending mutations, then style every primary match.
///
/// Each original text node is replaced by a `span` wrapper whose children
/// come from the mutation's markup. After all replacements, primary
/// matches get the highlight colors and their font size in a single pass;
/// font size is set once and never toggled by blinking.
pub fn commit(doc: &mut Document, ops: Vec<PendingMutation>, settings: &Settings) {
    let total = ops.len();
    let mut applied = 0;
    for op in ops {
        // The DOM may have changed during the scan
        if !doc.contains(op.parent, op.node) {
            continue;
        }
        let wrapper = build_wrapper(doc, &op.markup);
        if doc.replace_child(op.parent, wrapper, op.node) {
            applied += 1;
        }
    }
    if applied < total {
        log::debug!("commit: {} of {} mutations applied, rest stale", applied, total);
    }

    let matches = doc.elements_with_class(MATCH_CLASS);
    set_highlighted(doc, &matches, settings, true);
    let font_size = format!("{}px", settings.match_font_size);
    for &m in &matches {
        doc.set_style_property(m, "font-size", &font_size);
    }
}

/// Build the wrapper element for one mutation from its markup string.
fn build_wrapper(doc: &mut Document, markup_text: &str) -> NodeId {
    let wrapper = doc.create_element("span");
    for segment in markup::parse(markup_text) {
        match segment {
            Segment::Text(text) => {
                let t = doc.create_text(&text);
                doc.append_child(wrapper, t);
            }
            Segment::Marked { marker, text } => {
                let span = doc.create_element("span");
                doc.set_attribute(span, "class", marker.class_name());
                let t = doc.create_text(&text);
                doc.append_child(span, t);
                doc.append_child(wrapper, span);
            }
        }
    }
    wrapper
}

/// Toggle the highlight visual on a set of elements.
///
/// Highlighted sets the configured background and text colors; not
/// highlighted removes both properties, falling back to page styling.
pub(crate) fn set_highlighted(
    doc: &mut Document,
    elements: &[NodeId],
    settings: &Settings,
    highlighted: bool,
) {
    for &el in elements {
        if highlighted {
            doc.set_style_property(el, "background-color", &settings.highlight_bg_color);
            doc.set_style_property(el, "color", &settings.highlight_text_color);
        } else {
            doc.remove_style_property(el, "background-color");
            doc.remove_style_property(el, "color");
        }
    }
}

/// Convenience for [`Marker`]-based styling in the blink scheduler.
pub(crate) fn set_marker_class_highlighted(
    doc: &mut Document,
    marker: Marker,
    settings: &Settings,
    highlighted: bool,
) {
    let elements = doc.elements_with_class(marker.class_name());
    set_highlighted(doc, &elements, settings, highlighted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::markup::CONTEXT_CLASS;

    fn page_with_text(text: &str) -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.create_element("div");
        let t = doc.create_text(text);
        doc.append_child(div, t);
        doc.append_child(body, div);
        (doc, div, t)
    }

    #[test]
    fn test_commit_replaces_text_node_with_wrapper() {
        let (mut doc, div, t) = page_with_text("a needle b");
        let markup = format!(
            "a {} b",
            markup::wrap(Marker::Match, "needle")
        );
        let ops = vec![PendingMutation {
            parent: div,
            node: t,
            markup,
        }];
        commit(&mut doc, ops, &Settings::default());

        assert!(!doc.is_attached(t));
        assert_eq!(doc.text_content(div), "a needle b");
        let matches = doc.elements_with_class(MATCH_CLASS);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            doc.style_property(matches[0], "background-color"),
            Some("#ffff00")
        );
        assert_eq!(doc.style_property(matches[0], "color"), Some("#000"));
        assert_eq!(doc.style_property(matches[0], "font-size"), Some("20px"));
    }

    #[test]
    fn test_commit_skips_stale_nodes_silently() {
        let (mut doc, div, t) = page_with_text("needle");
        // Page script removed the node while the scan was in flight
        doc.detach(t);
        let ops = vec![PendingMutation {
            parent: div,
            node: t,
            markup: markup::wrap(Marker::Match, "needle"),
        }];
        commit(&mut doc, ops, &Settings::default());
        assert!(doc.elements_with_class(MATCH_CLASS).is_empty());
        assert_eq!(doc.text_content(div), "");
    }

    #[test]
    fn test_commit_styles_context_markers_unlit() {
        let (mut doc, div, t) = page_with_text("a needle");
        let markup = format!(
            "{} {}",
            markup::wrap(Marker::Context, "a"),
            markup::wrap(Marker::Match, "needle")
        );
        commit(
            &mut doc,
            vec![PendingMutation {
                parent: div,
                node: t,
                markup,
            }],
            &Settings::default(),
        );
        let context = doc.elements_with_class(CONTEXT_CLASS);
        assert_eq!(context.len(), 1);
        // Context markers start without the highlight visual
        assert_eq!(doc.style_property(context[0], "background-color"), None);
        assert_eq!(doc.style_property(context[0], "font-size"), None);
    }

    #[test]
    fn test_set_highlighted_toggle() {
        let (mut doc, div, _) = page_with_text("x");
        let settings = Settings::default();
        set_highlighted(&mut doc, &[div], &settings, true);
        assert_eq!(doc.style_property(div, "background-color"), Some("#ffff00"));
        set_highlighted(&mut doc, &[div], &settings, false);
        assert_eq!(doc.style_property(div, "background-color"), None);
        assert_eq!(doc.style_property(div, "color"), None);
    }
}
