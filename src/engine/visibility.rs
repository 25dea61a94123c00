//! Visibility filter: which elements count as visible, searchable text.
//!
//! Approximates platform find-in-page semantics so hidden page chrome is
//! neither highlighted nor counted. The scanner consults
//! [`should_skip_element`] before descending into a subtree.

use crate::dom::{Document, NodeId};

const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "meta", "link",
];

/// Non-content tags whose subtrees are never searched.
pub fn is_excluded_tag(tag: &str) -> bool {
    EXCLUDED_TAGS
        .iter()
        .any(|t| t.eq_ignore_ascii_case(tag))
}

/// Whether the element is actually rendered and perceivable.
///
/// Walks the ancestor chain for explicit hiding (`hidden`, `inert`,
/// `aria-hidden="true"`, `display: none`, `visibility: hidden`, zero
/// opacity, `content-visibility: hidden`), then requires the element itself
/// to have a non-zero-area client rect.
pub fn is_element_actually_visible(doc: &Document, el: NodeId) -> bool {
    let mut cur = Some(el);
    while let Some(n) = cur {
        if !doc.is_element(n) {
            break;
        }
        if doc.has_attribute(n, "hidden") || doc.has_attribute(n, "inert") {
            return false;
        }
        if doc.attribute(n, "aria-hidden") == Some("true") {
            return false;
        }
        if let Some(style) = doc.style(n) {
            if style.get("display") == Some("none") || style.get("visibility") == Some("hidden") {
                return false;
            }
            if style.opacity() == 0.0 {
                return false;
            }
            if style.get("content-visibility") == Some("hidden") {
                return false;
            }
        }
        cur = doc.parent_element(n);
    }

    doc.client_rect(el).has_area()
}

/// Whether the scanner should skip this element and its whole subtree.
pub fn should_skip_element(doc: &Document, el: NodeId) -> bool {
    if let Some(tag) = doc.tag(el) {
        if is_excluded_tag(tag) {
            return true;
        }
    }
    !is_element_actually_visible(doc, el)
}
