//! Match registry and selection.
//!
//! Holds the ordered match handles for the current search and the selected
//! index. Invariant: the index is `None` iff the list is empty, otherwise
//! `0 <= index < len`.

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::dom::{Document, NodeId};
use crate::engine::markup::MATCH_CLASS;

/// Navigation direction for stepping between matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Step forward in document order.
    Next,
    /// Step backward in document order.
    Prev,
}

/// The ordered set of current match handles.
#[derive(Debug, Default)]
pub struct MatchRegistry {
    matches: Vec<NodeId>,
    current: Option<usize>,
}

impl MatchRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the live tree: one query over the primary marker
    /// class, document order. Clears the selection.
    pub fn rebuild(&mut self, doc: &Document) {
        self.matches = doc.elements_with_class(MATCH_CLASS);
        self.current = None;
    }

    /// Drop all handles and the selection.
    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
    }

    /// Number of matches.
    pub fn count(&self) -> usize {
        self.matches.len()
    }

    /// Whether no matches are registered.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The match handles in document order.
    pub fn matches(&self) -> &[NodeId] {
        &self.matches
    }

    /// The selected index, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// The handle at `index`.
    pub fn match_at(&self, index: usize) -> Option<NodeId> {
        self.matches.get(index).copied()
    }

    /// Set the selected index. Out-of-range indices clear the selection,
    /// preserving the registry invariant.
    pub fn set_current(&mut self, index: Option<usize>) {
        self.current = index.filter(|&i| i < self.matches.len());
    }

    /// The default selection: the match whose vertical center is closest
    /// to the viewport's vertical center. Strict `<` comparison, so ties
    /// go to the first match in document order.
    pub fn default_index(&self, doc: &Document) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let viewport_center = doc.scroll_y() + doc.viewport_height() / 2.0;
        let mut best_dist = f32::INFINITY;
        let mut best_idx = 0;
        for (i, &m) in self.matches.iter().enumerate() {
            let dist = (doc.client_rect(m).center_y() - viewport_center).abs();
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        Some(best_idx)
    }

    /// Apply the current selection's visual: clear outline and border from
    /// every match, then outline the selected one and scroll it to the
    /// viewport center.
    pub fn apply_selection(&self, doc: &mut Document, settings: &Settings) {
        for &m in &self.matches {
            doc.remove_style_property(m, "outline");
            doc.remove_style_property(m, "border");
        }
        let Some(index) = self.current else {
            return;
        };
        let Some(el) = self.match_at(index) else {
            return;
        };
        let outline = format!("{}px solid {}", settings.border_width, settings.outline_color);
        doc.set_style_property(el, "outline", &outline);
        doc.scroll_into_view(el);
    }

    /// Step the selection with wraparound.
    ///
    /// Returns `(count, new_index)`. With an empty registry this is a
    /// no-op yielding `(0, None)`. A `None` index is treated as 0 before
    /// the step, so the first `next` lands on index 1 and the first `prev`
    /// on the last match.
    pub fn step(&mut self, direction: Direction) -> (usize, Option<usize>) {
        let count = self.matches.len();
        if count == 0 {
            self.current = None;
            return (0, None);
        }
        let idx = self.current.unwrap_or(0);
        let next = match direction {
            Direction::Next => (idx + 1) % count,
            Direction::Prev => (idx + count - 1) % count,
        };
        self.current = Some(next);
        (count, Some(next))
    }
}
