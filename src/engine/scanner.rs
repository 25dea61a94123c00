//! Chunked scanner: interruptible traversal of the page.
//!
//! The traversal keeps an explicit work queue instead of a call stack so it
//! can stop between batches. [`ChunkedScan::step`] processes one batch and
//! returns; that return is the cooperative yield point where the host runs
//! other work and where a newer search invocation takes effect. A
//! superseded scan discards everything it buffered and commits nothing.

use std::collections::VecDeque;

use crate::dom::{Document, NodeId};
use crate::engine::session::SearchToken;
use crate::engine::tokenizer::TokenAnnotator;
use crate::engine::visibility;

/// Nodes processed per batch before yielding. Small enough that a
/// cancellation lands promptly on busy pages.
pub const SCAN_CHUNK: usize = 600;

/// A buffered DOM edit: replace `node` (a text node under `parent`) with a
/// wrapper built from `markup`. Nothing is applied until the whole scan
/// completes.
#[derive(Debug, Clone)]
pub struct PendingMutation {
    /// The text node's owning parent element at scan time
    pub parent: NodeId,
    /// The original text node
    pub node: NodeId,
    /// Replacement markup for the wrapper's contents
    pub markup: String,
}

/// Outcome of one [`ChunkedScan::step`] call.
#[derive(Debug)]
pub enum ScanStatus {
    /// Work remains; call `step` again after yielding.
    Pending,
    /// Traversal finished; these are all the mutations the search needs.
    Complete(Vec<PendingMutation>),
    /// A newer invocation superseded this scan; all partial work was
    /// discarded.
    Cancelled,
}

/// One in-flight traversal of the document body.
#[derive(Debug)]
pub struct ChunkedScan {
    token: SearchToken,
    queue: VecDeque<NodeId>,
    annotator: TokenAnnotator,
    ops: Vec<PendingMutation>,
    batches: usize,
}

impl ChunkedScan {
    /// Start a scan rooted at `root`'s children.
    pub fn new(doc: &Document, root: NodeId, annotator: TokenAnnotator, token: SearchToken) -> Self {
        Self {
            token,
            queue: doc.children(root).iter().copied().collect(),
            annotator,
            ops: Vec::new(),
            batches: 0,
        }
    }

    /// The invocation token this scan belongs to.
    pub fn token(&self) -> SearchToken {
        self.token
    }

    /// Process up to [`SCAN_CHUNK`] nodes.
    ///
    /// `active` is the session's current invocation token; when it no
    /// longer equals this scan's token the scan self-terminates with
    /// [`ScanStatus::Cancelled`]. The token is checked before each batch
    /// and again after the final one.
    pub fn step(&mut self, doc: &Document, active: SearchToken) -> ScanStatus {
        if active != self.token {
            log::debug!("scan superseded after {} batches, discarding", self.batches);
            self.ops.clear();
            self.queue.clear();
            return ScanStatus::Cancelled;
        }

        let mut processed = 0;
        while processed < SCAN_CHUNK {
            let Some(node) = self.queue.pop_front() else {
                break;
            };
            if doc.is_text(node) {
                self.process_text_node(doc, node);
            } else if doc.is_element(node) && !visibility::should_skip_element(doc, node) {
                self.queue.extend(doc.children(node).iter().copied());
            }
            processed += 1;
        }
        self.batches += 1;

        if self.queue.is_empty() {
            if active != self.token {
                self.ops.clear();
                return ScanStatus::Cancelled;
            }
            log::debug!(
                "scan complete: {} batches, {} pending mutations",
                self.batches,
                self.ops.len()
            );
            ScanStatus::Complete(std::mem::take(&mut self.ops))
        } else {
            ScanStatus::Pending
        }
    }

    fn process_text_node(&mut self, doc: &Document, node: NodeId) {
        let Some(parent) = doc.parent_element(node) else {
            return;
        };
        if visibility::should_skip_element(doc, parent) {
            return;
        }
        let Some(raw) = doc.text(node) else {
            return;
        };
        if let Some(markup) = self.annotator.annotate(raw) {
            self.ops.push(PendingMutation {
                parent,
                node,
                markup,
            });
        }
    }
}
