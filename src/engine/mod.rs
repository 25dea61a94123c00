//! The page-text matching and highlighting engine.
//!
//! Components, leaves first: the visibility filter prunes traversal, the
//! tokenizer annotates text nodes with the two marker classes, the chunked
//! scanner walks the page interruptibly and buffers mutations, the applier
//! commits them in one pass, the registry tracks the ordered matches and
//! selection, and the blink scheduler drives the timed visuals. The
//! [`session::MatchingSession`] ties the per-page state together.

pub mod applier;
pub mod blink;
pub mod markup;
pub mod registry;
pub mod scanner;
pub mod session;
pub mod tokenizer;
pub mod visibility;

pub use blink::{BlinkTimer, SelectedGroup};
pub use markup::{Marker, Segment, CONTEXT_CLASS, MATCH_CLASS};
pub use registry::{Direction, MatchRegistry};
pub use scanner::{ChunkedScan, PendingMutation, ScanStatus, SCAN_CHUNK};
pub use session::{MatchingSession, SearchToken};
pub use tokenizer::TokenAnnotator;
