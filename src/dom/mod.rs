//! In-memory page model the matching engine operates on.
//!
//! The engine was written against a live browser DOM; this module provides
//! the equivalent surface for a headless host: an arena document tree with
//! attributes, classes, inline styles, approximate layout rects, and
//! viewport/scroll state. Everything the visibility filter, mutation
//! applier and match selector touch goes through [`Document`].

mod geometry;
mod node;
mod style;

pub use geometry::Rect;
pub use node::{Document, ElementData, NodeData, NodeId};
pub use style::InlineStyle;
