//! # Accessible Find
//!
//! A find-in-page matching and highlighting engine. Given a page model and
//! a search term, it walks the visible text, wraps every occurrence (and a
//! configurable window of surrounding words) in marker elements, blinks the
//! highlights for visibility, and supports stepping between matches with
//! wraparound — all without corrupting the page structure, and with
//! cooperative cancellation so a newer search cleanly supersedes an
//! in-flight one.
//!
//! ## Architecture
//!
//! - [`dom`] — the in-memory page model: arena tree, attributes, inline
//!   styles, approximate layout, viewport/scroll state.
//! - [`engine`] — the core: visibility filter, tokenizer & matcher,
//!   chunked scanner, mutation applier, match registry, blink scheduler,
//!   and the session that ties per-page state together.
//! - [`api`] — the action surface (`findInPage`, `navigate`,
//!   `cancelAndClear`) with wire-shaped payload types.
//! - [`config`] — the resolved style/timing settings.
//!
//! ## Example
//!
//! ```
//! use accessible_find::{Document, FindInPage, Settings, Direction};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let div = doc.create_element("p");
//! let text = doc.create_text("the quick brown fox");
//! doc.append_child(div, text);
//! doc.append_child(body, div);
//!
//! let mut find = FindInPage::new(doc);
//! let found = find.perform_search("quick", Settings::default(), 0)?;
//! assert_eq!(found.count, 1);
//!
//! let nav = find.navigate(Direction::Next, 0)?;
//! assert_eq!(nav.current_index, Some(0));
//!
//! find.cancel_and_cleanup();
//! # Ok::<(), accessible_find::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;

pub use api::{FindInPage, NavigateResponse, Request, Response, SearchResponse};
pub use config::Settings;
pub use dom::{Document, NodeId, Rect};
pub use engine::{Direction, MatchingSession, SearchToken};
pub use error::{Error, Result};
