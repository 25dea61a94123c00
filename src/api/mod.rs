//! High-level find-in-page API.
//!
//! [`FindInPage`] owns a page and its matching session and exposes the
//! three actions the UI surfaces drive over the message boundary: run a
//! search, navigate between matches, and cancel & clear. Payload types
//! mirror the wire shapes (camelCase, `action`-tagged requests).
//!
//! ## Example
//!
//! ```
//! use accessible_find::api::FindInPage;
//! use accessible_find::config::Settings;
//! use accessible_find::dom::Document;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let div = doc.create_element("div");
//! let text = doc.create_text("a needle in a haystack");
//! doc.append_child(div, text);
//! doc.append_child(body, div);
//!
//! let mut find = FindInPage::new(doc);
//! let response = find.perform_search("needle", Settings::default(), 0)?;
//! assert_eq!(response.count, 1);
//! # Ok::<(), accessible_find::Error>(())
//! ```

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::dom::Document;
use crate::engine::registry::Direction;
use crate::engine::scanner::{ChunkedScan, ScanStatus};
use crate::engine::session::{self, MatchingSession};
use crate::engine::tokenizer::TokenAnnotator;
use crate::engine::{applier, Marker};
use crate::error::{Error, Result};

/// Result of a search action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Handle of the all-matches blink timer, when one was started.
    pub blink_timer_handle: Option<u64>,
    /// Number of matches found.
    pub count: usize,
    /// Default selected index (viewport-center rule), if any match exists.
    pub current_index: Option<usize>,
}

impl SearchResponse {
    fn empty() -> Self {
        Self {
            blink_timer_handle: None,
            count: 0,
            current_index: None,
        }
    }
}

/// Result of a navigation action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    /// Number of matches in the registry.
    pub count: usize,
    /// Selected index after the step, if any.
    pub current_index: Option<usize>,
}

/// A request arriving over the message boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Run a search with a fully-resolved configuration.
    #[serde(rename_all = "camelCase")]
    FindInPage {
        /// The user's search term (used unescaped as a pattern)
        search_term: String,
        /// Style/timing configuration; missing fields take defaults
        #[serde(default)]
        settings: Settings,
    },
    /// Step the selection.
    #[serde(rename_all = "camelCase")]
    Navigate {
        /// `next` or `prev`
        direction: Direction,
    },
    /// Remove all highlighting and stop timers.
    CancelAndClear,
}

/// A response over the message boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// Response to a search request.
    Search(SearchResponse),
    /// Response to a navigation request.
    Navigate(NavigateResponse),
    /// Acknowledgement of cancel & clear.
    Cleared,
}

/// A page plus its matching session: the find-in-page surface for one
/// execution context.
#[derive(Debug)]
pub struct FindInPage {
    doc: Option<Document>,
    session: MatchingSession,
}

impl Default for FindInPage {
    fn default() -> Self {
        Self::without_page()
    }
}

impl FindInPage {
    /// Create the surface over a page.
    pub fn new(doc: Document) -> Self {
        Self {
            doc: Some(doc),
            session: MatchingSession::new(),
        }
    }

    /// Create the surface with no page attached; search and navigation
    /// fail with [`Error::NoActiveContext`] until a page is attached.
    pub fn without_page() -> Self {
        Self {
            doc: None,
            session: MatchingSession::new(),
        }
    }

    /// Attach a page, discarding all session state (nothing persists
    /// across page navigations).
    pub fn attach_page(&mut self, doc: Document) {
        self.doc = Some(doc);
        self.session = MatchingSession::new();
    }

    /// The attached page, if any.
    pub fn page(&self) -> Option<&Document> {
        self.doc.as_ref()
    }

    /// Mutable access to the attached page.
    pub fn page_mut(&mut self) -> Option<&mut Document> {
        self.doc.as_mut()
    }

    /// The session state.
    pub fn session(&self) -> &MatchingSession {
        &self.session
    }

    /// Run a search: strip previous highlighting, scan the page for the
    /// term, commit the highlight markup, pick the default selection and
    /// start the all-matches blink.
    ///
    /// An empty term performs a full reset and reports zero matches. The
    /// term is compiled as a case-insensitive pattern without escaping;
    /// a term that does not compile is an [`Error::InvalidPattern`].
    pub fn perform_search(
        &mut self,
        term: &str,
        settings: Settings,
        now_ms: u64,
    ) -> Result<SearchResponse> {
        let Some(doc) = self.doc.as_mut() else {
            return Err(Error::NoActiveContext("no page attached".to_string()));
        };
        let token = self.session.begin_invocation(settings);
        session::remove_highlight_markup(doc);

        if term.is_empty() {
            return Ok(SearchResponse::empty());
        }

        let regex = RegexBuilder::new(term)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: term.to_string(),
                reason: e.to_string(),
            })?;
        let annotator =
            TokenAnnotator::new(regex, self.session.settings().num_surrounding_words);

        let mut scan = ChunkedScan::new(doc, doc.body(), annotator, token);
        let ops = loop {
            // Each step return is the cooperative yield point
            match scan.step(doc, self.session.active_token()) {
                ScanStatus::Pending => continue,
                ScanStatus::Complete(ops) => break ops,
                ScanStatus::Cancelled => return Ok(SearchResponse::empty()),
            }
        };

        applier::commit(doc, ops, self.session.settings());
        self.session.rebuild_registry(doc);
        let default_index = self.session.default_index(doc);
        self.session.select(doc, default_index);
        let handle = self.session.start_all_matches_blink(now_ms);

        let count = self.session.registry().count();
        log::debug!("search found {} matches, default {:?}", count, default_index);
        Ok(SearchResponse {
            blink_timer_handle: Some(handle),
            count,
            current_index: self.session.registry().current(),
        })
    }

    /// Step the selection to the next/previous match, re-style it, scroll
    /// it into view and blink its group. A no-op on an empty registry.
    pub fn navigate(&mut self, direction: Direction, now_ms: u64) -> Result<NavigateResponse> {
        let Some(doc) = self.doc.as_mut() else {
            return Err(Error::NoActiveContext("no page attached".to_string()));
        };
        let (count, current_index) = self.session.navigate(doc, direction, now_ms);
        Ok(NavigateResponse {
            count,
            current_index,
        })
    }

    /// Remove all highlight markup, stop timers and clear the registry.
    /// A no-op without a page.
    pub fn cancel_and_cleanup(&mut self) {
        if let Some(doc) = self.doc.as_mut() {
            self.session.cancel_and_clear(doc);
        }
    }

    /// Drive the blink timers from the host clock. A no-op without a page.
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(doc) = self.doc.as_mut() {
            self.session.tick(doc, now_ms);
        }
    }

    /// Dispatch one message-boundary request.
    pub fn handle_request(&mut self, request: Request, now_ms: u64) -> Result<Response> {
        match request {
            Request::FindInPage {
                search_term,
                settings,
            } => Ok(Response::Search(self.perform_search(
                &search_term,
                settings,
                now_ms,
            )?)),
            Request::Navigate { direction } => {
                Ok(Response::Navigate(self.navigate(direction, now_ms)?))
            }
            Request::CancelAndClear => {
                self.cancel_and_cleanup();
                Ok(Response::Cleared)
            }
        }
    }

    /// Serialized text of the page body, for callers diffing reset state.
    pub fn body_text(&self) -> Option<String> {
        self.doc.as_ref().map(|d| d.text_content(d.body()))
    }

    /// Count of elements currently carrying a marker class.
    pub fn marked_element_count(&self) -> usize {
        self.doc
            .as_ref()
            .map(|d| {
                d.elements_with_any_class(&[Marker::Match.class_name(), Marker::Context.class_name()])
                    .len()
            })
            .unwrap_or(0)
    }
}
