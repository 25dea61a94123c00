//! The matching session: all page-scoped search state in one place.
//!
//! The original engine kept its invocation token, match list, style record
//! and timer ids as ad-hoc globals on the page context. Here they live in
//! one explicit [`MatchingSession`] owned by the caller, which makes the
//! whole thing resettable and testable. Nothing in a session survives a
//! page navigation; the owner drops it and starts fresh.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Settings;
use crate::dom::{Document, NodeId};
use crate::engine::blink::{self, BlinkTimer, SelectedGroup};
use crate::engine::markup::{CONTEXT_CLASS, MATCH_CLASS};
use crate::engine::registry::{Direction, MatchRegistry};

/// Identifier for one search invocation (time ⊕ random).
///
/// One token is active per session at a time; a later invocation's token
/// invalidates all in-flight work carrying an older one. Comparison at
/// checkpoints is the only cancellation mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchToken(u64);

impl SearchToken {
    /// Generate a fresh token from the wall clock and random bits.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let random = uuid::Uuid::new_v4().as_u128() as u64 % 1_000_000_000;
        Self(millis ^ random)
    }

    /// The raw token value (used as an opaque handle).
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Strip all highlight markup from the page.
///
/// Every parent of a marker element gets its children collapsed back to a
/// single text node of its text content; text content round-trips exactly.
pub fn remove_highlight_markup(doc: &mut Document) {
    let marked = doc.elements_with_any_class(&[MATCH_CLASS, CONTEXT_CLASS]);
    for el in marked {
        // Flattening one parent detaches its remaining marker children;
        // those then have no parent and are skipped
        if let Some(parent) = doc.parent(el) {
            doc.flatten_to_text(parent);
        }
    }
}

/// Page-scoped state for the current search: active token, match registry,
/// the style/timing configuration in effect, and both blink timers.
#[derive(Debug)]
pub struct MatchingSession {
    active_token: SearchToken,
    registry: MatchRegistry,
    settings: Settings,
    all_matches_timer: Option<BlinkTimer>,
    selected_timer: Option<BlinkTimer>,
    selected_group: Option<SelectedGroup>,
    selected_token: Option<SearchToken>,
}

impl Default for MatchingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingSession {
    /// Create a fresh session with default settings and no matches.
    pub fn new() -> Self {
        Self {
            active_token: SearchToken::generate(),
            registry: MatchRegistry::new(),
            settings: Settings::default(),
            all_matches_timer: None,
            selected_timer: None,
            selected_group: None,
            selected_token: None,
        }
    }

    /// The token of the latest invocation.
    pub fn active_token(&self) -> SearchToken {
        self.active_token
    }

    /// Whether `token` has been superseded.
    pub fn is_cancelled(&self, token: SearchToken) -> bool {
        self.active_token != token
    }

    /// The style/timing configuration in effect (used by navigation
    /// actions that run independently of a fresh search).
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current match registry.
    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    /// Begin a new search invocation: stop any previous all-matches
    /// blinking, record the configuration, and mint the token that
    /// supersedes all in-flight work.
    pub fn begin_invocation(&mut self, settings: Settings) -> SearchToken {
        self.all_matches_timer = None;
        self.settings = settings;
        self.active_token = SearchToken::generate();
        self.registry.clear();
        log::debug!("search invocation {:x}", self.active_token.value());
        self.active_token
    }

    /// Set the selection and apply its styling (outline + scroll).
    pub fn select(&mut self, doc: &mut Document, index: Option<usize>) {
        self.registry.set_current(index);
        self.registry.apply_selection(doc, &self.settings);
    }

    /// Rebuild the match list from the live tree.
    pub fn rebuild_registry(&mut self, doc: &Document) {
        self.registry.rebuild(doc);
    }

    /// Default selection per the viewport-center rule.
    pub fn default_index(&self, doc: &Document) -> Option<usize> {
        self.registry.default_index(doc)
    }

    /// Start the all-matches blink for the current invocation. At most one
    /// such timer runs; the previous one was dropped by
    /// [`begin_invocation`](Self::begin_invocation). Returns the timer
    /// handle.
    pub fn start_all_matches_blink(&mut self, now_ms: u64) -> u64 {
        let timer = BlinkTimer::new(
            self.active_token,
            self.settings.blink_interval,
            self.settings.num_blinks * 2,
            now_ms,
        );
        let handle = timer.handle();
        self.all_matches_timer = Some(timer);
        handle
    }

    /// Navigate to the next/previous match and blink the selected group.
    ///
    /// With an empty registry this is a visual no-op returning `(0, None)`.
    pub fn navigate(
        &mut self,
        doc: &mut Document,
        direction: Direction,
        now_ms: u64,
    ) -> (usize, Option<usize>) {
        let (count, index) = self.registry.step(direction);
        if count == 0 {
            return (0, None);
        }
        self.registry.apply_selection(doc, &self.settings);
        if let Some(el) = index.and_then(|i| self.registry.match_at(i)) {
            self.start_selected_blink(doc, el, now_ms);
        }
        (count, index)
    }

    /// Re-target the selected-group blink onto `match_el`.
    ///
    /// Restores the previously blinking group to its steady visual first,
    /// so switching selection never leaves a stray mid-blink element, then
    /// supersedes the old timer with a fresh token.
    pub fn start_selected_blink(&mut self, doc: &mut Document, match_el: NodeId, now_ms: u64) {
        if let Some(prev) = self.selected_group.take() {
            blink::apply_group_steady(doc, &prev, &self.settings);
        }
        self.selected_timer = None;

        let token = SearchToken::generate();
        self.selected_token = Some(token);
        let group = blink::selected_group(doc, match_el, self.settings.num_surrounding_words);
        blink::apply_group_steady(doc, &group, &self.settings);

        let interval = self.settings.blink_interval.max(50);
        let half_cycles = self.settings.num_blinks.max(1) * 2;
        self.selected_timer = Some(BlinkTimer::new(token, interval, half_cycles, now_ms));
        self.selected_group = Some(group);
    }

    /// Drive both timers from the caller's clock. Due toggles fire; stale
    /// or exhausted timers drop out. The two timers are independent and
    /// touch disjoint style properties, so no ordering between them
    /// matters.
    pub fn tick(&mut self, doc: &mut Document, now_ms: u64) {
        self.all_matches_timer = blink::tick_all_matches(
            self.all_matches_timer.take(),
            doc,
            &self.settings,
            self.active_token,
            now_ms,
        );
        if let Some(group) = &self.selected_group {
            self.selected_timer = blink::tick_selected(
                self.selected_timer.take(),
                doc,
                &self.settings,
                group,
                self.selected_token,
                now_ms,
            );
        } else {
            self.selected_timer = None;
        }
    }

    /// Whether the all-matches timer is still armed.
    pub fn all_matches_blinking(&self) -> bool {
        self.all_matches_timer.is_some()
    }

    /// Whether a selected-group timer is still armed.
    pub fn selected_blinking(&self) -> bool {
        self.selected_timer.is_some()
    }

    /// Cancel everything and restore the page: invalidate any in-flight
    /// scan, stop both timers, strip all highlight markup, and clear the
    /// registry.
    pub fn cancel_and_clear(&mut self, doc: &mut Document) {
        self.active_token = SearchToken::generate();
        self.all_matches_timer = None;
        self.selected_timer = None;
        self.selected_group = None;
        self.selected_token = None;
        remove_highlight_markup(doc);
        self.registry.clear();
        log::debug!("session cancelled and cleared");
    }
}
