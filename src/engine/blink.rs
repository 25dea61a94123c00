//! Blink scheduler: timed visual toggling.
//!
//! Two independent mechanisms share the [`BlinkTimer`] countdown: the
//! all-matches blink that runs once per successful search, and the
//! selected-group blink re-targeted on every navigation step. Each carries
//! a guard token; a tick whose token has been superseded self-terminates
//! without touching the page. Timers are value state driven by the caller's
//! clock, so a tick is just a function of `now`.

use crate::config::Settings;
use crate::dom::{Document, NodeId};
use crate::engine::applier::{set_highlighted, set_marker_class_highlighted};
use crate::engine::markup::{Marker, CONTEXT_CLASS};
use crate::engine::session::SearchToken;

/// Countdown state for one blinking run.
#[derive(Debug, Clone)]
pub struct BlinkTimer {
    token: SearchToken,
    interval: u64,
    next_due: u64,
    remaining: u32,
}

impl BlinkTimer {
    /// Arm a timer: first toggle fires one interval from `now_ms`.
    pub fn new(token: SearchToken, interval_ms: u64, half_cycles: u32, now_ms: u64) -> Self {
        Self {
            token,
            interval: interval_ms.max(1),
            next_due: now_ms + interval_ms.max(1),
            remaining: half_cycles,
        }
    }

    /// The guard token this timer was armed with.
    pub fn token(&self) -> SearchToken {
        self.token
    }

    /// Opaque handle reported to the caller.
    pub fn handle(&self) -> u64 {
        self.token.value()
    }

    /// Toggles left before the timer expires.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// The elements a selected-match blink toggles: the match itself plus its
/// context-marker siblings, left-to-right.
#[derive(Debug, Clone, Default)]
pub struct SelectedGroup {
    /// Elements whose steady state is highlighted (the match).
    pub on: Vec<NodeId>,
    /// Elements whose steady state is unhighlighted (the context words).
    pub off: Vec<NodeId>,
}

/// Restore a group to its steady visual: match on, context off.
pub fn apply_group_steady(doc: &mut Document, group: &SelectedGroup, settings: &Settings) {
    set_highlighted(doc, &group.on, settings, true);
    set_highlighted(doc, &group.off, settings, false);
}

/// Build the selected group around `node` by walking siblings outward, up
/// to `max_surrounding` context markers per side. Text siblings are
/// skipped without counting; the walk stops at the first non-context
/// element.
pub fn selected_group(doc: &Document, node: NodeId, max_surrounding: usize) -> SelectedGroup {
    let mut left = collect_surrounding(doc, node, Side::Left, max_surrounding);
    left.reverse();
    let right = collect_surrounding(doc, node, Side::Right, max_surrounding);
    let mut off = left;
    off.extend(right);
    SelectedGroup {
        on: vec![node],
        off,
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn collect_surrounding(doc: &Document, node: NodeId, side: Side, max: usize) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut cur = node;
    while out.len() < max {
        let next = match side {
            Side::Left => doc.prev_sibling(cur),
            Side::Right => doc.next_sibling(cur),
        };
        let Some(sibling) = next else {
            break;
        };
        cur = sibling;
        if doc.is_text(sibling) {
            continue;
        }
        if doc.has_class(sibling, CONTEXT_CLASS) {
            out.push(sibling);
        } else {
            break;
        }
    }
    out
}

/// Drive the all-matches timer.
///
/// Fires one toggle per elapsed interval, alternating the highlight across
/// every primary and context marker; an even half-cycle count means the run
/// ends in the "on" state. Returns the timer back while it remains armed;
/// `None` once finished or superseded (a superseded timer leaves the page
/// untouched from that tick on).
pub fn tick_all_matches(
    timer: Option<BlinkTimer>,
    doc: &mut Document,
    settings: &Settings,
    active: SearchToken,
    now_ms: u64,
) -> Option<BlinkTimer> {
    let mut t = timer?;
    while now_ms >= t.next_due {
        if active != t.token {
            log::trace!("all-matches blink superseded, dropping timer");
            return None;
        }
        if t.remaining == 0 {
            return None;
        }
        let on = t.remaining % 2 == 1;
        set_marker_class_highlighted(doc, Marker::Match, settings, on);
        set_marker_class_highlighted(doc, Marker::Context, settings, !on);
        t.remaining -= 1;
        t.next_due += t.interval;
        if t.remaining == 0 {
            log::trace!("all-matches blink finished");
            return None;
        }
    }
    Some(t)
}

/// Drive the selected-group timer.
///
/// Same alternation, scoped to the group. On exhaustion the group is left
/// in its steady state (match on, context off).
pub fn tick_selected(
    timer: Option<BlinkTimer>,
    doc: &mut Document,
    settings: &Settings,
    group: &SelectedGroup,
    selected_token: Option<SearchToken>,
    now_ms: u64,
) -> Option<BlinkTimer> {
    let mut t = timer?;
    while now_ms >= t.next_due {
        if selected_token != Some(t.token) {
            log::trace!("selected blink superseded, dropping timer");
            return None;
        }
        if t.remaining == 0 {
            return None;
        }
        let on = t.remaining % 2 == 1;
        set_highlighted(doc, &group.on, settings, on);
        set_highlighted(doc, &group.off, settings, !on);
        t.remaining -= 1;
        t.next_due += t.interval;
        if t.remaining == 0 {
            apply_group_steady(doc, group, settings);
            return None;
        }
    }
    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::markup::MATCH_CLASS;

    fn page_with_match_row() -> (Document, NodeId, Vec<NodeId>) {
        // wrapper: [ctx] " " [ctx] " " [match] " " [ctx] " " [plain]
        let mut doc = Document::new();
        let body = doc.body();
        let wrapper = doc.create_element("span");
        doc.append_child(body, wrapper);
        let mut ids = Vec::new();
        let classes = [
            Some(CONTEXT_CLASS),
            Some(CONTEXT_CLASS),
            Some(MATCH_CLASS),
            Some(CONTEXT_CLASS),
            None,
        ];
        for (i, class) in classes.iter().enumerate() {
            if i > 0 {
                let gap = doc.create_text(" ");
                doc.append_child(wrapper, gap);
            }
            let span = doc.create_element("span");
            if let Some(c) = class {
                doc.set_attribute(span, "class", c);
            }
            let t = doc.create_text("w");
            doc.append_child(span, t);
            doc.append_child(wrapper, span);
            ids.push(span);
        }
        (doc, ids[2], ids)
    }

    #[test]
    fn test_selected_group_walk_skips_text_and_stops_at_plain() {
        let (doc, matched, ids) = page_with_match_row();
        let group = selected_group(&doc, matched, 5);
        assert_eq!(group.on, vec![matched]);
        // Both left context spans, one right context span; the plain span
        // ends the right walk
        assert_eq!(group.off, vec![ids[0], ids[1], ids[3]]);
    }

    #[test]
    fn test_selected_group_respects_max_surrounding() {
        let (doc, matched, ids) = page_with_match_row();
        let group = selected_group(&doc, matched, 1);
        assert_eq!(group.off, vec![ids[1], ids[3]]);
    }

    #[test]
    fn test_all_matches_blink_tick_count_and_final_state() {
        let (mut doc, matched, _) = page_with_match_row();
        let settings = Settings::default().with_num_blinks(2).with_blink_interval(100);
        let token = SearchToken::generate();
        // Search leaves matches lit before blinking begins
        set_marker_class_highlighted(&mut doc, Marker::Match, &settings, true);

        let mut timer = Some(BlinkTimer::new(token, 100, 4, 0));
        let mut toggles = 0;
        let mut now = 0;
        while timer.is_some() {
            now += 100;
            let before = timer.as_ref().map(|t| t.remaining()).unwrap_or(0);
            timer = tick_all_matches(timer, &mut doc, &settings, token, now);
            let after = timer.as_ref().map(|t| t.remaining()).unwrap_or(0);
            toggles += (before - after) as usize;
        }
        assert_eq!(toggles, 4);
        // Ends in the "on" visual state
        assert_eq!(
            doc.style_property(matched, "background-color"),
            Some("#ffff00")
        );
    }

    #[test]
    fn test_all_matches_blink_superseded_token_stops_silently() {
        let (mut doc, matched, _) = page_with_match_row();
        let settings = Settings::default();
        let token = SearchToken::generate();
        set_marker_class_highlighted(&mut doc, Marker::Match, &settings, true);
        let timer = Some(BlinkTimer::new(token, 100, 4, 0));
        let newer = SearchToken::generate();
        let timer = tick_all_matches(timer, &mut doc, &settings, newer, 100);
        assert!(timer.is_none());
        // No toggle was applied by the stale tick
        assert_eq!(
            doc.style_property(matched, "background-color"),
            Some("#ffff00")
        );
    }

    #[test]
    fn test_catch_up_ticks_with_coarse_clock() {
        let (mut doc, _, _) = page_with_match_row();
        let settings = Settings::default();
        let token = SearchToken::generate();
        let timer = Some(BlinkTimer::new(token, 100, 4, 0));
        // One late tick covers all four due toggles
        let timer = tick_all_matches(timer, &mut doc, &settings, token, 1000);
        assert!(timer.is_none());
    }

    #[test]
    fn test_selected_blink_restores_steady_state_on_exhaustion() {
        let (mut doc, matched, _) = page_with_match_row();
        let settings = Settings::default();
        let token = SearchToken::generate();
        let group = selected_group(&doc, matched, 1);
        apply_group_steady(&mut doc, &group, &settings);

        let mut timer = Some(BlinkTimer::new(token, 50, 4, 0));
        let mut now = 0;
        while timer.is_some() {
            now += 50;
            timer = tick_selected(timer, &mut doc, &settings, &group, Some(token), now);
        }
        assert_eq!(
            doc.style_property(matched, "background-color"),
            Some("#ffff00")
        );
        for &off in &group.off {
            assert_eq!(doc.style_property(off, "background-color"), None);
        }
    }

    #[test]
    fn test_zero_half_cycles_expires_without_toggling() {
        let (mut doc, matched, _) = page_with_match_row();
        let settings = Settings::default();
        let token = SearchToken::generate();
        set_marker_class_highlighted(&mut doc, Marker::Match, &settings, true);
        let timer = Some(BlinkTimer::new(token, 100, 0, 0));
        let timer = tick_all_matches(timer, &mut doc, &settings, token, 100);
        assert!(timer.is_none());
        assert_eq!(
            doc.style_property(matched, "background-color"),
            Some("#ffff00")
        );
    }
}
