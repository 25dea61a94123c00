//! Resolved search configuration.
//!
//! The engine never talks to a settings store; each search invocation
//! receives a fully-resolved [`Settings`] value. Deserialization fills
//! missing fields from the defaults, so a partially-persisted settings
//! object merges the same way the extension storage layer merged
//! `{ ...defaults, ...stored }`.

use serde::{Deserialize, Serialize};

fn default_blink_interval() -> u64 {
    400
}
fn default_num_blinks() -> u32 {
    2
}
fn default_num_surrounding_words() -> usize {
    1
}
fn default_highlight_bg_color() -> String {
    "#ffff00".to_string()
}
fn default_highlight_text_color() -> String {
    "#000".to_string()
}
fn default_outline_color() -> String {
    "#ff8c00".to_string()
}
fn default_border_width() -> u32 {
    3
}
fn default_match_font_size() -> u32 {
    20
}
fn default_selected_bg_color() -> String {
    "#ff8c00".to_string()
}
fn default_selected_border_color() -> String {
    "#ffff00".to_string()
}
fn default_selected_text_color() -> String {
    "#fff".to_string()
}

/// Style and timing configuration for one search invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Milliseconds between blink toggles.
    #[serde(default = "default_blink_interval")]
    pub blink_interval: u64,

    /// Number of full on/off blink cycles.
    #[serde(default = "default_num_blinks")]
    pub num_blinks: u32,

    /// How many neighbor words on each side of a match get context styling.
    #[serde(default = "default_num_surrounding_words")]
    pub num_surrounding_words: usize,

    /// Highlight background color (CSS color value).
    #[serde(default = "default_highlight_bg_color")]
    pub highlight_bg_color: String,

    /// Highlight text color.
    #[serde(default = "default_highlight_text_color")]
    pub highlight_text_color: String,

    /// Outline color for the selected match.
    #[serde(default = "default_outline_color")]
    pub outline_color: String,

    /// Outline width for the selected match, in px.
    #[serde(default = "default_border_width")]
    pub border_width: u32,

    /// Font size applied to matched tokens, in px.
    #[serde(default = "default_match_font_size")]
    pub match_font_size: u32,

    /// Selected-state background color.
    #[serde(default = "default_selected_bg_color")]
    pub selected_bg_color: String,

    /// Selected-state border color.
    #[serde(default = "default_selected_border_color")]
    pub selected_border_color: String,

    /// Selected-state text color.
    #[serde(default = "default_selected_text_color")]
    pub selected_text_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create settings with the stock defaults.
    pub fn new() -> Self {
        Self {
            blink_interval: default_blink_interval(),
            num_blinks: default_num_blinks(),
            num_surrounding_words: default_num_surrounding_words(),
            highlight_bg_color: default_highlight_bg_color(),
            highlight_text_color: default_highlight_text_color(),
            outline_color: default_outline_color(),
            border_width: default_border_width(),
            match_font_size: default_match_font_size(),
            selected_bg_color: default_selected_bg_color(),
            selected_border_color: default_selected_border_color(),
            selected_text_color: default_selected_text_color(),
        }
    }

    /// Set the blink interval in milliseconds.
    pub fn with_blink_interval(mut self, ms: u64) -> Self {
        self.blink_interval = ms;
        self
    }

    /// Set the number of blink cycles.
    pub fn with_num_blinks(mut self, blinks: u32) -> Self {
        self.num_blinks = blinks;
        self
    }

    /// Set the surrounding-word window size.
    pub fn with_num_surrounding_words(mut self, words: usize) -> Self {
        self.num_surrounding_words = words;
        self
    }

    /// Set the highlight background and text colors.
    pub fn with_highlight_colors(mut self, bg: &str, text: &str) -> Self {
        self.highlight_bg_color = bg.to_string();
        self.highlight_text_color = text.to_string();
        self
    }

    /// Set the selected-match outline color and width.
    pub fn with_outline(mut self, color: &str, width: u32) -> Self {
        self.outline_color = color.to_string();
        self.border_width = width;
        self
    }

    /// Set the matched-token font size in px.
    pub fn with_match_font_size(mut self, px: u32) -> Self {
        self.match_font_size = px;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let s = Settings::default();
        assert_eq!(s.blink_interval, 400);
        assert_eq!(s.num_blinks, 2);
        assert_eq!(s.num_surrounding_words, 1);
        assert_eq!(s.highlight_bg_color, "#ffff00");
        assert_eq!(s.highlight_text_color, "#000");
        assert_eq!(s.outline_color, "#ff8c00");
        assert_eq!(s.border_width, 3);
        assert_eq!(s.match_font_size, 20);
        assert_eq!(s.selected_bg_color, "#ff8c00");
        assert_eq!(s.selected_border_color, "#ffff00");
        assert_eq!(s.selected_text_color, "#fff");
    }

    #[test]
    fn test_settings_builder() {
        let s = Settings::new()
            .with_blink_interval(250)
            .with_num_blinks(5)
            .with_num_surrounding_words(3)
            .with_highlight_colors("#00ff00", "#111")
            .with_outline("#123456", 7)
            .with_match_font_size(32);
        assert_eq!(s.blink_interval, 250);
        assert_eq!(s.num_blinks, 5);
        assert_eq!(s.num_surrounding_words, 3);
        assert_eq!(s.highlight_bg_color, "#00ff00");
        assert_eq!(s.highlight_text_color, "#111");
        assert_eq!(s.outline_color, "#123456");
        assert_eq!(s.border_width, 7);
        assert_eq!(s.match_font_size, 32);
    }

    #[test]
    fn test_partial_json_merges_with_defaults() {
        let s: Settings = serde_json::from_str(r##"{"blinkInterval": 100, "outlineColor": "#abc"}"##)
            .expect("partial settings should deserialize");
        assert_eq!(s.blink_interval, 100);
        assert_eq!(s.outline_color, "#abc");
        // Untouched fields come from the defaults
        assert_eq!(s.num_blinks, 2);
        assert_eq!(s.match_font_size, 20);
    }
}
