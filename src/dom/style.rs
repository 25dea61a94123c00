//! Inline style declarations.
//!
//! The page model approximates computed style with the element's inline
//! style, stored as an ordered `property -> value` map. That is all the
//! visibility filter and the highlight styling need.

use indexmap::IndexMap;

/// An ordered set of CSS-like declarations (`prop: value`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    declarations: IndexMap<String, String>,
}

impl InlineStyle {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration list like `"display: none; opacity: 0"`.
    ///
    /// Malformed entries (no `:`) are dropped; later declarations for the
    /// same property win.
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        for decl in text.split(';') {
            let decl = decl.trim();
            if decl.is_empty() {
                continue;
            }
            if let Some((prop, value)) = decl.split_once(':') {
                style.set(prop.trim(), value.trim());
            }
        }
        style
    }

    /// Set a property value (property names are lowercased).
    pub fn set(&mut self, property: &str, value: &str) {
        self.declarations
            .insert(property.to_ascii_lowercase(), value.to_string());
    }

    /// Remove a property. No-op when absent.
    pub fn remove(&mut self, property: &str) {
        self.declarations
            .shift_remove(&property.to_ascii_lowercase());
    }

    /// Get a property value.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .get(&property.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether no declarations are present.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize back to a declaration list.
    pub fn to_declaration_string(&self) -> String {
        self.declarations
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The `opacity` value parsed as a float, defaulting to fully opaque.
    pub fn opacity(&self) -> f32 {
        self.get("opacity")
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(1.0)
    }
}
