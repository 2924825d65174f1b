//! Palette types and normalization.
//!
//! Every theme that leaves this module is four `#RRGGBB` uppercase
//! achromatic colors. Invalid input falls back to the default for that key
//! before the grayscale transform, so any hue collapses to gray.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Hex digits only (after the `#` is stripped).
static HEX_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]+$").expect("valid hex regex"));

// ============================================================================
// Palette keys
// ============================================================================

/// The four palette slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteKey {
    Primary,
    Secondary,
    Tertiary,
    White,
}

impl PaletteKey {
    pub const ALL: [PaletteKey; 4] = [
        PaletteKey::Primary,
        PaletteKey::Secondary,
        PaletteKey::Tertiary,
        PaletteKey::White,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
            Self::White => "white",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

/// Editable field description for a palette slot.
#[derive(Debug, Clone, Copy)]
pub struct ThemeField {
    pub key: PaletteKey,
    pub label: &'static str,
    pub group: &'static str,
}

/// Field catalogue shown by editors, in display order.
pub const THEME_FIELDS: [ThemeField; 4] = [
    ThemeField { key: PaletteKey::Primary, label: "Primary", group: "Palette" },
    ThemeField { key: PaletteKey::Secondary, label: "Secondary", group: "Palette" },
    ThemeField { key: PaletteKey::Tertiary, label: "Tertiary", group: "Palette" },
    ThemeField { key: PaletteKey::White, label: "White", group: "Palette" },
];

// ============================================================================
// Theme
// ============================================================================

/// Four-color palette driving the derived CSS variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
    pub white: String,
}

/// Built-in palette (before the grayscale transform).
pub const DEFAULT_PRIMARY: &str = "#222222";
pub const DEFAULT_SECONDARY: &str = "#7B7B7B";
pub const DEFAULT_TERTIARY: &str = "#F8F8F8";
pub const DEFAULT_WHITE: &str = "#FFFFFF";

impl Theme {
    /// The raw built-in palette.
    pub fn default_palette() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            secondary: DEFAULT_SECONDARY.to_string(),
            tertiary: DEFAULT_TERTIARY.to_string(),
            white: DEFAULT_WHITE.to_string(),
        }
    }

    /// Normalize any JSON value. Non-objects count as an empty theme.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => normalize_theme(map),
            _ => normalize_theme(&Map::new()),
        }
    }

    pub fn get(&self, key: PaletteKey) -> &str {
        match key {
            PaletteKey::Primary => &self.primary,
            PaletteKey::Secondary => &self.secondary,
            PaletteKey::Tertiary => &self.tertiary,
            PaletteKey::White => &self.white,
        }
    }

    fn slot(&mut self, key: PaletteKey) -> &mut String {
        match key {
            PaletteKey::Primary => &mut self.primary,
            PaletteKey::Secondary => &mut self.secondary,
            PaletteKey::Tertiary => &mut self.tertiary,
            PaletteKey::White => &mut self.white,
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        PaletteKey::ALL
            .into_iter()
            .map(|k| (k.as_str().to_string(), Value::String(self.get(k).to_string())))
            .collect()
    }
}

impl Default for Theme {
    /// The normalized default palette.
    fn default() -> Self {
        normalize_theme(&Map::new())
    }
}

const fn default_for(key: PaletteKey) -> &'static str {
    match key {
        PaletteKey::Primary => DEFAULT_PRIMARY,
        PaletteKey::Secondary => DEFAULT_SECONDARY,
        PaletteKey::Tertiary => DEFAULT_TERTIARY,
        PaletteKey::White => DEFAULT_WHITE,
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Validate a candidate color, returning `#RRGGBB` uppercase or `fallback`.
///
/// Accepts `RGB`/`RRGGBB` with an optional leading `#`. Anything else
/// (wrong length, non-hex characters, non-string) yields `fallback`.
pub fn normalize_hex(value: &Value, fallback: &str) -> String {
    let Value::String(raw) = value else {
        return fallback.to_string();
    };

    let cleaned = raw.trim().replacen('#', "", 1);
    if !matches!(cleaned.len(), 3 | 6) || !HEX_BODY.is_match(&cleaned) {
        return fallback.to_string();
    }

    let expanded: String = if cleaned.len() == 3 {
        cleaned.chars().flat_map(|c| [c, c]).collect()
    } else {
        cleaned
    };

    format!("#{}", expanded.to_ascii_uppercase())
}

/// Split `#RRGGBB` (or `#RGB`) into channels. Malformed input is black.
pub fn hex_to_rgb(hex: &str) -> [u8; 3] {
    let clean = hex.trim_start_matches('#');
    let expanded: String = if clean.len() == 3 {
        clean.chars().flat_map(|c| [c, c]).collect()
    } else {
        clean.to_string()
    };

    let mut rgb = [0u8; 3];
    if hex::decode_to_slice(&expanded, &mut rgb).is_err() {
        return [0, 0, 0];
    }
    rgb
}

/// Luminance-weighted gray of a color, as `#GGGGGG`.
pub fn to_grayscale_hex(hex: &str) -> String {
    let [r, g, b] = hex_to_rgb(hex);
    let gray = (0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b)).round();
    // Weights sum to 1.0, so gray stays within 0..=255.
    let channel = hex::encode_upper([gray as u8]);
    format!("#{channel}{channel}{channel}")
}

/// Normalize a partial theme into a full grayscale [`Theme`].
///
/// Total and idempotent: missing or invalid keys take the built-in default.
pub fn normalize_theme(theme: &Map<String, Value>) -> Theme {
    let mut next = Theme::default_palette();
    for key in PaletteKey::ALL {
        let candidate = theme.get(key.as_str()).unwrap_or(&Value::Null);
        let normalized = normalize_hex(candidate, default_for(key));
        *next.slot(key) = to_grayscale_hex(&normalized);
    }
    next
}

// ============================================================================
// tests
// ============================================================================
