//! Layer merging.
//!
//! Layers overlay shallowly at the top level: a key present in a later
//! layer replaces the whole value from an earlier one. The theme is the
//! exception; it overlays per color key and is renormalized afterwards.

use super::model::ContentDocument;
use crate::theme::{Theme, normalize_theme};
use serde_json::{Map, Value};

/// Shallow top-level overlay of `layer` onto `base`.
pub fn overlay(base: &Map<String, Value>, layer: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in layer {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// The object behind a `theme` key, or empty.
pub fn theme_layer(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Overlay a partial theme onto a base theme and renormalize.
pub fn merge_theme(base: &Map<String, Value>, layer: Option<&Value>) -> Theme {
    normalize_theme(&overlay(base, &theme_layer(layer)))
}

/// Resolve a document from site content, raw theme and optional local edits.
///
/// `{ ...site, ...edits, theme: normalize({ ...theme, ...edits.theme }) }`
pub fn merge_document(
    site: &Map<String, Value>,
    theme: &Map<String, Value>,
    edits: Option<&Map<String, Value>>,
) -> ContentDocument {
    let empty = Map::new();
    let edits = edits.unwrap_or(&empty);

    let mut doc = ContentDocument::from_map(&overlay(site, edits));
    doc.theme = merge_theme(theme, edits.get("theme"));
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_overlay_is_shallow() {
        let base = obj(json!({ "about": { "headline": "A", "intro": "x" }, "name": "A" }));
        let layer = obj(json!({ "about": { "headline": "B" } }));
        let merged = overlay(&base, &layer);
        assert_eq!(merged["about"], json!({ "headline": "B" }));
        assert_eq!(merged["name"], json!("A"));
    }

    #[test]
    fn test_merge_document_precedence() {
        let site = obj(json!({ "name": "A", "title": "T" }));
        let theme = obj(json!({ "primary": "#000000" }));
        let edits = obj(json!({ "title": "X", "theme": { "secondary": "#fff" } }));

        let doc = merge_document(&site, &theme, Some(&edits));
        assert_eq!(doc.name, "A");
        assert_eq!(doc.title, "X");
        assert_eq!(doc.theme.primary, "#000000");
        assert_eq!(doc.theme.secondary, "#FFFFFF");
    }

    #[test]
    fn test_merge_theme_ignores_non_object_layer() {
        let base = obj(json!({ "primary": "#000" }));
        assert_eq!(merge_theme(&base, Some(&json!("red"))).primary, "#000000");
    }
}
