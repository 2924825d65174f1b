//! Draft normalization applied before committing edits.
//!
//! Drafts hold whatever the editing surface produced: newline-delimited
//! text where lists are expected, numbers typed as strings, missing
//! sections. These helpers turn a draft into a well-formed document.

use crate::content::{ContentDocument, SkillCategory, level_of, scalar_string};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Line separator for multi-line list fields.
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("valid line-break regex"));

/// List field delimiter.
#[derive(Debug, Clone, Copy)]
pub enum Delimiter {
    Comma,
    Line,
}

fn split<'a>(text: &'a str, delimiter: Delimiter) -> Vec<&'a str> {
    match delimiter {
        Delimiter::Comma => text.split(',').collect(),
        Delimiter::Line => LINE_BREAK.split(text).collect(),
    }
}

/// Coerce a list-ish value into trimmed, non-empty strings.
///
/// Arrays are kept item by item, strings are split on `delimiter`,
/// anything else becomes empty. Order is preserved.
pub fn to_string_array(value: Option<&Value>, delimiter: Delimiter) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| display_string(item).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(text)) => split(text, delimiter)
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Newline-delimited variant of [`to_string_array`].
pub fn to_line_array(value: Option<&Value>) -> Vec<String> {
    to_string_array(value, Delimiter::Line)
}

/// Inverse of [`to_string_array`] for edit forms.
pub fn format_array(value: Option<&Value>, delimiter: &str) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(delimiter),
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    }
}

/// String form of any value; nested structures render as JSON.
fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        scalar => scalar_string(scalar),
    }
}

/// Truthy values as strings, falsy ones (`null`, `false`, `0`, `""`) as empty.
fn truthy_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(v) => display_string(v),
    }
}

fn as_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Apply `f` to every object in a list field; non-objects are dropped.
fn map_objects(
    value: Option<&Value>,
    mut f: impl FnMut(&mut Map<String, Value>),
) -> Value {
    Value::Array(
        as_list(value)
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(mut obj) => {
                    f(&mut obj);
                    Some(Value::Object(obj))
                }
                _ => None,
            })
            .collect(),
    )
}

fn strings(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

/// Normalize a content draft into the JSON shape of a [`ContentDocument`].
pub fn normalize_content_map(draft: &Map<String, Value>) -> Map<String, Value> {
    let mut next = draft.clone();

    next.insert(
        "taglinePhrases".into(),
        strings(to_line_array(draft.get("taglinePhrases"))),
    );

    next.insert(
        "projects".into(),
        map_objects(draft.get("projects"), |project| {
            let tags = to_string_array(project.get("tags"), Delimiter::Comma);
            let tech = to_string_array(project.get("tech"), Delimiter::Comma);
            let highlights = to_line_array(project.get("highlights"));
            project.insert("tags".into(), strings(tags));
            project.insert("tech".into(), strings(tech));
            project.insert("highlights".into(), strings(highlights));
        }),
    );

    next.insert(
        "blog".into(),
        map_objects(draft.get("blog"), |post| {
            let tags = to_string_array(post.get("tags"), Delimiter::Comma);
            post.insert("tags".into(), strings(tags));
        }),
    );

    for key in ["labs", "certificates", "gallery"] {
        next.insert(key.into(), Value::Array(as_list(draft.get(key))));
    }

    if !matches!(draft.get("about"), Some(Value::Object(_))) {
        next.insert("about".into(), Value::Object(Map::new()));
    }

    // Palette overlays the built-in default, then renormalizes
    let theme = crate::theme::normalize_theme(&match draft.get("theme") {
        Some(Value::Object(theme)) => theme.clone(),
        _ => Map::new(),
    });
    next.insert("theme".into(), Value::Object(theme.to_map()));

    next
}

/// Normalize a content draft into a [`ContentDocument`].
///
/// ```ignore
/// normalize_content_draft(&{ "taglinePhrases": "a\nb\n\nc" })
///     .tagline_phrases == ["a", "b", "c"]
/// ```
pub fn normalize_content_draft(draft: &Map<String, Value>) -> ContentDocument {
    ContentDocument::from_map(&normalize_content_map(draft))
}

/// Normalize a skills draft. Non-arrays yield `fallback`.
pub fn normalize_skills_draft(value: &Value, fallback: &[SkillCategory]) -> Vec<SkillCategory> {
    let Value::Array(categories) = value else {
        return fallback.to_vec();
    };

    categories
        .iter()
        .map(|category| {
            let empty = Map::new();
            let obj = category.as_object().unwrap_or(&empty);

            let skills = as_list(obj.get("skills"))
                .iter()
                .map(|skill| {
                    let empty = Map::new();
                    let skill = skill.as_object().unwrap_or(&empty);
                    let mut next: Map<String, Value> = skill.clone();
                    next.insert("name".into(), Value::String(truthy_string(skill.get("name"))));
                    next.insert("tip".into(), Value::String(truthy_string(skill.get("tip"))));
                    next.insert(
                        "level".into(),
                        Value::from(level_of(skill.get("level").unwrap_or(&Value::Null))),
                    );
                    Value::Object(next)
                })
                .collect();

            let mut next = obj.clone();
            next.insert("id".into(), Value::String(truthy_string(obj.get("id"))));
            next.insert("label".into(), Value::String(truthy_string(obj.get("label"))));
            next.insert("skills".into(), Value::Array(skills));
            serde_json::from_value(Value::Object(next)).unwrap_or_default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use serde_json::json;

    fn draft(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_tagline_lines() {
        let doc = normalize_content_draft(&draft(json!({ "taglinePhrases": "a\nb\n\nc" })));
        assert_eq!(doc.tagline_phrases, vec!["a", "b", "c"]);

        let doc = normalize_content_draft(&draft(json!({ "taglinePhrases": "x\r\n  y  \r\n" })));
        assert_eq!(doc.tagline_phrases, vec!["x", "y"]);
    }

    #[test]
    fn test_project_fields() {
        let doc = normalize_content_draft(&draft(json!({
            "projects": [{
                "slug": "p",
                "tags": " CV, ,OCR ",
                "tech": ["Rust ", "", 3],
                "highlights": "fast\n\nsmall",
            }, "junk"]
        })));
        assert_eq!(doc.projects.len(), 1);
        let p = &doc.projects[0];
        assert_eq!(p.tags, vec!["CV", "OCR"]);
        assert_eq!(p.tech, vec!["Rust", "3"]);
        assert_eq!(p.highlights, vec!["fast", "small"]);
    }

    #[test]
    fn test_missing_lists_become_empty() {
        let doc = normalize_content_draft(&Map::new());
        assert!(doc.projects.is_empty());
        assert!(doc.labs.is_empty());
        assert!(doc.blog.is_empty());
        assert!(doc.certificates.is_empty());
        assert!(doc.gallery.is_empty());
        assert!(doc.tagline_phrases.is_empty());
        assert_eq!(doc.theme, Theme::default());

        let map = normalize_content_map(&Map::new());
        for key in ["projects", "labs", "blog", "certificates", "gallery", "taglinePhrases"] {
            assert!(map[key].is_array(), "{key}");
        }
        assert!(map["about"].is_object());
    }

    #[test]
    fn test_blog_tags_and_theme() {
        let doc = normalize_content_draft(&draft(json!({
            "blog": [{ "title": "t", "tags": "RAG, LLM" }],
            "theme": { "primary": "#F00", "white": "oops" },
        })));
        assert_eq!(doc.blog[0]["tags"], json!(["RAG", "LLM"]));
        assert_eq!(doc.theme.primary, "#363636");
        assert_eq!(doc.theme.white, "#FFFFFF");
    }

    #[test]
    fn test_normalize_skills_draft() {
        let skills = normalize_skills_draft(
            &json!([
                { "id": 12, "label": null, "skills": [
                    { "name": "Rust", "level": "150", "tip": 0 },
                    { "name": "Go", "level": -5 },
                    { "level": "abc" }
                ]},
                { "skills": "nope" }
            ]),
            &[],
        );
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].id, "12");
        assert_eq!(skills[0].label, "");
        let levels: Vec<u8> = skills[0].skills.iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![100, 0, 0]);
        assert_eq!(skills[0].skills[0].tip, "");
        assert_eq!(skills[0].skills[2].name, "");
        assert!(skills[1].skills.is_empty());
    }

    #[test]
    fn test_skills_fallback_for_non_array() {
        let fallback = vec![SkillCategory { id: "keep".into(), ..Default::default() }];
        assert_eq!(normalize_skills_draft(&json!("x"), &fallback), fallback);
    }

    #[test]
    fn test_format_array() {
        assert_eq!(format_array(Some(&json!(["a", "b"])), ", "), "a, b");
        assert_eq!(format_array(Some(&json!("raw")), ", "), "raw");
        assert_eq!(format_array(None, ", "), "");
    }
}
