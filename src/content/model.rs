//! Content data model.
//!
//! All types decode leniently (see [`super::lenient`]): list fields are
//! always present, unknown keys survive in `extra`, and the theme is
//! always normalized.

use super::lenient;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely typed entry of the labs/blog/certificates/gallery sections.
pub type Record = Map<String, Value>;

/// Key under which skills travel in import/export payloads.
pub const SKILLS_FIELD: &str = "skills";

// ============================================================================
// ContentDocument
// ============================================================================

/// The full editable site content (everything except skills).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub resume_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub linkedin: String,
    #[serde(deserialize_with = "lenient::string")]
    pub github: String,

    /// Rendered cyclically by the hero typewriter.
    #[serde(deserialize_with = "lenient::string_vec")]
    pub tagline_phrases: Vec<String>,

    #[serde(deserialize_with = "lenient::object")]
    pub about: About,

    #[serde(deserialize_with = "lenient::vec")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "lenient::vec")]
    pub labs: Vec<Record>,
    #[serde(deserialize_with = "lenient::vec")]
    pub blog: Vec<Record>,
    #[serde(deserialize_with = "lenient::vec")]
    pub certificates: Vec<Record>,
    #[serde(deserialize_with = "lenient::vec")]
    pub gallery: Vec<Record>,

    #[serde(deserialize_with = "lenient::theme")]
    pub theme: Theme,

    /// Keys this model does not know about, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentDocument {
    /// Decode a JSON object. A `skills` key is dropped: skills live apart.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut map = map.clone();
        map.remove(SKILLS_FIELD);
        serde_json::from_value(Value::Object(map)).unwrap_or_default()
    }

    /// Decode any JSON value; non-objects yield an empty document.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::from_map(&Map::new()),
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn records(&self, section: RecordSection) -> &[Record] {
        match section {
            RecordSection::Labs => &self.labs,
            RecordSection::Blog => &self.blog,
            RecordSection::Certificates => &self.certificates,
            RecordSection::Gallery => &self.gallery,
        }
    }

    /// Project by slug.
    pub fn project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }
}

/// The loosely typed list sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSection {
    Labs,
    Blog,
    Certificates,
    Gallery,
}

impl RecordSection {
    pub const ALL: [RecordSection; 4] = [
        RecordSection::Labs,
        RecordSection::Blog,
        RecordSection::Certificates,
        RecordSection::Gallery,
    ];

    /// Field name on [`ContentDocument`].
    pub const fn key(self) -> &'static str {
        match self {
            Self::Labs => "labs",
            Self::Blog => "blog",
            Self::Certificates => "certificates",
            Self::Gallery => "gallery",
        }
    }
}

// ============================================================================
// About
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    #[serde(deserialize_with = "lenient::string")]
    pub headline: String,
    #[serde(deserialize_with = "lenient::string")]
    pub intro: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub blocks: Vec<AboutBlock>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Icon + title + text card in the about section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutBlock {
    /// Icon name understood by the renderer (e.g. `Sparkles`, `Target`).
    #[serde(deserialize_with = "lenient::string")]
    pub icon: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Project
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    /// Render key and link anchor; unique within a document.
    #[serde(deserialize_with = "lenient::string")]
    pub slug: String,
    #[serde(deserialize_with = "lenient::string_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient::string_vec")]
    pub tech: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub blurb: String,
    #[serde(deserialize_with = "lenient::string_vec")]
    pub highlights: Vec<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(deserialize_with = "lottie", skip_serializing_if = "Option::is_none")]
    pub lottie: Option<Lottie>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Animation reference: a URL to fetch, or the animation data inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lottie {
    Url(String),
    Inline(Map<String, Value>),
}

fn lottie<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<Lottie>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(url) if !url.trim().is_empty() => Some(Lottie::Url(url)),
        Value::Object(data) => Some(Lottie::Inline(data)),
        _ => None,
    })
}

// ============================================================================
// Skills
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    /// Stable identity key.
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub skills: Vec<Skill>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Always within `0..=100`.
    #[serde(deserialize_with = "lenient::level")]
    pub level: u8,
    #[serde(deserialize_with = "lenient::string")]
    pub tip: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decode a skills list; non-arrays yield `None`.
pub fn skills_from_value(value: &Value) -> Option<Vec<SkillCategory>> {
    let Value::Array(items) = value else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
    )
}

pub fn skills_to_value(skills: &[SkillCategory]) -> Value {
    serde_json::to_value(skills).unwrap_or(Value::Array(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lists_default_to_empty() {
        let doc = ContentDocument::from_value(&json!({
            "name": "Ada",
            "projects": null,
            "labs": "not a list",
            "taglinePhrases": 3,
        }));
        assert_eq!(doc.name, "Ada");
        assert!(doc.projects.is_empty());
        assert!(doc.labs.is_empty());
        assert!(doc.blog.is_empty());
        assert!(doc.tagline_phrases.is_empty());
        assert_eq!(doc.theme, Theme::default());
    }

    #[test]
    fn test_unknown_keys_survive_and_skills_dropped() {
        let doc = ContentDocument::from_value(&json!({
            "skillsFlat": ["Rust"],
            "skills": [{ "id": "x" }],
        }));
        assert_eq!(doc.extra.get("skillsFlat"), Some(&json!(["Rust"])));
        assert!(!doc.to_map().contains_key(SKILLS_FIELD));
    }

    #[test]
    fn test_project_decoding() {
        let doc = ContentDocument::from_value(&json!({
            "projects": [
                {
                    "title": "OCR",
                    "slug": "ocr",
                    "tags": ["CV", 3, null],
                    "image": "",
                    "lottie": "/anim/ocr.json",
                    "stars": 12
                },
                "garbage",
                { "slug": "inline", "lottie": { "v": "5.7" } }
            ]
        }));
        assert_eq!(doc.projects.len(), 2);

        let ocr = doc.project("ocr").unwrap();
        assert_eq!(ocr.tags, vec!["CV", "3"]);
        assert_eq!(ocr.image, None);
        assert_eq!(ocr.lottie, Some(Lottie::Url("/anim/ocr.json".into())));
        assert_eq!(ocr.extra.get("stars"), Some(&json!(12)));

        let inline = doc.project("inline").unwrap();
        assert!(matches!(inline.lottie, Some(Lottie::Inline(_))));
    }

    #[test]
    fn test_project_serializes_camel_case_and_skips_none() {
        let doc = ContentDocument {
            resume_url: "/cv.pdf".into(),
            projects: vec![Project { slug: "a".into(), ..Default::default() }],
            ..Default::default()
        };
        let map = doc.to_map();
        assert_eq!(map.get("resumeUrl"), Some(&json!("/cv.pdf")));
        let project = &map["projects"][0];
        assert!(project.get("image").is_none());
        assert_eq!(project["tags"], json!([]));
    }

    #[test]
    fn test_skills_levels_clamped() {
        let skills = skills_from_value(&json!([
            { "id": 7, "label": "Core", "skills": [
                { "name": "Rust", "level": 180 },
                { "name": "Go", "level": "abc" },
                { "name": "C", "level": "55" }
            ]},
            "bad"
        ]))
        .unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].id, "7");
        let levels: Vec<u8> = skills[0].skills.iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![100, 0, 55]);
    }

    #[test]
    fn test_skills_from_non_array() {
        assert!(skills_from_value(&json!({ "id": "x" })).is_none());
    }
}
