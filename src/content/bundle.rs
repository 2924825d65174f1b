//! Bundled base content, compiled into the binary.

use super::model::{ContentDocument, SkillCategory, skills_from_value};
use crate::theme::normalize_theme;
use serde_json::{Map, Value};
use std::sync::LazyLock;

const SITE_JSON: &str = include_str!("../../content/base/site.json");
const SKILLS_JSON: &str = include_str!("../../content/base/skills.json");
const THEME_JSON: &str = include_str!("../../content/base/theme.json");

static BASE: LazyLock<BaseContent> =
    LazyLock::new(|| BaseContent::parse(SITE_JSON, SKILLS_JSON, THEME_JSON));

/// The three base layers: site content, skills and raw theme.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseContent {
    pub site: Map<String, Value>,
    pub skills: Value,
    pub theme: Map<String, Value>,
}

/// Bundled defaults, available synchronously for first paint.
pub fn base_content() -> &'static BaseContent {
    &BASE
}

impl BaseContent {
    pub fn new(site: Map<String, Value>, skills: Value, theme: Map<String, Value>) -> Self {
        Self { site, skills, theme }
    }

    /// Parse the three JSON texts. Malformed parts become empty.
    pub fn parse(site: &str, skills: &str, theme: &str) -> Self {
        Self {
            site: parse_object("site", site),
            skills: match serde_json::from_str::<Value>(skills) {
                Ok(value @ Value::Array(_)) => value,
                _ => {
                    crate::debug!("content"; "bundled skills are not a JSON array");
                    Value::Array(Vec::new())
                }
            },
            theme: parse_object("theme", theme),
        }
    }

    /// Base site with the normalized base theme.
    pub fn document(&self) -> ContentDocument {
        let mut doc = ContentDocument::from_map(&self.site);
        doc.theme = normalize_theme(&self.theme);
        doc
    }

    pub fn skill_categories(&self) -> Vec<SkillCategory> {
        skills_from_value(&self.skills).unwrap_or_default()
    }
}

fn parse_object(name: &str, text: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        _ => {
            crate::debug!("content"; "bundled {} is not a JSON object", name);
            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    #[test]
    fn test_bundled_content_parses() {
        let base = base_content();
        assert!(!base.site.is_empty());
        assert!(!base.skill_categories().is_empty());
        assert_eq!(base.document().theme, Theme::default());
    }

    #[test]
    fn test_bundled_slugs_unique() {
        let doc = base_content().document();
        let mut slugs: Vec<_> = doc.projects.iter().map(|p| p.slug.as_str()).collect();
        let total = slugs.len();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), total);
    }

    #[test]
    fn test_parse_degrades_to_empty() {
        let base = BaseContent::parse("[]", "{", "\"x\"");
        assert!(base.site.is_empty());
        assert_eq!(base.skills, Value::Array(Vec::new()));
        assert!(base.theme.is_empty());
    }
}
