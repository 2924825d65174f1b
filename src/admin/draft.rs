//! Editable working copy of the site content.
//!
//! The draft is loose JSON so edit forms can hold half-typed values
//! (comma-separated tags, levels typed as text). Nothing reaches the
//! provider until [`DraftEditor::commit`] normalizes it.

use super::normalize::{
    Delimiter, normalize_content_draft, normalize_content_map, normalize_skills_draft,
    to_string_array,
};
use crate::content::{
    RecordSection, SKILLS_FIELD, Skill, SkillCategory, level_of, skills_to_value,
};
use crate::provider::ContentProvider;
use crate::storage::KeyValueStore;
use crate::theme::{PaletteKey, Theme};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse JSON")]
    Parse(#[from] serde_json::Error),

    #[error("expected a JSON object")]
    NotAnObject,
}

/// Fields a new record starts with, per section.
pub fn record_fields(section: RecordSection) -> &'static [&'static str] {
    match section {
        RecordSection::Labs => &["title", "kind", "src", "note"],
        RecordSection::Blog => &["title", "slug", "tags", "read", "date"],
        RecordSection::Certificates => {
            &["title", "issuer", "year", "credentialUrl", "logo", "takeaway"]
        }
        RecordSection::Gallery => &["title", "kind", "src"],
    }
}

/// Milliseconds since the epoch, for generated slugs and ids.
fn timestamp() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Working copy of content and skills, detached from the provider.
#[derive(Debug, Clone, Default)]
pub struct DraftEditor {
    content: Map<String, Value>,
    skills: Value,
    /// Authoritative skills, used when the draft skills are unusable.
    fallback_skills: Vec<SkillCategory>,
    /// Provider revision the draft was last reset from.
    revision: Option<u64>,
}

impl DraftEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft seeded from the provider's current state.
    pub fn from_provider<S: KeyValueStore>(provider: &ContentProvider<S>) -> Self {
        let mut draft = Self::new();
        draft.sync(provider);
        draft
    }

    /// Reset to the provider state if it changed since the last sync.
    ///
    /// Unsaved edits are discarded. Returns whether a reset happened.
    pub fn sync<S: KeyValueStore>(&mut self, provider: &ContentProvider<S>) -> bool {
        let state = provider.snapshot();
        if self.revision == Some(state.revision) {
            return false;
        }

        self.content = normalize_content_map(&state.content.to_map());
        self.fallback_skills = state.skills.clone();
        self.skills = skills_to_value(&normalize_skills_draft(
            &skills_to_value(&state.skills),
            &state.skills,
        ));
        self.revision = Some(state.revision);
        true
    }

    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    pub fn skills(&self) -> &Value {
        &self.skills
    }

    // ------------------------------------------------------------------------
    // General fields
    // ------------------------------------------------------------------------

    pub fn set_field(&mut self, key: &str, value: Value) {
        self.content.insert(key.to_string(), value);
    }

    pub fn set_about_field(&mut self, key: &str, value: Value) {
        let about = self
            .content
            .entry("about")
            .or_insert_with(|| Value::Object(Map::new()));
        if !about.is_object() {
            *about = Value::Object(Map::new());
        }
        if let Value::Object(about) = about {
            about.insert(key.to_string(), value);
        }
    }

    // ------------------------------------------------------------------------
    // Projects and record sections
    // ------------------------------------------------------------------------

    fn list_mut(&mut self, key: &str) -> &mut Vec<Value> {
        let list = self
            .content
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !list.is_array() {
            *list = Value::Array(Vec::new());
        }
        match list {
            Value::Array(items) => items,
            _ => unreachable!("list field was just coerced to an array"),
        }
    }

    fn update_entry(&mut self, list: &str, index: usize, key: &str, value: Value) -> bool {
        match self.list_mut(list).get_mut(index) {
            Some(Value::Object(entry)) => {
                entry.insert(key.to_string(), value);
                true
            }
            _ => false,
        }
    }

    fn remove_entry(&mut self, list: &str, index: usize) -> bool {
        let items = self.list_mut(list);
        if index < items.len() {
            items.remove(index);
            true
        } else {
            false
        }
    }

    /// Append a blank project and return its generated slug.
    pub fn add_project(&mut self) -> String {
        let projects = self.list_mut("projects");
        let stem = format!("new-project-{}", timestamp());
        let mut slug = stem.clone();
        let mut n = 1;
        while projects.iter().any(|p| p.get("slug") == Some(&Value::String(slug.clone()))) {
            n += 1;
            slug = format!("{stem}-{n}");
        }

        projects.push(json!({
            "title": "New Project",
            "slug": slug,
            "tags": [],
            "blurb": "",
            "highlights": [],
            "tech": [],
            "image": "",
            "repo": "",
            "demo": "",
        }));
        slug
    }

    pub fn update_project(&mut self, index: usize, key: &str, value: Value) -> bool {
        self.update_entry("projects", index, key, value)
    }

    pub fn remove_project(&mut self, index: usize) -> bool {
        self.remove_entry("projects", index)
    }

    /// Append a record with every field of `section` set to `""`.
    pub fn add_item(&mut self, section: RecordSection) {
        let item: Map<String, Value> = record_fields(section)
            .iter()
            .map(|field| (field.to_string(), Value::String(String::new())))
            .collect();
        self.list_mut(section.key()).push(Value::Object(item));
    }

    /// Set one field of a record. Blog tags are split on commas.
    pub fn update_item(
        &mut self,
        section: RecordSection,
        index: usize,
        key: &str,
        value: Value,
    ) -> bool {
        let value = match (section, key) {
            (RecordSection::Blog, "tags") => json!(to_string_array(Some(&value), Delimiter::Comma)),
            _ => value,
        };
        self.update_entry(section.key(), index, key, value)
    }

    pub fn remove_item(&mut self, section: RecordSection, index: usize) -> bool {
        self.remove_entry(section.key(), index)
    }

    // ------------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------------

    /// Set a palette color as typed; it is normalized on commit.
    pub fn set_theme_color(&mut self, key: PaletteKey, value: &str) {
        let theme = self
            .content
            .entry("theme")
            .or_insert_with(|| Value::Object(Map::new()));
        if !theme.is_object() {
            *theme = Value::Object(Map::new());
        }
        if let Value::Object(theme) = theme {
            theme.insert(key.as_str().to_string(), Value::String(value.to_string()));
        }
    }

    /// Restore the default palette and save it right away.
    pub fn reset_theme<S: KeyValueStore>(&mut self, provider: &ContentProvider<S>) {
        let theme = Value::Object(Theme::default().to_map());
        let mut partial = Map::new();
        partial.insert("theme".into(), theme.clone());
        provider.save_content(&partial);

        self.content.insert("theme".into(), theme);
        self.revision = Some(provider.revision());
    }

    // ------------------------------------------------------------------------
    // Skills
    // ------------------------------------------------------------------------

    fn edit_skills<T>(&mut self, f: impl FnOnce(&mut Vec<SkillCategory>) -> T) -> T {
        let mut categories = normalize_skills_draft(&self.skills, &[]);
        let out = f(&mut categories);
        self.skills = skills_to_value(&categories);
        out
    }

    /// Append an empty category and return its generated id.
    pub fn add_category(&mut self) -> String {
        let id = format!("category-{}", timestamp());
        self.edit_skills(|categories| {
            categories.push(SkillCategory {
                id: id.clone(),
                label: "New Category".into(),
                ..Default::default()
            })
        });
        id
    }

    /// Set `id` or `label` of a category.
    pub fn update_category(&mut self, index: usize, key: &str, value: &str) -> bool {
        self.edit_skills(|categories| {
            let Some(category) = categories.get_mut(index) else {
                return false;
            };
            match key {
                "id" => category.id = value.to_string(),
                "label" => category.label = value.to_string(),
                other => {
                    category
                        .extra
                        .insert(other.to_string(), Value::String(value.to_string()));
                }
            }
            true
        })
    }

    pub fn remove_category(&mut self, index: usize) -> bool {
        self.edit_skills(|categories| {
            if index < categories.len() {
                categories.remove(index);
                true
            } else {
                false
            }
        })
    }

    pub fn add_skill(&mut self, category: usize) -> bool {
        self.edit_skills(|categories| match categories.get_mut(category) {
            Some(category) => {
                category.skills.push(Skill {
                    name: "New Skill".into(),
                    level: 80,
                    ..Default::default()
                });
                true
            }
            None => false,
        })
    }

    /// Set one field of a skill. `level` is clamped to `0..=100` here.
    pub fn update_skill(&mut self, category: usize, skill: usize, key: &str, value: Value) -> bool {
        self.edit_skills(|categories| {
            let Some(skill) = categories
                .get_mut(category)
                .and_then(|c| c.skills.get_mut(skill))
            else {
                return false;
            };
            match key {
                "level" => skill.level = level_of(&value),
                "name" => skill.name = crate::content::scalar_string(&value),
                "tip" => skill.tip = crate::content::scalar_string(&value),
                other => {
                    skill.extra.insert(other.to_string(), value);
                }
            }
            true
        })
    }

    pub fn remove_skill(&mut self, category: usize, skill: usize) -> bool {
        self.edit_skills(|categories| match categories.get_mut(category) {
            Some(c) if skill < c.skills.len() => {
                c.skills.remove(skill);
                true
            }
            _ => false,
        })
    }

    // ------------------------------------------------------------------------
    // Save, export, import
    // ------------------------------------------------------------------------

    fn normalized_skills(&self) -> Vec<SkillCategory> {
        normalize_skills_draft(&self.skills, &self.fallback_skills)
    }

    /// Normalize the draft, save it to the provider and keep the normalized copy.
    pub fn commit<S: KeyValueStore>(&mut self, provider: &ContentProvider<S>) {
        let content = normalize_content_map(&self.content);
        let skills = self.normalized_skills();

        provider.save_content(&content);
        provider.update_skills(skills.clone());

        self.content = content;
        self.skills = skills_to_value(&skills);
        self.fallback_skills = skills;
        self.revision = Some(provider.revision());
    }

    /// Pretty-printed JSON of the normalized content with `skills` embedded.
    pub fn export(&self) -> String {
        let mut data = normalize_content_draft(&self.content).to_map();
        data.insert(
            SKILLS_FIELD.into(),
            skills_to_value(&self.normalized_skills()),
        );
        serde_json::to_string_pretty(&Value::Object(data)).unwrap_or_default()
    }

    /// Replace the draft from exported JSON.
    ///
    /// Accepts `{ "content": {..}, "skills": [..] }` or flat content with an
    /// embedded `skills` key. Skills are kept when the payload has none.
    /// On error the draft is left untouched.
    pub fn import(&mut self, text: &str) -> Result<(), ImportError> {
        let raw: Value = serde_json::from_str(text)?;
        let Value::Object(raw) = raw else {
            return Err(ImportError::NotAnObject);
        };

        let payload = match raw.get("content") {
            Some(Value::Object(content)) => content,
            _ => &raw,
        };
        let skills = [raw.get(SKILLS_FIELD), payload.get(SKILLS_FIELD)]
            .into_iter()
            .flatten()
            .find(|v| !matches!(v, Value::Null | Value::Bool(false)))
            .cloned();

        let mut content = payload.clone();
        content.remove(SKILLS_FIELD);
        self.content = normalize_content_map(&content);
        if let Some(skills) = skills {
            self.skills = skills_to_value(&normalize_skills_draft(&skills, &self.fallback_skills));
        }
        Ok(())
    }

    pub fn import_file(&mut self, path: &Path) -> Result<(), ImportError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ImportError::Io(path.to_path_buf(), e))?;
        self.import(&text)
    }
}
