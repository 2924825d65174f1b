//! Site content: model, bundled base layers, client overrides and merging.
//!
//! # Module Structure
//!
//! ```text
//! content/
//! ├── model      # ContentDocument, Project, SkillCategory, ...
//! ├── lenient    # Never-failing field decoders, clamp_number
//! ├── bundle     # Embedded base JSON (content/base/*.json)
//! ├── loader     # ClientId, ResourceSource, load_content
//! └── merge      # Shallow overlay, theme merge
//! ```
//!
//! # Layers
//!
//! | Layer          | Source                                   |
//! |----------------|------------------------------------------|
//! | base           | `content/base/*.json`, compiled in       |
//! | client         | `<content>/clients/<id>/*.json`, optional |
//! | local edits    | persisted `site.content` blob            |

mod bundle;
mod lenient;
mod loader;
mod merge;
mod model;

pub use bundle::{BaseContent, base_content};
pub use lenient::{clamp_number, level_of, scalar_string};
pub use loader::{
    ClientId, DirSource, LoadedContent, MemorySource, Resource, ResourceSource, load_content,
    resolve_client_id,
};
pub use merge::{merge_document, merge_theme, overlay};
pub use model::{
    About, AboutBlock, ContentDocument, Lottie, Project, Record, RecordSection, SKILLS_FIELD,
    Skill, SkillCategory, skills_from_value, skills_to_value,
};
