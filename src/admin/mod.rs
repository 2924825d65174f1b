//! Content editing: loose drafts, normalization, import and export.

mod draft;
mod normalize;

pub use crate::content::clamp_number;
pub use draft::{DraftEditor, ImportError, record_fields};
pub use normalize::{
    Delimiter, format_array, normalize_content_draft, normalize_content_map,
    normalize_skills_draft, to_line_array, to_string_array,
};
