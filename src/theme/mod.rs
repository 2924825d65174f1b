//! Theme palette normalization and runtime CSS injection.
//!
//! # Module Structure
//!
//! ```text
//! theme/
//! ├── palette    # Theme, PaletteKey, normalize_theme (grayscale)
//! ├── css        # CSS variable block derivation
//! └── apply      # StyleSink + apply_theme
//! ```

mod apply;
mod css;
mod palette;

pub use apply::{FileStyleSink, MemoryStyleSink, StyleSink, THEME_STYLE_ID, apply_theme};
pub use css::build_theme_css;
pub use palette::{PaletteKey, THEME_FIELDS, Theme, normalize_theme};
