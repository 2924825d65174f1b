//! Runtime theme injection.
//!
//! A [`StyleSink`] holds named global style blocks. Applying a theme
//! replaces the single `runtime-theme` block, so repeated application of
//! the same theme leaves the sink unchanged.

use super::css::build_theme_css;
use super::palette::Theme;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Id of the global style block owned by the theme.
pub const THEME_STYLE_ID: &str = "runtime-theme";

/// Destination for global style blocks, keyed by id.
pub trait StyleSink: Send + Sync {
    /// Insert or replace the block `id` with `css`.
    fn inject(&self, id: &str, css: &str) -> io::Result<()>;
}

/// Writes each block to `<dir>/<id>.css`.
#[derive(Debug, Clone)]
pub struct FileStyleSink {
    dir: PathBuf,
}

impl FileStyleSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.css"))
    }
}

impl StyleSink for FileStyleSink {
    fn inject(&self, id: &str, css: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(id);
        if file_content_matches(&path, css) {
            crate::debug!("theme"; "{} unchanged, skipping write", path.display());
            return Ok(());
        }
        fs::write(&path, css)
    }
}

fn file_content_matches(path: &Path, content: &str) -> bool {
    path.exists() && fs::read_to_string(path).is_ok_and(|existing| existing == content)
}

/// In-memory sink, useful for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryStyleSink {
    blocks: Mutex<FxHashMap<String, String>>,
}

impl MemoryStyleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.blocks.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }
}

impl StyleSink for MemoryStyleSink {
    fn inject(&self, id: &str, css: &str) -> io::Result<()> {
        self.blocks.lock().insert(id.to_string(), css.to_string());
        Ok(())
    }
}

/// Derive the CSS block for `theme` and inject it into `sink`.
///
/// Never fails: sink errors are logged and dropped.
pub fn apply_theme(theme: &Theme, sink: &dyn StyleSink) {
    let css = build_theme_css(theme);
    if let Err(e) = sink.inject(THEME_STYLE_ID, &css) {
        crate::debug!("theme"; "failed to inject theme styles: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct BrokenSink;

    impl StyleSink for BrokenSink {
        fn inject(&self, _id: &str, _css: &str) -> io::Result<()> {
            Err(io::Error::other("no document"))
        }
    }

    #[test]
    fn test_apply_replaces_single_block() {
        let sink = MemoryStyleSink::new();
        apply_theme(&Theme::default(), &sink);
        let first = sink.get(THEME_STYLE_ID).unwrap();

        let mut dark = Theme::default();
        dark.primary = "#000000".into();
        apply_theme(&dark, &sink);

        assert_eq!(sink.len(), 1);
        assert_ne!(sink.get(THEME_STYLE_ID).unwrap(), first);
    }

    #[test]
    fn test_apply_idempotent() {
        let sink = MemoryStyleSink::new();
        apply_theme(&Theme::default(), &sink);
        let first = sink.get(THEME_STYLE_ID);
        apply_theme(&Theme::default(), &sink);
        assert_eq!(sink.get(THEME_STYLE_ID), first);
    }

    #[test]
    fn test_file_sink_writes_css() {
        let temp = TempDir::new().unwrap();
        let sink = FileStyleSink::new(temp.path().join("public"));
        apply_theme(&Theme::default(), &sink);

        let written = fs::read_to_string(sink.path_for(THEME_STYLE_ID)).unwrap();
        assert_eq!(written, build_theme_css(&Theme::default()));
    }

    #[test]
    fn test_broken_sink_is_ignored() {
        apply_theme(&Theme::default(), &BrokenSink);
    }
}
