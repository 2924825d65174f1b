//! Theme commands.

use super::args::ThemeAction;
use super::session::Session;
use crate::admin::DraftEditor;
use crate::config::FolioConfig;
use crate::logger::Status;
use crate::theme::{FileStyleSink, PaletteKey, THEME_FIELDS, THEME_STYLE_ID, build_theme_css};
use anyhow::{Result, bail};
use serde_json::{Map, Value};
use std::fs;
use std::sync::Arc;

pub fn run_theme(session: &Session, action: &ThemeAction) -> Result<()> {
    match action {
        ThemeAction::Show { css } => show(session, *css),
        ThemeAction::Set { colors } => set(session, colors),
        ThemeAction::Reset => reset(session),
    }
}

fn show(session: &Session, css: bool) -> Result<()> {
    let theme = session.provider().theme();
    if css {
        print!("{}", build_theme_css(&theme));
    } else {
        for field in THEME_FIELDS {
            println!("{:<10} {}", field.label, theme.get(field.key));
        }
    }
    Ok(())
}

fn set(session: &Session, colors: &[(PaletteKey, String)]) -> Result<()> {
    session.require_auth()?;

    let palette: Map<String, Value> = colors
        .iter()
        .map(|(key, value)| (key.as_str().to_string(), Value::String(value.clone())))
        .collect();
    let mut partial = Map::new();
    partial.insert("theme".into(), Value::Object(palette));

    let provider = session.provider();
    provider.save_content(&partial);

    let theme = provider.theme();
    for (key, raw) in colors {
        Status::new().success(&format!("{} = {} (from {})", key.as_str(), theme.get(*key), raw));
    }
    Ok(())
}

fn reset(session: &Session) -> Result<()> {
    session.require_auth()?;
    let provider = session.provider();
    DraftEditor::from_provider(provider).reset_theme(provider);
    Status::new().success("theme reset to the default palette");
    Ok(())
}

/// Write `runtime-theme.css` for the current theme into the output dir.
pub fn apply(session: &Session, config: &FolioConfig) -> Result<()> {
    let sink = Arc::new(FileStyleSink::new(config.output_dir()));
    let provider = session.provider();
    provider.attach_styles(sink.clone());

    // Sink errors are swallowed; a stale file from an earlier run must not pass
    let path = sink.path_for(THEME_STYLE_ID);
    let expected = build_theme_css(&provider.theme());
    if fs::read_to_string(&path).ok().as_deref() != Some(expected.as_str()) {
        bail!("failed to write {}", path.display());
    }
    Status::new().success(&format!("wrote {}", path.display()));
    Ok(())
}
