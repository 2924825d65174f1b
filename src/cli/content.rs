//! Content commands: resolve, export, import, reset.

use super::session::Session;
use crate::admin::DraftEditor;
use crate::content::{ClientId, ContentDocument, SkillCategory};
use crate::logger::Status;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Effective site data as seen by a renderer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolved<'a> {
    content: &'a ContentDocument,
    skills: &'a [SkillCategory],
    client_id: &'a ClientId,
}

/// Print the effective content, skills and client as pretty JSON.
pub fn resolve(session: &Session) -> Result<()> {
    let state = session.provider().snapshot();
    let resolved = Resolved {
        content: &state.content,
        skills: &state.skills,
        client_id: &state.client_id,
    };
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

/// Export the normalized content with embedded skills.
pub fn export(session: &Session, output: Option<&Path>) -> Result<()> {
    let json = DraftEditor::from_provider(session.provider()).export();
    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Status::new().success(&format!("exported to {}", path.display()));
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Import an export file and save it.
pub fn import(session: &Session, file: &Path) -> Result<()> {
    session.require_auth()?;

    let provider = session.provider();
    let mut draft = DraftEditor::from_provider(provider);
    draft
        .import_file(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    draft.commit(provider);

    Status::new().success(&format!("imported {}", file.display()));
    Ok(())
}

/// Drop saved edits.
pub fn reset(session: &Session) -> Result<()> {
    session.require_auth()?;
    session.provider().reset_content();
    Status::new().success("content reset to the shipped defaults");
    Ok(())
}
