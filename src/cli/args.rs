//! Command-line interface definitions.

use crate::theme::PaletteKey;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Portfolio content and theme engine
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: folio.toml)
    #[arg(short = 'C', long, global = true, default_value = "folio.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve the effective content and print it as JSON
    #[command(visible_alias = "r")]
    Resolve {
        /// Page URL whose `client` query parameter selects the client
        #[arg(short, long, value_hint = clap::ValueHint::Url)]
        url: Option<String>,

        /// Client identifier (overrides folio.toml and FOLIO_CLIENT_ID)
        #[arg(short, long)]
        client: Option<String>,
    },

    /// Inspect or edit the theme palette
    #[command(visible_alias = "t")]
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Write runtime-theme.css for the current theme
    #[command(visible_alias = "a")]
    Apply,

    /// Export content and skills as JSON
    #[command(visible_alias = "e")]
    Export {
        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Import an exported JSON file and save it
    #[command(visible_alias = "i")]
    Import {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Discard saved edits and return to the shipped content
    Reset,

    /// Unlock editing commands (the first login sets the passphrase)
    Login { password: String },

    /// Lock editing commands
    Logout,
}

/// `theme` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ThemeAction {
    /// Print the normalized palette
    Show {
        /// Print the derived CSS variables instead
        #[arg(long)]
        css: bool,
    },

    /// Set palette colors, e.g. `primary=#333 white=#FAFAFA`
    Set {
        #[arg(value_name = "KEY=HEX", required = true, value_parser = parse_assignment)]
        colors: Vec<(PaletteKey, String)>,
    },

    /// Restore the default palette
    Reset,
}

/// Parse `key=value` into a palette key and raw color.
fn parse_assignment(raw: &str) -> Result<(PaletteKey, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=HEX, got `{raw}`"))?;
    let key = PaletteKey::parse(key.trim()).ok_or_else(|| {
        format!("unknown palette key `{key}` (expected primary, secondary, tertiary or white)")
    })?;
    Ok((key, value.trim().to_string()))
}
