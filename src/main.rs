//! Folio - content and theme engine for a personal portfolio site.

#![allow(dead_code)]

mod admin;
mod cli;
mod config;
mod content;
mod logger;
mod provider;
mod storage;
mod theme;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, Session};
use config::FolioConfig;
use logger::Status;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if let Err(e) = run(&cli) {
        let detail = e
            .chain()
            .skip(1)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Status::new().error(&e.to_string(), &detail);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = FolioConfig::load(&cli.config)?;

    // Client resolution is the only async work; one thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let (client, url) = match &cli.command {
        Commands::Resolve { client, url } => (client.as_deref(), url.as_deref()),
        _ => (None, None),
    };
    let session = runtime.block_on(Session::open(&config, client, url))?;

    match &cli.command {
        Commands::Resolve { .. } => cli::content::resolve(&session),
        Commands::Theme { action } => cli::theme::run_theme(&session, action),
        Commands::Apply => cli::theme::apply(&session, &config),
        Commands::Export { output } => cli::content::export(&session, output.as_deref()),
        Commands::Import { file } => cli::content::import(&session, file),
        Commands::Reset => cli::content::reset(&session),
        Commands::Login { password } => cli::auth::login(&session, password),
        Commands::Logout => cli::auth::logout(&session),
    }
}
