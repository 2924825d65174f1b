//! Command-line interface module.

mod args;
pub mod auth;
pub mod content;
mod session;
pub mod theme;

pub use args::{Cli, Commands, ThemeAction};
pub use session::Session;
