//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only active with `--verbose`
//! - `Status` for user-visible outcome messages (saved, login failed, ...)
//!
//! Log lines and errors go to stderr; stdout carries command output only
//! (`resolve` and `export` print JSON there).
//!
//! # Example
//!
//! ```ignore
//! log!("content"; "resolved client {}", client_id);
//!
//! let status = Status::new();
//! status.success("content saved");
//! status.error("failed to parse JSON", &detail);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let mut stderr = stderr().lock();
    execute!(stderr, Clear(ClearType::UntilNewLine)).ok();
    write_log(&mut stderr, module, message);
}

fn write_log(out: &mut impl Write, module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "theme" => prefix.bright_blue().bold().to_string(),
        "storage" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Status (user-visible outcomes)
// ============================================================================

/// Status display for the outcome of an explicit user action.
///
/// Only explicit actions (login, import, save) report through here;
/// background degradations go through `debug!`.
#[derive(Debug, Default)]
pub struct Status;

impl Status {
    pub const fn new() -> Self {
        Self
    }

    /// Display success message (✓ prefix, green).
    pub fn success(&self, message: &str) {
        self.display(&mut stdout().lock(), format!("{}", "✓".green()), message);
    }

    /// Display error message (✗ prefix, red) with optional detail.
    pub fn error(&self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{}", detail.dimmed())
        };
        self.display(&mut stderr().lock(), format!("{}", "✗".red()), &message);
    }

    /// Display warning message (⚠ prefix, yellow).
    pub fn warning(&self, detail: &str) {
        self.display(&mut stderr().lock(), format!("{}", "⚠".yellow()), detail);
    }

    fn display(&self, out: &mut impl Write, symbol: String, message: &str) {
        writeln!(out, "{symbol} {message}").ok();
        out.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_log_line() {
        let mut out = Vec::new();
        write_log(&mut out, "theme", "wrote runtime-theme.css");
        let line = String::from_utf8(out).unwrap();
        assert!(line.contains("[theme]"));
        assert!(line.ends_with(" wrote runtime-theme.css\n"));
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn test_status_display_line() {
        let mut out = Vec::new();
        Status::new().display(&mut out, "✓".to_string(), "saved");
        assert_eq!(String::from_utf8(out).unwrap(), "✓ saved\n");
    }
}
