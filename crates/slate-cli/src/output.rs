//! CLI output formatting with colors.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables. Colors are
//! automatically disabled when output is piped.

use colored::{ColoredString, Colorize};

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    // colored handles NO_COLOR automatically, but we add explicit
    // FORCE_COLOR support
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn title(name: &str) -> ColoredString {
    name.bold()
}

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

pub fn command(name: &str) -> ColoredString {
    name.green()
}

pub fn arg(name: &str) -> ColoredString {
    name.cyan()
}
