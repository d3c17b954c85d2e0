//! Shared CLI output helpers.
//!
//! Human-readable output goes to stdout with colored status symbols. In JSON
//! mode each helper emits one `{"type", "payload"}` line instead, and
//! commands print their result with [`json_output`].

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use serde_json::json;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Return whether machine-readable JSON output is enabled.
#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Print a section header.
pub fn section(title: &str) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }
    println!();
    println!("{}", title.bold());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }
    println!("  {:<12} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line. Shown even in quiet mode.
pub fn warning(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }
    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if read_config().json {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }
    eprintln!("  {} {}", "×".red(), message);
}

/// Print pre-rendered multi-line content, indented.
pub fn lines(content: &str) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }
    for line in content.lines() {
        println!("  {line}");
    }
}

/// Emit a JSON value directly (for commands with custom JSON output).
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}
