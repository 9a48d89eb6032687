//! Terminal output for run progress and the final summary.
//!
//! Status lines go to stdout; colors are only used when stdout is a terminal.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::models::MetricsRecord;

/// Width of the summary rule
const RULE_WIDTH: usize = 50;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for the different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Format a status line, colored when `color` is set.
pub fn status_line(status: Status, msg: &str, color: bool) -> String {
    let icon = status_icon(status);
    if !color {
        return format!("{} {}", icon, msg);
    }

    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    println!("{}", status_line(status, msg, is_terminal()));
}

/// Print a numbered step header, e.g. `1. Fetching metrics...`.
pub fn print_step(number: usize, msg: &str) {
    if is_terminal() {
        println!("{} {}", format!("{}.", number).cyan().bold(), msg);
    } else {
        println!("{}. {}", number, msg);
    }
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "=".repeat(RULE_WIDTH));
}

/// Format a number with commas.
pub fn format_number(n: u64) -> String {
    n.to_string()
        .chars()
        .rev()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}

/// Summary lines listing the fetched values
pub fn summary_details(metrics: &MetricsRecord, publications: usize) -> Vec<String> {
    vec![
        format!("  - Citations: {}", format_number(metrics.citations)),
        format!("  - h-index: {}", metrics.h_index),
        format!("  - i10-index: {}", metrics.i10_index),
        format!("  - Publications: {}", publications),
    ]
}
