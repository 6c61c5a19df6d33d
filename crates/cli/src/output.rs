//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table of rows
pub fn print_table<T: Tabled>(items: &[T]) {
    if items.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    if bytes >= GB {
        format!("{:.2}Gi", bytes / GB)
    } else if bytes >= MB {
        format!("{:.2}Mi", bytes / MB)
    } else if bytes >= KB {
        format!("{:.2}Ki", bytes / KB)
    } else {
        format!("{:.0}B", bytes)
    }
}

/// Format CPU seconds
pub fn format_secs(secs: f64) -> String {
    format!("{:.3}s", secs)
}

/// Format a ratio as percentage
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format an epoch second as UTC time, falling back to the raw value
pub fn format_timestamp(timestamp: i64) -> String {
    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

/// Shorten an id to its first segment for tables
pub fn short_id(id: &str) -> String {
    id.split('-').next().unwrap_or(id).to_string()
}

/// Color utilization based on value
pub fn color_utilization(ratio: f64) -> String {
    let formatted = format_percent(ratio);
    if ratio >= 0.8 {
        formatted.red().to_string()
    } else if ratio >= 0.5 {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}
