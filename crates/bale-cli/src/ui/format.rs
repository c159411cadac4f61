//! Formatting utilities for sizes, durations, and build summaries.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

use super::{colors_enabled, is_quiet};

/// Format file size in human-readable format.
///
/// ```
/// use bale_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use bale_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One written artifact in the build summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// Output path, relative to the project when possible
    pub path: String,
    /// `cjs` or `es`
    pub format: String,
    pub size: u64,
}

/// Render the summary lines without color.
fn summary_lines(entries: &[SummaryEntry], elapsed: Duration) -> Vec<String> {
    let mut lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "  ▸ {} [{}] {}",
                entry.path,
                entry.format,
                format_size(entry.size)
            )
        })
        .collect();
    let total: u64 = entries.iter().map(|e| e.size).sum();
    lines.push(format!(
        "  Total: {} in {}",
        format_size(total),
        format_duration(elapsed)
    ));
    lines
}

/// Print the build summary table to stderr.
pub fn print_build_summary(entries: &[SummaryEntry], elapsed: Duration) {
    if is_quiet() {
        return;
    }
    let width = (Term::stderr().size().1 as usize).min(80);
    let rule = "─".repeat(width);

    if !colors_enabled() {
        eprintln!("\nBuild Summary\n{rule}");
        for line in summary_lines(entries, elapsed) {
            eprintln!("{line}");
        }
        return;
    }

    eprintln!("\n{}", "Build Summary".bold().underline());
    eprintln!("{rule}");
    for entry in entries {
        eprintln!(
            "  {} {} {} {}",
            "▸".blue(),
            entry.path.bright_white().bold(),
            format!("[{}]", entry.format).cyan(),
            format_size(entry.size).dimmed()
        );
    }
    eprintln!("{rule}");

    let total: u64 = entries.iter().map(|e| e.size).sum();
    eprintln!(
        "  {} {} in {}",
        "Total:".bold(),
        format_size(total).green(),
        format_duration(elapsed).green()
    );
}
