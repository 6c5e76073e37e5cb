//! Visual styling utilities for the CLI.

use owo_colors::OwoColorize;

use tirta_types::Severity;

/// Color a label according to its severity.
pub fn format_severity_colored(label: &str, severity: Severity, no_color: bool) -> String {
    if no_color {
        return label.to_string();
    }
    match severity {
        Severity::Good => label.green().to_string(),
        Severity::Warning => label.yellow().to_string(),
        Severity::Danger => label.red().bold().to_string(),
    }
}

/// Format an alert message for terminal output.
pub fn format_alert(message: &str, no_color: bool) -> String {
    if no_color {
        format!("!! {}", message)
    } else {
        format!("{} {}", "!!".red().bold(), message.red())
    }
}

/// Get trend indicator comparing a value to the previous reading.
pub fn trend_indicator(current: f64, previous: f64, no_color: bool) -> &'static str {
    let diff = current - previous;
    if diff.abs() < 0.5 {
        "-"
    } else if diff > 0.0 {
        if no_color { "^" } else { "↑" }
    } else if no_color {
        "v"
    } else {
        "↓"
    }
}
