use console::style;

use crate::models::{Issue, ScanResult, ScanStatus};
use crate::taxonomy::Severity;

/// Render a scan result as styled terminal output.
pub fn print_result(result: &ScanResult) {
    let status = match result.status {
        ScanStatus::Safe => style(result.status.as_str()).green().bold(),
        ScanStatus::Warning => style(result.status.as_str()).yellow().bold(),
        ScanStatus::Critical => style(result.status.as_str()).red().bold(),
    };

    println!(
        "\n{} {}",
        style("Target:").dim(),
        style(&result.details.target).white().bold()
    );
    println!(
        "{} {}  {} {}",
        style("Score:").dim(),
        style(result.score).cyan().bold(),
        style("Status:").dim(),
        status
    );

    if result.issues.is_empty() {
        println!("\n  {} No issues found", style("✓").green());
    } else {
        println!();
        for issue in &result.issues {
            println!("  {} {}", severity_tag(issue), issue.message);
        }
    }

    for note in &result.details.notes {
        println!("  {} {}", style("note:").dim(), style(note).dim());
    }
    println!();
}

fn severity_tag(issue: &Issue) -> String {
    let tag = format!("[{:>8}]", issue.severity.as_str());
    match issue.severity {
        Severity::Critical => style(tag).red().bold().to_string(),
        Severity::High => style(tag).red().to_string(),
        Severity::Medium => style(tag).yellow().to_string(),
        Severity::Low => style(tag).cyan().to_string(),
        Severity::Info => style(tag).dim().to_string(),
    }
}
