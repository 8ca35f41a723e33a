// src/validate/report.rs
//! Terminal output for an evaluation.

use colored::Colorize;

use crate::graph::cycles;
use crate::types::{Graph, Severity, Summary, Violation};

/// Prints the violations, the distinct cycles and a one-line tally.
pub fn print_report(graph: &Graph, summary: &Summary) {
    print_header(summary);

    if summary.is_clean() {
        println!("{}", "  ✓ No dependency violations found.".green());
        return;
    }

    for violation in &summary.violations {
        print_violation(violation);
    }
    print_cycles(graph);
    print_tally(summary);
}

fn print_header(summary: &Summary) {
    println!(
        "\n{} {} modules | {} dependencies",
        "DEPFENCE".cyan().bold(),
        summary.total_cruised,
        summary.total_dependencies_cruised,
    );
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Error => severity.label().red().bold().to_string(),
        Severity::Warn => severity.label().yellow().bold().to_string(),
        Severity::Info => severity.label().blue().to_string(),
    }
}

fn print_violation(violation: &Violation) {
    let target = if violation.from == violation.to {
        String::new()
    } else {
        format!(" → {}", violation.to.red())
    };
    println!(
        "\n  {} {}: {}{}",
        severity_label(violation.severity()),
        violation.rule.name.bold(),
        violation.from,
        target
    );

    if !violation.cycle.is_empty() {
        println!("      cycle: {}", violation.cycle.join(" → ").dimmed());
    }
    if let Some(via) = violation.via.as_ref().filter(|v| v.len() > 1) {
        println!("      via: {}", via.join(" → ").dimmed());
    }
    if let Some(comment) = &violation.rule.comment {
        println!("      {}", comment.dimmed());
    }
}

fn print_cycles(graph: &Graph) {
    let found = cycles::cycles(graph);
    if found.is_empty() {
        return;
    }

    println!("\n{}", "CYCLES".yellow().bold());
    for cycle in &found {
        let first = cycle.first().map_or("", String::as_str);
        println!("  {} → {}", cycle.join(" → "), first);
    }
}

fn print_tally(summary: &Summary) {
    println!(
        "\n  {} violations ({} errors, {} warnings, {} info)",
        format_count(summary.violations.len()),
        format_count(summary.error),
        summary.warn.to_string().yellow(),
        summary.info,
    );
}

fn format_count(n: usize) -> String {
    if n == 0 {
        n.to_string().green().to_string()
    } else {
        n.to_string().red().to_string()
    }
}
