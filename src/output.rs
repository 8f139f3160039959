//! Colored console output for the proposal simulator.
//!
//! Human-readable progress, separate from `tracing` diagnostics. Callers only
//! print when the environment's `logging` flag is set.
//! Color scheme: blue+bold headers, cyan values, green success,
//! red failures, yellow warnings, dimmed secondary text.

use colored::Colorize;

use crate::lifecycle::{Divergence, LifecycleError, Phase, SimulationReport, ValidationReport};
use crate::proposal::{ProposalError, RenderedDescription};
use crate::proposals::ProposalEntry;

// ── Helpers ────────────────────────────────────────────────────────

/// `"3/4 checks passed"`, singular for one check.
pub fn format_checks(report: &ValidationReport) -> String {
    let total = report.checks();
    let passed = total - report.failures().len();
    let noun = if total == 1 { "check" } else { "checks" };
    format!("{passed}/{total} {noun} passed")
}

// ── Banner ─────────────────────────────────────────────────────────

/// Print the startup banner with the simulated deployment's identity.
pub fn print_banner(network: &str, executor: &str, contracts: usize) {
    println!();
    println!("{}", "=== Proposal Simulator ===".blue().bold());
    println!("  Network:   {}", network.cyan());
    println!("  Executor:  {}", executor.cyan());
    println!("  Contracts: {}", contracts.to_string().cyan());
}

// ── Catalog ────────────────────────────────────────────────────────

/// Print the proposal catalog.
pub fn print_proposal_list(entries: &[ProposalEntry]) {
    println!("{}", "Proposals:".blue().bold());
    for entry in entries {
        println!(
            "  {} {}",
            format!("{:<24}", entry.key).cyan(),
            entry.module.description().title()
        );
    }
}

/// Print a rendered description.
pub fn print_description(rendered: &RenderedDescription) {
    println!();
    println!("{}", rendered.title.blue().bold());
    if !rendered.description.is_empty() {
        println!("  {}", rendered.description.dimmed());
    }
    for (i, command) in rendered.commands.iter().enumerate() {
        let templated = if command.templated { " (templated)".dimmed() } else { "".normal() };
        println!(
            "  {}. {}.{}({}){}",
            (i + 1).to_string().dimmed(),
            command.target.cyan(),
            command.method,
            command.arguments.join(", "),
            templated,
        );
        if command.values != "0" {
            println!("     value: {}", command.values.cyan());
        }
        if !command.description.is_empty() {
            println!("     {}", command.description.dimmed());
        }
    }
}

// ── Lifecycle ──────────────────────────────────────────────────────

/// Print that a phase is starting.
pub fn print_phase_start(phase: Phase) {
    println!();
    println!("{}", format!("[{phase}]").blue().bold());
}

/// Print that a phase completed.
pub fn print_phase_ok(phase: Phase) {
    println!("  {} {}", "OK".green().bold(), phase.as_str().dimmed());
}

/// Print a fail-fast phase error with its kind.
pub fn print_phase_failed(phase: Phase, error: &ProposalError) {
    println!(
        "  {} {} [{}] {}",
        "FAILED".red().bold(),
        phase.as_str().red(),
        error.kind().yellow(),
        error,
    );
}

/// Print a call about to be sent by a phase; `sender` is a registry name when
/// one is known.
pub fn print_command(label: &str, sender: &str) {
    println!("  {} {} {}", "→".cyan(), label.cyan(), format!("from {sender}").dimmed());
}

/// Print a declared proposal command about to be executed.
pub fn print_declared_command(label: &str, description: &str) {
    if description.is_empty() {
        println!("  {} {}", "→".cyan(), label.cyan());
    } else {
        println!("  {} {} {}", "→".cyan(), label.cyan(), description.dimmed());
    }
}

/// Print every validation result.
pub fn print_validation(report: &ValidationReport) {
    println!();
    if report.passed() {
        println!("  {} {}", "OK".green().bold(), format_checks(report));
        return;
    }
    println!("  {} {}", "FAILED".red().bold(), format_checks(report));
    for failure in report.failures() {
        println!(
            "    {} {}: expected {}, got {}",
            "✗".red(),
            failure.invariant.yellow(),
            failure.expected.cyan(),
            failure.actual.red(),
        );
    }
}

/// Print the outcome of a completed run.
pub fn print_summary(report: &SimulationReport) {
    println!();
    if report.passed() {
        println!("{} {}", "PASSED".green().bold(), report.title);
    } else {
        println!(
            "{} {} ({})",
            "FAILED".red().bold(),
            report.title,
            format_checks(&report.validation)
        );
    }
}

/// Print the outcome of an aborted run, including any checks VALIDATE
/// recorded before it failed.
pub fn print_aborted(error: &LifecycleError) {
    println!();
    println!(
        "{} {} in {} [{}]",
        "ABORTED".red().bold(),
        error.title,
        error.phase.as_str().red(),
        error.source.kind().yellow(),
    );
    if let Some(validation) = &error.validation {
        print_validation(validation);
    }
}

// ── Consistency ────────────────────────────────────────────────────

/// Print the result of a RUN-vs-description comparison.
pub fn print_divergences(title: &str, divergences: &[Divergence]) {
    if divergences.is_empty() {
        println!("  {} {} RUN matches its description", "OK".green().bold(), title.cyan());
        return;
    }
    println!(
        "  {} {} diverges from its description at {} position(s)",
        "FAILED".red().bold(),
        title.cyan(),
        divergences.len().to_string().yellow(),
    );
    for divergence in divergences {
        println!("    {} {divergence}", "✗".red());
    }
}

// ── Guardian ───────────────────────────────────────────────────────

/// Print which registry entries a guardian sweep may act on.
pub fn print_guardian(targets: &[String], exempt: &[String]) {
    println!("{}", "Guardian sweep targets:".blue().bold());
    for name in targets {
        println!("  {} {}", "•".yellow(), name.cyan());
    }
    println!("{}", "Exempt (safe addresses):".blue().bold());
    for name in exempt {
        println!("  {} {}", "•".green(), name.dimmed());
    }
}

/// Print a generic informational message.
pub fn print_info(msg: &str) {
    println!("  {} {}", "INFO".blue().bold(), msg);
}

// ── Tests ───────────────────────────────────────────────────────────
