//! Sync and check command implementations

use colored::Colorize;
use serde_json::json;

use navsync_content::{CheckReport, CheckStatus, Severity, TargetStatus};
use navsync_core::{SyncOptions, SyncOutcome};

use crate::context::SiteContext;
use crate::error::{CliError, Result};

/// Run the sync command
///
/// Exits with an error when any target failed, after printing every result.
pub fn run_sync(site: &SiteContext, dry_run: bool, json: bool) -> Result<()> {
    let engine = site.engine()?;

    if !json {
        println!(
            "{} Synchronizing navigation from {}...",
            "=>".blue().bold(),
            engine.manifest().reference.cyan()
        );
    }

    let outcome = engine.sync(SyncOptions { dry_run })?;
    let report = &outcome.report;

    if json {
        let output = json!({
            "dry_run": outcome.dry_run,
            "succeeded": report.succeeded(),
            "failed": report.failed(),
            "written": outcome.written,
            "results": report.results,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_sync_outcome(&outcome);
    }

    if report.failed() > 0 {
        return Err(CliError::user(format!(
            "{} of {} document(s) could not be synchronized",
            report.failed(),
            report.results.len()
        )));
    }
    Ok(())
}

fn print_sync_outcome(outcome: &SyncOutcome) {
    let report = &outcome.report;

    for (identifier, result) in &report.results {
        if !result.success {
            let reason = result
                .reason
                .as_ref()
                .map(|r| r.to_string())
                .unwrap_or_default();
            println!(
                "  {} {} {}",
                "x".red().bold(),
                identifier.cyan(),
                format!("failed: {reason}").red()
            );
            continue;
        }

        if outcome.written.contains(identifier) {
            let label = if outcome.dry_run {
                "would update"
            } else {
                "updated"
            };
            println!("  {} {} {}", "+".green().bold(), identifier.cyan(), label.green());
        } else {
            println!("  {} {} {}", "=".dimmed(), identifier.cyan(), "unchanged".dimmed());
        }

        for notice in &result.notices {
            match notice.severity() {
                Severity::Warning => println!("      {} {}", "!".yellow(), notice.to_string().yellow()),
                Severity::Info => println!("      {} {}", "-".dimmed(), notice.to_string().dimmed()),
            }
        }
    }

    println!();
    println!(
        "Success: {}  Failed: {}",
        report.succeeded().to_string().green(),
        if report.failed() > 0 {
            report.failed().to_string().red()
        } else {
            report.failed().to_string().normal()
        }
    );

    if outcome.dry_run && !outcome.written.is_empty() {
        println!("Dry run: no files were written. Run {} to apply.", "navsync sync".cyan());
    }
}

/// Run the check command
///
/// Exits with an error unless every target is in sync.
pub fn run_check(site: &SiteContext, json: bool) -> Result<()> {
    let engine = site.engine()?;

    if !json {
        println!(
            "{} Checking navigation against {}...",
            "=>".blue().bold(),
            engine.manifest().reference.cyan()
        );
    }

    let report = engine.check()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_check_report(&report);
    }

    match report.status {
        CheckStatus::Healthy => Ok(()),
        CheckStatus::Drifted => Err(CliError::user(format!(
            "{} document(s) out of sync",
            report.count(TargetStatus::Drifted)
        ))),
        CheckStatus::Broken => Err(CliError::user(format!(
            "{} document(s) without a usable navigation block",
            report.count(TargetStatus::Missing)
        ))),
    }
}

fn print_check_report(report: &CheckReport) {
    if report.status == CheckStatus::Healthy {
        println!(
            "{} All {} document(s) match the reference.",
            "OK".green().bold(),
            report.targets.len()
        );
        return;
    }

    for (identifier, target) in &report.targets {
        match target.status {
            TargetStatus::InSync => {}
            TargetStatus::Drifted => {
                println!("  {} {}", "DRIFTED".yellow().bold(), identifier.cyan());
                for difference in &target.differences {
                    println!("      {} {}", "!".yellow(), difference);
                }
            }
            TargetStatus::Missing => {
                let reason = target
                    .reason
                    .as_ref()
                    .map(|r| r.to_string())
                    .unwrap_or_default();
                println!("  {} {}: {}", "MISSING".red().bold(), identifier.cyan(), reason);
            }
        }
    }

    println!();
    println!(
        "In sync: {}  Drifted: {}  Missing: {}",
        report.count(TargetStatus::InSync).to_string().green(),
        report.count(TargetStatus::Drifted).to_string().yellow(),
        report.count(TargetStatus::Missing).to_string().red()
    );
    println!("Run {} to repair.", "navsync sync".cyan());
}
