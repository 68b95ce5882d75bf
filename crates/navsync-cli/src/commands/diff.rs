//! Diff command implementation
//!
//! Previews what sync would write without applying it.

use colored::Colorize;
use serde_json::json;

use navsync_content::FileDiff;

use crate::context::SiteContext;
use crate::error::Result;

/// Run the diff command
pub fn run_diff(site: &SiteContext, json: bool) -> Result<()> {
    let diffs = site.engine()?.diff()?;

    if json {
        let output = json!({
            "has_changes": !diffs.is_empty(),
            "files": diffs,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_diffs(&diffs);
    }

    Ok(())
}

fn print_diffs(diffs: &[FileDiff]) {
    if diffs.is_empty() {
        println!("{} No changes needed. All pages are in sync.", "OK".green().bold());
        return;
    }

    for diff in diffs {
        for line in diff.unified().lines() {
            if line.starts_with("+++") || line.starts_with("---") {
                println!("{}", line.bold());
            } else if line.starts_with("@@") {
                println!("{}", line.cyan());
            } else if line.starts_with('+') {
                println!("{}", line.green());
            } else if line.starts_with('-') {
                println!("{}", line.red());
            } else {
                println!("{line}");
            }
        }
        println!();
    }

    println!(
        "{} file(s) would change. Run {} to apply these changes.",
        diffs.len(),
        "navsync sync".cyan()
    );
}
