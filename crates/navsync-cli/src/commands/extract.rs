//! Extract command implementation

use colored::Colorize;
use serde_json::json;

use crate::context::SiteContext;
use crate::error::Result;

/// Print the reference page's navigation block with active markers cleared.
pub fn run_extract(site: &SiteContext, json: bool) -> Result<()> {
    let engine = site.engine()?;
    let template = engine.extract()?;

    if json {
        let output = json!({
            "reference": engine.manifest().reference,
            "block": template.cleared(),
            "entries": template.entries(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", template.cleared());
    println!();
    println!(
        "{} {} entries in {}",
        "=>".blue().bold(),
        template.entries().len(),
        engine.manifest().reference.cyan()
    );
    for entry in template.entries() {
        let destination = entry.destination.as_deref().unwrap_or("<none>");
        println!("  {:>3}. {}", entry.index + 1, destination);
    }
    Ok(())
}
