//! Init command implementation
//!
//! Writes a manifest with the default region and marker rules.

use colored::Colorize;

use navsync_core::{DEFAULT_MANIFEST, Manifest};
use navsync_fs::{ConfigStore, io};

use crate::context::SiteContext;
use crate::error::{CliError, Result};

/// Run the init command
///
/// TOML manifests get the commented template; other formats are written
/// from the default [`Manifest`].
pub fn run_init(site: &SiteContext, force: bool) -> Result<()> {
    let path = site.manifest_path();
    if path.exists() && !force {
        return Err(CliError::user(format!(
            "{} already exists (use --force to overwrite)",
            path
        )));
    }

    println!("{} Writing {}", "=>".blue().bold(), path.as_str().cyan());

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);
    if is_toml {
        io::write_text(&path, DEFAULT_MANIFEST)?;
    } else {
        ConfigStore::new().save(&path, &Manifest::default())?;
    }

    println!(
        "{} Manifest written. Run {} to update the pages.",
        "OK".green().bold(),
        "navsync sync".cyan()
    );
    Ok(())
}
