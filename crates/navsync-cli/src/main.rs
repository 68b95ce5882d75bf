//! navsync CLI
//!
//! Keeps the sidebar navigation of a static documentation site in sync with
//! one reference page.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::SiteContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;
    tracing::debug!("Verbose mode enabled");

    let Some(command) = cli.command else {
        println!("{} navigation block synchronizer", "navsync".green().bold());
        println!();
        println!("Run {} for available commands.", "navsync --help".cyan());
        return Ok(());
    };

    let site = SiteContext::resolve(cli.root.as_deref(), cli.config.as_deref())?;
    execute_command(&site, command)
}

fn execute_command(site: &SiteContext, command: Commands) -> Result<()> {
    match command {
        Commands::Init { force } => commands::run_init(site, force),
        Commands::Sync { dry_run, json } => commands::run_sync(site, dry_run, json),
        Commands::Check { json } => commands::run_check(site, json),
        Commands::Diff { json } => commands::run_diff(site, json),
        Commands::Extract { json } => commands::run_extract(site, json),
    }
}
