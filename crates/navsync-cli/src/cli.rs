//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// navsync - Propagate a reference navigation block across documentation pages
#[derive(Parser, Debug)]
#[command(name = "navsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Site root (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Manifest file (defaults to navsync.toml in the site root)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write a default manifest into the site root
    Init {
        /// Overwrite an existing manifest
        #[arg(long)]
        force: bool,
    },

    /// Copy the reference navigation block into every target page
    ///
    /// Each page gets the block with its own entry marked active. Pages
    /// whose block is missing or unbalanced are reported and left untouched.
    Sync {
        /// Preview changes without writing any file
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Report pages whose navigation block differs from the reference
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Preview what sync would change
    Diff {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical navigation block and its entries
    Extract {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_command() {
        let cli = Cli::parse_from(["navsync"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_sync_flags() {
        let cli = Cli::parse_from(["navsync", "sync", "--dry-run", "--json"]);
        assert_eq!(
            cli.command,
            Some(Commands::Sync {
                dry_run: true,
                json: true
            })
        );
    }

    #[test]
    fn parse_global_flags_after_command() {
        let cli = Cli::parse_from(["navsync", "check", "-C", "site", "--config", "nav.yaml", "-v"]);
        assert_eq!(cli.root, Some(PathBuf::from("site")));
        assert_eq!(cli.config, Some(PathBuf::from("nav.yaml")));
        assert!(cli.verbose);
        assert_eq!(cli.command, Some(Commands::Check { json: false }));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["navsync", "init", "--force"]);
        assert_eq!(cli.command, Some(Commands::Init { force: true }));
    }

    #[test]
    fn unknown_command_rejected() {
        assert!(Cli::try_parse_from(["navsync", "publish"]).is_err());
    }
}
