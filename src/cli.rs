use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Install and remove macOS packages described by a resolved manifest.
#[derive(Parser, Debug)]
#[command(name = "caskpkg", author, version)]
pub struct Cli {
    /// Settings file (defaults to <config dir>/caskpkg/settings.json)
    #[arg(long, short = 'c', global = true, env = "CASKPKG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Log every command instead of running it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Per-command timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the native installer for every bundle in the manifest
    Install {
        /// Package manifest (JSON)
        manifest: PathBuf,
    },

    /// Run every uninstall directive in the manifest
    Uninstall {
        /// Package manifest (JSON)
        manifest: PathBuf,
    },
}

impl Commands {
    pub fn manifest(&self) -> &PathBuf {
        match self {
            Commands::Install { manifest } | Commands::Uninstall { manifest } => manifest,
        }
    }
}
